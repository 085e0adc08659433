//! pawmatch CLI: search shelter dogs, curate favorites, and find a match.
//!
//! Drives `pawmatch-core` over the `pawmatch-http` transport.

mod render;
mod shell;

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use tracing::debug;

use pawmatch_core::{load_config, ClientConfig, DogsApi, FetchStatus, FilterProperty, NoopObserver, SearchSession};
use pawmatch_http::HttpDogsApi;

use crate::render::TerminalObserver;
use crate::shell::Shell;

/// pawmatch: find a shelter dog from the terminal.
#[derive(Parser)]
#[command(name = "pm", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    /// API base URL (overrides the config file)
    #[arg(long, global = true, env = "PAWMATCH_BASE_URL")]
    base_url: Option<String>,

    /// Name used to log in
    #[arg(long, global = true, env = "PAWMATCH_NAME")]
    name: Option<String>,

    /// Email used to log in
    #[arg(long, global = true, env = "PAWMATCH_EMAIL")]
    email: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List every breed the service knows
    Breeds,
    /// Run one search and print a page of results
    Search {
        /// Breed filter (repeatable, or comma-separated)
        #[arg(long = "breed", value_delimiter = ',')]
        breeds: Vec<String>,

        /// Zip code filter (repeatable, or comma-separated)
        #[arg(long = "zip", value_delimiter = ',')]
        zip_codes: Vec<String>,

        /// Minimum age (slider low handle)
        #[arg(long)]
        age_min: Option<i64>,

        /// Maximum age (slider high handle)
        #[arg(long)]
        age_max: Option<i64>,

        /// Sort tokens applied in order: breed, name, age, asc, desc
        #[arg(long)]
        sort: Vec<String>,

        /// Page to show (1-based), reached by following `next` cursors
        #[arg(long, default_value = "1")]
        page: u32,
    },
    /// Ask for a match among the given dog ids
    Match {
        /// Candidate dog ids
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Interactive session: filter, page, favorite, match
    Shell,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Login identity, from flags or environment.
#[derive(Debug, Clone)]
pub struct Credentials {
    name: Option<String>,
    email: Option<String>,
}

impl Credentials {
    pub async fn login(&self, api: &HttpDogsApi) -> Result<()> {
        let (Some(name), Some(email)) = (self.name.as_deref(), self.email.as_deref()) else {
            bail!("--name and --email (or PAWMATCH_NAME / PAWMATCH_EMAIL) are required to log in");
        };
        api.login(name, email).await.context("Login failed")
    }
}

fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let cwd = std::env::current_dir().context("Could not determine current directory")?;
    let mut config = load_config(&cwd);
    if let Some(url) = &cli.base_url {
        config.base_url = url.trim_end_matches('/').to_string();
    }
    debug!(base_url = %config.base_url, "config resolved");
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("pawmatch=warn".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell } = &cli.command {
        clap_complete::generate(*shell, &mut Cli::command(), "pm", &mut std::io::stdout());
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(run(cli, config))
}

async fn run(cli: Cli, config: ClientConfig) -> Result<()> {
    let api = HttpDogsApi::new(&config)?;
    let credentials = Credentials { name: cli.name, email: cli.email };
    credentials.login(&api).await?;

    match cli.command {
        Commands::Breeds => {
            let breeds = api.breeds().await.context("Failed to load breeds")?;
            render::print_breeds(&breeds, cli.json);
        }
        Commands::Search { breeds, zip_codes, age_min, age_max, sort, page } => {
            let mut session = SearchSession::new(&config);
            let mut observer = NoopObserver;
            if !breeds.is_empty() {
                session.set_filter(FilterProperty::Breeds, breeds);
            }
            if !zip_codes.is_empty() {
                session.set_filter(FilterProperty::ZipCodes, zip_codes);
            }
            if let Some(min) = age_min {
                session.set_age_min(min, &mut observer);
            }
            if let Some(max) = age_max {
                session.set_age_max(max, &mut observer);
            }
            for token in &sort {
                session.set_sort(token);
            }

            let mut status = session.search(&api, &mut observer).await?;
            for _ in 1..page {
                if !session.search_state().has_next() {
                    break;
                }
                status = session.next_page(&api, &mut observer).await?;
            }
            if let FetchStatus::Failed(issue) = status {
                bail!("{}. {}", issue.message, issue.hint);
            }
            let state = session.search_state();
            render::print_dogs(state.dogs(), state.total(), cli.json);
            if !cli.json {
                render::print_pager(state);
            }
        }
        Commands::Match { ids } => {
            let mut session = SearchSession::new(&config);
            let mut observer = TerminalObserver::new(cli.json);
            let candidates = api.dogs(&ids).await.context("Failed to load candidate dogs")?;
            for dog in candidates {
                session.add_favorite(dog, &mut NoopObserver);
            }
            session.find_match(&api, &mut observer).await?;
        }
        Commands::Shell => {
            Shell::new(SearchSession::new(&config), api, credentials, cli.json).run().await?;
        }
        Commands::Completions { .. } => {}
    }
    Ok(())
}
