//! Interactive shell: one line per command, driving a single `SearchSession`.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use pawmatch_core::{FilterProperty, SearchSession};
use pawmatch_http::HttpDogsApi;

use crate::render::{self, TerminalObserver};
use crate::Credentials;

const HELP: &str = "\
commands:
  breeds                      list known breeds
  breed <a,b,...>             filter by breeds (empty clears)
  zip <z1,z2,...>             filter by zip codes (empty clears)
  age-min <n> | age-max <n>   move the age slider handles
  sort <breed|name|age|asc|desc>
  search | next | prev | reset
  fav <id> | unfav <id> | favs | clear-favs
  match                       find a match among favorites
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Breeds,
    Filter(FilterProperty, String),
    AgeMin(i64),
    AgeMax(i64),
    Sort(String),
    Search,
    Next,
    Prev,
    Reset,
    Fav(String),
    Unfav(String),
    Favs,
    ClearFavs,
    Match,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse one input line. `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let cmd = match head {
            "breeds" => ShellCommand::Breeds,
            "breed" => ShellCommand::Filter(FilterProperty::Breeds, rest.to_string()),
            "zip" => ShellCommand::Filter(FilterProperty::ZipCodes, rest.to_string()),
            "age-min" => ShellCommand::AgeMin(number(rest)?),
            "age-max" => ShellCommand::AgeMax(number(rest)?),
            "sort" => ShellCommand::Sort(required(head, rest)?),
            "search" | "s" => ShellCommand::Search,
            "next" | "n" => ShellCommand::Next,
            "prev" | "p" => ShellCommand::Prev,
            "reset" => ShellCommand::Reset,
            "fav" => ShellCommand::Fav(required(head, rest)?),
            "unfav" => ShellCommand::Unfav(required(head, rest)?),
            "favs" => ShellCommand::Favs,
            "clear-favs" => ShellCommand::ClearFavs,
            "match" => ShellCommand::Match,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => return Err(format!("unknown command '{other}' (try 'help')")),
        };
        Ok(Some(cmd))
    }

    fn needs_network(&self) -> bool {
        matches!(
            self,
            ShellCommand::Breeds
                | ShellCommand::Search
                | ShellCommand::Next
                | ShellCommand::Prev
                | ShellCommand::Reset
                | ShellCommand::Match
        )
    }
}

fn number(arg: &str) -> std::result::Result<i64, String> {
    arg.parse().map_err(|_| format!("expected a number, got '{arg}'"))
}

fn required(cmd: &str, arg: &str) -> std::result::Result<String, String> {
    if arg.is_empty() {
        Err(format!("'{cmd}' needs an argument"))
    } else {
        Ok(arg.to_string())
    }
}

pub struct Shell {
    session: SearchSession,
    api: HttpDogsApi,
    credentials: Credentials,
    observer: TerminalObserver,
    json: bool,
}

impl Shell {
    pub fn new(session: SearchSession, api: HttpDogsApi, credentials: Credentials, json: bool) -> Self {
        Self { session, api, credentials, observer: TerminalObserver::new(json), json }
    }

    pub async fn run(mut self) -> Result<()> {
        eprintln!("pawmatch shell (session {}). Type 'help' for commands.", self.session.id());
        let stdin = std::io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            eprint!("pm> ");
            std::io::stderr().flush().ok();
            let Some(line) = lines.next() else { break };
            let line = line.context("Failed to read from stdin")?;

            let cmd = match ShellCommand::parse(&line) {
                Ok(Some(cmd)) => cmd,
                Ok(None) => continue,
                Err(msg) => {
                    eprintln!("{msg}");
                    continue;
                }
            };
            if cmd == ShellCommand::Quit {
                break;
            }
            self.execute(&cmd).await?;
        }
        Ok(())
    }

    /// Run one command, logging in again once if the session cookie has expired.
    async fn execute(&mut self, cmd: &ShellCommand) -> Result<()> {
        match self.dispatch(cmd).await {
            Err(err) if err.is_unauthorized() && cmd.needs_network() => {
                warn!(error = %err, "session expired, logging in again");
                self.credentials.login(&self.api).await?;
                self.dispatch(cmd).await.context("Still not authorized after logging in again")
            }
            Err(err) if err.is_unauthorized() => Err(err.into()),
            Err(err) => {
                // Search and match failures were already reported through the observer.
                debug!(error = %err, "command failed");
                Ok(())
            }
            Ok(()) => Ok(()),
        }
    }

    async fn dispatch(&mut self, cmd: &ShellCommand) -> pawmatch_core::Result<()> {
        let observer = &mut self.observer;
        match cmd {
            ShellCommand::Breeds => {
                let breeds = self.session.load_breeds(&self.api).await?;
                render::print_breeds(breeds, self.json);
            }
            ShellCommand::Filter(property, values) => {
                self.session.set_filter(*property, values.as_str());
            }
            ShellCommand::AgeMin(v) => {
                self.session.set_age_min(*v, observer);
            }
            ShellCommand::AgeMax(v) => {
                self.session.set_age_max(*v, observer);
            }
            ShellCommand::Sort(token) => {
                self.session.set_sort(token);
                eprintln!("sort: {}", self.session.query().sort());
            }
            ShellCommand::Search => {
                self.session.search(&self.api, observer).await?;
                render::print_pager(self.session.search_state());
            }
            ShellCommand::Next => {
                self.session.next_page(&self.api, observer).await?;
                render::print_pager(self.session.search_state());
            }
            ShellCommand::Prev => {
                self.session.prev_page(&self.api, observer).await?;
                render::print_pager(self.session.search_state());
            }
            ShellCommand::Reset => {
                self.session.reset(&self.api, observer).await?;
                render::print_pager(self.session.search_state());
            }
            ShellCommand::Fav(id) => {
                if !self.session.add_favorite_by_id(id, observer) {
                    eprintln!("'{id}' is not on this page or is already a favorite");
                }
            }
            ShellCommand::Unfav(id) => {
                if !self.session.remove_favorite(id, observer) {
                    eprintln!("'{id}' is not a favorite");
                }
            }
            ShellCommand::Favs => render::print_favorites(self.session.favorites(), self.json),
            ShellCommand::ClearFavs => self.session.clear_favorites(observer),
            ShellCommand::Match => {
                self.session.find_match(&self.api, observer).await?;
                self.session.dismiss_match_message();
            }
            ShellCommand::Help => eprintln!("{HELP}"),
            ShellCommand::Quit => {}
        }
        Ok(())
    }
}
