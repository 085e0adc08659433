//! Client configuration: `.pawmatch.toml` in the working directory, falling back
//! to `~/.pawmatch/config.toml`, merged over built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, warn};

use crate::search::SearchOptions;

/// Public dogs API used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://frontend-take-home-service.fetch.com";

/// Local config file name, looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".pawmatch.toml";

/// Known keys in the config file, for validation.
const KNOWN_CONFIG_KEYS: &[&str] =
    &["base_url", "request_timeout_secs", "page_size", "age_min", "age_max"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// `size` sent with fresh searches. `None` lets the server pick (25).
    pub page_size: Option<u32>,
    /// Age slider domain.
    pub age_min: i64,
    pub age_max: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
            page_size: None,
            age_min: 0,
            age_max: 20,
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions { page_size: self.page_size, request_timeout: self.request_timeout() }
    }

    /// Merge keys from a TOML document over `self`. Unknown keys and values of the
    /// wrong type are logged and skipped.
    pub fn merge_toml(mut self, content: &str) -> Self {
        let table = match content.parse::<toml::Table>() {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "Ignoring unparseable pawmatch config");
                return self;
            }
        };

        for key in table.keys() {
            if !KNOWN_CONFIG_KEYS.contains(&key.as_str()) {
                match KNOWN_CONFIG_KEYS.iter().min_by_key(|k| edit_distance(key, k)) {
                    Some(suggestion) if edit_distance(key, suggestion) <= 3 => warn!(
                        key = key.as_str(),
                        suggestion = *suggestion,
                        "Unknown key in pawmatch config, did you mean '{suggestion}'?"
                    ),
                    _ => warn!(
                        key = key.as_str(),
                        "Unknown key in pawmatch config (known keys: {})",
                        KNOWN_CONFIG_KEYS.join(", ")
                    ),
                }
            }
        }

        if let Some(url) = table.get("base_url").and_then(|v| v.as_str()) {
            self.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = positive_int(&table, "request_timeout_secs") {
            self.request_timeout_secs = secs as u64;
        }
        if let Some(size) = positive_int(&table, "page_size") {
            self.page_size = u32::try_from(size).ok();
        }
        if let Some(min) = table.get("age_min").and_then(|v| v.as_integer()) {
            self.age_min = min;
        }
        if let Some(max) = table.get("age_max").and_then(|v| v.as_integer()) {
            self.age_max = max;
        }
        if self.age_min > self.age_max {
            warn!(age_min = self.age_min, age_max = self.age_max, "age bounds reversed, swapping");
            std::mem::swap(&mut self.age_min, &mut self.age_max);
        }
        self
    }
}

fn positive_int(table: &toml::Table, key: &str) -> Option<i64> {
    let value = table.get(key)?;
    match value.as_integer() {
        Some(n) if n > 0 => Some(n),
        _ => {
            warn!(key, value = %value, "expected a positive integer, ignoring");
            None
        }
    }
}

/// Load configuration for a client started in `cwd`.
///
/// The local `.pawmatch.toml` wins over the user-level file; neither is required.
pub fn load_config(cwd: &Path) -> ClientConfig {
    let candidates = [Some(cwd.join(LOCAL_CONFIG_FILE)), config_dir().map(|d| d.join("config.toml"))];
    for path in candidates.into_iter().flatten() {
        if !path.exists() {
            continue;
        }
        debug!(path = %path.display(), "Loading pawmatch config");
        match std::fs::read_to_string(&path) {
            Ok(content) => return ClientConfig::default().merge_toml(&content),
            Err(e) => warn!(path = %path.display(), error = %e, "Could not read config"),
        }
    }
    ClientConfig::default()
}

/// Platform-aware home directory: `HOME` on Unix, `USERPROFILE` on Windows.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")).ok().map(PathBuf::from)
}

/// Platform-aware config directory: `~/.pawmatch` on Unix, `%APPDATA%/pawmatch` on Windows.
pub fn config_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        std::env::var("APPDATA").ok().map(|a| PathBuf::from(a).join("pawmatch"))
    } else {
        home_dir().map(|h| h.join(".pawmatch"))
    }
}

/// Simple Levenshtein edit distance for typo suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
