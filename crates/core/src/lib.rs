//! pawmatch core: the stateful logic behind a shelter-dog search client.
//!
//! # Modules
//!
//! - [`range`]: Two-handle age slider that never lets its handles cross
//! - [`query`]: Accumulated filter/sort specification and its query-string form
//! - [`search`]: Two-phase, cursor-paginated search with stale-response discarding
//! - [`favorites`]: Deduplicated, breed-sorted favorites
//! - [`matching`]: Favorites → single match, plus hydration of the matched record
//! - [`session`]: The controller that owns all of the above
//! - [`api`]: The transport capability the core consumes
//! - [`config`]: `.pawmatch.toml` loading
//! - [`error`]: Error taxonomy
//! - [`types`]: Wire and domain types

pub mod api;
pub mod config;
pub mod error;
pub mod favorites;
pub mod matching;
pub mod query;
pub mod range;
pub mod search;
pub mod session;
pub mod types;

pub use api::DogsApi;
pub use config::{load_config, ClientConfig};
pub use error::{Error, ErrorKind, Result};
pub use favorites::FavoritesSet;
pub use query::{FilterProperty, QueryState};
pub use range::{RangeChange, RangeInput, RangeSelection, TrackGeometry};
pub use search::{FetchOutcome, FetchStatus, PaginatedSearch, SearchIssue, SearchOptions, SearchTicket, Trigger};
pub use session::{NoopObserver, SearchSession, SessionObserver};
pub use types::{Cursor, Dog, MatchResponse, ResultPage, SearchTarget, Sort, SortDirection, SortField};
