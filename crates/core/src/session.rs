//! The search session: one controller that owns the query, the age slider,
//! pagination, favorites, and the last match, and is the only way a front end
//! mutates any of them.

use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::DogsApi;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::favorites::FavoritesSet;
use crate::matching::{hydrate_match, match_failure_message, request_match};
use crate::query::{FilterProperty, FilterValues, QueryState};
use crate::range::{RangeChange, RangeInput};
use crate::search::{
    bounded, execute, FetchOutcome, FetchStatus, PaginatedSearch, SearchIssue, SearchOptions, SearchTicket, Trigger,
};
use crate::types::Dog;

/// Callbacks for whatever renders the session. Every method defaults to a no-op.
pub trait SessionObserver {
    /// The age slider moved; redraw the filled track.
    fn on_range(&mut self, _change: &RangeChange) {}
    /// Displayed records were replaced.
    fn on_results(&mut self, _dogs: &[Dog], _total: u64) {}
    /// A search failed; the previous page is still displayed.
    fn on_search_issue(&mut self, _issue: &SearchIssue) {}
    fn on_favorites(&mut self, _favorites: &FavoritesSet) {}
    fn on_match(&mut self, _dog: &Dog) {}
    fn on_match_message(&mut self, _message: &str) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

#[derive(Debug, Clone)]
pub struct SearchSession {
    id: Uuid,
    query: QueryState,
    age: RangeInput,
    search: PaginatedSearch,
    favorites: FavoritesSet,
    breeds: Vec<String>,
    matched: Option<Dog>,
    match_message: Option<String>,
}

impl SearchSession {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_options(config.search_options(), config.age_min, config.age_max)
    }

    pub fn with_options(options: SearchOptions, age_min: i64, age_max: i64) -> Self {
        let id = Uuid::new_v4();
        debug!(session = %id, "search session started");
        Self {
            id,
            query: QueryState::new(),
            age: RangeInput::new(age_min, age_max),
            search: PaginatedSearch::new(options),
            favorites: FavoritesSet::new(),
            breeds: Vec::new(),
            matched: None,
            match_message: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn age(&self) -> &RangeInput {
        &self.age
    }

    pub fn search_state(&self) -> &PaginatedSearch {
        &self.search
    }

    pub fn favorites(&self) -> &FavoritesSet {
        &self.favorites
    }

    pub fn breeds(&self) -> &[String] {
        &self.breeds
    }

    pub fn matched(&self) -> Option<&Dog> {
        self.matched.as_ref()
    }

    pub fn match_message(&self) -> Option<&str> {
        self.match_message.as_deref()
    }

    // -----------------------------------------------------------------------
    // Query editing
    // -----------------------------------------------------------------------

    /// Load the breed catalogue for the filter picker.
    pub async fn load_breeds<A: DogsApi + ?Sized>(&mut self, api: &A) -> Result<&[String]> {
        self.breeds = bounded(self.request_timeout(), api.breeds()).await?;
        debug!(session = %self.id, count = self.breeds.len(), "breeds loaded");
        Ok(&self.breeds)
    }

    pub fn set_filter(&mut self, property: FilterProperty, values: impl Into<FilterValues>) {
        self.query = std::mem::take(&mut self.query).with_filter(property, values);
    }

    pub fn set_sort(&mut self, token: &str) {
        self.query = std::mem::take(&mut self.query).with_sort(token);
    }

    pub fn set_age_min(&mut self, candidate: i64, observer: &mut dyn SessionObserver) -> RangeChange {
        let change = self.age.set_min(candidate);
        self.apply_range(&change, observer);
        change
    }

    pub fn set_age_max(&mut self, candidate: i64, observer: &mut dyn SessionObserver) -> RangeChange {
        let change = self.age.set_max(candidate);
        self.apply_range(&change, observer);
        change
    }

    fn apply_range(&mut self, change: &RangeChange, observer: &mut dyn SessionObserver) {
        let min = to_age(change.selection.min);
        let max = to_age(change.selection.max);
        self.query = std::mem::take(&mut self.query).with_age_range(min, max);
        observer.on_range(change);
    }

    // -----------------------------------------------------------------------
    // Searching
    // -----------------------------------------------------------------------

    /// Search with the current query.
    pub async fn search<A: DogsApi + ?Sized>(
        &mut self,
        api: &A,
        observer: &mut dyn SessionObserver,
    ) -> Result<FetchStatus> {
        self.run(api, Trigger::Fresh, observer).await
    }

    pub async fn next_page<A: DogsApi + ?Sized>(
        &mut self,
        api: &A,
        observer: &mut dyn SessionObserver,
    ) -> Result<FetchStatus> {
        self.run(api, Trigger::Next, observer).await
    }

    pub async fn prev_page<A: DogsApi + ?Sized>(
        &mut self,
        api: &A,
        observer: &mut dyn SessionObserver,
    ) -> Result<FetchStatus> {
        self.run(api, Trigger::Prev, observer).await
    }

    /// Discard every pending filter edit, put the slider back on its endpoints,
    /// and fetch the canonical default query.
    pub async fn reset<A: DogsApi + ?Sized>(
        &mut self,
        api: &A,
        observer: &mut dyn SessionObserver,
    ) -> Result<FetchStatus> {
        self.run(api, Trigger::Reset, observer).await
    }

    /// First half of a search cycle for front ends that keep handling input while
    /// a request is in flight: issue a ticket, then run it with
    /// [`execute`](crate::search::execute) and hand the outcome to
    /// [`finish_search`](Self::finish_search).
    ///
    /// `Reset` clears the query and slider immediately. Returns `None` for
    /// `Prev`/`Next` when there is no cursor to follow.
    pub fn begin_search(&mut self, trigger: Trigger, observer: &mut dyn SessionObserver) -> Option<SearchTicket> {
        if trigger == Trigger::Reset {
            self.query = QueryState::reset();
            let change = self.age.reset();
            observer.on_range(&change);
            info!(session = %self.id, "query reset");
        }
        self.search.begin(trigger, &self.query)
    }

    /// Second half of a search cycle. Outcomes of superseded tickets come back as
    /// [`FetchStatus::Stale`] and change nothing.
    pub fn finish_search(&mut self, outcome: FetchOutcome, observer: &mut dyn SessionObserver) -> Result<FetchStatus> {
        let status = self.search.apply(outcome)?;
        match &status {
            FetchStatus::Updated { total, .. } => observer.on_results(self.search.dogs(), *total),
            FetchStatus::Failed(issue) => observer.on_search_issue(issue),
            FetchStatus::Stale | FetchStatus::Skipped => {}
        }
        Ok(status)
    }

    /// Bound applied to each request phase.
    pub fn request_timeout(&self) -> Duration {
        self.search.options().request_timeout
    }

    async fn run<A: DogsApi + ?Sized>(
        &mut self,
        api: &A,
        trigger: Trigger,
        observer: &mut dyn SessionObserver,
    ) -> Result<FetchStatus> {
        let Some(ticket) = self.begin_search(trigger, observer) else {
            return Ok(FetchStatus::Skipped);
        };
        let outcome = execute(api, &ticket, self.request_timeout()).await;
        self.finish_search(outcome, observer)
    }

    // -----------------------------------------------------------------------
    // Favorites
    // -----------------------------------------------------------------------

    pub fn add_favorite(&mut self, dog: Dog, observer: &mut dyn SessionObserver) -> bool {
        let changed = self.favorites.add(dog);
        if changed {
            observer.on_favorites(&self.favorites);
        }
        changed
    }

    /// Add a displayed record by id. Returns `false` if it is not on the current page
    /// or is already a favorite.
    pub fn add_favorite_by_id(&mut self, id: &str, observer: &mut dyn SessionObserver) -> bool {
        match self.search.find(id).cloned() {
            Some(dog) => self.add_favorite(dog, observer),
            None => {
                debug!(session = %self.id, id, "not on the current page");
                false
            }
        }
    }

    pub fn remove_favorite(&mut self, id: &str, observer: &mut dyn SessionObserver) -> bool {
        let changed = self.favorites.remove(id);
        if changed {
            observer.on_favorites(&self.favorites);
        }
        changed
    }

    pub fn toggle_favorite(&mut self, dog: Dog, add_mode: bool, observer: &mut dyn SessionObserver) -> bool {
        let changed = self.favorites.toggle(dog, add_mode);
        if changed {
            observer.on_favorites(&self.favorites);
        }
        changed
    }

    pub fn clear_favorites(&mut self, observer: &mut dyn SessionObserver) {
        self.favorites.clear();
        observer.on_favorites(&self.favorites);
    }

    // -----------------------------------------------------------------------
    // Matching
    // -----------------------------------------------------------------------

    /// Request a match for the current favorites and hydrate the result.
    ///
    /// Non-auth failures are kept as a short message on the session (and returned);
    /// favorites are never cleared.
    pub async fn find_match<A: DogsApi + ?Sized>(
        &mut self,
        api: &A,
        observer: &mut dyn SessionObserver,
    ) -> Result<Dog> {
        self.match_message = None;
        let timeout = self.request_timeout();
        let outcome = match request_match(api, &self.favorites, timeout).await {
            Ok(id) => hydrate_match(api, &id, timeout).await,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(dog) => {
                observer.on_match(&dog);
                self.matched = Some(dog.clone());
                Ok(dog)
            }
            Err(err) => {
                if !err.is_unauthorized() {
                    let message = match_failure_message(&err);
                    warn!(session = %self.id, error = %err, "match failed");
                    observer.on_match_message(&message);
                    self.match_message = Some(message);
                }
                Err(err)
            }
        }
    }

    /// Drop the short-lived match message once it has been shown.
    pub fn dismiss_match_message(&mut self) {
        self.match_message = None;
    }
}

/// Slider values are clamped to a non-negative domain before reaching the query.
fn to_age(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
