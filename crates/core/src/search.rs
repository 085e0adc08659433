//! Cursor-paginated, two-phase dog search.
//!
//! A fetch cycle first asks `/dogs/search` for a page of ids (phase A), then
//! hydrates exactly those ids with one batched `POST /dogs` (phase B). Cycles are
//! split into [`PaginatedSearch::begin`], [`execute`] and [`PaginatedSearch::apply`]
//! so a front end can keep editing while a request is outstanding: each ticket
//! carries a sequence number, and `apply` drops any outcome that is not from the
//! most recently issued ticket.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::api::DogsApi;
use crate::error::{Error, ErrorKind, Result};
use crate::query::QueryState;
use crate::types::{Cursor, Dog, ResultPage, SearchTarget};

/// Remediation shown next to a failed search.
pub const SEARCH_ISSUE_HINT: &str = "Try resetting and narrowing your search.";

/// Default bound on a single request phase.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// What started a fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Serialize the current query.
    Fresh,
    /// Serialize the canonical default query, ignoring the current one.
    Reset,
    /// Replay the stored `prev` cursor.
    Prev,
    /// Replay the stored `next` cursor.
    Next,
}

/// Session-level "search issue" flag raised when a cycle fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchIssue {
    pub kind: ErrorKind,
    pub message: String,
    pub hint: &'static str,
}

impl SearchIssue {
    fn from_error(err: &Error) -> Self {
        Self { kind: err.kind(), message: err.to_string(), hint: SEARCH_ISSUE_HINT }
    }
}

/// Handle for one in-flight fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    trigger: Trigger,
    target: SearchTarget,
}

impl SearchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    pub fn target(&self) -> &SearchTarget {
        &self.target
    }
}

/// Result of running a ticket against the backend, not yet applied to state.
#[derive(Debug)]
pub struct FetchOutcome {
    seq: u64,
    /// Present when phase A succeeded.
    page: Option<ResultPage>,
    /// Hydrated records, or the first error from either phase.
    dogs: Result<Vec<Dog>>,
}

impl FetchOutcome {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// How a cycle ended, from the caller's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// Displayed records were replaced.
    Updated { shown: usize, total: u64 },
    /// The cycle failed; the previous page is still displayed.
    Failed(SearchIssue),
    /// A newer ticket was issued; this outcome was dropped.
    Stale,
    /// `Prev`/`Next` with no stored cursor; nothing was sent.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Page size sent as `size` on fresh and reset queries. `None` leaves it to the server.
    /// Cursor replays are sent exactly as the server issued them, so `size` is
    /// never added to `Prev`/`Next` requests.
    pub page_size: Option<u32>,
    pub request_timeout: Duration,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { page_size: None, request_timeout: DEFAULT_REQUEST_TIMEOUT }
    }
}

/// Pagination state: cursors, total, displayed records, and the failure flag.
#[derive(Debug, Clone, Default)]
pub struct PaginatedSearch {
    options: SearchOptions,
    prev: Option<Cursor>,
    next: Option<Cursor>,
    total: u64,
    dogs: Vec<Dog>,
    issue: Option<SearchIssue>,
    issued: u64,
    loading: bool,
}

impl PaginatedSearch {
    pub fn new(options: SearchOptions) -> Self {
        Self { options, ..Self::default() }
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    pub fn dogs(&self) -> &[Dog] {
        &self.dogs
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn prev(&self) -> Option<&Cursor> {
        self.prev.as_ref()
    }

    pub fn next(&self) -> Option<&Cursor> {
        self.next.as_ref()
    }

    pub fn has_prev(&self) -> bool {
        self.prev.is_some()
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn issue(&self) -> Option<&SearchIssue> {
        self.issue.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Sequence number of the most recently issued ticket (0 before any fetch).
    pub fn latest_seq(&self) -> u64 {
        self.issued
    }

    /// Look up a displayed record by id.
    pub fn find(&self, id: &str) -> Option<&Dog> {
        self.dogs.iter().find(|d| d.id == id)
    }

    /// Build the request target for `trigger` and issue a new ticket.
    ///
    /// Returns `None` (and changes nothing) for `Prev`/`Next` when the matching
    /// cursor is absent.
    pub fn begin(&mut self, trigger: Trigger, query: &QueryState) -> Option<SearchTicket> {
        let target = match trigger {
            Trigger::Fresh => SearchTarget::Query(self.query_pairs(query)),
            Trigger::Reset => SearchTarget::Query(self.query_pairs(&QueryState::reset())),
            Trigger::Prev | Trigger::Next => {
                let cursor = if trigger == Trigger::Prev { &self.prev } else { &self.next };
                match cursor {
                    Some(cursor) => SearchTarget::Cursor(cursor.clone()),
                    None => {
                        debug!(?trigger, "no cursor stored, skipping fetch");
                        return None;
                    }
                }
            }
        };
        self.issued += 1;
        self.loading = true;
        debug!(seq = self.issued, ?trigger, ?target, "search ticket issued");
        Some(SearchTicket { seq: self.issued, trigger, target })
    }

    /// Fold an outcome into state. Outcomes from superseded tickets are dropped.
    ///
    /// Only a fully hydrated page replaces the displayed records, cursors and
    /// total; any failure leaves the last good page navigable as it was.
    /// Authorization failures are returned as `Err` without touching the
    /// displayed page; every other failure raises the search-issue flag.
    pub fn apply(&mut self, outcome: FetchOutcome) -> Result<FetchStatus> {
        if outcome.seq != self.issued {
            warn!(seq = outcome.seq, latest = self.issued, "discarding stale search response");
            return Ok(FetchStatus::Stale);
        }
        self.loading = false;

        match outcome.dogs {
            Ok(dogs) => {
                // Cursors and total belong to the page being shown, so they move with it.
                if let Some(page) = outcome.page {
                    self.prev = page.prev;
                    self.next = page.next;
                    self.total = page.total;
                }
                let shown = dogs.len();
                self.dogs = dogs;
                self.issue = None;
                info!(seq = outcome.seq, shown, total = self.total, "search page loaded");
                Ok(FetchStatus::Updated { shown, total: self.total })
            }
            Err(err) if err.is_unauthorized() => {
                warn!(seq = outcome.seq, "search rejected: not authorized");
                Err(err)
            }
            Err(err) => {
                warn!(seq = outcome.seq, error = %err, "search failed, keeping previous page");
                let issue = SearchIssue::from_error(&err);
                self.issue = Some(issue.clone());
                Ok(FetchStatus::Failed(issue))
            }
        }
    }

    /// Run one full cycle: `begin`, `execute`, `apply`.
    pub async fn fetch<A>(&mut self, api: &A, trigger: Trigger, query: &QueryState) -> Result<FetchStatus>
    where
        A: DogsApi + ?Sized,
    {
        let Some(ticket) = self.begin(trigger, query) else {
            return Ok(FetchStatus::Skipped);
        };
        let outcome = execute(api, &ticket, self.options.request_timeout).await;
        self.apply(outcome)
    }

    /// Clear the failure flag (e.g. after the user acknowledged it).
    pub fn dismiss_issue(&mut self) {
        self.issue = None;
    }

    fn query_pairs(&self, query: &QueryState) -> Vec<(String, String)> {
        let mut pairs = query.to_query_pairs();
        if let Some(size) = self.options.page_size {
            pairs.push(("size".to_string(), size.to_string()));
        }
        pairs
    }
}

/// Run both phases for `ticket`. Does not touch any state, so it can be awaited
/// while the owner keeps handling other events.
pub async fn execute<A>(api: &A, ticket: &SearchTicket, timeout: Duration) -> FetchOutcome
where
    A: DogsApi + ?Sized,
{
    let seq = ticket.seq;
    let page = match bounded(timeout, api.search(&ticket.target)).await {
        Ok(page) => page,
        Err(err) => return FetchOutcome { seq, page: None, dogs: Err(err) },
    };

    let dogs = if page.ids.is_empty() {
        debug!(seq, "empty result page, skipping hydration");
        Ok(Vec::new())
    } else {
        bounded(timeout, api.dogs(&page.ids)).await
    };

    FetchOutcome { seq, page: Some(page), dogs }
}

/// Bound a request future; expiry becomes [`Error::Timeout`].
pub(crate) async fn bounded<T, F>(limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(limit, fut).await.map_err(|_| Error::Timeout)?
}
