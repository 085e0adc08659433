//! The capability the core consumes from its transport.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Dog, MatchResponse, ResultPage, SearchTarget};

/// Abstraction over the dogs search backend.
///
/// Implementations must carry session credentials on every call and map
/// 401/403 responses to [`crate::Error::Unauthorized`].
#[async_trait]
pub trait DogsApi: Send + Sync {
    /// `GET /dogs/breeds`
    async fn breeds(&self) -> Result<Vec<String>>;

    /// `GET /dogs/search?<query>` or the echoed cursor path.
    async fn search(&self, target: &SearchTarget) -> Result<ResultPage>;

    /// `POST /dogs` with the ids as a JSON array. Order of the response is the server's.
    async fn dogs(&self, ids: &[String]) -> Result<Vec<Dog>>;

    /// `POST /dogs/match` with the favorite ids.
    async fn find_match(&self, ids: &[String]) -> Result<MatchResponse>;
}
