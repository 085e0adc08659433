//! Turning a favorites set into a single match.

use std::time::Duration;

use tracing::{debug, info};

use crate::api::DogsApi;
use crate::error::{Error, Result};
use crate::favorites::FavoritesSet;
use crate::search::bounded;
use crate::types::Dog;

/// Shown when "find match" is pressed with nothing selected.
pub const EMPTY_FAVORITES_MESSAGE: &str = "Add at least one dog to your favorites before matching.";

/// Ask the server to pick one dog out of `favorites`.
///
/// Fails with [`Error::Validation`] before any request when the set is empty,
/// and with [`Error::NoMatch`] when the server answers `{}`.
pub async fn request_match<A>(api: &A, favorites: &FavoritesSet, timeout: Duration) -> Result<String>
where
    A: DogsApi + ?Sized,
{
    if favorites.is_empty() {
        return Err(Error::Validation(EMPTY_FAVORITES_MESSAGE.to_string()));
    }
    let ids = favorites.ids();
    debug!(count = ids.len(), "requesting match");

    let response = bounded(timeout, api.find_match(&ids)).await?;
    match response.matched {
        Some(id) if !id.is_empty() => {
            info!(id = %id, "match found");
            Ok(id)
        }
        _ => Err(Error::NoMatch),
    }
}

/// Fetch the full record for a matched id through the batch record endpoint.
pub async fn hydrate_match<A>(api: &A, id: &str, timeout: Duration) -> Result<Dog>
where
    A: DogsApi + ?Sized,
{
    let mut dogs = bounded(timeout, api.dogs(&[id.to_string()])).await?;
    match dogs.iter().position(|d| d.id == id) {
        Some(pos) => Ok(dogs.swap_remove(pos)),
        None => Err(Error::Malformed(format!("record for matched id {id} missing from response"))),
    }
}

/// Short user-facing message for a failed match attempt.
pub fn match_failure_message(err: &Error) -> String {
    match err {
        Error::Validation(msg) => msg.clone(),
        Error::NoMatch => "No match found this time. Adjust your favorites and try again.".to_string(),
        Error::Unauthorized { .. } => "Your session has expired. Please log in again.".to_string(),
        other => format!("Could not reach the matching service ({other}). Please try again."),
    }
}
