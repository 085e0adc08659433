//! pawmatch-http: reqwest transport for the dogs search API.
//!
//! [`HttpDogsApi`] implements [`pawmatch_core::DogsApi`] over HTTPS with a cookie
//! store, so one `login` call authorizes every later request from the same client.

mod client;

pub use client::{HttpDogsApi, LoginRequest};
