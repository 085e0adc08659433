//! HTTP client for the dogs API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace, warn};

use pawmatch_core::{ClientConfig, Cursor, Dog, DogsApi, Error, MatchResponse, Result, ResultPage, SearchTarget};

const SEARCH_PATH: &str = "/dogs/search";

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

/// Cookie-authenticated client for the dogs endpoints.
#[derive(Debug, Clone)]
pub struct HttpDogsApi {
    client: Client,
    base_url: String,
}

impl HttpDogsApi {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the underlying HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a session. The server answers with an auth cookie that the client
    /// stores and replays on every later call.
    ///
    /// # Errors
    ///
    /// [`Error::Unauthorized`] when the server rejects the credentials, transport
    /// errors otherwise.
    pub async fn login(&self, name: &str, email: &str) -> Result<()> {
        let url = self.url("/auth/login");
        let req = self.client.post(&url).json(&LoginRequest { name, email });
        send(req).await?;
        debug!(name, "logged in");
        Ok(())
    }

    /// End the session server-side. The local cookie is left to expire.
    ///
    /// # Errors
    ///
    /// Transport errors, or [`Error::Unauthorized`] if there was no session.
    pub async fn logout(&self) -> Result<()> {
        send(self.client.post(self.url("/auth/logout"))).await?;
        debug!("logged out");
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Absolute URL for a server-issued cursor, replayed byte for byte.
    ///
    /// Cursors are paths (`/dogs/search?from=25&...`); a bare query string is
    /// accepted too and sent to the search endpoint.
    fn cursor_url(&self, cursor: &Cursor) -> String {
        let raw = cursor.as_str();
        if raw.starts_with('/') {
            self.url(raw)
        } else {
            format!("{}?{}", self.url(SEARCH_PATH), raw.trim_start_matches('?'))
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = send(self.client.post(self.url(path)).json(body)).await?;
        decode(response).await
    }
}

#[async_trait]
impl DogsApi for HttpDogsApi {
    async fn breeds(&self) -> Result<Vec<String>> {
        let response = send(self.client.get(self.url("/dogs/breeds"))).await?;
        decode(response).await
    }

    async fn search(&self, target: &SearchTarget) -> Result<ResultPage> {
        let req = match target {
            SearchTarget::Query(pairs) => self.client.get(self.url(SEARCH_PATH)).query(pairs),
            SearchTarget::Cursor(cursor) => self.client.get(self.cursor_url(cursor)),
        };
        let response = send(req).await?;
        decode(response).await
    }

    async fn dogs(&self, ids: &[String]) -> Result<Vec<Dog>> {
        self.post_json("/dogs", ids).await
    }

    async fn find_match(&self, ids: &[String]) -> Result<MatchResponse> {
        self.post_json("/dogs/match", ids).await
    }
}

// ---------------------------------------------------------------------------
// Response handling
// ---------------------------------------------------------------------------

/// Send a request and turn non-2xx statuses into errors.
async fn send(req: RequestBuilder) -> Result<Response> {
    let response = req.send().await.map_err(transport_error)?;
    let status = response.status();
    trace!(url = %response.url(), %status, "response");

    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    warn!(%status, "API error");
    Err(Error::from_status(status.as_u16(), body))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await.map_err(transport_error)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout
    } else if err.is_decode() {
        Error::Malformed(err.to_string())
    } else {
        Error::Network(err.to_string())
    }
}
