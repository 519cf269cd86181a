//! Motivational quote retrieval.
//!
//! Fetches a random quote over HTTP and decodes the two fields the UI
//! shows. Every failure mode folds into [`QuoteError`] so callers see a
//! plain success-or-failure result and can fall back to showing nothing.

use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::QuoteError;

/// Default quote endpoint.
pub const DEFAULT_QUOTE_ENDPOINT: &str = "https://api.quotable.io/random";

/// One quote, as shown in the UI.
///
/// The wire payload carries more fields (tags, lengths, ids); everything
/// but the text and attribution is ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub content: String,
    pub author: String,
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} — {}", self.content, self.author)
    }
}

/// Outcome of a quote fetch.
pub type QuoteResult = Result<Quote, QuoteError>;

/// HTTP client for the quote endpoint.
#[derive(Debug, Clone)]
pub struct QuoteService {
    client: Client,
    endpoint: String,
}

impl QuoteService {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            endpoint: DEFAULT_QUOTE_ENDPOINT.to_string(),
        }
    }

    /// Point the service at a different endpoint, e.g. a local mock
    /// server in tests.
    pub fn with_endpoint(endpoint: Url) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Fetch one random quote.
    pub async fn fetch(&self) -> QuoteResult {
        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            debug!("quote endpoint returned {status}");
            return Err(QuoteError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| QuoteError::Decode(e.to_string()))
    }

    /// Run the fetch on a background task.
    ///
    /// The returned handle can be awaited for the result or dropped to
    /// abandon the request.
    pub fn spawn_fetch(&self) -> QuoteTask {
        let service = self.clone();
        let handle = tokio::spawn(async move { service.fetch().await });
        QuoteTask {
            handle: Some(handle),
        }
    }
}

impl Default for QuoteService {
    fn default() -> Self {
        Self::new()
    }
}

/// In-flight quote fetch.
///
/// Dropping the task aborts the underlying request.
pub struct QuoteTask {
    handle: Option<tokio::task::JoinHandle<QuoteResult>>,
}

impl QuoteTask {
    /// Wait for the fetch to finish. A cancelled task yields
    /// [`QuoteError::Cancelled`].
    pub async fn result(mut self) -> QuoteResult {
        match self.handle.take() {
            Some(handle) => handle.await.unwrap_or(Err(QuoteError::Cancelled)),
            None => Err(QuoteError::Cancelled),
        }
    }

    /// Abort the in-flight request.
    pub fn cancel(&self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }
}

impl Drop for QuoteTask {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}
