//! The AnkiConnect client, its builder, and the [`Connector`] capability.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::trace;

use crate::error::Result;
use crate::request::{AnkiRequest, AnkiResponse};

/// Default URL for AnkiConnect.
pub const DEFAULT_URL: &str = "http://127.0.0.1:8765";

/// Default timeout for requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can submit a single AnkiConnect action.
///
/// [`AnkiClient`] talks HTTP; tests substitute an in-memory fake. An
/// implementation returns `Err` only when no usable response arrived.
/// Remote errors travel inside the returned [`AnkiResponse`].
pub trait Connector: Send + Sync {
    /// Submit `action` with optional `params` and return the raw response.
    fn submit(
        &self,
        action: &str,
        params: Option<Value>,
    ) -> impl Future<Output = Result<AnkiResponse>> + Send;
}

/// HTTP client for AnkiConnect.
///
/// # Example
///
/// ```no_run
/// use ankicard::{AnkiClient, Connector};
///
/// # async fn example() -> ankicard::Result<()> {
/// let client = AnkiClient::new();
/// let raw = client.submit("version", None).await?;
/// println!("AnkiConnect version: {:?}", raw.result);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AnkiClient {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl AnkiClient {
    /// Create a new client with default settings.
    ///
    /// Connects to `http://127.0.0.1:8765` with a 10 second timeout.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for custom client configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The URL requests are posted to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Connector for AnkiClient {
    async fn submit(&self, action: &str, params: Option<Value>) -> Result<AnkiResponse> {
        let request = AnkiRequest::new(action, params, self.api_key.as_deref());
        trace!(action, url = %self.base_url, "Posting AnkiConnect request");

        let response = self
            .http_client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl Default for AnkiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating a customized [`AnkiClient`].
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use ankicard::AnkiClient;
///
/// let client = AnkiClient::builder()
///     .url("http://localhost:8765")
///     .api_key("my-secret-key")
///     .timeout(Duration::from_secs(5))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the AnkiConnect URL.
    ///
    /// Defaults to `http://127.0.0.1:8765`.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the API key for authentication.
    ///
    /// Only required if AnkiConnect is configured to require an API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 10 seconds.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    /// Build the client.
    pub fn build(self) -> AnkiClient {
        let http_client = Client::builder()
            .timeout(self.timeout)
            .build()
            .expect("Failed to build HTTP client");

        AnkiClient {
            http_client,
            base_url: self.base_url,
            api_key: self.api_key,
        }
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
