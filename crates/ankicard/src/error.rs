//! Error types for the ankicard crate.
//!
//! Errors fall into three groups:
//!
//! - **Validation**: the tool input was rejected before anything was sent
//! - **Remote**: AnkiConnect answered with an error string
//! - **Transport**: no usable answer arrived (connection refused, timeout,
//!   non-2xx status, another HTTP failure, or a body that is not the
//!   expected JSON)
//!
//! [`Error::kind`] collapses a concrete error into the [`ErrorKind`] that
//! failure envelopes report to callers.
//!
//! # Example
//!
//! ```no_run
//! use ankicard::{AnkiClient, Connector, Error};
//!
//! # async fn example() {
//! let client = AnkiClient::new();
//!
//! match client.submit("deckNames", None).await {
//!     Ok(raw) => println!("raw result: {:?}", raw.result),
//!     Err(Error::ConnectionRefused) => {
//!         eprintln!("Please start Anki with AnkiConnect installed");
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! # }
//! ```

use serde::Serialize;
use thiserror::Error;

/// The error type for gateway and AnkiConnect operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The tool input failed validation. Nothing was sent to AnkiConnect.
    #[error("{0}")]
    Validation(String),

    /// AnkiConnect returned an error message.
    ///
    /// Common messages include:
    /// - "cannot create note because it is a duplicate"
    /// - "deck was not found"
    /// - "model was not found"
    #[error("{0}")]
    AnkiConnect(String),

    /// The requested note type does not exist in the collection.
    #[error("Model '{model}' not found. Available models: {}", .available.join(", "))]
    ModelNotFound {
        /// The model that was asked for.
        model: String,
        /// The models the collection does have.
        available: Vec<String>,
    },

    /// Connection refused - Anki is likely not running.
    ///
    /// This error occurs when:
    /// - Anki is not running
    /// - The AnkiConnect add-on is not installed
    /// - AnkiConnect is configured on a different port
    #[error(
        "Failed to connect to AnkiConnect. Make sure Anki is running with AnkiConnect add-on enabled."
    )]
    ConnectionRefused,

    /// The request did not complete within the configured timeout.
    #[error("AnkiConnect did not respond in time")]
    Timeout,

    /// AnkiConnect answered with a non-success HTTP status.
    #[error("AnkiConnect returned HTTP status {0}")]
    Status(u16),

    /// Any other HTTP/network error from reqwest.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// The response body was not valid AnkiConnect JSON, or the result did
    /// not have the expected shape.
    #[error("Malformed AnkiConnect response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The action succeeded but carried no result where one is required.
    #[error("{0}")]
    EmptyResult(String),
}

impl Error {
    /// Classify this error for a failure envelope.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::AnkiConnect(_) | Error::ModelNotFound { .. } => ErrorKind::Remote,
            Error::ConnectionRefused => ErrorKind::Unreachable,
            Error::Timeout => ErrorKind::Timeout,
            Error::Status(_) => ErrorKind::HttpStatus,
            Error::Http(_) => ErrorKind::Transport,
            Error::Malformed(_) | Error::EmptyResult(_) => ErrorKind::MalformedResponse,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Error::ConnectionRefused
        } else if err.is_timeout() {
            Error::Timeout
        } else if let Some(status) = err.status() {
            Error::Status(status.as_u16())
        } else {
            Error::Http(err)
        }
    }
}

/// Error classification reported in failure envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input rejected before any network call.
    Validation,
    /// AnkiConnect reported an error.
    Remote,
    /// AnkiConnect could not be reached.
    Unreachable,
    /// AnkiConnect did not answer in time.
    Timeout,
    /// AnkiConnect answered with a non-success status.
    HttpStatus,
    /// The request failed for another HTTP reason (bad URL, broken
    /// connection, redirect loop).
    Transport,
    /// The answer could not be understood.
    MalformedResponse,
}

/// A specialized Result type for ankicard operations.
pub type Result<T> = std::result::Result<T, Error>;
