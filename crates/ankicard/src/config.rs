//! Gateway configuration, built once at startup.

use std::time::Duration;

use crate::card::CardDefaults;
use crate::client::{AnkiClient, DEFAULT_TIMEOUT, DEFAULT_URL};

/// Everything the gateway needs to know, passed in explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// AnkiConnect base URL.
    pub anki_url: String,
    /// Optional AnkiConnect API key.
    pub api_key: Option<String>,
    /// Bound on each HTTP request.
    pub timeout: Duration,
    /// Defaults for cards that omit deck, model, or color.
    pub defaults: CardDefaults,
}

impl GatewayConfig {
    /// Configuration for the given URL with every other setting defaulted.
    pub fn new(anki_url: impl Into<String>) -> Self {
        Self {
            anki_url: anki_url.into(),
            ..Default::default()
        }
    }

    /// Build the HTTP client this configuration describes.
    pub fn client(&self) -> AnkiClient {
        let mut builder = AnkiClient::builder()
            .url(&self.anki_url)
            .timeout(self.timeout);
        if let Some(key) = &self.api_key {
            builder = builder.api_key(key);
        }
        builder.build()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            anki_url: DEFAULT_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            defaults: CardDefaults::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.anki_url, "http://127.0.0.1:8765");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.defaults.deck, "English");
        assert_eq!(config.defaults.model, "Basic");
    }

    #[test]
    fn test_client_uses_url() {
        let config = GatewayConfig::new("http://localhost:9999");
        assert_eq!(config.client().base_url(), "http://localhost:9999");
    }
}
