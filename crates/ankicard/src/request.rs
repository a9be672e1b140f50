//! Request and response types for the AnkiConnect protocol.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// The AnkiConnect API version every request targets.
pub const API_VERSION: u8 = 6;

/// The request format expected by AnkiConnect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnkiRequest<'a> {
    /// The action to perform.
    pub action: &'a str,
    /// The API version (always 6).
    pub version: u8,
    /// Optional API key for authentication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<&'a str>,
    /// Parameters for the action. Omitted for parameterless actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl<'a> AnkiRequest<'a> {
    /// Create a new request.
    pub fn new(action: &'a str, params: Option<Value>, key: Option<&'a str>) -> Self {
        Self {
            action,
            version: API_VERSION,
            key,
            params,
        }
    }
}

/// The raw response returned by AnkiConnect.
///
/// A `null` result deserializes to `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AnkiResponse {
    /// The result of the action, if successful.
    #[serde(default)]
    pub result: Option<Value>,
    /// The error message, if the action failed.
    #[serde(default)]
    pub error: Option<String>,
}

impl AnkiResponse {
    /// Build a successful response.
    pub fn ok(result: impl Into<Value>) -> Self {
        let result = match result.into() {
            Value::Null => None,
            value => Some(value),
        };
        Self {
            result,
            error: None,
        }
    }

    /// Build an error response.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(message.into()),
        }
    }

    /// Split the response into the result or the remote error.
    ///
    /// A non-null `error` always wins, even when a result is also present.
    pub fn into_result(self) -> Result<Option<Value>> {
        match self.error {
            Some(err) => Err(Error::AnkiConnect(err)),
            None => Ok(self.result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let request = AnkiRequest::new("deckNames", None, None);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, json!({"action": "deckNames", "version": 6}));
    }

    #[test]
    fn test_request_with_params_and_key() {
        let request = AnkiRequest::new("createDeck", Some(json!({"deck": "Verbs"})), Some("secret"));
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "action": "createDeck",
                "version": 6,
                "key": "secret",
                "params": {"deck": "Verbs"}
            })
        );
    }

    #[test]
    fn test_response_error_wins() {
        let raw: AnkiResponse =
            serde_json::from_value(json!({"result": null, "error": "deck not found"})).unwrap();
        let err = raw.into_result().unwrap_err();
        assert!(matches!(err, Error::AnkiConnect(ref msg) if msg == "deck not found"));
    }

    #[test]
    fn test_response_null_result() {
        let raw: AnkiResponse =
            serde_json::from_value(json!({"result": null, "error": null})).unwrap();
        assert_eq!(raw.into_result().unwrap(), None);
    }

    #[test]
    fn test_response_ok_helper() {
        assert_eq!(AnkiResponse::ok(json!([1, 2])).result, Some(json!([1, 2])));
        assert_eq!(AnkiResponse::ok(Value::Null).result, None);
    }
}
