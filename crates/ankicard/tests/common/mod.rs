//! Common test utilities for ankicard integration tests.

use std::time::Duration;

use ankicard::{AnkiClient, CardDefaults, Gateway};
use serde::Serialize;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate, Times};

/// Start a new mock server for testing.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Create a client connected to the mock server.
#[allow(dead_code)]
pub fn client_for_mock(server: &MockServer) -> AnkiClient {
    AnkiClient::builder()
        .url(server.uri())
        .timeout(Duration::from_millis(500))
        .build()
}

/// Create a Gateway connected to the mock server.
#[allow(dead_code)]
pub fn gateway_for_mock(server: &MockServer) -> Gateway {
    Gateway::with_connector(client_for_mock(server), CardDefaults::default())
}

/// Create a successful AnkiConnect response.
pub fn mock_anki_response<T: Serialize>(result: T) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "result": result,
        "error": null
    }))
}

/// Create an error AnkiConnect response.
#[allow(dead_code)] // Not all test files use this
pub fn mock_anki_error(error: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "result": null,
        "error": error
    }))
}

/// Mount a mock for a specific action (expect exactly 1 call).
pub async fn mock_action(server: &MockServer, action: &str, response: ResponseTemplate) {
    mock_action_times(server, action, response, 1).await;
}

/// Mount a mock for a specific action with expected call count.
pub async fn mock_action_times(
    server: &MockServer,
    action: &str,
    response: ResponseTemplate,
    times: u64,
) {
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "action": action,
            "version": 6
        })))
        .respond_with(response)
        .expect(Times::from(times))
        .mount(server)
        .await;
}

/// Mount a mock that only matches when the request body contains `body`.
#[allow(dead_code)]
pub async fn mock_request(server: &MockServer, body: serde_json::Value, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(body_partial_json(body))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}
