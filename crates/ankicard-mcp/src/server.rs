//! MCP tool surface for card creation.

use std::sync::Arc;

use ankicard::{CardRequest, ColorInput, Envelope, Gateway};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars, tool, tool_handler, tool_router,
};
use serde::Serialize;
use tracing::debug;

// ============================================================================
// Parameter Types
// ============================================================================

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub(crate) struct AddCardParams {
    /// Front side text
    front: String,
    /// Back side text
    back: String,
    /// Deck name (default: "English"). Created if it does not exist.
    #[serde(default)]
    deck: Option<String>,
    /// Note type (model) name (default: "Basic")
    #[serde(default)]
    model: Option<String>,
    /// Space-separated tags for the card (e.g., "vocab jlpt-n5")
    #[serde(default)]
    tags: String,
    /// Words to highlight on the front side (case-sensitive)
    #[serde(default)]
    highlight_front: Vec<String>,
    /// Words to highlight on the back side (case-sensitive)
    #[serde(default)]
    highlight_back: Vec<String>,
    /// Highlight background color (default: {"Red": 255, "Green": 255, "Blue": 180})
    #[serde(default)]
    highlight_color: Option<HighlightColor>,
}

/// Wire shape of [`ColorInput`], redeclared here so the library does not
/// need a `schemars` dependency for the tool schema. Keep the keys in sync.
#[derive(Debug, Clone, Copy, serde::Deserialize, schemars::JsonSchema)]
pub(crate) struct HighlightColor {
    /// Red channel, 0-255
    #[serde(rename = "Red", alias = "red")]
    red: i64,
    /// Green channel, 0-255
    #[serde(rename = "Green", alias = "green")]
    green: i64,
    /// Blue channel, 0-255
    #[serde(rename = "Blue", alias = "blue")]
    blue: i64,
}

impl From<AddCardParams> for CardRequest {
    fn from(params: AddCardParams) -> Self {
        CardRequest {
            front: params.front,
            back: params.back,
            deck: params.deck,
            model: params.model,
            tags: params.tags,
            highlight_front: params.highlight_front,
            highlight_back: params.highlight_back,
            highlight_color: params.highlight_color.map(|c| ColorInput {
                red: c.red,
                green: c.green,
                blue: c.blue,
            }),
        }
    }
}

// ============================================================================
// Server Implementation
// ============================================================================

#[derive(Clone)]
pub(crate) struct CardServer {
    gateway: Arc<Gateway>,
    tool_router: ToolRouter<CardServer>,
}

impl CardServer {
    pub(crate) fn new(gateway: Gateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
            tool_router: Self::tool_router(),
        }
    }
}

/// Render an envelope as the tool's JSON text output.
///
/// Failure envelopes are flagged as tool errors so clients can tell them
/// apart without parsing.
fn respond<T: Serialize>(envelope: &Envelope<T>) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(envelope)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    let content = vec![Content::text(text)];
    if envelope.is_success() {
        Ok(CallToolResult::success(content))
    } else {
        Ok(CallToolResult::error(content))
    }
}

#[tool_router]
impl CardServer {
    #[tool(
        description = "Add a new card to Anki. Optionally highlights words on the front or back with a background color. Creates the deck if it does not exist."
    )]
    async fn add_anki_card(
        &self,
        Parameters(params): Parameters<AddCardParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!(deck = ?params.deck, model = ?params.model, "add_anki_card called");
        respond(&self.gateway.add_card(params.into()).await)
    }

    #[tool(description = "List all Anki decks with their card and note counts.")]
    async fn list_anki_decks(&self) -> Result<CallToolResult, McpError> {
        debug!("list_anki_decks called");
        respond(&self.gateway.list_decks().await)
    }

    #[tool(description = "List all Anki note types (models).")]
    async fn list_anki_models(&self) -> Result<CallToolResult, McpError> {
        debug!("list_anki_models called");
        respond(&self.gateway.list_models().await)
    }

    #[tool(
        description = "Get general information about the Anki collection: note, card, deck and model counts plus deck and model names."
    )]
    async fn get_anki_info(&self) -> Result<CallToolResult, McpError> {
        debug!("get_anki_info called");
        respond(&self.gateway.collection_info().await)
    }
}

#[tool_handler]
impl ServerHandler for CardServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Anki card creation via AnkiConnect. \
                 Requires Anki to be running with the AnkiConnect add-on installed. \
                 Tools: add_anki_card, list_anki_decks, list_anki_models, get_anki_info."
                    .to_string(),
            ),
        }
    }
}
