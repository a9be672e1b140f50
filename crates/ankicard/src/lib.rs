//! Card creation for Anki via AnkiConnect.
//!
//! This crate is the core of the `ankicard-mcp` server. It validates card
//! requests, highlights words in card text, forwards the work to
//! AnkiConnect, and turns every outcome into an [`Envelope`].
//!
//! # Quick Start
//!
//! ```no_run
//! use ankicard::{CardRequest, Gateway, GatewayConfig};
//!
//! # async fn example() {
//! let gateway = Gateway::new(&GatewayConfig::default());
//!
//! let decks = gateway.list_decks().await;
//! println!("{}", decks.message());
//!
//! let added = gateway
//!     .add_card(
//!         CardRequest::new("Hello, how are you?", "こんにちは、元気ですか？")
//!             .deck("English")
//!             .tags("greeting daily")
//!             .highlight_front(["Hello"]),
//!     )
//!     .await;
//! println!("{}", serde_json::to_string_pretty(&added).unwrap());
//! # }
//! ```
//!
//! # Testing Without Anki
//!
//! [`Gateway`] is generic over [`Connector`], the single capability of
//! submitting an action and getting back the raw response. Implement it
//! for an in-memory fake to exercise the gateway without a network.

mod actions;
mod card;
mod client;
mod config;
mod envelope;
mod error;
mod gateway;
pub mod highlight;
mod request;

pub use actions::{Actions, deck_query};
pub use card::{
    BACK_FIELD, CardDefaults, CardRequest, DEFAULT_DECK, DEFAULT_MODEL, FRONT_FIELD, Note,
    ValidCard, parse_tags,
};
pub use client::{AnkiClient, ClientBuilder, Connector, DEFAULT_TIMEOUT, DEFAULT_URL};
pub use config::GatewayConfig;
pub use envelope::{Envelope, Operation};
pub use error::{Error, ErrorKind, Result};
pub use gateway::{AddedCard, CollectionInfo, Count, DeckDetail, DeckListing, Gateway, ModelListing};
pub use highlight::{ColorInput, MAX_WORD_LEN, Rgb, highlight};
pub use request::{API_VERSION, AnkiRequest, AnkiResponse};
