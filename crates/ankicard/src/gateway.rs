//! The tool gateway: the four operations exposed to MCP callers.
//!
//! Every operation returns an [`Envelope`] rather than a `Result`, so a
//! failed invocation is just another answer and never affects the next one.
//! Remote calls are made one at a time, in order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::actions::{ALL_CARDS_QUERY, Actions, deck_query};
use crate::card::{BACK_FIELD, CardDefaults, CardRequest, FRONT_FIELD};
use crate::client::{AnkiClient, Connector};
use crate::config::GatewayConfig;
use crate::envelope::{Envelope, Operation};
use crate::error::{Error, Result};

/// A count AnkiConnect may or may not have been able to provide.
///
/// Serializes as a number, or as the string `"unknown"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    Known(usize),
    Unknown,
}

impl Serialize for Count {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Count::Known(n) => serializer.serialize_u64(*n as u64),
            Count::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Count::Known(n) => write!(f, "{}", n),
            Count::Unknown => f.write_str("unknown"),
        }
    }
}

/// Result of adding a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddedCard {
    pub note_id: i64,
    /// Front field as stored, highlighting included.
    pub front: String,
    /// Back field as stored, highlighting included.
    pub back: String,
    pub deck: String,
    pub model: String,
    pub tags: Vec<String>,
    pub highlighted_words_front: Vec<String>,
    pub highlighted_words_back: Vec<String>,
}

/// Per-deck counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckDetail {
    pub name: String,
    pub card_count: Count,
    pub note_count: Count,
}

/// Result of listing decks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckListing {
    pub decks: Vec<String>,
    pub deck_count: usize,
    pub deck_details: BTreeMap<String, DeckDetail>,
}

/// Result of listing note types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelListing {
    pub models: Vec<String>,
    pub model_count: usize,
}

/// Aggregate collection statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionInfo {
    pub total_notes: Count,
    pub total_cards: Count,
    pub total_decks: usize,
    pub total_models: usize,
    pub available_decks: Vec<String>,
    pub available_models: Vec<String>,
}

/// Maps tool calls onto AnkiConnect and normalizes the answers.
///
/// # Example
///
/// ```no_run
/// use ankicard::{CardRequest, Gateway, GatewayConfig};
///
/// # async fn example() {
/// let gateway = Gateway::new(&GatewayConfig::default());
///
/// let added = gateway
///     .add_card(CardRequest::new("Hello", "こんにちは").highlight_front(["Hello"]))
///     .await;
/// println!("{}", added.message());
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Gateway<C = AnkiClient> {
    connector: C,
    defaults: CardDefaults,
}

impl Gateway<AnkiClient> {
    /// Create a gateway talking HTTP to the configured AnkiConnect.
    pub fn new(config: &GatewayConfig) -> Self {
        Self::with_connector(config.client(), config.defaults.clone())
    }
}

impl<C: Connector> Gateway<C> {
    /// Create a gateway over any connector.
    pub fn with_connector(connector: C, defaults: CardDefaults) -> Self {
        Self {
            connector,
            defaults,
        }
    }

    /// Get a reference to the underlying connector.
    pub fn connector(&self) -> &C {
        &self.connector
    }

    fn actions(&self) -> Actions<'_, C> {
        Actions::new(&self.connector)
    }

    /// Add one card, creating its deck first if needed.
    pub async fn add_card(&self, request: CardRequest) -> Envelope<AddedCard> {
        match self.try_add_card(request).await {
            Ok(card) => {
                let message = format!("Successfully added card to deck '{}'", card.deck);
                Envelope::success(card, message)
            }
            Err(e) => fail(Operation::AddCard, e),
        }
    }

    /// List every deck with its card and note counts.
    pub async fn list_decks(&self) -> Envelope<DeckListing> {
        match self.try_list_decks().await {
            Ok(listing) => {
                let message = format!("Found {} available decks", listing.deck_count);
                Envelope::success(listing, message)
            }
            Err(e) => fail(Operation::ListDecks, e),
        }
    }

    /// List every note type.
    pub async fn list_models(&self) -> Envelope<ModelListing> {
        debug!("Listing models");
        match self.actions().model_names().await {
            Ok(models) => {
                debug!(count = models.len(), "Listed models");
                let listing = ModelListing {
                    model_count: models.len(),
                    models,
                };
                let message = format!(
                    "Found {} available note types/models",
                    listing.model_count
                );
                Envelope::success(listing, message)
            }
            Err(e) => fail(Operation::ListModels, e),
        }
    }

    /// Summarize the collection.
    pub async fn collection_info(&self) -> Envelope<CollectionInfo> {
        match self.try_collection_info().await {
            Ok(info) => {
                let message = format!(
                    "Anki collection contains {} notes, {} cards across {} decks",
                    info.total_notes, info.total_cards, info.total_decks
                );
                Envelope::success(info, message)
            }
            Err(e) => fail(Operation::CollectionInfo, e),
        }
    }

    async fn try_add_card(&self, request: CardRequest) -> Result<AddedCard> {
        let card = request.validate(&self.defaults)?;
        info!(
            deck = %card.deck,
            model = %card.model,
            front = %preview(&card.front),
            "Adding card"
        );

        let note = card.to_note()?;

        tolerate_remote(self.ensure_deck(&card.deck).await, "checking/creating deck")?;
        tolerate_remote(self.check_model(&card.model).await, "checking models")?;

        let note_id = self.actions().add_note(&note).await?.ok_or_else(|| {
            Error::EmptyResult("Failed to add note - no note ID returned".to_string())
        })?;
        info!(note_id, deck = %card.deck, "Card added");

        let mut fields = note.fields;
        Ok(AddedCard {
            note_id,
            front: fields.remove(FRONT_FIELD).unwrap_or_default(),
            back: fields.remove(BACK_FIELD).unwrap_or_default(),
            deck: card.deck,
            model: card.model,
            tags: card.tags,
            highlighted_words_front: card.highlight_front,
            highlighted_words_back: card.highlight_back,
        })
    }

    async fn ensure_deck(&self, deck: &str) -> Result<()> {
        let decks = self.actions().deck_names().await?;
        if !decks.iter().any(|d| d == deck) {
            info!(deck, "Creating new deck");
            self.actions().create_deck(deck).await?;
        }
        Ok(())
    }

    async fn check_model(&self, model: &str) -> Result<()> {
        let models = self.actions().model_names().await?;
        if models.iter().any(|m| m == model) {
            Ok(())
        } else {
            Err(Error::ModelNotFound {
                model: model.to_string(),
                available: models,
            })
        }
    }

    async fn try_list_decks(&self) -> Result<DeckListing> {
        debug!("Listing decks");
        let decks = self.actions().deck_names().await?;

        let mut deck_details = BTreeMap::new();
        for name in &decks {
            let query = deck_query(name);
            let card_count = count(self.actions().find_cards(&query).await, "cards", name)?;
            let note_count = count(self.actions().find_notes(&query).await, "notes", name)?;
            deck_details.insert(
                name.clone(),
                DeckDetail {
                    name: name.clone(),
                    card_count,
                    note_count,
                },
            );
        }

        debug!(count = decks.len(), "Listed decks");
        Ok(DeckListing {
            deck_count: decks.len(),
            decks,
            deck_details,
        })
    }

    async fn try_collection_info(&self) -> Result<CollectionInfo> {
        debug!("Getting collection info");
        let available_decks = self.actions().deck_names().await?;
        let available_models = self.actions().model_names().await?;

        let total_cards = count(
            self.actions().find_cards(ALL_CARDS_QUERY).await,
            "cards",
            "collection",
        )?;
        let total_notes = count(
            self.actions().find_notes(ALL_CARDS_QUERY).await,
            "notes",
            "collection",
        )?;

        Ok(CollectionInfo {
            total_notes,
            total_cards,
            total_decks: available_decks.len(),
            total_models: available_models.len(),
            available_decks,
            available_models,
        })
    }
}

fn fail<T>(op: Operation, err: Error) -> Envelope<T> {
    warn!(operation = ?op, kind = ?err.kind(), error = %err, "Operation failed");
    Envelope::failure(op, &err)
}

/// Pre-flight checks only give up on transport faults and missing models.
fn tolerate_remote(outcome: Result<()>, context: &str) -> Result<()> {
    match outcome {
        Err(Error::AnkiConnect(msg)) => {
            warn!(error = %msg, "Error {}", context);
            Ok(())
        }
        other => other,
    }
}

/// A failed count is `Unknown` unless the transport itself failed.
fn count(lookup: Result<Vec<i64>>, what: &str, scope: &str) -> Result<Count> {
    match lookup {
        Ok(ids) => Ok(Count::Known(ids.len())),
        Err(e @ (Error::AnkiConnect(_) | Error::Malformed(_) | Error::EmptyResult(_))) => {
            warn!(scope, error = %e, "Could not count {}", what);
            Ok(Count::Unknown)
        }
        Err(e) => Err(e),
    }
}

fn preview(text: &str) -> String {
    const MAX: usize = 50;
    match text.char_indices().nth(MAX) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
