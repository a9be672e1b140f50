//! Typed AnkiConnect actions on top of any [`Connector`].
//!
//! # Example
//!
//! ```no_run
//! use ankicard::{Actions, AnkiClient};
//!
//! # async fn example() -> ankicard::Result<()> {
//! let client = AnkiClient::new();
//! let decks = Actions::new(&client).deck_names().await?;
//! println!("Decks: {:?}", decks);
//! # Ok(())
//! # }
//! ```

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::card::Note;
use crate::client::Connector;
use crate::error::{Error, Result};

/// Query matching every card in the collection.
pub const ALL_CARDS_QUERY: &str = "deck:*";

/// Provides the AnkiConnect actions the gateway needs.
#[derive(Debug)]
pub struct Actions<'a, C> {
    connector: &'a C,
}

impl<'a, C: Connector> Actions<'a, C> {
    pub fn new(connector: &'a C) -> Self {
        Self { connector }
    }

    /// Get all deck names.
    pub async fn deck_names(&self) -> Result<Vec<String>> {
        self.invoke("deckNames", None).await
    }

    /// Create a deck, returning its ID. Existing decks are left untouched.
    pub async fn create_deck(&self, name: &str) -> Result<i64> {
        self.invoke("createDeck", Some(json!({ "deck": name }))).await
    }

    /// Get all note type (model) names.
    pub async fn model_names(&self) -> Result<Vec<String>> {
        self.invoke("modelNames", None).await
    }

    /// Add a note. Returns `None` when AnkiConnect reports no note ID.
    pub async fn add_note(&self, note: &Note) -> Result<Option<i64>> {
        self.invoke_nullable("addNote", Some(note.add_note_params()))
            .await
    }

    /// Find card IDs matching an Anki search query.
    pub async fn find_cards(&self, query: &str) -> Result<Vec<i64>> {
        self.invoke("findCards", Some(json!({ "query": query })))
            .await
    }

    /// Find note IDs matching an Anki search query.
    pub async fn find_notes(&self, query: &str) -> Result<Vec<i64>> {
        self.invoke("findNotes", Some(json!({ "query": query })))
            .await
    }

    /// Execute an action whose result must not be null.
    async fn invoke<R>(&self, action: &str, params: Option<Value>) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.invoke_nullable(action, params)
            .await?
            .ok_or_else(|| Error::EmptyResult(format!("{} returned no result", action)))
    }

    /// Execute an action where null is a valid result.
    async fn invoke_nullable<R>(&self, action: &str, params: Option<Value>) -> Result<Option<R>>
    where
        R: DeserializeOwned,
    {
        let raw = self.connector.submit(action, params).await?;
        match raw.into_result()? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }
}

/// Search query for all cards in `deck` (subdecks included).
pub fn deck_query(deck: &str) -> String {
    let mut escaped = String::with_capacity(deck.len());
    for c in deck.chars() {
        if matches!(c, '\\' | '"' | '*' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("\"deck:{}\"", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_query() {
        assert_eq!(deck_query("Default"), "\"deck:Default\"");
        assert_eq!(deck_query("My Deck"), "\"deck:My Deck\"");
        assert_eq!(deck_query("Japanese::N5"), "\"deck:Japanese::N5\"");
    }

    #[test]
    fn test_deck_query_escapes_specials() {
        assert_eq!(deck_query("a\"b"), "\"deck:a\\\"b\"");
        assert_eq!(deck_query("x_y*"), "\"deck:x\\_y\\*\"");
    }
}
