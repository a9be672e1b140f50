//! Card requests and the mapping onto AnkiConnect's `addNote` payload.
//!
//! A [`CardRequest`] is what a tool caller sends. [`CardRequest::validate`]
//! checks it without touching the network and yields a [`ValidCard`], whose
//! [`ValidCard::to_note`] produces the [`Note`] AnkiConnect expects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::highlight::{ColorInput, Rgb, highlight};

/// Deck used when the caller doesn't name one.
pub const DEFAULT_DECK: &str = "English";

/// Note type used when the caller doesn't name one.
pub const DEFAULT_MODEL: &str = "Basic";

/// Field receiving the front text.
pub const FRONT_FIELD: &str = "Front";

/// Field receiving the back text.
pub const BACK_FIELD: &str = "Back";

/// A request to add one card, as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CardRequest {
    pub front: String,
    pub back: String,
    /// Falls back to the configured default deck.
    #[serde(default)]
    pub deck: Option<String>,
    /// Falls back to the configured default model.
    #[serde(default)]
    pub model: Option<String>,
    /// Space-separated tags.
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub highlight_front: Vec<String>,
    #[serde(default)]
    pub highlight_back: Vec<String>,
    /// Falls back to the configured default color.
    #[serde(default)]
    pub highlight_color: Option<ColorInput>,
}

impl CardRequest {
    /// Create a request with just front and back text.
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
            ..Default::default()
        }
    }

    /// Set the deck.
    pub fn deck(mut self, deck: impl Into<String>) -> Self {
        self.deck = Some(deck.into());
        self
    }

    /// Set the note type.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the space-separated tag string.
    pub fn tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Set the words to highlight on the front.
    pub fn highlight_front<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.highlight_front = words.into_iter().map(Into::into).collect();
        self
    }

    /// Set the words to highlight on the back.
    pub fn highlight_back<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.highlight_back = words.into_iter().map(Into::into).collect();
        self
    }

    /// Set the highlight color.
    pub fn highlight_color(mut self, color: impl Into<ColorInput>) -> Self {
        self.highlight_color = Some(color.into());
        self
    }

    /// Validate the request, filling in defaults.
    ///
    /// Front and back must be non-empty after trimming, deck and model must
    /// not be blank, and every color channel must be within 0-255.
    pub fn validate(self, defaults: &CardDefaults) -> Result<ValidCard> {
        let front = required(&self.front, "Front side text is required")?;
        let back = required(&self.back, "Back side text is required")?;
        let deck = or_default(self.deck, &defaults.deck, "Deck name must not be empty")?;
        let model = or_default(self.model, &defaults.model, "Model name must not be empty")?;
        let color = match self.highlight_color {
            Some(input) => input.validate()?,
            None => defaults.color,
        };

        Ok(ValidCard {
            front,
            back,
            deck,
            model,
            tags: parse_tags(&self.tags),
            highlight_front: self.highlight_front,
            highlight_back: self.highlight_back,
            color,
        })
    }
}

fn required(text: &str, message: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(Error::Validation(message.to_string()))
    } else {
        Ok(trimmed.to_string())
    }
}

fn or_default(value: Option<String>, default: &str, message: &str) -> Result<String> {
    match value {
        Some(v) => required(&v, message),
        None => Ok(default.to_string()),
    }
}

/// Split a space-separated tag string, dropping empty tokens.
pub fn parse_tags(tags: &str) -> Vec<String> {
    tags.split_whitespace().map(str::to_string).collect()
}

/// Defaults applied to requests that omit deck, model, or color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDefaults {
    pub deck: String,
    pub model: String,
    pub color: Rgb,
}

impl Default for CardDefaults {
    fn default() -> Self {
        Self {
            deck: DEFAULT_DECK.to_string(),
            model: DEFAULT_MODEL.to_string(),
            color: Rgb::default(),
        }
    }
}

/// A card request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCard {
    pub front: String,
    pub back: String,
    pub deck: String,
    pub model: String,
    pub tags: Vec<String>,
    pub highlight_front: Vec<String>,
    pub highlight_back: Vec<String>,
    pub color: Rgb,
}

impl ValidCard {
    /// Front text after highlighting.
    pub fn front_html(&self) -> Result<String> {
        highlight(&self.front, &self.highlight_front, self.color)
    }

    /// Back text after highlighting.
    pub fn back_html(&self) -> Result<String> {
        highlight(&self.back, &self.highlight_back, self.color)
    }

    /// Build the note to add.
    pub fn to_note(&self) -> Result<Note> {
        let mut fields = BTreeMap::new();
        fields.insert(FRONT_FIELD.to_string(), self.front_html()?);
        fields.insert(BACK_FIELD.to_string(), self.back_html()?);

        Ok(Note {
            deck_name: self.deck.clone(),
            model_name: self.model.clone(),
            fields,
            tags: self.tags.clone(),
        })
    }
}

/// A new note in AnkiConnect's wire format.
///
/// Field values are HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// The deck to add the note to.
    pub deck_name: String,
    /// The note type (model) name.
    pub model_name: String,
    /// Field values, keyed by field name.
    pub fields: BTreeMap<String, String>,
    /// Tags for the note.
    pub tags: Vec<String>,
}

impl Note {
    /// The `params` object for the `addNote` action.
    pub fn add_note_params(&self) -> Value {
        json!({ "note": self })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> CardDefaults {
        CardDefaults::default()
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags("a  b   c"), vec!["a", "b", "c"]);
        assert_eq!(parse_tags(" vocab\tjlpt-n5 "), vec!["vocab", "jlpt-n5"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags("   \t ").is_empty());
    }

    #[test]
    fn test_defaults_applied() {
        let card = CardRequest::new("Hello", "World").validate(&defaults()).unwrap();
        assert_eq!(card.deck, "English");
        assert_eq!(card.model, "Basic");
        assert_eq!(card.color, Rgb::new(255, 255, 180));
        assert!(card.tags.is_empty());
    }

    #[test]
    fn test_texts_are_trimmed() {
        let card = CardRequest::new("  Hello \n", "\tWorld ")
            .validate(&defaults())
            .unwrap();
        assert_eq!(card.front, "Hello");
        assert_eq!(card.back, "World");
    }

    #[test]
    fn test_blank_front_rejected() {
        let err = CardRequest::new("   ", "World").validate(&defaults()).unwrap_err();
        assert!(matches!(err, Error::Validation(ref msg) if msg.contains("Front")));
    }

    #[test]
    fn test_blank_back_rejected() {
        let err = CardRequest::new("Hello", "").validate(&defaults()).unwrap_err();
        assert!(matches!(err, Error::Validation(ref msg) if msg.contains("Back")));
    }

    #[test]
    fn test_blank_deck_rejected() {
        let err = CardRequest::new("Hello", "World")
            .deck("  ")
            .validate(&defaults())
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_bad_color_rejected() {
        let err = CardRequest::new("Hello", "World")
            .highlight_color(ColorInput { red: 300, green: 0, blue: 0 })
            .validate(&defaults())
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_note_has_exactly_two_fields() {
        let note = CardRequest::new(" Hello, how are you? ", "こんにちは、元気ですか？")
            .tags("greeting  daily")
            .validate(&defaults())
            .unwrap()
            .to_note()
            .unwrap();

        assert_eq!(note.fields.len(), 2);
        assert_eq!(note.fields["Front"], "Hello, how are you?");
        assert_eq!(note.fields["Back"], "こんにちは、元気ですか？");
        assert_eq!(note.tags, vec!["greeting", "daily"]);
    }

    #[test]
    fn test_note_highlights_each_side_independently() {
        let note = CardRequest::new("Hello, how are you?", "Hello back")
            .highlight_front(["Hello"])
            .highlight_color(Rgb::new(255, 255, 180))
            .validate(&defaults())
            .unwrap()
            .to_note()
            .unwrap();

        assert_eq!(
            note.fields["Front"],
            "<span style=\"background-color: #ffffb4\">Hello</span>, how are you?"
        );
        assert_eq!(note.fields["Back"], "Hello back");
    }

    #[test]
    fn test_add_note_params_shape() {
        let note = CardRequest::new("Q", "A")
            .deck("Verbs")
            .model("Basic (and reversed card)")
            .tags("x")
            .validate(&defaults())
            .unwrap()
            .to_note()
            .unwrap();

        assert_eq!(
            note.add_note_params(),
            json!({
                "note": {
                    "deckName": "Verbs",
                    "modelName": "Basic (and reversed card)",
                    "fields": {"Front": "Q", "Back": "A"},
                    "tags": ["x"]
                }
            })
        );
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let request: CardRequest =
            serde_json::from_value(json!({"front": "Q", "back": "A"})).unwrap();
        assert_eq!(request, CardRequest::new("Q", "A"));
    }
}
