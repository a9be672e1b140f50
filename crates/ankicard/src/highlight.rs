//! Inline highlighting of words in card text.
//!
//! Matching is literal and case-sensitive. All words are matched in a single
//! left-to-right pass over the original text: the earliest match wins, and
//! when two words start at the same offset the one listed first wins. A
//! wrapped span is never scanned again, so markup is never nested and the
//! inserted `<span>` text can't itself be matched.

use std::fmt;

use regex_lite::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Longest word, in characters, that can be highlighted.
pub const MAX_WORD_LEN: usize = 256;

/// Default highlight color, a light yellow.
pub const DEFAULT_HIGHLIGHT: Rgb = Rgb::new(255, 255, 180);

/// A validated 8-bit-per-channel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// CSS hex notation, e.g. `#ffffb4`.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        DEFAULT_HIGHLIGHT
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// A color as supplied by a caller, before range checks.
///
/// Serialized with the `Red`/`Green`/`Blue` keys tool callers send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorInput {
    #[serde(rename = "Red", alias = "red")]
    pub red: i64,
    #[serde(rename = "Green", alias = "green")]
    pub green: i64,
    #[serde(rename = "Blue", alias = "blue")]
    pub blue: i64,
}

impl ColorInput {
    /// Check every channel is within 0-255.
    pub fn validate(&self) -> Result<Rgb> {
        let channel = |name: &str, value: i64| {
            u8::try_from(value).map_err(|_| {
                Error::Validation(format!(
                    "Highlight color {} must be between 0 and 255, got {}",
                    name, value
                ))
            })
        };
        Ok(Rgb::new(
            channel("Red", self.red)?,
            channel("Green", self.green)?,
            channel("Blue", self.blue)?,
        ))
    }
}

impl From<Rgb> for ColorInput {
    fn from(rgb: Rgb) -> Self {
        Self {
            red: rgb.red.into(),
            green: rgb.green.into(),
            blue: rgb.blue.into(),
        }
    }
}

/// Wrap every occurrence of `words` in `text` with a background-color span.
///
/// Empty words are ignored. With no usable words the text is returned as is.
/// A word longer than [`MAX_WORD_LEN`] characters is a validation error.
///
/// # Example
///
/// ```
/// use ankicard::highlight::{highlight, DEFAULT_HIGHLIGHT};
///
/// let out = highlight("Hello, world", &["Hello"], DEFAULT_HIGHLIGHT).unwrap();
/// assert_eq!(
///     out,
///     r#"<span style="background-color: #ffffb4">Hello</span>, world"#
/// );
/// ```
pub fn highlight<S: AsRef<str>>(text: &str, words: &[S], color: Rgb) -> Result<String> {
    let Some(pattern) = alternation(words)? else {
        return Ok(text.to_string());
    };

    let open = format!("<span style=\"background-color: {}\">", color.hex());
    Ok(pattern
        .replace_all(text, |caps: &Captures<'_>| {
            format!("{}{}</span>", open, &caps[0])
        })
        .into_owned())
}

/// Build a leftmost-first alternation of the escaped words, in input order.
fn alternation<S: AsRef<str>>(words: &[S]) -> Result<Option<Regex>> {
    let mut seen: Vec<&str> = Vec::new();
    for word in words.iter().map(AsRef::as_ref) {
        if word.chars().count() > MAX_WORD_LEN {
            return Err(Error::Validation(format!(
                "Highlight words must be at most {} characters",
                MAX_WORD_LEN
            )));
        }
        if !word.is_empty() && !seen.contains(&word) {
            seen.push(word);
        }
    }
    if seen.is_empty() {
        return Ok(None);
    }

    let source = seen
        .iter()
        .map(|w| regex_lite::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&source)
        .map(Some)
        .map_err(|e| Error::Validation(format!("Cannot highlight these words: {}", e)))
}
