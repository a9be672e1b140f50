//! The normalized success/failure envelope returned by every operation.
//!
//! On the wire a success looks like
//! `{"success": true, "message": "...", "result": {...}}` and a failure like
//! `{"success": false, "error_kind": "remote", "error": "...", "message": "..."}`.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::{Error, ErrorKind};

/// Outcome of one gateway operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success {
        result: T,
        message: String,
    },
    Failure {
        kind: ErrorKind,
        error: String,
        message: String,
    },
}

impl<T> Envelope<T> {
    pub fn success(result: T, message: impl Into<String>) -> Self {
        Envelope::Success {
            result,
            message: message.into(),
        }
    }

    /// Build a failure from an error raised while performing `op`.
    pub fn failure(op: Operation, err: &Error) -> Self {
        Envelope::Failure {
            kind: err.kind(),
            error: err.to_string(),
            message: op.failure_message(err),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Envelope::Success { message, .. } | Envelope::Failure { message, .. } => message,
        }
    }

    /// The result, if this is a success.
    pub fn result(&self) -> Option<&T> {
        match self {
            Envelope::Success { result, .. } => Some(result),
            Envelope::Failure { .. } => None,
        }
    }

    /// The error kind, if this is a failure.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Envelope::Success { .. } => None,
            Envelope::Failure { kind, .. } => Some(*kind),
        }
    }

    /// The error text, if this is a failure.
    pub fn error(&self) -> Option<&str> {
        match self {
            Envelope::Success { .. } => None,
            Envelope::Failure { error, .. } => Some(error),
        }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Envelope::Success { result, message } => {
                let mut state = serializer.serialize_struct("Envelope", 3)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("message", message)?;
                state.serialize_field("result", result)?;
                state.end()
            }
            Envelope::Failure {
                kind,
                error,
                message,
            } => {
                let mut state = serializer.serialize_struct("Envelope", 4)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error_kind", kind)?;
                state.serialize_field("error", error)?;
                state.serialize_field("message", message)?;
                state.end()
            }
        }
    }
}

/// The gateway operations, used to phrase failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AddCard,
    ListDecks,
    ListModels,
    CollectionInfo,
}

impl Operation {
    fn failure_message(self, err: &Error) -> String {
        if let (Operation::AddCard, Error::AnkiConnect(msg)) = (self, err) {
            if msg.to_lowercase().contains("duplicate") {
                return "Duplicate card detected - card already exists".to_string();
            }
        }

        match self {
            Operation::AddCard => "Failed to add card",
            Operation::ListDecks => "Failed to list decks",
            Operation::ListModels => "Failed to list models",
            Operation::CollectionInfo => "Failed to get collection info",
        }
        .to_string()
    }
}
