//! Validation errors carried from one request to the next.
//!
//! Errors travel through the session as JSON: an object mapping field names
//! to either one message or a list of messages.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The error message(s) recorded for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorEntry {
    /// A single message.
    Message(String),
    /// Several messages, in the order they were raised.
    Messages(Vec<String>),
}

impl ErrorEntry {
    /// Returns every message.
    pub fn messages(&self) -> Vec<&str> {
        match self {
            Self::Message(m) => vec![m.as_str()],
            Self::Messages(ms) => ms.iter().map(String::as_str).collect(),
        }
    }

    /// Returns the first message, if any.
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Message(m) => Some(m),
            Self::Messages(ms) => ms.first().map(String::as_str),
        }
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join(" "))
    }
}

impl From<&str> for ErrorEntry {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<String> for ErrorEntry {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<Vec<String>> for ErrorEntry {
    fn from(messages: Vec<String>) -> Self {
        Self::Messages(messages)
    }
}

/// Field name to error entry.
pub type FieldErrors = BTreeMap<String, ErrorEntry>;

/// Decodes flashed errors.
///
/// Anything that is not a JSON object yields `None`. Inside the object, each
/// entry that is not a message or a list of messages is skipped on its own.
pub(crate) fn decode(raw: &str) -> Option<FieldErrors> {
    let entries: BTreeMap<String, serde_json::Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(error = %err, "ignoring malformed flashed form errors");
            return None;
        }
    };

    let errors = entries
        .into_iter()
        .filter_map(|(field, value)| match serde_json::from_value(value) {
            Ok(entry) => Some((field, entry)),
            Err(err) => {
                tracing::debug!(%field, error = %err, "skipping malformed form error entry");
                None
            }
        })
        .collect();
    Some(errors)
}
