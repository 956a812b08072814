//! Core error types for the formkit crates.
//!
//! [`FormError`] covers the few ways form rendering and its collaborators can
//! fail: an unsupported form method, bad configuration, serialization
//! problems, and session lookups.

use thiserror::Error;

/// The primary error type for formkit.
///
/// Each variant maps to an appropriate HTTP status code via
/// [`FormError::status_code`], so request handlers can turn a failed render
/// straight into a response.
#[derive(Error, Debug)]
pub enum FormError {
    // ── Rendering ────────────────────────────────────────────────────

    /// The requested form method is not one of GET, POST, PUT, PATCH, DELETE.
    #[error("{0} is not a valid form method.")]
    InvalidMethod(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    Serialization(String),

    // ── Sessions ─────────────────────────────────────────────────────

    /// The requested session does not exist or has expired.
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// A session backend failed to load or store data.
    #[error("Session error: {0}")]
    Session(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `InvalidMethod` -> 405
    /// - `SessionNotFound` -> 404
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidMethod(_) => 405,
            Self::SessionNotFound(_) => 404,
            Self::Configuration(_) | Self::Serialization(_) | Self::Session(_) | Self::Io(_) => {
                500
            }
        }
    }
}

impl From<serde_json::Error> for FormError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// A convenience type alias for `Result<T, FormError>`.
pub type FormResult<T> = Result<T, FormError>;
