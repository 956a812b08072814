//! Settings for form rendering.
//!
//! [`Settings`] holds everything a form builder needs to know that isn't
//! per-request: the names of the hidden CSRF and method-spoofing fields, the
//! session key validation errors are flashed under, textarea defaults, and
//! logging configuration.

use serde::{Deserialize, Serialize};

/// The complete set of formkit settings.
///
/// # Examples
///
/// ```
/// use formkit_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.token_field, "__token");
/// assert_eq!(settings.textarea_cols, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled.
    pub debug: bool,

    // ── Rendering ────────────────────────────────────────────────────

    /// The value of the `accept-charset` attribute on every `<form>`.
    pub charset: String,
    /// Name of the hidden input carrying the CSRF token.
    pub token_field: String,
    /// Name of the hidden input carrying a spoofed HTTP method.
    pub method_field: String,
    /// Session key holding the JSON-encoded validation errors.
    pub errors_key: String,
    /// Default `cols` for a `<textarea>`.
    pub textarea_cols: u32,
    /// Default `rows` for a `<textarea>`.
    pub textarea_rows: u32,

    // ── Sessions ─────────────────────────────────────────────────────

    /// The name of the session cookie.
    pub session_cookie_name: String,
    /// The session cookie max age in seconds.
    pub session_cookie_age: u64,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,

            charset: "UTF-8".to_string(),
            token_field: "__token".to_string(),
            method_field: "__method".to_string(),
            errors_key: "errors".to_string(),
            textarea_cols: 50,
            textarea_rows: 10,

            session_cookie_name: "sessionid".to_string(),
            session_cookie_age: 1_209_600, // 2 weeks

            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Returns `true` if `name` is one of the hidden fields the builder
    /// injects itself.
    pub fn is_internal_field(&self, name: &str) -> bool {
        name == self.token_field || name == self.method_field
    }
}
