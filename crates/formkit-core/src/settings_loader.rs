//! Reading [`Settings`] from TOML, JSON, and the environment.
//!
//! A config file only needs the keys it changes: its values are merged over
//! [`Settings::default`]. Environment variables are applied last and win.
//!
//! | Variable | Field |
//! |---|---|
//! | `FORMKIT_DEBUG` | `debug` |
//! | `FORMKIT_LOG_LEVEL` | `log_level` |
//! | `FORMKIT_CHARSET` | `charset` |
//! | `FORMKIT_TEXTAREA_COLS` | `textarea_cols` |
//! | `FORMKIT_TEXTAREA_ROWS` | `textarea_rows` |
//! | `FORMKIT_SESSION_COOKIE_NAME` | `session_cookie_name` |
//! | `FORMKIT_SESSION_COOKIE_AGE` | `session_cookie_age` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use formkit_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("config/forms.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::FormError;
use crate::settings::Settings;

/// Parses TOML, keeping defaults for every missing key.
///
/// # Errors
///
/// [`FormError::Configuration`] for invalid TOML or mistyped values.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, FormError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| FormError::Configuration(format!("Failed to parse TOML: {e}")))?;
    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Reads and parses a TOML config file.
///
/// # Errors
///
/// [`FormError::Configuration`] if the file is unreadable, else as [`from_toml_str`].
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, FormError> {
    let content = read_config(path.as_ref(), "TOML")?;
    from_toml_str(&content)
}

/// [`from_toml_file`] followed by [`apply_env_overrides`].
///
/// # Errors
///
/// Same as [`from_toml_file`].
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, FormError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Parses JSON, keeping defaults for every missing key.
///
/// # Errors
///
/// [`FormError::Configuration`] for invalid JSON or mistyped values.
pub fn from_json_str(json_str: &str) -> Result<Settings, FormError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| FormError::Configuration(format!("Failed to parse JSON: {e}")))?;
    merge_over_defaults(json_value, "JSON")
}

/// Reads and parses a JSON config file.
///
/// # Errors
///
/// [`FormError::Configuration`] if the file is unreadable, else as [`from_json_str`].
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, FormError> {
    let content = read_config(path.as_ref(), "JSON")?;
    from_json_str(&content)
}

/// Defaults plus environment overrides, with no config file.
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `FORMKIT_*` environment variable overrides to a settings struct.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides(settings, |key| std::env::var(key).ok());
}

/// Applies overrides from an arbitrary key lookup.
///
/// Numeric values that fail to parse are ignored.
pub fn apply_overrides<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("FORMKIT_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Some(val) = lookup("FORMKIT_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Some(val) = lookup("FORMKIT_CHARSET") {
        settings.charset = val;
    }

    if let Some(cols) = lookup("FORMKIT_TEXTAREA_COLS").and_then(|v| v.parse().ok()) {
        settings.textarea_cols = cols;
    }

    if let Some(rows) = lookup("FORMKIT_TEXTAREA_ROWS").and_then(|v| v.parse().ok()) {
        settings.textarea_rows = rows;
    }

    if let Some(val) = lookup("FORMKIT_SESSION_COOKIE_NAME") {
        settings.session_cookie_name = val;
    }

    if let Some(age) = lookup("FORMKIT_SESSION_COOKIE_AGE").and_then(|v| v.parse().ok()) {
        settings.session_cookie_age = age;
    }
}

// ============================================================
// Helpers
// ============================================================

fn read_config(path: &Path, format: &str) -> Result<String, FormError> {
    std::fs::read_to_string(path).map_err(|e| {
        FormError::Configuration(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_over_defaults(value: serde_json::Value, format: &str) -> Result<Settings, FormError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        FormError::Configuration(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        FormError::Configuration(format!("Failed to deserialize settings from {format}: {e}"))
    })
}

/// TOML to JSON, so both formats share one merge path.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => serde_json::Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Recursively overlays `override_val` onto `base`. Non-object values replace.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = match base_map.remove(&key) {
                    Some(base_v) => merge_json(base_v, override_v),
                    None => override_v,
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}
