//! The collaborators a [`FormBuilder`](crate::FormBuilder) reads from.
//!
//! Each trait is implemented for the matching formkit type, so a builder
//! works out of the box with [`HttpRequest`], [`Session`], and
//! [`CsrfTokens`]. Hosts with their own request or session types implement
//! the traits instead.

use std::collections::BTreeMap;

use formkit_csrf::CsrfTokens;
use formkit_http::HttpRequest;
use formkit_session::Session;

/// Read access to the current request.
pub trait RequestAccessor {
    /// The request path, used as the default form action.
    fn path(&self) -> &str;

    /// The submitted value for `name`, if any.
    fn input(&self, name: &str) -> Option<String>;

    /// Every submitted field as `name -> value`.
    ///
    /// With `exclude_internal`, fields whose names start with `__` (the CSRF
    /// token, the spoofed method) are left out.
    fn all(&self, exclude_internal: bool) -> BTreeMap<String, String>;
}

/// The session operations the builder needs.
pub trait SessionStore {
    /// Returns `true` if `key` is set.
    fn has(&self, key: &str) -> bool;

    /// Returns the value of `key` as a string.
    fn get(&self, key: &str) -> Option<String>;

    /// Returns the value flashed under `key` by this or the previous
    /// request. Values stored for the whole session are not old input.
    fn old(&self, key: &str) -> Option<String>;

    /// Stores a value readable on the next request only.
    fn flash(&self, key: &str, value: &str);
}

/// Something that hands out CSRF tokens.
pub trait CsrfTokenSource {
    /// Returns a token for one form.
    fn generate_token(&self) -> String;
}

fn is_internal(name: &str) -> bool {
    name.starts_with("__")
}

impl RequestAccessor for HttpRequest {
    fn path(&self) -> &str {
        Self::path(self)
    }

    fn input(&self, name: &str) -> Option<String> {
        Self::input(self, name).map(String::from)
    }

    fn all(&self, exclude_internal: bool) -> BTreeMap<String, String> {
        let mut fields = Self::all(self);
        if exclude_internal {
            fields.retain(|name, _| !is_internal(name));
        }
        fields
    }
}

impl SessionStore for Session {
    fn has(&self, key: &str) -> bool {
        Self::has(self, key)
    }

    fn get(&self, key: &str) -> Option<String> {
        self.get_string(key)
    }

    fn old(&self, key: &str) -> Option<String> {
        self.get_flash_string(key)
    }

    fn flash(&self, key: &str, value: &str) {
        Self::flash(self, key, serde_json::Value::String(value.to_string()));
    }
}

impl CsrfTokenSource for CsrfTokens {
    fn generate_token(&self) -> String {
        Self::generate_token(self)
    }
}
