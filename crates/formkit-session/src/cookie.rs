//! The session cookie: finding the session key in a request and issuing the
//! `Set-Cookie` value that carries it back.

use std::fmt::Write;

use http::header::COOKIE;
use http::HeaderMap;

use formkit_core::Settings;

use crate::backend::generate_session_key;
use crate::session::SessionData;

/// Name and lifetime of the session cookie.
///
/// # Examples
///
/// ```
/// use formkit_session::SessionCookie;
///
/// let cookie = SessionCookie::new("sid", 3600);
/// assert_eq!(
///     cookie.set_cookie("abc"),
///     "sid=abc; Path=/; Max-Age=3600; HttpOnly; SameSite=Lax"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    name: String,
    max_age: u64,
}

impl Default for SessionCookie {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl SessionCookie {
    /// Creates a cookie description with a name and a lifetime in seconds.
    pub fn new(name: impl Into<String>, max_age: u64) -> Self {
        Self {
            name: name.into(),
            max_age,
        }
    }

    /// Reads `session_cookie_name` and `session_cookie_age`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.session_cookie_name.clone(), settings.session_cookie_age)
    }

    /// Returns the cookie name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the cookie and session lifetime in seconds.
    pub const fn max_age(&self) -> u64 {
        self.max_age
    }

    /// Returns the lifetime as the signed seconds [`SessionData`] expects.
    pub fn lifetime_seconds(&self) -> i64 {
        i64::try_from(self.max_age).unwrap_or(i64::MAX)
    }

    /// Extracts the session key from the request's `Cookie` headers.
    pub fn session_key(&self, headers: &HeaderMap) -> Option<String> {
        let prefix = format!("{}=", self.name);
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|header| header.split(';'))
            .find_map(|cookie| cookie.trim().strip_prefix(prefix.as_str()))
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }

    /// Builds the `Set-Cookie` header value for `session_key`.
    pub fn set_cookie(&self, session_key: &str) -> String {
        let mut cookie = format!("{}={session_key}; Path=/", self.name);
        let _ = write!(cookie, "; Max-Age={}", self.max_age);
        cookie.push_str("; HttpOnly; SameSite=Lax");
        cookie
    }

    /// Starts a fresh session that expires after this cookie's lifetime.
    pub fn new_session(&self) -> SessionData {
        SessionData::with_lifetime(generate_session_key(), self.lifetime_seconds())
    }
}
