//! CSRF token generation, masking, and validation.

use formkit_http::HttpRequest;
use formkit_session::Session;
use rand::RngCore;

/// The length of a CSRF secret in bytes (produces a 64-char hex string).
const CSRF_TOKEN_LENGTH: usize = 32;

/// Session key under which the per-session CSRF secret is stored.
pub const CSRF_SESSION_KEY: &str = "_csrf_secret";

/// Per-session CSRF token service.
///
/// Holds the session's secret and hands out masked tokens for forms.
///
/// # Examples
///
/// ```
/// use formkit_csrf::CsrfTokens;
///
/// let csrf = CsrfTokens::new();
/// let a = csrf.generate_token();
/// let b = csrf.generate_token();
/// assert_ne!(a, b);
/// assert!(csrf.verify(&a) && csrf.verify(&b));
/// ```
#[derive(Debug, Clone)]
pub struct CsrfTokens {
    secret: String,
}

impl Default for CsrfTokens {
    fn default() -> Self {
        Self::new()
    }
}

impl CsrfTokens {
    /// Creates a service with a fresh random secret.
    pub fn new() -> Self {
        Self {
            secret: generate_csrf_token(),
        }
    }

    /// Creates a service around an existing secret.
    pub fn from_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Uses the secret stored in `session`, creating and storing one if the
    /// session has none yet.
    pub fn for_session(session: &Session) -> Self {
        if let Some(secret) = session
            .get_string(CSRF_SESSION_KEY)
            .filter(|s| s.len() == CSRF_TOKEN_LENGTH * 2)
        {
            return Self { secret };
        }
        let tokens = Self::new();
        session.set(CSRF_SESSION_KEY, serde_json::Value::String(tokens.secret.clone()));
        tracing::debug!(session_key = %session.key(), "created CSRF secret for session");
        tokens
    }

    /// Returns the unmasked secret.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Returns a freshly masked token for embedding in a form.
    pub fn generate_token(&self) -> String {
        mask_csrf_token(&self.secret)
    }

    /// Checks a submitted token against the secret.
    pub fn verify(&self, token: &str) -> bool {
        validate_csrf_token(token, &self.secret)
    }

    /// Checks the token submitted in `field` of a request.
    ///
    /// Safe methods (GET, HEAD, OPTIONS, TRACE) always pass.
    pub fn verify_request(&self, request: &HttpRequest, field: &str) -> bool {
        if is_safe_method(request.method()) {
            return true;
        }
        let verified = request.post().get(field).is_some_and(|t| self.verify(t));
        if !verified {
            tracing::warn!(path = request.path(), "CSRF token missing or invalid");
        }
        verified
    }
}

/// Returns `true` if the given HTTP method is "safe" (does not modify state).
const fn is_safe_method(method: &http::Method) -> bool {
    matches!(
        *method,
        http::Method::GET | http::Method::HEAD | http::Method::OPTIONS | http::Method::TRACE
    )
}

/// Generates a cryptographically random CSRF secret as a 64-character hex string.
pub fn generate_csrf_token() -> String {
    let mut bytes = [0u8; CSRF_TOKEN_LENGTH];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Masks a CSRF token using XOR masking.
///
/// Generates a random mask, XORs it with the token bytes, and returns
/// the concatenation of mask and masked token as a hex string. Returns an
/// empty string when `token` is not valid hex.
pub fn mask_csrf_token(token: &str) -> String {
    let token_bytes = match hex::decode(token) {
        Ok(bytes) if !bytes.is_empty() => bytes,
        _ => return String::new(),
    };

    let mut mask = vec![0u8; token_bytes.len()];
    rand::thread_rng().fill_bytes(&mut mask);

    let masked: Vec<u8> = token_bytes
        .iter()
        .zip(mask.iter())
        .map(|(t, m)| t ^ m)
        .collect();

    let mut result = mask;
    result.extend_from_slice(&masked);
    hex::encode(result)
}

/// Unmasks a previously masked CSRF token. Returns an empty string for
/// malformed input.
pub fn unmask_csrf_token(masked: &str) -> String {
    let Ok(bytes) = hex::decode(masked) else {
        return String::new();
    };

    if bytes.is_empty() || bytes.len() % 2 != 0 {
        return String::new();
    }

    let (mask, masked_token) = bytes.split_at(bytes.len() / 2);
    let unmasked: Vec<u8> = masked_token
        .iter()
        .zip(mask.iter())
        .map(|(m, k)| m ^ k)
        .collect();

    hex::encode(unmasked)
}

/// Validates a submitted token against the secret.
///
/// Accepts both masked and unmasked tokens. Uses constant-time comparison.
pub fn validate_csrf_token(request_token: &str, secret: &str) -> bool {
    if request_token.is_empty() || secret.is_empty() {
        return false;
    }

    let effective_request = if request_token.len() == secret.len() * 2 {
        unmask_csrf_token(request_token)
    } else {
        request_token.to_string()
    };

    constant_time_eq(effective_request.as_bytes(), secret.as_bytes())
}

/// Constant-time byte comparison.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}
