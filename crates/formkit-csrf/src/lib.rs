//! # formkit-csrf
//!
//! CSRF protection for formkit. Every session carries a random secret;
//! forms embed a freshly masked copy of it, so each rendered token differs
//! while all of them validate against the same secret.
//!
//! Tokens are XOR-masked before being sent to the client to prevent BREACH
//! attacks on compressed HTTPS responses.

pub mod tokens;

pub use tokens::{
    generate_csrf_token, mask_csrf_token, unmask_csrf_token, validate_csrf_token, CsrfTokens,
};
