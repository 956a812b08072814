//! Utility functions for formkit.
//!
//! - [`text`]: HTML escaping and label text helpers.

pub mod text;
