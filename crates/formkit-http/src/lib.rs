//! # formkit-http
//!
//! The request side of formkit: an [`HttpRequest`] exposing the path, method,
//! and submitted GET/POST data a form builder reads from, and the
//! [`QueryDict`] that holds that data.

pub mod querydict;
pub mod request;

pub use querydict::QueryDict;
pub use request::{HttpRequest, HttpRequestBuilder};
