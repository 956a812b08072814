//! # formkit
//!
//! HTML form rendering for Rust web applications.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `formkit` to get everything, or depend on individual
//! crates for finer-grained control.
//!
//! ```
//! use formkit::prelude::*;
//!
//! let request = HttpRequest::builder().path("/posts/3").build();
//! let session = Session::new(SessionData::new("k".into()));
//! let csrf = CsrfTokens::for_session(&session);
//! let builder = FormBuilder::new(&request, &session, &csrf);
//!
//! let form = builder.open("delete", None, attrs! {}).unwrap();
//! assert!(form.opening_tag().as_str().contains(r#"value="DELETE""#));
//! assert_eq!(form.submit(Some("Remove"), attrs! {}).as_str(), r#"<input value="Remove" type="submit" />"#);
//! ```

/// Errors, settings, logging, and text helpers.
pub use formkit_core as core;

/// Request data: parsed query strings and form bodies.
#[cfg(feature = "http")]
pub use formkit_http as http;

/// Sessions with flash values, and session backends.
#[cfg(feature = "session")]
pub use formkit_session as session;

/// CSRF secrets and masked per-form tokens.
#[cfg(feature = "csrf")]
pub use formkit_csrf as csrf;

/// The form builder and its render context.
#[cfg(feature = "forms")]
pub use formkit_forms as forms;

/// Convenience re-exports of the most commonly used types.
pub mod prelude {
    pub use formkit_core::{FormError, FormResult, Settings};

    #[cfg(feature = "http")]
    pub use formkit_http::{HttpRequest, QueryDict};

    #[cfg(feature = "session")]
    pub use formkit_session::{
        InMemorySessionBackend, Session, SessionBackend, SessionCookie, SessionData,
    };

    #[cfg(feature = "csrf")]
    pub use formkit_csrf::CsrfTokens;

    #[cfg(feature = "forms")]
    pub use formkit_forms::{
        attrs, Attributes, ErrorEntry, FieldErrors, Fields, FormBindable, FormBuilder,
        FormMethod, Markup, OpenForm,
    };

    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}
