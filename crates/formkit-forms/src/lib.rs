//! # formkit-forms
//!
//! An HTML form builder. A [`FormBuilder`] is created per request from three
//! collaborators (the request, the session, and a CSRF token source) and
//! opens forms. Each open returns an [`OpenForm`] render context that emits
//! fields whose values are refilled from, in order:
//!
//! 1. old input flashed into the session after a failed validation,
//! 2. the current request's submitted data,
//! 3. the value passed by the caller,
//! 4. the bound model, if the form was opened with [`FormBuilder::model`].
//!
//! ```
//! use formkit_csrf::CsrfTokens;
//! use formkit_forms::{attrs, FormBuilder};
//! use formkit_http::HttpRequest;
//! use formkit_session::{Session, SessionData};
//!
//! let request = HttpRequest::builder().path("/signup").build();
//! let session = Session::new(SessionData::new("k".into()));
//! let csrf = CsrfTokens::for_session(&session);
//! let builder = FormBuilder::new(&request, &session, &csrf);
//!
//! let mut form = builder.open("post", None, attrs! {}).unwrap();
//! let label = form.label("email", None, attrs! {});
//! let email = form.email("email", None, attrs! { "class" => "wide" });
//! let end = form.close();
//!
//! assert_eq!(label.as_str(), r#"<label for="email">Email</label>"#);
//! assert_eq!(
//!     email.as_str(),
//!     r#"<input class="wide" name="email" id="email" type="email" />"#
//! );
//! assert_eq!(end.as_str(), "</form>");
//! ```

pub mod builder;
pub mod errors;
pub mod markup;
pub mod method;
pub mod model;
pub mod services;

pub use builder::{FormBuilder, OpenForm};
pub use errors::{ErrorEntry, FieldErrors};
pub use markup::{Attributes, Markup};
pub use method::FormMethod;
pub use model::{FormBindable, Fields};
pub use services::{CsrfTokenSource, RequestAccessor, SessionStore};
