//! The form builder and its per-form render context.
//!
//! [`FormBuilder`] lives for one request and can open any number of forms.
//! Every [`FormBuilder::open`] returns a fresh [`OpenForm`] holding that
//! form's labels, bound model, and decoded validation errors; dropping or
//! [closing](OpenForm::close) it discards them, so nothing leaks between
//! forms.

use std::sync::OnceLock;

use regex::Regex;

use formkit_core::logging::form_span;
use formkit_core::{FormResult, Settings};

use crate::errors::{self, ErrorEntry, FieldErrors};
use crate::markup::{Attributes, Markup};
use crate::method::FormMethod;
use crate::model::FormBindable;
use crate::services::{CsrfTokenSource, RequestAccessor, SessionStore};

/// Input types that never have their value refilled.
const SKIP_VALUE_TYPES: [&str; 4] = ["file", "password", "checkbox", "radio"];

/// Request field that is never used to refill a form.
const REQUEST_METHOD_FIELD: &str = "request_method";

/// Opens forms against one request, session, and CSRF token source.
pub struct FormBuilder<'a> {
    request: &'a dyn RequestAccessor,
    session: &'a dyn SessionStore,
    csrf: &'a dyn CsrfTokenSource,
    settings: Settings,
}

impl<'a> FormBuilder<'a> {
    /// Creates a builder with default [`Settings`].
    pub fn new(
        request: &'a dyn RequestAccessor,
        session: &'a dyn SessionStore,
        csrf: &'a dyn CsrfTokenSource,
    ) -> Self {
        Self {
            request,
            session,
            csrf,
            settings: Settings::default(),
        }
    }

    /// Replaces the settings.
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns the settings in use.
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Opens a form.
    ///
    /// `method` is matched case-insensitively against GET, POST, PUT, PATCH,
    /// and DELETE. `url` defaults to the request path. Extra attributes are
    /// added to the `<form>` tag after `method`, `action`, and
    /// `accept-charset`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidMethod`](formkit_core::FormError::InvalidMethod)
    /// for any other method.
    pub fn open(
        &self,
        method: &str,
        url: Option<&str>,
        attrs: Attributes,
    ) -> FormResult<OpenForm<'_>> {
        self.start(None, method, url, attrs)
    }

    /// Opens a form bound to `model`, which fills in any field that has no
    /// old input, request value, or explicit value.
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open).
    pub fn model<'m>(
        &'m self,
        model: &'m dyn FormBindable,
        method: &str,
        url: Option<&str>,
        attrs: Attributes,
    ) -> FormResult<OpenForm<'m>> {
        self.start(Some(model), method, url, attrs)
    }

    /// Flashes the current request's fields as old input and `errors` as the
    /// next form's validation errors.
    ///
    /// Call this from a request handler after validation fails and before
    /// redirecting back to the form.
    ///
    /// # Errors
    ///
    /// Returns an error if `errors` cannot be serialized.
    pub fn report_errors(
        &self,
        session: &dyn SessionStore,
        errors: &FieldErrors,
    ) -> FormResult<()> {
        let flashed = self.flash_old_input(session);
        session.flash(&self.settings.errors_key, &serde_json::to_string(errors)?);
        tracing::info!(
            fields = flashed,
            errors = errors.len(),
            "flashed old input and form errors"
        );
        Ok(())
    }

    /// Flashes every public request field and returns how many were flashed.
    fn flash_old_input(&self, session: &dyn SessionStore) -> usize {
        let fields = self.request.all(true);
        let public = fields
            .iter()
            .filter(|(name, _)| !self.settings.is_internal_field(name));
        let mut flashed = 0;
        for (name, value) in public {
            session.flash(name, value);
            flashed += 1;
        }
        flashed
    }

    /// Returns the old input flashed for `name`, if any. Regular session
    /// values are not old input.
    pub fn old(&self, name: &str) -> Option<String> {
        self.session.old(name)
    }

    fn start<'f>(
        &'f self,
        model: Option<&'f dyn FormBindable>,
        method: &str,
        url: Option<&str>,
        attrs: Attributes,
    ) -> FormResult<OpenForm<'f>> {
        let errors = self.load_errors();
        let method: FormMethod = method.parse()?;
        let action = url
            .filter(|u| !u.is_empty())
            .map_or_else(|| self.request.path().to_string(), str::to_string);
        let _span = form_span(&action).entered();

        let mut tag_attrs = Attributes::new()
            .with("method", method.html_method())
            .with("action", action.as_str())
            .with("accept-charset", self.settings.charset.as_str());
        for (name, value) in attrs.iter() {
            tag_attrs.insert(name, value);
        }

        let mut opening = Markup::from_trusted(tag_attrs.tag("form", ">"));
        opening += hidden_field(&self.settings.token_field, &self.csrf.generate_token());
        if method.is_spoofed() {
            opening += hidden_field(&self.settings.method_field, method.as_str());
        }

        tracing::debug!(%method, errors = errors.len(), bound = model.is_some(), "opened form");

        Ok(OpenForm {
            builder: self,
            model,
            labels: Vec::new(),
            errors,
            opening,
        })
    }

    fn load_errors(&self) -> FieldErrors {
        self.session
            .old(&self.settings.errors_key)
            .and_then(|raw| errors::decode(&raw))
            .unwrap_or_default()
    }
}

/// Renders a hidden input whose value is used verbatim.
fn hidden_field(name: &str, value: &str) -> Markup {
    let attrs = Attributes::new()
        .with("name", name)
        .with("id", name)
        .with("value", value)
        .with("type", "hidden");
    Markup::from_trusted(attrs.tag("input", " />"))
}

/// One open form: its opening markup plus the state its fields share.
pub struct OpenForm<'a> {
    builder: &'a FormBuilder<'a>,
    model: Option<&'a dyn FormBindable>,
    labels: Vec<String>,
    errors: FieldErrors,
    opening: Markup,
}

impl OpenForm<'_> {
    /// The `<form>` tag followed by the hidden CSRF and method fields.
    pub const fn opening_tag(&self) -> &Markup {
        &self.opening
    }

    /// Closes the form, discarding its labels, model, and errors.
    pub fn close(self) -> Markup {
        Markup::from_trusted("</form>")
    }

    /// Returns the validation error entry for `name`.
    pub fn errors(&self, name: &str) -> Option<&ErrorEntry> {
        self.errors.get(name)
    }

    /// Returns all validation errors decoded when the form was opened.
    pub const fn all_errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Returns the field names labeled so far, in order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the old input flashed for `name`, if any.
    pub fn old(&self, name: &str) -> Option<String> {
        self.builder.old(name)
    }

    // ── Labels ───────────────────────────────────────────────────────

    /// Renders `<label for="name">`. Without `text`, the name is humanized:
    /// `first_name` becomes `First Name`.
    pub fn label(&mut self, name: &str, text: Option<&str>, attrs: Attributes) -> Markup {
        self.label_with_escape(name, text, true, attrs)
    }

    /// Like [`label`](Self::label), with control over escaping the text.
    pub fn label_with_escape(
        &mut self,
        name: &str,
        text: Option<&str>,
        escape_html: bool,
        attrs: Attributes,
    ) -> Markup {
        self.labels.push(name.to_string());

        let text = text.map_or_else(
            || formkit_core::utils::text::humanize_field_name(name),
            str::to_string,
        );
        let text = if escape_html {
            Markup::escape(&text)
        } else {
            Markup::from_trusted(text)
        };

        let mut tag_attrs = Attributes::new().with("for", name);
        for (attr, value) in attrs.iter() {
            tag_attrs.insert(attr, value);
        }
        Markup::from_trusted(format!("{}{text}</label>", tag_attrs.tag("label", ">")))
    }

    // ── Inputs ───────────────────────────────────────────────────────

    /// Renders an `<input>` of any type.
    ///
    /// `name` and `id` come from `attrs` when given there, else from `name`.
    /// For every type except file, password, checkbox, and radio the value is
    /// resolved from old input, the request, `value`, and the bound model, in
    /// that order; with nothing found no `value` attribute is rendered. For
    /// those four types `value` is passed through untouched.
    pub fn input(
        &self,
        input_type: &str,
        name: Option<&str>,
        value: Option<&str>,
        mut attrs: Attributes,
    ) -> Markup {
        if let Some(name) = name {
            attrs.insert_default("name", name);
            attrs.insert_default("id", name);
        }

        let value = if SKIP_VALUE_TYPES.contains(&input_type) {
            value.map(str::to_string)
        } else {
            self.resolve_value(name, value)
        };
        if let Some(value) = value {
            attrs.insert("value", value);
        }

        attrs.insert("type", input_type);
        Markup::from_trusted(attrs.tag("input", " />"))
    }

    /// Renders a text input.
    pub fn text(&self, name: &str, value: Option<&str>, attrs: Attributes) -> Markup {
        self.input("text", Some(name), value, attrs)
    }

    /// Renders a password input. Never pre-filled.
    pub fn password(&self, name: &str, attrs: Attributes) -> Markup {
        self.input("password", Some(name), None, attrs)
    }

    /// Renders a hidden input.
    pub fn hidden(&self, name: &str, value: Option<&str>, attrs: Attributes) -> Markup {
        self.input("hidden", Some(name), value, attrs)
    }

    /// Renders a search input.
    pub fn search(&self, name: &str, value: Option<&str>, attrs: Attributes) -> Markup {
        self.input("search", Some(name), value, attrs)
    }

    /// Renders an email input.
    pub fn email(&self, name: &str, value: Option<&str>, attrs: Attributes) -> Markup {
        self.input("email", Some(name), value, attrs)
    }

    /// Renders a telephone input.
    pub fn tel(&self, name: &str, value: Option<&str>, attrs: Attributes) -> Markup {
        self.input("tel", Some(name), value, attrs)
    }

    /// Renders a number input.
    pub fn number(&self, name: &str, value: Option<&str>, attrs: Attributes) -> Markup {
        self.input("number", Some(name), value, attrs)
    }

    /// Renders a date input.
    pub fn date(&self, name: &str, value: Option<&str>, attrs: Attributes) -> Markup {
        self.input("date", Some(name), value, attrs)
    }

    /// Renders a `datetime` input.
    pub fn datetime(&self, name: &str, value: Option<&str>, attrs: Attributes) -> Markup {
        self.input("datetime", Some(name), value, attrs)
    }

    /// Renders a `datetime-local` input.
    pub fn datetime_local(&self, name: &str, value: Option<&str>, attrs: Attributes) -> Markup {
        self.input("datetime-local", Some(name), value, attrs)
    }

    /// Renders a time input.
    pub fn time(&self, name: &str, value: Option<&str>, attrs: Attributes) -> Markup {
        self.input("time", Some(name), value, attrs)
    }

    /// Renders a URL input.
    pub fn url(&self, name: &str, value: Option<&str>, attrs: Attributes) -> Markup {
        self.input("url", Some(name), value, attrs)
    }

    /// Renders a color input.
    pub fn color(&self, name: &str, value: Option<&str>, attrs: Attributes) -> Markup {
        self.input("color", Some(name), value, attrs)
    }

    /// Renders a file input. Never pre-filled.
    pub fn file(&self, name: &str, attrs: Attributes) -> Markup {
        self.input("file", Some(name), None, attrs)
    }

    /// Renders a checkbox submitting `value`, checked when the resolved
    /// value of `name` equals `value`.
    pub fn checkbox(&self, name: &str, value: &str, attrs: Attributes) -> Markup {
        self.checkable("checkbox", name, value, attrs)
    }

    /// Renders a radio button submitting `value`, checked when the resolved
    /// value of `name` equals `value`.
    pub fn radio(&self, name: &str, value: &str, mut attrs: Attributes) -> Markup {
        // Radios in one group share a name, so the default id includes the value.
        attrs.insert_default("id", format!("{name}_{value}"));
        self.checkable("radio", name, value, attrs)
    }

    fn checkable(
        &self,
        input_type: &str,
        name: &str,
        value: &str,
        mut attrs: Attributes,
    ) -> Markup {
        if self.resolve_value(Some(name), None).as_deref() == Some(value) {
            attrs.insert("checked", "checked");
        }
        self.input(input_type, Some(name), Some(value), attrs)
    }

    /// Renders a submit button showing `value` verbatim.
    pub fn submit(&self, value: Option<&str>, attrs: Attributes) -> Markup {
        self.input("submit", None, value, attrs)
    }

    /// Renders a reset button showing `value` verbatim.
    pub fn reset(&self, value: Option<&str>, attrs: Attributes) -> Markup {
        self.input("reset", None, value, attrs)
    }

    // ── Other elements ───────────────────────────────────────────────

    /// Renders a `<textarea>` with its value as escaped content.
    ///
    /// Size comes from a `size` attribute written `COLSxROWS` (which is never
    /// rendered itself), or from `cols`/`rows`, defaulting to the configured
    /// textarea size.
    pub fn textarea(&self, name: &str, value: Option<&str>, mut attrs: Attributes) -> Markup {
        attrs.insert_default("name", name);

        let settings = self.builder.settings();
        let (cols, rows) = match attrs.remove("size") {
            Some(size) => parse_size(&size, settings.textarea_cols, settings.textarea_rows),
            None => (
                attrs
                    .get("cols")
                    .map_or_else(|| settings.textarea_cols.to_string(), str::to_string),
                attrs
                    .get("rows")
                    .map_or_else(|| settings.textarea_rows.to_string(), str::to_string),
            ),
        };
        attrs.insert("cols", cols);
        attrs.insert("rows", rows);
        attrs.insert_default("id", name);

        let content = self
            .resolve_value(Some(name), value)
            .map(|v| Markup::escape(&v))
            .unwrap_or_default();
        Markup::from_trusted(format!("{}{content}</textarea>", attrs.tag("textarea", ">")))
    }

    /// Renders a `<button>` with `value` as escaped content. The `type`
    /// defaults to `button`.
    pub fn button(&self, value: Option<&str>, mut attrs: Attributes) -> Markup {
        attrs.insert_default("type", "button");
        let content = value.map(Markup::escape).unwrap_or_default();
        Markup::from_trusted(format!("{}{content}</button>", attrs.tag("button", ">")))
    }

    /// Renders a `<select>` of `(value, label)` options. The option matching
    /// the resolved value of `name` (with `selected` as the explicit value)
    /// is marked selected.
    pub fn select(
        &self,
        name: &str,
        options: &[(&str, &str)],
        selected: Option<&str>,
        mut attrs: Attributes,
    ) -> Markup {
        attrs.insert_default("name", name);
        attrs.insert_default("id", name);

        let current = self.resolve_value(Some(name), selected);
        let mut html = attrs.tag("select", ">");
        for (value, label) in options {
            let mut option = Attributes::new().with("value", *value);
            if current.as_deref() == Some(*value) {
                option.insert("selected", "selected");
            }
            html.push_str(&option.tag("option", ">"));
            html.push_str(Markup::escape(label).as_str());
            html.push_str("</option>");
        }
        html.push_str("</select>");
        Markup::from_trusted(html)
    }

    // ── Value resolution ─────────────────────────────────────────────

    /// Resolves the display value for `name`: old input, then the request,
    /// then `value`, then the bound model. Empty old or request values are
    /// skipped. Without a name, `value` is returned as-is.
    pub fn resolve_value(&self, name: Option<&str>, value: Option<&str>) -> Option<String> {
        let Some(name) = name else {
            return value.map(str::to_string);
        };

        if name != self.builder.settings().method_field {
            if let Some(old) = self.old(name).filter(|v| !v.is_empty()) {
                return Some(old);
            }
        }

        if name != REQUEST_METHOD_FIELD {
            if let Some(submitted) = self.builder.request.input(name).filter(|v| !v.is_empty()) {
                return Some(submitted);
            }
        }

        if let Some(value) = value {
            return Some(value.to_string());
        }

        self.model.and_then(|model| model.form_value(name))
    }
}

/// Splits a `COLSxROWS` size. A missing or non-numeric side falls back to
/// its default.
fn parse_size(size: &str, default_cols: u32, default_rows: u32) -> (String, String) {
    static SIZE_RE: OnceLock<Regex> = OnceLock::new();
    let size_re = SIZE_RE.get_or_init(|| Regex::new(r"^\s*(\d*)\s*[xX]\s*(\d*)\s*$").unwrap());

    let (cols, rows) = size_re
        .captures(size)
        .map_or((None, None), |caps| {
            (
                caps.get(1).map(|m| m.as_str()).filter(|s| !s.is_empty()),
                caps.get(2).map(|m| m.as_str()).filter(|s| !s.is_empty()),
            )
        });

    if cols.is_none() || rows.is_none() {
        tracing::warn!(size, "malformed textarea size, using defaults for missing parts");
    }

    (
        cols.map_or_else(|| default_cols.to_string(), str::to_string),
        rows.map_or_else(|| default_rows.to_string(), str::to_string),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;
    use formkit_core::FormError;
    use formkit_csrf::CsrfTokens;
    use formkit_http::HttpRequest;
    use formkit_session::{Session, SessionData};
    use serde_json::json;

    struct Fixture {
        request: HttpRequest,
        session: Session,
        csrf: CsrfTokens,
    }

    impl Fixture {
        fn new(request: HttpRequest) -> Self {
            let session = Session::new(SessionData::new("test".to_string()));
            let csrf = CsrfTokens::for_session(&session);
            Self {
                request,
                session,
                csrf,
            }
        }

        fn get(path: &str) -> Self {
            Self::new(HttpRequest::builder().path(path).build())
        }

        fn post(path: &str, body: &str) -> Self {
            Self::new(
                HttpRequest::builder()
                    .method(http::Method::POST)
                    .path(path)
                    .form_body(body)
                    .build(),
            )
        }

        fn builder(&self) -> FormBuilder<'_> {
            FormBuilder::new(&self.request, &self.session, &self.csrf)
        }
    }

    fn token_of(markup: &Markup) -> String {
        let html = markup.as_str();
        let marker = r#"name="__token" id="__token" value=""#;
        let start = html.find(marker).unwrap() + marker.len();
        let end = start + html[start..].find('"').unwrap();
        html[start..end].to_string()
    }

    // ── open / model / close ─────────────────────────────────────────

    #[test]
    fn test_open_get() {
        let fx = Fixture::get("/search");
        let builder = fx.builder();
        let form = builder.open("get", None, attrs! {}).unwrap();
        let html = form.opening_tag().as_str();
        assert!(html.starts_with(
            r#"<form method="GET" action="/search" accept-charset="UTF-8"><input name="__token""#
        ));
        assert!(!html.contains("__method"));
    }

    #[test]
    fn test_open_all_allowed_methods() {
        let fx = Fixture::get("/");
        let builder = fx.builder();
        for method in ["GET", "POST", "PUT", "PATCH", "DELETE", "delete", "Patch"] {
            assert!(builder.open(method, None, attrs! {}).is_ok(), "{method}");
        }
    }

    #[test]
    fn test_open_invalid_method() {
        let fx = Fixture::get("/");
        let builder = fx.builder();
        for method in ["HEAD", "OPTIONS", "CONNECT", "", "GETT"] {
            let err = builder.open(method, None, attrs! {}).err().unwrap();
            assert!(matches!(err, FormError::InvalidMethod(_)));
            assert_eq!(err.status_code(), 405);
        }
    }

    #[test]
    fn test_open_spoofed_methods() {
        let fx = Fixture::get("/users/1");
        let builder = fx.builder();
        for method in ["put", "PATCH", "Delete"] {
            let form = builder.open(method, None, attrs! {}).unwrap();
            let html = form.opening_tag().as_str();
            assert!(html.starts_with(r#"<form method="POST""#));
            let spoof = format!(
                r#"<input name="__method" id="__method" value="{}" type="hidden" />"#,
                method.to_uppercase()
            );
            assert_eq!(html.matches(&spoof).count(), 1);
            assert_eq!(html.matches("__method").count(), 2);
        }
    }

    #[test]
    fn test_open_token_fresh_and_valid() {
        let fx = Fixture::get("/");
        let builder = fx.builder();
        let first = builder.open("post", None, attrs! {}).unwrap();
        let second = builder.open("post", None, attrs! {}).unwrap();

        let html = first.opening_tag().as_str();
        assert_eq!(html.matches(r#"name="__token""#).count(), 1);

        let a = token_of(first.opening_tag());
        let b = token_of(second.opening_tag());
        assert!(!a.is_empty());
        assert_ne!(a, b);
        assert!(fx.csrf.verify(&a));
        assert!(fx.csrf.verify(&b));
    }

    #[test]
    fn test_open_token_ignores_submitted_token() {
        let fx = Fixture::post("/", "__token=stale");
        let builder = fx.builder();
        let form = builder.open("post", None, attrs! {}).unwrap();
        assert_ne!(token_of(form.opening_tag()), "stale");
    }

    #[test]
    fn test_open_explicit_url_and_attrs() {
        let fx = Fixture::get("/ignored");
        let builder = fx.builder();
        let form = builder
            .open(
                "post",
                Some("/login?next=/a&b"),
                attrs! { "class" => "auth", "data-x" => "\"q\"" },
            )
            .unwrap();
        assert!(form.opening_tag().as_str().starts_with(
            r#"<form method="POST" action="/login?next=/a&amp;b" accept-charset="UTF-8" class="auth" data-x="&quot;q&quot;">"#
        ));
    }

    #[test]
    fn test_open_action_escapes_request_path() {
        let fx = Fixture::get("/a\"b");
        let builder = fx.builder();
        let form = builder.open("get", None, attrs! {}).unwrap();
        assert!(form.opening_tag().as_str().contains(r#"action="/a&quot;b""#));
    }

    #[test]
    fn test_custom_settings() {
        let fx = Fixture::get("/");
        let settings = Settings {
            charset: "ISO-8859-1".to_string(),
            token_field: "_csrf".to_string(),
            ..Settings::default()
        };
        let builder = fx.builder().with_settings(settings);
        let form = builder.open("post", None, attrs! {}).unwrap();
        let html = form.opening_tag().as_str();
        assert!(html.contains(r#"accept-charset="ISO-8859-1""#));
        assert!(html.contains(r#"name="_csrf""#));
    }

    #[test]
    fn test_close() {
        let fx = Fixture::get("/");
        let builder = fx.builder();
        let form = builder.open("get", None, attrs! {}).unwrap();
        assert_eq!(form.close().as_str(), "</form>");
    }

    #[test]
    fn test_model_does_not_leak_after_close() {
        let fx = Fixture::get("/");
        let builder = fx.builder();
        let user = json!({"name": "Ada"});

        let form = builder.model(&user, "put", None, attrs! {}).unwrap();
        assert!(form.text("name", None, attrs! {}).as_str().contains(r#"value="Ada""#));
        form.close();

        let form = builder.open("post", None, attrs! {}).unwrap();
        assert_eq!(
            form.text("name", None, attrs! {}).as_str(),
            r#"<input name="name" id="name" type="text" />"#
        );
    }

    #[test]
    fn test_two_open_forms_are_independent() {
        let fx = Fixture::get("/");
        let builder = fx.builder();
        let a_model = json!({"title": "A"});
        let b_model = json!({"title": "B"});

        let mut a = builder.model(&a_model, "post", None, attrs! {}).unwrap();
        let b = builder.model(&b_model, "post", None, attrs! {}).unwrap();
        a.label("title", None, attrs! {});

        assert!(a.text("title", None, attrs! {}).as_str().contains(r#"value="A""#));
        assert!(b.text("title", None, attrs! {}).as_str().contains(r#"value="B""#));
        assert_eq!(a.labels(), ["title".to_string()]);
        assert!(b.labels().is_empty());
    }

    // ── errors ───────────────────────────────────────────────────────

    #[test]
    fn test_errors_loaded_from_session() {
        let fx = Fixture::get("/");
        fx.session.flash(
            "errors",
            json!(r#"{"email": "Invalid email.", "name": ["Required."]}"#),
        );
        let builder = fx.builder();
        let form = builder.open("post", None, attrs! {}).unwrap();
        assert_eq!(form.errors("email").and_then(ErrorEntry::first), Some("Invalid email."));
        assert_eq!(form.errors("name").map(ErrorEntry::messages), Some(vec!["Required."]));
        assert!(form.errors("age").is_none());
        assert_eq!(form.all_errors().len(), 2);
    }

    #[test]
    fn test_malformed_errors_ignored() {
        let fx = Fixture::get("/");
        fx.session.flash("errors", json!("{oops"));
        let builder = fx.builder();
        let form = builder.open("post", None, attrs! {}).unwrap();
        assert!(form.all_errors().is_empty());
    }

    #[test]
    fn test_report_errors_flashes_input_and_errors() {
        let fx = Fixture::post("/signup", "email=bad&name=Ada&__token=t&__method=PUT");
        let builder = fx.builder();
        let mut errors = FieldErrors::new();
        errors.insert("email".into(), "Invalid email.".into());

        builder.report_errors(&fx.session, &errors).unwrap();

        assert_eq!(fx.session.get_string("email").as_deref(), Some("bad"));
        assert_eq!(fx.session.get_string("name").as_deref(), Some("Ada"));
        assert!(!fx.session.has("__token"));
        assert!(!fx.session.has("__method"));
        assert_eq!(
            fx.session.get_string("errors").as_deref(),
            Some(r#"{"email":"Invalid email."}"#)
        );
        assert_eq!(builder.old("email").as_deref(), Some("bad"));
    }

    #[test]
    fn test_report_errors_skips_custom_internal_fields() {
        let fx = Fixture::post("/", "title=Hi&_csrf=t&_verb=PUT&__extra=x");
        let settings = Settings {
            token_field: "_csrf".to_string(),
            method_field: "_verb".to_string(),
            ..Settings::default()
        };
        let builder = fx.builder().with_settings(settings);

        assert_eq!(builder.flash_old_input(&fx.session), 1);
        assert!(fx.session.has("title"));
        assert!(!fx.session.has("_csrf"));
        assert!(!fx.session.has("_verb"));
        assert!(!fx.session.has("__extra"));
    }

    #[test]
    fn test_errors_keep_valid_entries_of_mixed_payload() {
        let fx = Fixture::get("/");
        fx.session.flash(
            "errors",
            json!(r#"{"email": "Invalid.", "age": {"min": "Too young."}, "name": ["Required."]}"#),
        );
        let builder = fx.builder();
        let form = builder.open("post", None, attrs! {}).unwrap();
        assert_eq!(form.errors("email").and_then(ErrorEntry::first), Some("Invalid."));
        assert_eq!(form.errors("name").and_then(ErrorEntry::first), Some("Required."));
        assert!(form.errors("age").is_none());
    }

    #[test]
    fn test_regular_errors_value_is_not_flashed_errors() {
        let fx = Fixture::get("/");
        fx.session.set("errors", json!(r#"{"email": "Stale."}"#));
        let builder = fx.builder();
        let form = builder.open("post", None, attrs! {}).unwrap();
        assert!(form.all_errors().is_empty());
    }

    // ── old input ────────────────────────────────────────────────────

    #[test]
    fn test_regular_session_value_is_not_old_input() {
        let fx = Fixture::get("/");
        fx.session.set("email", json!("logged-in@x.io"));
        let builder = fx.builder();
        let model = json!({"email": "edited-user@x.io"});
        let form = builder.model(&model, "put", None, attrs! {}).unwrap();

        assert_eq!(form.old("email"), None);
        assert!(form
            .email("email", None, attrs! {})
            .as_str()
            .contains(r#"value="edited-user@x.io""#));
        assert!(form
            .email("email", Some("explicit@x.io"), attrs! {})
            .as_str()
            .contains(r#"value="explicit@x.io""#));
    }

    #[test]
    fn test_csrf_secret_never_rendered_as_value() {
        let fx = Fixture::get("/");
        let builder = fx.builder();
        let form = builder.open("post", None, attrs! {}).unwrap();
        let secret = fx.csrf.secret().to_string();

        let html = form.hidden("_csrf_secret", None, attrs! {});
        assert_eq!(
            html.as_str(),
            r#"<input name="_csrf_secret" id="_csrf_secret" type="hidden" />"#
        );
        assert!(!form.opening_tag().as_str().contains(&secret));
    }

    #[test]
    fn test_old_input_from_previous_request() {
        let fx = Fixture::get("/");
        fx.session.flash("email", json!("old@x.io"));
        let mut data = fx.session.snapshot();
        data.age_flash();
        let session = Session::new(data);
        let builder = FormBuilder::new(&fx.request, &session, &fx.csrf);
        assert_eq!(builder.old("email").as_deref(), Some("old@x.io"));
    }

    // ── labels ───────────────────────────────────────────────────────

    #[test]
    fn test_label_humanized() {
        let fx = Fixture::get("/");
        let builder = fx.builder();
        let mut form = builder.open("get", None, attrs! {}).unwrap();
        assert_eq!(
            form.label("first_name", None, attrs! {}).as_str(),
            r#"<label for="first_name">First Name</label>"#
        );
    }

    #[test]
    fn test_label_explicit_text_escaped() {
        let fx = Fixture::get("/");
        let builder = fx.builder();
        let mut form = builder.open("get", None, attrs! {}).unwrap();
        assert_eq!(
            form.label("tos", Some("I agree <b>now</b>"), attrs! { "class" => "c" })
                .as_str(),
            r#"<label for="tos" class="c">I agree &lt;b&gt;now&lt;/b&gt;</label>"#
        );
    }

    #[test]
    fn test_label_unescaped() {
        let fx = Fixture::get("/");
        let builder = fx.builder();
        let mut form = builder.open("get", None, attrs! {}).unwrap();
        let html = form.label_with_escape("tos", Some("<b>Terms</b>"), false, attrs! {});
        assert_eq!(html.as_str(), r#"<label for="tos"><b>Terms</b></label>"#);
        form.label("email", None, attrs! {});
        assert_eq!(form.labels(), ["tos".to_string(), "email".to_string()]);
    }

    // ── inputs & precedence ──────────────────────────────────────────

    #[test]
    fn test_input_precedence_old_over_request() {
        let fx = Fixture::post("/", "email=request%40x.io");
        fx.session.flash("email", json!("old@x.io"));
        let builder = fx.builder();
        let form = builder.open("post", None, attrs! {}).unwrap();
        assert!(form
            .email("email", Some("explicit@x.io"), attrs! {})
            .as_str()
            .contains(r#"value="old@x.io""#));
    }

    #[test]
    fn test_input_precedence_request_over_explicit() {
        let fx = Fixture::post("/", "email=request%40x.io");
        let builder = fx.builder();
        let model = json!({"email": "model@x.io"});
        let form = builder.model(&model, "post", None, attrs! {}).unwrap();
        assert!(form
            .email("email", Some("explicit@x.io"), attrs! {})
            .as_str()
            .contains(r#"value="request@x.io""#));
    }

    #[test]
    fn test_input_precedence_explicit_over_model() {
        let fx = Fixture::get("/");
        let builder = fx.builder();
        let model = json!({"email": "model@x.io"});
        let form = builder.model(&model, "post", None, attrs! {}).unwrap();
        assert!(form
            .email("email", Some("explicit@x.io"), attrs! {})
            .as_str()
            .contains(r#"value="explicit@x.io""#));
        assert!(form
            .email("email", None, attrs! {})
            .as_str()
            .contains(r#"value="model@x.io""#));
    }

    #[test]
    fn test_empty_old_and_request_values_skipped() {
        let fx = Fixture::post("/", "nick=");
        fx.session.flash("nick", json!(""));
        let builder = fx.builder();
        let form = builder.open("post", None, attrs! {}).unwrap();
        assert!(form
            .text("nick", Some("fallback"), attrs! {})
            .as_str()
            .contains(r#"value="fallback""#));
    }

    #[test]
    fn test_method_field_ignores_old_input() {
        let fx = Fixture::get("/");
        fx.session.flash("__method", json!("DELETE"));
        let builder = fx.builder();
        let form = builder.open("post", None, attrs! {}).unwrap();
        assert_eq!(form.resolve_value(Some("__method"), Some("PUT")).as_deref(), Some("PUT"));
    }

    #[test]
    fn test_request_method_field_ignores_request() {
        let fx = Fixture::post("/", "request_method=DELETE");
        let builder = fx.builder();
        let form = builder.open("post", None, attrs! {}).unwrap();
        assert_eq!(form.resolve_value(Some("request_method"), None), None);
    }

    #[test]
    fn test_input_renders_no_value_when_unresolved() {
        let fx = Fixture::get("/");
        let builder = fx.builder();
        let form = builder.open("get", None, attrs! {}).unwrap();
        assert_eq!(
            form.text("q", None, attrs! {}).as_str(),
            r#"<input name="q" id="q" type="text" />"#
        );
    }

    #[test]
    fn test_input_value_escaped() {
        let fx = Fixture::get("/");
        let builder = fx.builder();
        let form = builder.open("get", None, attrs! {}).unwrap();
        assert_eq!(
            form.text("q", Some(r#""><script>"#), attrs! {}).as_str(),
            r#"<input name="q" id="q" value="&quot;&gt;&lt;script&gt;" type="text" />"#
        );
    }

    #[test]
    fn test_input_explicit_name_and_id_win() {
        let fx = Fixture::get("/");
        let builder = fx.builder();
        let form = builder.open("get", None, attrs! {}).unwrap();
        assert_eq!(
            form.text("q", None, attrs! { "id" => "search-box", "name" => "query" })
                .as_str(),
            r#"<input id="search-box" name="query" type="text" />"#
        );
    }

    #[test]
    fn test_typed_inputs() {
        let fx = Fixture::get("/");
        let builder = fx.builder();
        let form = builder.open("get", None, attrs! {}).unwrap();
        let cases = [
            (form.hidden("a", Some("1"), attrs! {}), "hidden"),
            (form.search("a", None, attrs! {}), "search"),
            (form.tel("a", None, attrs! {}), "tel"),
            (form.number("a", None, attrs! {}), "number"),
            (form.date("a", None, attrs! {}), "date"),
            (form.datetime("a", None, attrs! {}), "datetime"),
            (form.datetime_local("a", None, attrs! {}), "datetime-local"),
            (form.time("a", None, attrs! {}), "time"),
            (form.url("a", None, attrs! {}), "url"),
            (form.color("a", None, attrs! {}), "color"),
        ];
        for (markup, ty) in cases {
            assert!(markup.as_str().ends_with(&format!(r#"type="{ty}" />"#)), "{ty}");
        }
    }

    #[test]
    fn test_password_and_file_never_prefilled() {
        let fx = Fixture::post("/", "secret=hunter2&avatar=x.png");
        fx.session.flash("secret", json!("old"));
        let builder = fx.builder();
        let form = builder.open("post", None, attrs! {}).unwrap();
        assert_eq!(
            form.password("secret", attrs! {}).as_str(),
            r#"<input name="secret" id="secret" type="password" />"#
        );
        assert_eq!(
            form.file("avatar", attrs! {}).as_str(),
            r#"<input name="avatar" id="avatar" type="file" />"#
        );
    }

    #[test]
    fn test_submit_and_reset() {
        let fx = Fixture::post("/", "Save=other");
        let builder = fx.builder();
        let form = builder.open("post", None, attrs! {}).unwrap();
        assert_eq!(
            form.submit(Some("Save"), attrs! { "class" => "btn" }).as_str(),
            r#"<input class="btn" value="Save" type="submit" />"#
        );
        assert_eq!(form.submit(None, attrs! {}).as_str(), r#"<input type="submit" />"#);
        assert_eq!(
            form.reset(Some("Clear"), attrs! {}).as_str(),
            r#"<input value="Clear" type="reset" />"#
        );
    }

    #[test]
    fn test_checkbox_checked_from_old_input() {
        let fx = Fixture::get("/");
        fx.session.flash("remember", json!("yes"));
        let builder = fx.builder();
        let form = builder.open("post", None, attrs! {}).unwrap();
        assert_eq!(
            form.checkbox("remember", "yes", attrs! {}).as_str(),
            r#"<input checked="checked" name="remember" id="remember" value="yes" type="checkbox" />"#
        );
        assert!(!form.checkbox("newsletter", "yes", attrs! {}).as_str().contains("checked"));
    }

    #[test]
    fn test_radio_group() {
        let fx = Fixture::get("/");
        let builder = fx.builder();
        let model = json!({"plan": "pro"});
        let form = builder.model(&model, "post", None, attrs! {}).unwrap();
        let free = form.radio("plan", "free", attrs! {});
        let pro = form.radio("plan", "pro", attrs! {});
        assert_eq!(
            free.as_str(),
            r#"<input id="plan_free" name="plan" value="free" type="radio" />"#
        );
        assert_eq!(
            pro.as_str(),
            r#"<input id="plan_pro" checked="checked" name="plan" value="pro" type="radio" />"#
        );
    }

    #[test]
    fn test_select() {
        let fx = Fixture::post("/", "country=fr");
        let builder = fx.builder();
        let form = builder.open("post", None, attrs! {}).unwrap();
        let html = form.select(
            "country",
            &[("de", "Germany"), ("fr", "France"), ("x", "A & B")],
            Some("de"),
            attrs! {},
        );
        assert_eq!(
            html.as_str(),
            concat!(
                r#"<select name="country" id="country">"#,
                r#"<option value="de">Germany</option>"#,
                r#"<option value="fr" selected="selected">France</option>"#,
                r#"<option value="x">A &amp; B</option>"#,
                "</select>"
            )
        );
    }

    // ── textarea & button ────────────────────────────────────────────

    #[test]
    fn test_textarea_defaults() {
        let fx = Fixture::get("/");
        let builder = fx.builder();
        let form = builder.open("post", None, attrs! {}).unwrap();
        assert_eq!(
            form.textarea("bio", Some("<hi>"), attrs! {}).as_str(),
            r#"<textarea name="bio" cols="50" rows="10" id="bio">&lt;hi&gt;</textarea>"#
        );
    }

    #[test]
    fn test_textarea_size_shorthand() {
        let fx = Fixture::get("/");
        let builder = fx.builder();
        let form = builder.open("post", None, attrs! {}).unwrap();
        let html = form.textarea("bio", None, attrs! { "size" => "40x5" });
        assert_eq!(
            html.as_str(),
            r#"<textarea name="bio" cols="40" rows="5" id="bio"></textarea>"#
        );
        assert!(!html.as_str().contains("size"));
    }

    #[test]
    fn test_textarea_explicit_cols_rows() {
        let fx = Fixture::get("/");
        let builder = fx.builder();
        let form = builder.open("post", None, attrs! {}).unwrap();
        assert_eq!(
            form.textarea("bio", None, attrs! { "rows" => "3" }).as_str(),
            r#"<textarea rows="3" name="bio" cols="50" id="bio"></textarea>"#
        );
    }

    #[test]
    fn test_textarea_malformed_size_falls_back() {
        let fx = Fixture::get("/");
        let builder = fx.builder();
        let form = builder.open("post", None, attrs! {}).unwrap();
        let html = form.textarea("bio", None, attrs! { "size" => "wide" });
        assert!(html.as_str().contains(r#"cols="50" rows="10""#));
        let html = form.textarea("bio", None, attrs! { "size" => "30x" });
        assert!(html.as_str().contains(r#"cols="30" rows="10""#));
    }

    #[test]
    fn test_textarea_uses_model() {
        let fx = Fixture::get("/");
        let builder = fx.builder();
        let model = json!({"bio": "Mathematician & writer"});
        let form = builder.model(&model, "patch", None, attrs! {}).unwrap();
        assert!(form
            .textarea("bio", None, attrs! {})
            .as_str()
            .ends_with(">Mathematician &amp; writer</textarea>"));
    }

    #[test]
    fn test_button() {
        let fx = Fixture::get("/");
        let builder = fx.builder();
        let form = builder.open("post", None, attrs! {}).unwrap();
        assert_eq!(
            form.button(Some("Go <now>"), attrs! {}).as_str(),
            r#"<button type="button">Go &lt;now&gt;</button>"#
        );
        assert_eq!(
            form.button(Some("Send"), attrs! { "type" => "submit", "class" => "b" })
                .as_str(),
            r#"<button type="submit" class="b">Send</button>"#
        );
        assert_eq!(form.button(None, attrs! {}).as_str(), r#"<button type="button"></button>"#);
    }

    // ── helpers ──────────────────────────────────────────────────────

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("40x5", 50, 10), ("40".into(), "5".into()));
        assert_eq!(parse_size(" 80 X 24 ", 50, 10), ("80".into(), "24".into()));
        assert_eq!(parse_size("x7", 50, 10), ("50".into(), "7".into()));
        assert_eq!(parse_size("", 50, 10), ("50".into(), "10".into()));
    }
}
