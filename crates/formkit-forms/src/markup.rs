//! Safe HTML fragments and attribute sets.
//!
//! [`Markup`] is HTML that is ready to embed: anything that went into it has
//! already been escaped. [`Attributes`] is an insertion-ordered attribute set
//! whose values are escaped when it is rendered.

use std::fmt;
use std::ops::{Add, AddAssign};

use formkit_core::utils::text::escape_html;

/// A fragment of HTML that is safe to embed in a page as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Markup(String);

impl Markup {
    /// Wraps HTML that the caller vouches for. Nothing is escaped.
    pub fn from_trusted(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    /// Escapes `text` and wraps the result.
    pub fn escape(text: &str) -> Self {
        Self(escape_html(text))
    }

    /// Returns the HTML as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the markup, returning the HTML string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Appends another fragment.
    pub fn push(&mut self, other: &Self) {
        self.0.push_str(&other.0);
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Add for Markup {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self.0.push_str(&rhs.0);
        self
    }
}

impl AddAssign for Markup {
    fn add_assign(&mut self, rhs: Self) {
        self.0.push_str(&rhs.0);
    }
}

impl From<Markup> for String {
    fn from(markup: Markup) -> Self {
        markup.0
    }
}

/// An ordered set of HTML attributes.
///
/// Re-inserting an existing name replaces its value in place, so the output
/// order is the order names were first seen.
///
/// # Examples
///
/// ```
/// use formkit_forms::Attributes;
///
/// let mut attrs = Attributes::new().with("class", "a").with("title", "x<y");
/// attrs.insert("class", "b");
/// assert_eq!(attrs.render(), r#"class="b" title="x&lt;y""#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    /// Creates an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets an attribute, replacing the value if the name is already present.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Sets an attribute only if it is not present yet.
    pub fn insert_default(&mut self, name: &str, value: impl Into<String>) {
        if !self.contains(name) {
            self.entries.push((name.to_string(), value.into()));
        }
    }

    /// Returns the value of an attribute.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if the attribute is present.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Removes an attribute, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, raw value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Renders the set as `name="value"` pairs joined by spaces, escaping
    /// every value.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(name, value)| format!(r#"{name}="{}""#, escape_html(value)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Renders an opening tag such as `<input a="b"` followed by `close`.
    pub(crate) fn tag(&self, element: &str, close: &str) -> String {
        if self.is_empty() {
            format!("<{element}{close}")
        } else {
            format!("<{element} {}{close}", self.render())
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Attributes {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Builds an [`Attributes`] set from `name => value` pairs.
///
/// ```
/// use formkit_forms::attrs;
///
/// let a = attrs! { "class" => "btn", "data-id" => 7.to_string() };
/// assert_eq!(a.get("data-id"), Some("7"));
/// assert!(attrs! {}.is_empty());
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::Attributes::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut attrs = $crate::Attributes::new();
        $(attrs.insert($name, $value);)+
        attrs
    }};
}
