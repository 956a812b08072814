//! Binding a model to a form.
//!
//! A bound model is the last place a field looks for its value. Types that
//! know how to present themselves implement [`FormBindable`] directly; plain
//! serializable structs are wrapped in [`Fields`], which looks fields up by
//! name.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use formkit_core::FormResult;

/// A value source for form fields.
pub trait FormBindable {
    /// Returns the display value for the field `name`, if the model has one.
    fn form_value(&self, name: &str) -> Option<String>;
}

impl<T: FormBindable + ?Sized> FormBindable for &T {
    fn form_value(&self, name: &str) -> Option<String> {
        (**self).form_value(name)
    }
}

impl FormBindable for serde_json::Value {
    /// Looks `name` up as an object key. Strings are returned as-is, other
    /// scalars in their JSON form, and `null` counts as missing.
    fn form_value(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            Self::Null => None,
            Self::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl FormBindable for HashMap<String, String> {
    fn form_value(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl FormBindable for BTreeMap<String, String> {
    fn form_value(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Adapter that exposes the named fields of any serializable struct.
///
/// # Examples
///
/// ```
/// use formkit_forms::{Fields, FormBindable};
///
/// #[derive(serde::Serialize)]
/// struct User { name: String, age: u32, nickname: Option<String> }
///
/// let user = User { name: "Ada".into(), age: 36, nickname: None };
/// let fields = Fields::new(&user).unwrap();
/// assert_eq!(fields.form_value("name").as_deref(), Some("Ada"));
/// assert_eq!(fields.form_value("age").as_deref(), Some("36"));
/// assert_eq!(fields.form_value("nickname"), None);
/// ```
#[derive(Debug, Clone)]
pub struct Fields {
    value: serde_json::Value,
}

impl Fields {
    /// Serializes `model` once so later lookups are plain map reads.
    pub fn new<T: Serialize + ?Sized>(model: &T) -> FormResult<Self> {
        Ok(Self {
            value: serde_json::to_value(model)?,
        })
    }
}

impl FormBindable for Fields {
    fn form_value(&self, name: &str) -> Option<String> {
        self.value.form_value(name)
    }
}
