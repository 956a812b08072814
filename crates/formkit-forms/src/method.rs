//! Form methods and method spoofing.

use std::fmt;
use std::str::FromStr;

use formkit_core::FormError;

/// An HTTP method a form may be opened with.
///
/// Browsers can only submit GET and POST, so PUT, PATCH, and DELETE are
/// *spoofed*: the form posts and carries the real verb in a hidden field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`, sent as a spoofed POST.
    Put,
    /// `PATCH`, sent as a spoofed POST.
    Patch,
    /// `DELETE`, sent as a spoofed POST.
    Delete,
}

impl FormMethod {
    /// Returns the upper-case verb.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Returns `true` if the browser cannot send this verb natively.
    pub const fn is_spoofed(self) -> bool {
        matches!(self, Self::Put | Self::Patch | Self::Delete)
    }

    /// The value for the `<form method>` attribute.
    pub const fn html_method(self) -> &'static str {
        if self.is_spoofed() {
            "POST"
        } else {
            self.as_str()
        }
    }
}

impl FromStr for FormMethod {
    type Err = FormError;

    /// Parses a verb case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            other => Err(FormError::InvalidMethod(other.to_string())),
        }
    }
}

impl fmt::Display for FormMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
