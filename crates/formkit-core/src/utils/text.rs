//! String utility functions.

/// Escapes HTML special characters in a string.
///
/// Replaces `&`, `<`, `>`, `"`, and `'` with their HTML entity equivalents.
///
/// # Examples
///
/// ```
/// use formkit_core::utils::text::escape_html;
///
/// assert_eq!(escape_html("<b>\"hi\"</b>"), "&lt;b&gt;&quot;hi&quot;&lt;/b&gt;");
/// ```
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Title-cases a string: the first letter of every word is uppercased and
/// the remaining letters are lowercased. A word starts after any character
/// that is not alphabetic.
///
/// # Examples
///
/// ```
/// use formkit_core::utils::text::title_case;
///
/// assert_eq!(title_case("first name"), "First Name");
/// assert_eq!(title_case("EMAIL address"), "Email Address");
/// ```
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Turns a field name into default label text.
///
/// Underscores become spaces and the result is title-cased.
///
/// # Examples
///
/// ```
/// use formkit_core::utils::text::humanize_field_name;
///
/// assert_eq!(humanize_field_name("first_name"), "First Name");
/// ```
pub fn humanize_field_name(name: &str) -> String {
    title_case(&name.replace('_', " "))
}
