use std::borrow::Cow;

pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

const QUOTES: &[char] = &['"', '`', '[', ']'];

/// Remove the dialect quotes from every dotted part of an identifier.
///
/// ```rust
/// use sluice_core::unquote;
/// assert_eq!(unquote("[dbo].[Person]"), "dbo.Person");
/// assert_eq!(unquote("\"Name\""), "Name");
/// assert_eq!(unquote("plain"), "plain");
/// ```
pub fn unquote(value: &str) -> Cow<'_, str> {
    if !value.contains(QUOTES) {
        return Cow::Borrowed(value.trim());
    }
    let mut result = String::with_capacity(value.len());
    separated_by(
        &mut result,
        value.split('.'),
        |out, part| out.push_str(part.trim().trim_matches(QUOTES)),
        ".",
    );
    Cow::Owned(result)
}

/// Unquoted, case folded form of an identifier, used for comparisons and keys.
pub fn normalize(value: &str) -> String {
    unquote(value).to_ascii_lowercase()
}

/// Case insensitive comparison of two identifiers ignoring the quotes.
pub fn same_identifier(a: &str, b: &str) -> bool {
    unquote(a).eq_ignore_ascii_case(&unquote(b))
}

/// Parameter name bound to a column, without the dialect prefix.
///
/// ```rust
/// use sluice_core::parameter_name;
/// assert_eq!(parameter_name("[First Name]"), "First_Name");
/// ```
pub fn parameter_name(column: &str) -> String {
    unquote(column)
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {{
        let query: &str = &$query;
        let end = query
            .char_indices()
            .nth(497)
            .map(|(i, _)| i)
            .unwrap_or(query.len());
        format!(
            "{}{}",
            query[..end].trim_end(),
            if end < query.len() { "..." } else { "" },
        )
    }};
}

#[macro_export]
macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = $crate::itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
