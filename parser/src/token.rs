//! Small helpers for normalizing raw tokens.

pub use argline_core::strip_leading_hyphens;

/// The token that ends option processing.
pub const TERMINATOR: &str = "--";

/// Removes one layer of surrounding double quotes.
///
/// The quotes are only removed when the inner text contains no further
/// double quote, so `"a"b"` is left untouched.
///
/// # Examples
///
/// ```
/// use argline_parser::token::strip_surrounding_quotes;
///
/// assert_eq!(strip_surrounding_quotes("\"hello world\""), "hello world");
/// assert_eq!(strip_surrounding_quotes("\"a\"b\""), "\"a\"b\"");
/// assert_eq!(strip_surrounding_quotes("\""), "\"");
/// ```
pub fn strip_surrounding_quotes(token: &str) -> &str {
    match token
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) if !inner.contains('"') => inner,
        _ => token,
    }
}

/// Returns `true` if the token parses as a negative real number.
///
/// Only digit forms count: `-inf` and `-nan` are left to the registry.
pub fn is_negative_number(token: &str) -> bool {
    token
        .strip_prefix('-')
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit() || c == '.'))
        && token.parse::<f64>().is_ok()
}

/// Splits `name=value` at the first `=`.
pub fn split_at_equal(token: &str) -> Option<(&str, &str)> {
    token.split_once('=')
}

/// Splits off the first character, returning it and the remainder.
pub fn split_first_char(token: &str) -> Option<(char, &str)> {
    let mut chars = token.chars();
    chars.next().map(|first| (first, chars.as_str()))
}

/// Returns `true` if the token is exactly one character long.
pub fn is_single_char(token: &str) -> bool {
    split_first_char(token).is_some_and(|(_, rest)| rest.is_empty())
}
