//! Registry validation.
//!
//! Catches declaration mistakes such as missing names, illegal characters,
//! or a short name that collides with another option's long name, before
//! they turn into confusing parse behaviour.
//!
//! # Examples
//!
//! ```
//! use argline_core::*;
//!
//! let options = Options::new()
//!     .with_option(OptionSpec::short("v").with_long("verbose"));
//! assert!(validate_options(&options).is_empty());
//!
//! // Invalid: short name containing a space
//! let bad = Options::new().with_option(OptionSpec::short("a b"));
//! assert!(!validate_options(&bad).is_empty());
//! ```

use std::collections::HashMap;

use thiserror::Error;

use crate::{Arity, OptionSpec, Options};

/// Registry validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// An option has neither a short nor a long name.
    #[error("option must define a short or long name")]
    MissingOptionName,
    /// A short name contains a character that cannot appear in an option.
    #[error("illegal short option name '{name}': invalid character '{ch}'")]
    InvalidShortName { name: String, ch: char },
    /// A long name is empty, starts with a hyphen, or contains `=` or whitespace.
    #[error("invalid long option name: '{0}'")]
    InvalidLongName(String),
    /// Two options share the same short name or the same long name.
    #[error("duplicate option name: {0}")]
    DuplicateName(String),
    /// A short name of one option equals the long name of another.
    #[error("short name '{0}' collides with a long name of another option")]
    KeyCollision(String),
    /// An option declared with `Fixed(0)`.
    #[error("option '{0}' has a fixed arity of zero; use Arity::None")]
    ZeroArity(String),
    /// A value separator on an option that takes no values.
    #[error("option '{0}' has a value separator but takes no arguments")]
    SeparatorWithoutArgs(String),
}

/// Validates every option declared in the registry.
///
/// Returns all problems found, in declaration order.
pub fn validate_options(options: &Options) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut short_owner: HashMap<&str, &str> = HashMap::new();
    let mut long_owner: HashMap<&str, &str> = HashMap::new();

    for option in options.options() {
        errors.extend(validate_option(option));

        let key = option.key();
        if let Some(short) = option.short.as_deref() {
            if short_owner.insert(short, key).is_some_and(|owner| owner != key) {
                errors.push(ValidationError::DuplicateName(short.to_string()));
            }
        }
        if let Some(long) = option.long.as_deref() {
            if long_owner.insert(long, key).is_some_and(|owner| owner != key) {
                errors.push(ValidationError::DuplicateName(long.to_string()));
            }
        }
    }

    for option in options.options() {
        if let Some(short) = option.short.as_deref() {
            if long_owner
                .get(short)
                .is_some_and(|&owner| owner != option.key())
            {
                errors.push(ValidationError::KeyCollision(short.to_string()));
            }
        }
    }

    errors.dedup();
    errors
}

/// Validates a single option declaration.
pub fn validate_option(option: &OptionSpec) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if option.short.is_none() && option.long.is_none() {
        errors.push(ValidationError::MissingOptionName);
        return errors;
    }

    if let Some(short) = &option.short {
        if let Some(ch) = invalid_short_char(short) {
            errors.push(ValidationError::InvalidShortName {
                name: short.clone(),
                ch,
            });
        }
    }

    if let Some(long) = &option.long {
        if long.is_empty()
            || long.starts_with('-')
            || long.contains('=')
            || long.chars().any(char::is_whitespace)
        {
            errors.push(ValidationError::InvalidLongName(long.clone()));
        }
    }

    match option.arity {
        Arity::Fixed(0) => errors.push(ValidationError::ZeroArity(option.key().to_string())),
        Arity::None if option.value_separator.is_some() => {
            errors.push(ValidationError::SeparatorWithoutArgs(option.key().to_string()));
        }
        _ => {}
    }

    errors
}

/// Single-character names may also be `?` or `@`; longer short names must
/// be made of identifier characters only.
fn invalid_short_char(name: &str) -> Option<char> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Some(' '),
        (Some(ch), None) => (!is_name_char(ch) && ch != '?' && ch != '@').then_some(ch),
        _ => name.chars().find(|&ch| !is_name_char(ch)),
    }
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}
