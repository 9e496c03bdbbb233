//! Error types for command-line parsing.
//!
//! Every error aborts the parse that raised it; no partial result is
//! returned alongside.

use std::fmt;

use argline_core::{AlreadySelected, ValueError};
use thiserror::Error;

/// A required option or group that never matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingOption {
    /// A required option, by key.
    Option(String),
    /// A required group, by member keys.
    Group(Vec<String>),
}

impl fmt::Display for MissingOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingOption::Option(key) => f.write_str(key),
            MissingOption::Group(keys) => write!(f, "[{}]", keys.join(", ")),
        }
    }
}

/// Errors that can occur while parsing tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A token looks like an option but matches nothing in the registry.
    #[error("unrecognized option: {0}")]
    UnrecognizedOption(String),

    /// A long-name prefix matches more than one registered long name.
    #[error("ambiguous option: '{token}' (could be: {})", quoted(.candidates))]
    AmbiguousOption {
        token: String,
        candidates: Vec<String>,
    },

    /// An option needing an argument reached the next option or the end of
    /// input without one.
    #[error("missing argument for option: {0}")]
    MissingArgument(String),

    /// Required options or groups never matched.
    #[error("missing required option(s): {}", joined(.0))]
    MissingOptions(Vec<MissingOption>),

    /// Two members of the same group were given.
    #[error(transparent)]
    AlreadySelected(#[from] AlreadySelected),

    /// A default value names an option absent from the registry.
    #[error("default option was not declared: {0}")]
    UnknownDefault(String),

    /// A value was fed in a way the option's declaration does not allow.
    #[error("invalid option declaration: {0}")]
    Value(#[from] ValueError),
}

impl ParseError {
    /// Returns `true` for errors about an option that could not be
    /// identified: unrecognized, ambiguous, or an unknown default.
    pub fn is_unrecognized(&self) -> bool {
        matches!(
            self,
            ParseError::UnrecognizedOption(_)
                | ParseError::AmbiguousOption { .. }
                | ParseError::UnknownDefault(_)
        )
    }

    /// The offending token or option name, when there is a single one.
    pub fn option(&self) -> Option<&str> {
        match self {
            ParseError::UnrecognizedOption(token)
            | ParseError::MissingArgument(token)
            | ParseError::UnknownDefault(token) => Some(token),
            ParseError::AmbiguousOption { token, .. } => Some(token),
            ParseError::AlreadySelected(err) => Some(&err.option),
            ParseError::MissingOptions(_) | ParseError::Value(_) => None,
        }
    }
}

fn quoted(candidates: &[String]) -> String {
    candidates
        .iter()
        .map(|c| format!("'{c}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn joined(missing: &[MissingOption]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience alias for results with [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_message_lists_candidates() {
        let err = ParseError::AmbiguousOption {
            token: "--f".to_string(),
            candidates: vec!["file".to_string(), "force".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "ambiguous option: '--f' (could be: 'file', 'force')"
        );
        assert!(err.is_unrecognized());
    }

    #[test]
    fn test_missing_options_message() {
        let err = ParseError::MissingOptions(vec![
            MissingOption::Option("r".to_string()),
            MissingOption::Group(vec!["x".to_string(), "y".to_string()]),
        ]);
        assert_eq!(err.to_string(), "missing required option(s): r, [x, y]");
        assert!(!err.is_unrecognized());
        assert_eq!(err.option(), None);
    }

    #[test]
    fn test_already_selected_exposes_rejected_option() {
        let err = ParseError::from(AlreadySelected {
            group: vec!["x".to_string(), "y".to_string()],
            selected: "x".to_string(),
            option: "y".to_string(),
        });
        assert_eq!(err.option(), Some("y"));
    }
}
