//! Token shape classification.
//!
//! Deciding what a token means is separated from acting on it: the
//! functions here only inspect the token and the registry, and return a
//! shape that the parse session then dispatches on.

use argline_core::{OptionSpec, Options};

use crate::token::{
    TERMINATOR, is_negative_number, is_single_char, split_at_equal, split_first_char,
    strip_leading_hyphens,
};

/// Coarse shape of a token, decided from its prefix alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// The literal `--`.
    Terminator,
    /// Starts with `--`.
    Long,
    /// Starts with a single `-` and is not `-` itself.
    Short,
    /// Anything else, including a lone `-` and negative numbers.
    Positional,
}

/// Classifies a token by its leading hyphens.
///
/// A token that parses as a negative number is positional even though it
/// starts with `-`.
pub fn classify_token(token: &str) -> TokenKind {
    if token == TERMINATOR {
        TokenKind::Terminator
    } else if is_negative_number(token) {
        TokenKind::Positional
    } else if token.starts_with("--") {
        TokenKind::Long
    } else if token.starts_with('-') && token != "-" {
        TokenKind::Short
    } else {
        TokenKind::Positional
    }
}

/// Interpretation of a token starting with a single hyphen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortToken<'a, 't> {
    /// `-S`, or `-SS` naming a multi-character short option.
    Short(&'a OptionSpec),
    /// `-L` or `-l`: a long name or long-name prefix written with one hyphen.
    Long,
    /// `-Xmx512m`: a long name followed directly by its value.
    AttachedValue {
        option: &'a OptionSpec,
        value: &'t str,
    },
    /// `-Dvalue`: a property-style option followed by its first value.
    Property {
        option: &'a OptionSpec,
        value: &'t str,
    },
    /// `-S1S2S3` or `-S1S2V`: clustered single-character options.
    Cluster,
    /// `-S=V`.
    ShortWithEqual {
        option: &'a OptionSpec,
        value: &'t str,
    },
    /// `-Dkey=value`.
    PropertyWithEqual {
        option: &'a OptionSpec,
        key: &'t str,
        value: &'t str,
    },
    /// `-L=V` or `-l=V`.
    LongWithEqual,
    /// Looks like an option but cannot name one.
    Unknown,
}

/// Decides how a single-hyphen token should be handled.
///
/// Exact short names win over single-hyphen long names, which win over
/// attached values, property-style options and finally clusters.
pub fn classify_short<'a, 't>(options: &'a Options, token: &'t str) -> ShortToken<'a, 't> {
    let t = strip_leading_hyphens(token);

    if is_single_char(t) {
        return match options.get(t) {
            Some(option) if options.has_short_option(t) => ShortToken::Short(option),
            _ => ShortToken::Unknown,
        };
    }

    match split_at_equal(t) {
        None => {
            if let Some(option) = options.get(t).filter(|_| options.has_short_option(t)) {
                ShortToken::Short(option)
            } else if !options.matching_long_options(t).is_empty() {
                ShortToken::Long
            } else if let Some((option, value)) =
                long_prefix(options, t).filter(|(option, _)| option.accepts_arg())
            {
                ShortToken::AttachedValue { option, value }
            } else if let Some((option, value)) = property_option(options, t) {
                ShortToken::Property { option, value }
            } else {
                ShortToken::Cluster
            }
        }
        Some((name, value)) => {
            if is_single_char(name) {
                match options.get(name) {
                    Some(option) if option.accepts_arg() => {
                        ShortToken::ShortWithEqual { option, value }
                    }
                    _ => ShortToken::Unknown,
                }
            } else if let Some((option, key)) = property_option(options, name) {
                ShortToken::PropertyWithEqual { option, key, value }
            } else {
                ShortToken::LongWithEqual
            }
        }
    }
}

/// Finds the longest registered long name that prefixes `token`, leaving at
/// least two characters of attached value.
///
/// The scan stops at the first (longest) hit; a shorter long name that also
/// prefixes the token is never considered.
pub fn long_prefix<'a, 't>(options: &'a Options, token: &'t str) -> Option<(&'a OptionSpec, &'t str)> {
    let t = strip_leading_hyphens(token);
    let bounds: Vec<usize> = t.char_indices().map(|(i, _)| i).collect();

    (2..bounds.len().saturating_sub(1)).rev().find_map(|len| {
        let (prefix, rest) = t.split_at(bounds[len]);
        options.get_long(prefix).map(|option| (option, rest))
    })
}

/// Returns the property-style option named by the first character of
/// `token`, with the rest of the token.
pub fn property_option<'a, 't>(
    options: &'a Options,
    token: &'t str,
) -> Option<(&'a OptionSpec, &'t str)> {
    let (first, rest) = split_first_char(token)?;
    options
        .get(&first.to_string())
        .filter(|option| option.is_property_style())
        .map(|option| (option, rest))
}

/// Returns `true` if the token should be taken as an argument value rather
/// than as an option. Negative numbers are always arguments.
pub fn is_argument(options: &Options, token: &str) -> bool {
    !is_option(options, token) || is_negative_number(token)
}

fn is_option(options: &Options, token: &str) -> bool {
    is_long_option(options, token) || is_short_option(options, token)
}

fn is_short_option(options: &Options, token: &str) -> bool {
    let Some(rest) = token.strip_prefix('-').filter(|rest| !rest.is_empty()) else {
        return false;
    };

    let name = split_at_equal(rest).map_or(rest, |(name, _)| name);
    options.has_short_option(name)
        || split_first_char(name)
            .is_some_and(|(first, _)| options.has_short_option(&first.to_string()))
}

fn is_long_option(options: &Options, token: &str) -> bool {
    if !token.starts_with('-') || token.len() == 1 {
        return false;
    }

    let name = split_at_equal(token).map_or(token, |(name, _)| name);
    !options.matching_long_options(name).is_empty()
        || (!token.starts_with("--") && long_prefix(options, token).is_some())
}
