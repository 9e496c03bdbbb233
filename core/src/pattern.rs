//! Compact pattern syntax for declaring short options.
//!
//! Each option is a single character, optionally followed by value codes:
//!
//! | Code | Meaning |
//! |------|---------|
//! | `:` | takes a string argument |
//! | `%` | takes a number argument |
//! | `#` | takes a date argument |
//! | `>` | takes a file argument |
//! | `<` | takes an existing-file argument |
//! | `*` | takes a list of files |
//! | `/` | takes a URL argument |
//! | `!` | the option is required |

use crate::{OptionSpec, Options, ValueType};

/// Maps a value code to the type it declares, `None` for non-type codes.
pub fn value_type_for_code(code: char) -> Option<ValueType> {
    match code {
        ':' => Some(ValueType::String),
        '%' => Some(ValueType::Number),
        '#' => Some(ValueType::Date),
        '>' => Some(ValueType::File),
        '<' => Some(ValueType::ExistingFile),
        '*' => Some(ValueType::Files),
        '/' => Some(ValueType::Url),
        _ => None,
    }
}

/// Returns `true` if `ch` is a value code rather than an option name.
pub fn is_value_code(ch: char) -> bool {
    ch == '!' || value_type_for_code(ch).is_some()
}

/// Builds a registry from a compact pattern such as `"vf>n%!"`.
///
/// # Examples
///
/// ```
/// use argline_core::{parse_pattern, Arity, ValueType};
///
/// let options = parse_pattern("vf>n%!");
///
/// let v = options.get("v").unwrap();
/// assert_eq!(v.arity, Arity::None);
///
/// let f = options.get("f").unwrap();
/// assert_eq!(f.arity, Arity::Fixed(1));
/// assert_eq!(f.value_type, ValueType::File);
///
/// let n = options.get("n").unwrap();
/// assert_eq!(n.value_type, ValueType::Number);
/// assert!(n.required);
/// ```
pub fn parse_pattern(pattern: &str) -> Options {
    let mut options = Options::new();
    let mut pending: Option<PendingOption> = None;

    for ch in pattern.chars() {
        if !is_value_code(ch) {
            if let Some(done) = pending.take() {
                options.add_option(done.build());
            }
            pending = Some(PendingOption::new(ch));
        } else if let Some(current) = pending.as_mut() {
            match value_type_for_code(ch) {
                Some(value_type) => current.value_type = Some(value_type),
                None => current.required = true,
            }
        }
    }

    if let Some(done) = pending {
        options.add_option(done.build());
    }

    options
}

struct PendingOption {
    name: char,
    required: bool,
    value_type: Option<ValueType>,
}

impl PendingOption {
    fn new(name: char) -> Self {
        Self {
            name,
            required: false,
            value_type: None,
        }
    }

    fn build(self) -> OptionSpec {
        let mut option = OptionSpec::short(&self.name.to_string());
        if let Some(value_type) = self.value_type {
            option = option.with_arg().with_value_type(value_type);
        }
        if self.required {
            option = option.required();
        }
        option
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Arity, Requirement};

    #[test]
    fn test_flags_only() {
        let options = parse_pattern("abc");
        assert_eq!(options.options().len(), 3);
        assert!(options.options().iter().all(|o| o.arity == Arity::None));
    }

    #[test]
    fn test_value_codes_apply_to_preceding_option() {
        let options = parse_pattern("u/d#e<");

        assert_eq!(options.get("u").unwrap().value_type, ValueType::Url);
        assert_eq!(options.get("d").unwrap().value_type, ValueType::Date);
        assert_eq!(
            options.get("e").unwrap().value_type,
            ValueType::ExistingFile
        );
    }

    #[test]
    fn test_required_flag_without_argument() {
        let options = parse_pattern("r!x");

        let r = options.get("r").unwrap();
        assert!(r.required);
        assert!(!r.accepts_arg());
        assert_eq!(
            options.required_options(),
            [Requirement::Option("r".to_string())]
        );
    }

    #[test]
    fn test_leading_value_codes_are_ignored() {
        let options = parse_pattern(":!a");
        assert_eq!(options.options().len(), 1);
        assert!(!options.get("a").unwrap().required);
    }
}
