//! Option declaration types.
//!
//! An [`OptionSpec`] is the immutable prototype of one command-line option:
//! its short and/or long name, how many argument values it takes
//! ([`Arity`]), and the flags that tune how values are accumulated. The
//! registry holds prototypes; every match during a parse produces a fresh
//! [`Occurrence`] that borrows the prototype and owns its own value list.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How many argument values an option may accumulate.
///
/// Serialized as a plain count (`0` for none) or the word `unbounded`.
///
/// # Examples
///
/// ```
/// use argline_core::Arity;
///
/// assert_eq!(Arity::fixed(0), Arity::None);
/// assert_eq!(Arity::fixed(2), Arity::Fixed(2));
/// assert!(Arity::Unbounded.takes_values());
/// assert!(!Arity::None.takes_values());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "ArityRepr", into = "ArityRepr")]
pub enum Arity {
    /// The option is a flag and takes no argument (the default).
    #[default]
    None,
    /// Exactly `n` values, `n >= 1`.
    Fixed(usize),
    /// Any number of values.
    Unbounded,
}

impl Arity {
    /// Builds a fixed arity, folding `0` into [`Arity::None`].
    pub fn fixed(n: usize) -> Self {
        if n == 0 { Arity::None } else { Arity::Fixed(n) }
    }

    /// Returns `true` unless this is [`Arity::None`].
    pub fn takes_values(self) -> bool {
        !matches!(self, Arity::None)
    }

    /// Returns `true` for arities of two or more values (or unbounded).
    pub fn takes_multiple_values(self) -> bool {
        match self {
            Arity::None => false,
            Arity::Fixed(n) => n >= 2,
            Arity::Unbounded => true,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ArityRepr {
    Count(usize),
    Keyword(String),
}

impl From<Arity> for ArityRepr {
    fn from(arity: Arity) -> Self {
        match arity {
            Arity::None => ArityRepr::Count(0),
            Arity::Fixed(n) => ArityRepr::Count(n),
            Arity::Unbounded => ArityRepr::Keyword("unbounded".to_string()),
        }
    }
}

impl TryFrom<ArityRepr> for Arity {
    type Error = String;

    fn try_from(repr: ArityRepr) -> Result<Self, Self::Error> {
        match repr {
            ArityRepr::Count(n) => Ok(Arity::fixed(n)),
            ArityRepr::Keyword(word) => match word.as_str() {
                "unbounded" => Ok(Arity::Unbounded),
                "none" => Ok(Arity::None),
                other => Err(format!("unknown arity '{other}'")),
            },
        }
    }
}

/// Opaque type tag consumed by value coercion.
///
/// The parser never looks at this tag; it only travels with the option so
/// callers can convert raw strings after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Plain string (the default).
    #[default]
    String,
    /// Integer, or floating point when the text contains a `.`.
    Number,
    /// Calendar date or RFC 3339 timestamp.
    Date,
    /// Filesystem path.
    File,
    /// Filesystem path that must already exist.
    ExistingFile,
    /// List of paths joined with the platform path separator.
    Files,
    /// Absolute URL.
    Url,
}

/// Declaration of a single command-line option.
///
/// Names are stored without their leading hyphens. The option's *key* is its
/// short name when present, otherwise its long name.
///
/// # Examples
///
/// ```
/// use argline_core::{Arity, OptionSpec};
///
/// let verbose = OptionSpec::short("v")
///     .with_long("verbose")
///     .with_description("Enable verbose output");
/// assert_eq!(verbose.key(), "v");
/// assert!(!verbose.accepts_arg());
///
/// let define = OptionSpec::short("D")
///     .with_args(2)
///     .with_value_separator('=');
/// assert_eq!(define.arity, Arity::Fixed(2));
/// assert!(define.is_property_style());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Short name without the hyphen (e.g. `"v"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    /// Long name without the hyphens (e.g. `"verbose"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    /// Number of argument values accepted.
    #[serde(default)]
    pub arity: Arity,
    /// Must appear at least once in every parse.
    #[serde(default)]
    pub required: bool,
    /// The argument may be omitted even though the arity allows one.
    #[serde(default)]
    pub optional_arg: bool,
    /// Splits a single token into several values (e.g. `key=value`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_separator: Option<char>,
    /// Type tag for value coercion.
    #[serde(default)]
    pub value_type: ValueType,
    /// Display name of the argument in help output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg_name: Option<String>,
    /// Description shown in help output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OptionSpec {
    /// Creates a flag identified by a short name.
    pub fn short(name: &str) -> Self {
        Self::new(Some(name), None)
    }

    /// Creates a flag identified only by a long name.
    pub fn long(name: &str) -> Self {
        Self::new(None, Some(name))
    }

    /// Creates a flag from optional short and long names.
    ///
    /// At least one name should be given; [`validate_options`] reports
    /// declarations that have neither.
    ///
    /// [`validate_options`]: crate::validate_options
    pub fn new(short: Option<&str>, long: Option<&str>) -> Self {
        Self {
            short: short.map(String::from),
            long: long.map(String::from),
            arity: Arity::None,
            required: false,
            optional_arg: false,
            value_separator: None,
            value_type: ValueType::default(),
            arg_name: None,
            description: None,
        }
    }

    /// Adds a long name.
    pub fn with_long(mut self, name: &str) -> Self {
        self.long = Some(name.to_string());
        self
    }

    /// Takes exactly one argument.
    pub fn with_arg(self) -> Self {
        self.with_arity(Arity::Fixed(1))
    }

    /// Takes exactly `n` arguments (`0` makes the option a flag).
    pub fn with_args(self, n: usize) -> Self {
        self.with_arity(Arity::fixed(n))
    }

    /// Takes any number of arguments.
    pub fn with_unbounded_args(self) -> Self {
        self.with_arity(Arity::Unbounded)
    }

    /// Sets the arity directly.
    pub fn with_arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    /// Marks the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Allows the argument to be omitted.
    pub fn optional_arg(mut self) -> Self {
        self.optional_arg = true;
        self
    }

    /// Splits each supplied value on `separator`.
    pub fn with_value_separator(mut self, separator: char) -> Self {
        self.value_separator = Some(separator);
        self
    }

    /// Sets the coercion type tag.
    pub fn with_value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    /// Sets the argument display name used in help output.
    pub fn with_arg_name(mut self, name: &str) -> Self {
        self.arg_name = Some(name.to_string());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Returns the identity of the option: the short name, else the long name.
    pub fn key(&self) -> &str {
        self.short
            .as_deref()
            .or(self.long.as_deref())
            .unwrap_or_default()
    }

    /// Returns `true` if the option takes at least one argument value.
    pub fn accepts_arg(&self) -> bool {
        self.arity.takes_values()
    }

    /// Returns `true` for options taking two or more values, which accept the
    /// `-Dkey=value` form.
    pub fn is_property_style(&self) -> bool {
        self.arity.takes_multiple_values()
    }

    /// Checks if this option is named by `name` (short or long, hyphens optional).
    ///
    /// # Examples
    ///
    /// ```
    /// use argline_core::OptionSpec;
    ///
    /// let opt = OptionSpec::short("f").with_long("file");
    /// assert!(opt.matches("-f"));
    /// assert!(opt.matches("--file"));
    /// assert!(opt.matches("file"));
    /// assert!(!opt.matches("--force"));
    /// ```
    pub fn matches(&self, name: &str) -> bool {
        let name = crate::strip_leading_hyphens(name);
        self.short.as_deref() == Some(name) || self.long.as_deref() == Some(name)
    }

    /// Starts a new occurrence of this option with an empty value list.
    pub fn occurrence(&self) -> Occurrence<'_> {
        Occurrence {
            spec: self,
            values: Vec::new(),
        }
    }
}

/// Defects raised while accumulating values on an [`Occurrence`].
///
/// These indicate a mismatch between the registry and the way values are
/// being fed, not bad user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// A value was fed to an option declared without arguments.
    #[error("option '{0}' does not take arguments")]
    NoArgumentsAllowed(String),
    /// A value was fed beyond the option's fixed arity.
    #[error("option '{option}' cannot take more than {limit} value(s)")]
    ListFull { option: String, limit: usize },
}

/// One concrete match of an option within a single parse.
///
/// Occurrences borrow their prototype from the registry and own the values
/// collected for that match only, so a flag given twice yields two
/// independent occurrences.
///
/// # Examples
///
/// ```
/// use argline_core::OptionSpec;
///
/// let spec = OptionSpec::short("D").with_args(2).with_value_separator('=');
/// let mut occurrence = spec.occurrence();
/// occurrence.add_value("key=value").unwrap();
/// assert_eq!(occurrence.values(), ["key", "value"]);
/// assert!(!occurrence.accepts_more_values());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence<'a> {
    spec: &'a OptionSpec,
    values: Vec<String>,
}

impl<'a> Occurrence<'a> {
    /// The registered prototype this occurrence was created from.
    pub fn spec(&self) -> &'a OptionSpec {
        self.spec
    }

    /// Shorthand for `self.spec().key()`.
    pub fn key(&self) -> &'a str {
        self.spec.key()
    }

    /// Values collected for this occurrence, in order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// The first collected value, if any.
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// Returns `true` while the arity bound has room for another value.
    pub fn accepts_more_values(&self) -> bool {
        match self.spec.arity {
            Arity::None => false,
            Arity::Fixed(n) => self.values.len() < n,
            Arity::Unbounded => true,
        }
    }

    /// Returns `true` if the option needs an argument and has none yet.
    pub fn requires_arg(&self) -> bool {
        self.spec.accepts_arg() && !self.spec.optional_arg && self.values.is_empty()
    }

    /// Feeds one raw token to this occurrence.
    ///
    /// With a value separator configured the token is split into successive
    /// values; once a fixed arity is one short of full, the remainder is kept
    /// verbatim as the final value.
    ///
    /// # Errors
    ///
    /// [`ValueError::NoArgumentsAllowed`] for flags, and
    /// [`ValueError::ListFull`] when a fragment would exceed the arity.
    pub fn add_value(&mut self, raw: &str) -> Result<(), ValueError> {
        if !self.spec.accepts_arg() {
            return Err(ValueError::NoArgumentsAllowed(self.key().to_string()));
        }

        let mut rest = raw;
        if let Some(separator) = self.spec.value_separator {
            while let Some(index) = rest.find(separator) {
                if let Arity::Fixed(n) = self.spec.arity {
                    if self.values.len() + 1 == n {
                        break;
                    }
                }
                self.push(&rest[..index])?;
                rest = &rest[index + separator.len_utf8()..];
            }
        }

        self.push(rest)
    }

    fn push(&mut self, value: &str) -> Result<(), ValueError> {
        if !self.accepts_more_values() {
            let limit = match self.spec.arity {
                Arity::Fixed(n) => n,
                _ => 0,
            };
            return Err(ValueError::ListFull {
                option: self.key().to_string(),
                limit,
            });
        }
        self.values.push(value.to_string());
        Ok(())
    }
}
