//! The result of a parse.
//!
//! A [`CommandLine`] lists every option occurrence in the order it was
//! matched, each with its own values, plus the leftover positional
//! arguments. It is built by the parse session only; callers get it back
//! read-only.

use std::collections::BTreeMap;

use argline_core::{Occurrence, strip_leading_hyphens};

use crate::convert::{ConvertError, Value, convert};

/// Parsed options and positional arguments.
///
/// Lookups accept short or long names, with or without leading hyphens.
///
/// # Examples
///
/// ```
/// use argline_core::{OptionSpec, Options};
/// use argline_parser::parse;
///
/// let options = Options::new()
///     .with_option(OptionSpec::short("I").with_long("include").with_arg())
///     .with_option(OptionSpec::short("v"));
///
/// let cmd = parse(&options, ["-I", "src", "-v", "--include=lib", "main.c"]).unwrap();
///
/// assert!(cmd.has_option("v"));
/// assert_eq!(cmd.option_value("--include"), Some("src"));
/// assert_eq!(cmd.option_values("I"), vec!["src", "lib"]);
/// assert_eq!(cmd.occurrences().len(), 3);
/// assert_eq!(cmd.args(), ["main.c"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine<'a> {
    occurrences: Vec<Occurrence<'a>>,
    args: Vec<String>,
}

impl<'a> CommandLine<'a> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_occurrence(&mut self, occurrence: Occurrence<'a>) -> usize {
        self.occurrences.push(occurrence);
        self.occurrences.len() - 1
    }

    pub(crate) fn add_arg(&mut self, arg: &str) {
        self.args.push(arg.to_string());
    }

    pub(crate) fn occurrence_at(&self, index: usize) -> Option<&Occurrence<'a>> {
        self.occurrences.get(index)
    }

    pub(crate) fn occurrence_at_mut(&mut self, index: usize) -> Option<&mut Occurrence<'a>> {
        self.occurrences.get_mut(index)
    }

    /// Returns `true` if the named option matched at least once.
    pub fn has_option(&self, name: &str) -> bool {
        self.occurrence(name).is_some()
    }

    /// The first occurrence of the named option.
    pub fn occurrence(&self, name: &str) -> Option<&Occurrence<'a>> {
        self.occurrences_of(name).next()
    }

    /// Every occurrence of the named option, in match order.
    pub fn occurrences_of<'s>(
        &'s self,
        name: &str,
    ) -> impl Iterator<Item = &'s Occurrence<'a>> + use<'s, 'a> {
        let name = strip_leading_hyphens(name).to_string();
        self.occurrences
            .iter()
            .filter(move |occurrence| occurrence.spec().matches(&name))
    }

    /// All occurrences in match order.
    pub fn occurrences(&self) -> &[Occurrence<'a>] {
        &self.occurrences
    }

    /// The first value given to the named option.
    pub fn option_value(&self, name: &str) -> Option<&str> {
        self.occurrences_of(name)
            .flat_map(|occurrence| occurrence.values())
            .map(String::as_str)
            .next()
    }

    /// The first value given to the named option, or `default`.
    pub fn option_value_or<'s>(&'s self, name: &str, default: &'s str) -> &'s str {
        self.option_value(name).unwrap_or(default)
    }

    /// Every value given to the named option, across all occurrences.
    pub fn option_values(&self, name: &str) -> Vec<&str> {
        self.occurrences_of(name)
            .flat_map(|occurrence| occurrence.values())
            .map(String::as_str)
            .collect()
    }

    /// Pairs each occurrence's first two values as key and value.
    ///
    /// An occurrence with a single value maps it to `"true"`; later
    /// occurrences override earlier ones with the same key.
    ///
    /// # Examples
    ///
    /// ```
    /// use argline_core::{OptionSpec, Options};
    /// use argline_parser::parse;
    ///
    /// let options = Options::new()
    ///     .with_option(OptionSpec::short("D").with_args(2).with_value_separator('='));
    ///
    /// let cmd = parse(&options, ["-Dcolor=auto", "-Ddebug"]).unwrap();
    /// let props = cmd.option_properties("D");
    /// assert_eq!(props.get("color").map(String::as_str), Some("auto"));
    /// assert_eq!(props.get("debug").map(String::as_str), Some("true"));
    /// ```
    pub fn option_properties(&self, name: &str) -> BTreeMap<String, String> {
        let mut properties = BTreeMap::new();
        for occurrence in self.occurrences_of(name) {
            match occurrence.values() {
                [key, value, ..] => {
                    properties.insert(key.clone(), value.clone());
                }
                [key] => {
                    properties.insert(key.clone(), "true".to_string());
                }
                [] => {}
            }
        }
        properties
    }

    /// Converts the first value of the named option according to its
    /// declared [`ValueType`](argline_core::ValueType).
    ///
    /// Returns `Ok(None)` if the option is absent or has no value.
    pub fn parsed_option_value(&self, name: &str) -> Result<Option<Value>, ConvertError> {
        let Some(occurrence) = self
            .occurrences_of(name)
            .find(|occurrence| !occurrence.values().is_empty())
        else {
            return Ok(None);
        };

        match occurrence.value() {
            Some(raw) => convert(raw, occurrence.spec().value_type).map(Some),
            None => Ok(None),
        }
    }

    /// Positional arguments, in order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Consumes the result, returning the positional arguments.
    pub fn into_args(self) -> Vec<String> {
        self.args
    }
}
