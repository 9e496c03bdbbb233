//! The parse session.
//!
//! A [`Parser`] is cheap configuration; every call to [`Parser::parse`] runs
//! a fresh `Session` that owns the mutable state of one parse: the
//! command line being built, the requirements still outstanding, the group
//! selections made so far and the option currently open for values. The
//! registry is only borrowed, so parses never leak into each other.
//!
//! The session walks the tokens once, left to right. Each token is either
//! appended to the open option, dispatched on its shape (see
//! [`classify`](crate::classify)), or kept as a positional argument.

use argline_core::{GroupSelection, OptionSpec, Options, Requirement};
use tracing::{debug, trace};

use crate::classify::{ShortToken, TokenKind, classify_short, classify_token, is_argument};
use crate::command_line::CommandLine;
use crate::error::{MissingOption, ParseError, Result};
use crate::token::{is_negative_number, split_at_equal, strip_surrounding_quotes};

/// Parses token arrays against an option registry.
///
/// # Examples
///
/// ```
/// use argline_core::{OptionSpec, Options};
/// use argline_parser::Parser;
///
/// let options = Options::new()
///     .with_option(OptionSpec::short("a"))
///     .with_option(OptionSpec::short("b").with_arg());
///
/// let cmd = Parser::new()
///     .stop_at_non_option(true)
///     .parse(&options, ["-a", "file", "-b", "x"])
///     .unwrap();
///
/// assert!(cmd.has_option("a"));
/// assert!(!cmd.has_option("b"));
/// assert_eq!(cmd.args(), ["file", "-b", "x"]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Parser {
    stop_at_non_option: bool,
}

impl Parser {
    /// Creates a parser that rejects unknown options and keeps parsing
    /// after positional arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, the first token that is not an option ends option
    /// processing, and unknown options are kept as positional arguments
    /// instead of failing the parse.
    pub fn stop_at_non_option(mut self, stop: bool) -> Self {
        self.stop_at_non_option = stop;
        self
    }

    /// Parses `arguments` against `options`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] encountered; no partial result is
    /// produced.
    pub fn parse<'a, I, S>(&self, options: &'a Options, arguments: I) -> Result<CommandLine<'a>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.parse_with_defaults(options, arguments, std::iter::empty::<(&str, &str)>())
    }

    /// Parses `arguments`, then applies `defaults` for options not given.
    ///
    /// Defaults are `(name, value)` pairs applied in iteration order. An
    /// option taking arguments receives `value`; a flag is set only when
    /// `value` is `yes`, `true` or `1` (any case). Defaults never override
    /// an option that was given, nor select a second member of a group.
    ///
    /// # Errors
    ///
    /// As [`Parser::parse`], plus [`ParseError::UnknownDefault`] for a
    /// default naming an undeclared option.
    pub fn parse_with_defaults<'a, I, S, D, K, V>(
        &self,
        options: &'a Options,
        arguments: I,
        defaults: D,
    ) -> Result<CommandLine<'a>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        D: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Session::new(options, self.stop_at_non_option).run(arguments, defaults)
    }
}

/// Mutable state of a single parse.
struct Session<'a> {
    options: &'a Options,
    stop_at_non_option: bool,
    cmd: CommandLine<'a>,
    expected: Vec<Requirement>,
    selection: GroupSelection,
    current: Option<usize>,
    skip_parsing: bool,
}

impl<'a> Session<'a> {
    fn new(options: &'a Options, stop_at_non_option: bool) -> Self {
        Self {
            options,
            stop_at_non_option,
            cmd: CommandLine::new(),
            expected: options.required_options().to_vec(),
            selection: GroupSelection::new(),
            current: None,
            skip_parsing: false,
        }
    }

    fn run<I, S, D, K, V>(mut self, arguments: I, defaults: D) -> Result<CommandLine<'a>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        D: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for argument in arguments {
            self.handle_token(argument.as_ref())?;
        }

        self.check_required_args()?;
        self.handle_defaults(defaults)?;
        self.check_required_options()?;

        debug!(
            occurrences = self.cmd.occurrences().len(),
            args = self.cmd.args().len(),
            "Parsed command line"
        );
        Ok(self.cmd)
    }

    fn handle_token(&mut self, token: &str) -> Result<()> {
        trace!(token, "Handling token");

        if self.skip_parsing {
            self.cmd.add_arg(token);
        } else {
            let kind = classify_token(token);
            if kind == TokenKind::Terminator {
                self.skip_parsing = true;
            } else if self.current_accepts_value() && is_argument(self.options, token) {
                self.add_value(strip_surrounding_quotes(token))?;
            } else {
                match kind {
                    TokenKind::Long => self.handle_long_option(token)?,
                    TokenKind::Short => self.handle_short_and_long_option(token)?,
                    TokenKind::Terminator | TokenKind::Positional => {
                        self.handle_unknown_token(token)?
                    }
                }
            }
        }

        if !self.current_accepts_value() {
            self.current = None;
        }
        Ok(())
    }

    fn current_accepts_value(&self) -> bool {
        self.current
            .and_then(|index| self.cmd.occurrence_at(index))
            .is_some_and(|occurrence| occurrence.accepts_more_values())
    }

    /// `--L` or `--L=V`.
    fn handle_long_option(&mut self, token: &str) -> Result<()> {
        if token.contains('=') {
            self.handle_long_option_with_equal(token)
        } else {
            self.handle_long_option_without_equal(token)
        }
    }

    fn handle_long_option_without_equal(&mut self, token: &str) -> Result<()> {
        let options = self.options;
        match options.matching_long_options(token).as_slice() {
            [] => self.handle_unknown_token(token),
            [long] => {
                let option = self.lookup_long(long, token)?;
                self.handle_option(option)
            }
            candidates => Err(ParseError::AmbiguousOption {
                token: token.to_string(),
                candidates: candidates.iter().map(|c| c.to_string()).collect(),
            }),
        }
    }

    fn handle_long_option_with_equal(&mut self, token: &str) -> Result<()> {
        let Some((name, value)) = split_at_equal(token) else {
            return self.handle_long_option_without_equal(token);
        };

        let options = self.options;
        match options.matching_long_options(name).as_slice() {
            [] => self.handle_unknown_token(token),
            [long] => {
                let option = self.lookup_long(long, token)?;
                if option.accepts_arg() {
                    self.handle_option(option)?;
                    self.add_value(value)?;
                    self.current = None;
                    Ok(())
                } else {
                    self.handle_unknown_token(token)
                }
            }
            candidates => Err(ParseError::AmbiguousOption {
                token: name.to_string(),
                candidates: candidates.iter().map(|c| c.to_string()).collect(),
            }),
        }
    }

    fn lookup_long(&self, long: &str, token: &str) -> Result<&'a OptionSpec> {
        self.options
            .get_long(long)
            .ok_or_else(|| ParseError::UnrecognizedOption(token.to_string()))
    }

    /// Any token starting with a single hyphen.
    fn handle_short_and_long_option(&mut self, token: &str) -> Result<()> {
        let shape = classify_short(self.options, token);
        debug!(token, shape = ?shape, "Classified short token");

        match shape {
            ShortToken::Short(option) => self.handle_option(option),
            ShortToken::Long => self.handle_long_option_without_equal(token),
            ShortToken::AttachedValue { option, value }
            | ShortToken::ShortWithEqual { option, value } => {
                self.handle_option(option)?;
                self.add_value(value)?;
                self.current = None;
                Ok(())
            }
            ShortToken::Property { option, value } => {
                self.handle_option(option)?;
                self.add_value(value)
            }
            ShortToken::PropertyWithEqual { option, key, value } => {
                self.handle_option(option)?;
                self.add_value(key)?;
                self.add_value(value)
            }
            ShortToken::LongWithEqual => self.handle_long_option_with_equal(token),
            ShortToken::Cluster => self.handle_concatenated_options(token),
            ShortToken::Unknown => self.handle_unknown_token(token),
        }
    }

    /// `-abc`: each character names an option, until one takes an argument,
    /// which then receives the rest of the token.
    fn handle_concatenated_options(&mut self, token: &str) -> Result<()> {
        let options = self.options;
        for (index, ch) in token.char_indices().skip(1) {
            match options.get(&ch.to_string()) {
                Some(option) => {
                    self.handle_option(option)?;
                    let rest = &token[index + ch.len_utf8()..];
                    if self.current.is_some() && !rest.is_empty() {
                        self.add_value(rest)?;
                        break;
                    }
                }
                None => {
                    let unknown = if self.stop_at_non_option && index > 1 {
                        &token[index..]
                    } else {
                        token
                    };
                    self.handle_unknown_token(unknown)?;
                    break;
                }
            }
        }
        Ok(())
    }

    fn handle_unknown_token(&mut self, token: &str) -> Result<()> {
        if token.starts_with('-')
            && token.len() > 1
            && !is_negative_number(token)
            && !self.stop_at_non_option
        {
            return Err(ParseError::UnrecognizedOption(token.to_string()));
        }

        self.cmd.add_arg(token);
        if self.stop_at_non_option {
            debug!(token, "Stopping at non-option");
            self.skip_parsing = true;
        }
        Ok(())
    }

    fn handle_option(&mut self, option: &'a OptionSpec) -> Result<()> {
        self.check_required_args()?;
        self.update_required_options(option)?;

        debug!(option = option.key(), "Matched option");
        let index = self.cmd.add_occurrence(option.occurrence());
        self.current = option.accepts_arg().then_some(index);
        Ok(())
    }

    fn update_required_options(&mut self, option: &OptionSpec) -> Result<()> {
        let key = option.key();
        if option.required {
            self.expected
                .retain(|req| !matches!(req, Requirement::Option(k) if k == key));
        }

        if let Some((id, group)) = self.options.group_of(key) {
            if group.required {
                self.expected.retain(|req| *req != Requirement::Group(id));
            }
            self.selection.select(id, group, key)?;
        }
        Ok(())
    }

    fn add_value(&mut self, value: &str) -> Result<()> {
        if let Some(occurrence) = self
            .current
            .and_then(|index| self.cmd.occurrence_at_mut(index))
        {
            trace!(option = occurrence.key(), value, "Adding value");
            occurrence.add_value(value)?;
        }
        Ok(())
    }

    /// Fails if the open option still needs its argument.
    fn check_required_args(&self) -> Result<()> {
        match self.current.and_then(|index| self.cmd.occurrence_at(index)) {
            Some(occurrence) if occurrence.requires_arg() => {
                Err(ParseError::MissingArgument(occurrence.key().to_string()))
            }
            _ => Ok(()),
        }
    }

    fn handle_defaults<D, K, V>(&mut self, defaults: D) -> Result<()>
    where
        D: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let options = self.options;
        for (name, value) in defaults {
            let (name, value) = (name.as_ref(), value.as_ref());
            let option = options
                .get(name)
                .ok_or_else(|| ParseError::UnknownDefault(name.to_string()))?;

            let group_selected = options
                .group_of(option.key())
                .is_some_and(|(id, _)| self.selection.selected(id).is_some());
            if group_selected || self.cmd.has_option(name) {
                continue;
            }

            if option.accepts_arg() {
                debug!(option = option.key(), value, "Applying default");
                self.handle_option(option)?;
                self.add_value(value)?;
            } else if is_truthy(value) {
                debug!(option = option.key(), "Applying default flag");
                self.handle_option(option)?;
            }
            self.current = None;
        }
        Ok(())
    }

    fn check_required_options(&self) -> Result<()> {
        if self.expected.is_empty() {
            return Ok(());
        }

        let missing = self
            .expected
            .iter()
            .map(|req| match req {
                Requirement::Option(key) => MissingOption::Option(key.clone()),
                Requirement::Group(id) => MissingOption::Group(
                    self.options
                        .group(*id)
                        .map(|group| group.keys().into_iter().map(String::from).collect())
                        .unwrap_or_default(),
                ),
            })
            .collect();
        Err(ParseError::MissingOptions(missing))
    }
}

fn is_truthy(value: &str) -> bool {
    ["yes", "true", "1"]
        .iter()
        .any(|word| value.eq_ignore_ascii_case(word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use argline_core::OptionGroup;

    #[test]
    fn test_open_option_takes_next_token() {
        let options = Options::new().with_option(OptionSpec::short("b").with_arg());
        let cmd = Parser::new().parse(&options, ["-b", "value", "rest"]).unwrap();

        assert_eq!(cmd.option_value("b"), Some("value"));
        assert_eq!(cmd.args(), ["rest"]);
    }

    #[test]
    fn test_option_closes_open_option_without_value() {
        let options = Options::new()
            .with_option(OptionSpec::short("a"))
            .with_option(OptionSpec::short("b").with_arg());

        let err = Parser::new().parse(&options, ["-b", "-a"]).unwrap_err();
        assert_eq!(err, ParseError::MissingArgument("b".to_string()));
    }

    #[test]
    fn test_optional_arg_closes_quietly() {
        let options = Options::new()
            .with_option(OptionSpec::short("a"))
            .with_option(OptionSpec::short("b").with_arg().optional_arg());

        let cmd = Parser::new().parse(&options, ["-b", "-a"]).unwrap();
        assert!(cmd.has_option("a"));
        assert!(cmd.option_values("b").is_empty());
    }

    #[test]
    fn test_missing_argument_at_end_of_input() {
        let options = Options::new().with_option(OptionSpec::long("file").with_arg());
        let err = Parser::new().parse(&options, ["--file"]).unwrap_err();
        assert_eq!(err, ParseError::MissingArgument("file".to_string()));
    }

    #[test]
    fn test_long_with_equal_on_flag_is_unrecognized() {
        let options = Options::new().with_option(OptionSpec::long("verbose"));
        let err = Parser::new().parse(&options, ["--verbose=yes"]).unwrap_err();
        assert_eq!(err, ParseError::UnrecognizedOption("--verbose=yes".to_string()));
    }

    #[test]
    fn test_unknown_cluster_char_keeps_suffix_when_stopping() {
        let options = Options::new().with_option(OptionSpec::short("a"));
        let cmd = Parser::new()
            .stop_at_non_option(true)
            .parse(&options, ["-azx", "-a"])
            .unwrap();

        assert_eq!(cmd.occurrences().len(), 1);
        assert_eq!(cmd.args(), ["zx", "-a"]);
    }

    #[test]
    fn test_unknown_first_cluster_char_keeps_whole_token() {
        let options = Options::new().with_option(OptionSpec::short("a"));
        let cmd = Parser::new()
            .stop_at_non_option(true)
            .parse(&options, ["-za"])
            .unwrap();

        assert!(cmd.occurrences().is_empty());
        assert_eq!(cmd.args(), ["-za"]);
    }

    #[test]
    fn test_group_conflict() {
        let options = Options::new().with_group(
            OptionGroup::new()
                .with_option(OptionSpec::short("x"))
                .with_option(OptionSpec::short("y")),
        );

        let err = Parser::new().parse(&options, ["-x", "-y"]).unwrap_err();
        match err {
            ParseError::AlreadySelected(err) => {
                assert_eq!(err.selected, "x");
                assert_eq!(err.option, "y");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_same_group_member_twice_is_allowed() {
        let options = Options::new().with_group(
            OptionGroup::new()
                .with_option(OptionSpec::short("x"))
                .with_option(OptionSpec::short("y")),
        );

        let cmd = Parser::new().parse(&options, ["-x", "-x"]).unwrap();
        assert_eq!(cmd.occurrences().len(), 2);
    }

    #[test]
    fn test_defaults_fill_missing_options() {
        let options = Options::new()
            .with_option(OptionSpec::short("o").with_arg())
            .with_option(OptionSpec::short("f"))
            .with_option(OptionSpec::short("g"));

        let cmd = Parser::new()
            .parse_with_defaults(
                &options,
                ["-o", "given"],
                [("o", "default"), ("f", "TRUE"), ("g", "no")],
            )
            .unwrap();

        assert_eq!(cmd.option_values("o"), vec!["given"]);
        assert!(cmd.has_option("f"));
        assert!(!cmd.has_option("g"));
    }

    #[test]
    fn test_default_does_not_select_second_group_member() {
        let options = Options::new().with_group(
            OptionGroup::new()
                .with_option(OptionSpec::short("x"))
                .with_option(OptionSpec::short("y")),
        );

        let cmd = Parser::new()
            .parse_with_defaults(&options, ["-x"], [("y", "true")])
            .unwrap();
        assert!(!cmd.has_option("y"));
    }

    #[test]
    fn test_default_satisfies_requirement() {
        let options = Options::new().with_option(OptionSpec::short("r").with_arg().required());

        let cmd = Parser::new()
            .parse_with_defaults(&options, Vec::<String>::new(), [("r", "value")])
            .unwrap();
        assert_eq!(cmd.option_value("r"), Some("value"));
    }

    #[test]
    fn test_unknown_default_is_rejected() {
        let options = Options::new();
        let err = Parser::new()
            .parse_with_defaults(&options, Vec::<String>::new(), [("nope", "1")])
            .unwrap_err();
        assert_eq!(err, ParseError::UnknownDefault("nope".to_string()));
    }

    #[test]
    fn test_missing_required_group_lists_members() {
        let options = Options::new().with_group(
            OptionGroup::new()
                .with_option(OptionSpec::short("x"))
                .with_option(OptionSpec::short("y"))
                .required(),
        );

        let err = Parser::new().parse(&options, Vec::<String>::new()).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingOptions(vec![MissingOption::Group(vec![
                "x".to_string(),
                "y".to_string()
            ])])
        );
    }
}
