//! POSIX/GNU-style command-line parsing.
//!
//! Given an [`Options`] registry from `argline-core` and a list of raw
//! tokens, a [`Parser`] produces a [`CommandLine`]: the matched option
//! occurrences with their values, plus the positional arguments.
//!
//! Supported token forms:
//!
//! - `-a`, `-abc` (clustered flags), `-bVALUE`, `-b VALUE`, `-b=VALUE`
//! - `--long`, `--lo` (unique prefix), `--long=VALUE`, `--long VALUE`
//! - `-long` and `-Xmx512m` (long names written with a single hyphen)
//! - `-Dkey=value` for options taking two or more values
//! - `--` to end option processing
//!
//! # Main entry points
//!
//! - [`parse`]: parse with the default policy.
//! - [`Parser`]: configure `stop_at_non_option` and supply defaults.
//! - [`HelpFormatter`]: render usage and option listings.
//! - [`convert`]: coerce raw values by their declared type.
//!
//! # Example
//!
//! ```
//! use argline_core::{OptionSpec, Options};
//! use argline_parser::parse;
//!
//! let options = Options::new()
//!     .with_option(OptionSpec::short("a"))
//!     .with_option(OptionSpec::short("b").with_arg().required())
//!     .with_option(OptionSpec::long("verbose"));
//!
//! let cmd = parse(&options, ["-a", "-b", "file.txt", "--verb", "rest"]).unwrap();
//! assert!(cmd.has_option("a"));
//! assert_eq!(cmd.option_value("b"), Some("file.txt"));
//! assert!(cmd.has_option("verbose"));
//! assert_eq!(cmd.args(), ["rest"]);
//! ```

pub mod classify;
mod command_line;
mod convert;
mod error;
mod help;
mod session;
pub mod token;

pub use command_line::CommandLine;
pub use convert::{ConvertError, Value, convert};
pub use error::{MissingOption, ParseError, Result};
pub use help::{HelpError, HelpFormatter};
pub use session::Parser;

use argline_core::Options;

/// Parses `arguments` against `options` with the default policy.
///
/// Unknown options are errors and options may follow positional arguments.
pub fn parse<'a, I, S>(options: &'a Options, arguments: I) -> Result<CommandLine<'a>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Parser::new().parse(options, arguments)
}

/// Parses `arguments`, then applies `defaults` to options not given.
///
/// See [`Parser::parse_with_defaults`].
pub fn parse_with_defaults<'a, I, S, D, K, V>(
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
    Parser::new().parse_with_defaults(options, arguments, defaults)
}
