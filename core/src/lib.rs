//! Option declarations and the option registry.
//!
//! This crate defines the static side of command-line parsing:
//!
//! - [`OptionSpec`]: one option's short/long names, [`Arity`] and value
//!   handling flags.
//! - [`OptionGroup`]: a set of mutually exclusive options, with
//!   [`GroupSelection`] tracking which member a parse picked.
//! - [`Options`]: the registry, with name lookup, long-name prefix matching,
//!   group membership and the required list.
//! - [`Occurrence`]: one match of an option, owning its collected values.
//!
//! Registries can be checked with [`validate_options`] and built from a
//! compact string with [`parse_pattern`]. Parsing itself lives in the
//! `argline-parser` crate.
//!
//! # Example
//!
//! ```
//! use argline_core::*;
//!
//! let options = Options::new()
//!     .with_option(OptionSpec::short("a"))
//!     .with_option(OptionSpec::short("b").with_arg().required())
//!     .with_option(OptionSpec::long("verbose"))
//!     .with_group(
//!         OptionGroup::new()
//!             .with_option(OptionSpec::short("x"))
//!             .with_option(OptionSpec::short("y")),
//!     );
//!
//! assert!(options.has_short_option("b"));
//! assert_eq!(options.matching_long_options("--verb"), vec!["verbose"]);
//! assert_eq!(options.required_options().len(), 1);
//! assert!(validate_options(&options).is_empty());
//! ```

mod group;
mod options;
mod pattern;
mod types;
mod validate;

pub use group::{AlreadySelected, GroupId, GroupSelection, OptionGroup};
pub use options::{Options, Requirement, strip_leading_hyphens};
pub use pattern::{is_value_code, parse_pattern, value_type_for_code};
pub use types::*;
pub use validate::{ValidationError, validate_option, validate_options};
