//! Mutually exclusive option groups.
//!
//! An [`OptionGroup`] is part of the static registry and never changes once
//! added. Which member was chosen during a parse is tracked separately by a
//! [`GroupSelection`], owned by the parse that fills it, so one registry can
//! be shared between parses.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::OptionSpec;

/// Position of a group inside its [`Options`](crate::Options) registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub(crate) usize);

impl GroupId {
    /// Zero-based index in declaration order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A set of options of which at most one may be given.
///
/// # Examples
///
/// ```
/// use argline_core::{OptionGroup, OptionSpec};
///
/// let group = OptionGroup::new()
///     .with_option(OptionSpec::short("x"))
///     .with_option(OptionSpec::short("y"))
///     .required();
/// assert_eq!(group.keys(), vec!["x", "y"]);
/// assert_eq!(group.to_string(), "[-x, -y]");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionGroup {
    /// Member options in declaration order.
    pub options: Vec<OptionSpec>,
    /// At least one member must be given.
    #[serde(default)]
    pub required: bool,
}

impl OptionGroup {
    /// Creates an empty, optional group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member option.
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Marks the group as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Member keys in declaration order.
    pub fn keys(&self) -> Vec<&str> {
        self.options.iter().map(OptionSpec::key).collect()
    }

    /// Returns `true` if `key` names one of the members.
    pub fn contains(&self, key: &str) -> bool {
        self.options.iter().any(|opt| opt.key() == key)
    }
}

impl fmt::Display for OptionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, opt) in self.options.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match (&opt.short, &opt.long) {
                (Some(short), _) => write!(f, "-{short}")?,
                (None, Some(long)) => write!(f, "--{long}")?,
                (None, None) => {}
            }
            if let Some(desc) = &opt.description {
                write!(f, " {desc}")?;
            }
        }
        f.write_str("]")
    }
}

/// A second member of a group was given after another one was selected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "the option '{option}' was specified but an option from this group has already been selected: '{selected}'"
)]
pub struct AlreadySelected {
    /// Member keys of the conflicting group.
    pub group: Vec<String>,
    /// Key of the member chosen first.
    pub selected: String,
    /// Key of the rejected member.
    pub option: String,
}

/// Per-parse record of which member each group has selected.
///
/// # Examples
///
/// ```
/// use argline_core::{OptionGroup, OptionSpec, Options};
///
/// let options = Options::new().with_group(
///     OptionGroup::new()
///         .with_option(OptionSpec::short("x"))
///         .with_option(OptionSpec::short("y")),
/// );
/// let (id, group) = options.group_of("x").unwrap();
///
/// let mut selection = argline_core::GroupSelection::new();
/// selection.select(id, group, "x").unwrap();
/// selection.select(id, group, "x").unwrap();
/// assert!(selection.select(id, group, "y").is_err());
/// assert_eq!(selection.selected(id), Some("x"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GroupSelection {
    selected: HashMap<GroupId, String>,
}

impl GroupSelection {
    /// Creates a selection with no group selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key` as the selected member of `group`.
    ///
    /// Selecting the same member again is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`AlreadySelected`] if a different member is already selected.
    pub fn select(
        &mut self,
        id: GroupId,
        group: &OptionGroup,
        key: &str,
    ) -> Result<(), AlreadySelected> {
        match self.selected.get(&id) {
            Some(current) if current != key => Err(AlreadySelected {
                group: group.keys().into_iter().map(String::from).collect(),
                selected: current.clone(),
                option: key.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.selected.insert(id, key.to_string());
                Ok(())
            }
        }
    }

    /// The member selected for `id`, if any.
    pub fn selected(&self, id: GroupId) -> Option<&str> {
        self.selected.get(&id).map(String::as_str)
    }

    /// Forgets every selection.
    pub fn clear(&mut self) {
        self.selected.clear();
    }
}
