//! The option registry.
//!
//! [`Options`] owns every declared [`OptionSpec`] in declaration order and
//! indexes them by short and long name. It also records group membership and
//! the list of options and groups a parse must satisfy. Once built it is
//! read-only: parses borrow it and keep their own state.

use std::collections::HashMap;

use crate::{GroupId, OptionGroup, OptionSpec};

/// Removes a leading `--` or, failing that, a single leading `-`.
///
/// # Examples
///
/// ```
/// use argline_core::strip_leading_hyphens;
///
/// assert_eq!(strip_leading_hyphens("--file"), "file");
/// assert_eq!(strip_leading_hyphens("-f"), "f");
/// assert_eq!(strip_leading_hyphens("---x"), "-x");
/// assert_eq!(strip_leading_hyphens("plain"), "plain");
/// ```
pub fn strip_leading_hyphens(name: &str) -> &str {
    name.strip_prefix("--")
        .or_else(|| name.strip_prefix('-'))
        .unwrap_or(name)
}

/// Something a parse must see at least once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// A required option, by key.
    Option(String),
    /// A required group; any one member satisfies it.
    Group(GroupId),
}

/// Registry of declared options and groups.
///
/// Short and long names live in separate key spaces. Lookups accept names
/// with or without leading hyphens and check short names first.
///
/// # Examples
///
/// ```
/// use argline_core::{OptionSpec, Options};
///
/// let options = Options::new()
///     .with_option(OptionSpec::short("f").with_long("file").with_arg())
///     .with_option(OptionSpec::long("force"));
///
/// assert!(options.has_short_option("f"));
/// assert!(options.has_long_option("--force"));
/// assert_eq!(options.get("--file").unwrap().key(), "f");
/// assert_eq!(options.matching_long_options("--fi"), vec!["file"]);
/// assert_eq!(options.matching_long_options("f"), vec!["file", "force"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Options {
    options: Vec<OptionSpec>,
    short_index: HashMap<String, usize>,
    long_index: HashMap<String, usize>,
    groups: Vec<OptionGroup>,
    membership: HashMap<String, GroupId>,
    required: Vec<Requirement>,
}

impl Options {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an option, consuming and returning the registry.
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.add_option(option);
        self
    }

    /// Adds a group, consuming and returning the registry.
    pub fn with_group(mut self, group: OptionGroup) -> Self {
        self.add_group(group);
        self
    }

    /// Adds an option.
    ///
    /// An option with the same key replaces the earlier declaration in place.
    pub fn add_option(&mut self, option: OptionSpec) -> &mut Self {
        let key = option.key().to_string();

        let index = match self.options.iter().position(|opt| opt.key() == key) {
            Some(index) => {
                let previous = &self.options[index];
                if let Some(short) = &previous.short {
                    self.short_index.remove(short);
                }
                if let Some(long) = &previous.long {
                    self.long_index.remove(long);
                }
                self.options[index] = option;
                index
            }
            None => {
                self.options.push(option);
                self.options.len() - 1
            }
        };

        let option = &self.options[index];
        if let Some(short) = &option.short {
            self.short_index.insert(short.clone(), index);
        }
        if let Some(long) = &option.long {
            self.long_index.insert(long.clone(), index);
        }

        self.required
            .retain(|req| !matches!(req, Requirement::Option(k) if *k == key));
        if option.required {
            self.required.push(Requirement::Option(key));
        }

        self
    }

    /// Adds a group of mutually exclusive options.
    ///
    /// Members are registered as ordinary options with their individual
    /// `required` flag cleared; a required group is itself added to the
    /// required list instead.
    pub fn add_group(&mut self, mut group: OptionGroup) -> &mut Self {
        let id = GroupId(self.groups.len());

        for option in &mut group.options {
            option.required = false;
            self.membership.insert(option.key().to_string(), id);
            self.add_option(option.clone());
        }

        if group.required {
            self.required.push(Requirement::Group(id));
        }
        self.groups.push(group);

        self
    }

    /// All options in declaration order.
    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    /// All groups in declaration order.
    pub fn groups(&self) -> &[OptionGroup] {
        &self.groups
    }

    /// The group registered under `id`.
    pub fn group(&self, id: GroupId) -> Option<&OptionGroup> {
        self.groups.get(id.0)
    }

    /// Required options and groups in the order they were declared.
    pub fn required_options(&self) -> &[Requirement] {
        &self.required
    }

    /// Finds an option by short name, then by long name.
    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        let name = strip_leading_hyphens(name);
        self.short_index
            .get(name)
            .or_else(|| self.long_index.get(name))
            .map(|&index| &self.options[index])
    }

    /// Finds an option by long name only.
    pub fn get_long(&self, name: &str) -> Option<&OptionSpec> {
        self.long_index
            .get(strip_leading_hyphens(name))
            .map(|&index| &self.options[index])
    }

    /// Returns `true` if `name` is a short or long name.
    pub fn has_option(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns `true` if `name` is a registered short name.
    pub fn has_short_option(&self, name: &str) -> bool {
        self.short_index.contains_key(strip_leading_hyphens(name))
    }

    /// Returns `true` if `name` is a registered long name.
    pub fn has_long_option(&self, name: &str) -> bool {
        self.long_index.contains_key(strip_leading_hyphens(name))
    }

    /// Resolves a possibly abbreviated long name.
    ///
    /// An exact long name always wins and is returned alone. Otherwise every
    /// long name starting with `prefix` is returned in declaration order: none
    /// means unknown, more than one means ambiguous.
    pub fn matching_long_options(&self, prefix: &str) -> Vec<&str> {
        let prefix = strip_leading_hyphens(prefix);
        if prefix.is_empty() {
            return Vec::new();
        }

        if let Some((long, _)) = self.long_index.get_key_value(prefix) {
            return vec![long.as_str()];
        }

        self.options
            .iter()
            .filter_map(|opt| opt.long.as_deref())
            .filter(|long| long.starts_with(prefix))
            .collect()
    }

    /// The group containing the option with this key, if any.
    pub fn group_of(&self, key: &str) -> Option<(GroupId, &OptionGroup)> {
        self.membership
            .get(key)
            .map(|&id| (id, &self.groups[id.0]))
    }
}
