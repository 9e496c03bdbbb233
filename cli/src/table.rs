//! Option table documents.
//!
//! An option table declares the registry the CLI parses against. It is read
//! from YAML or JSON, chosen by file extension.

use std::fs;
use std::path::Path;

use argline_core::{OptionGroup, OptionSpec, Options};
use serde::{Deserialize, Serialize};

/// Declared options and groups, in declaration order.
///
/// ```yaml
/// options:
///   - short: o
///     long: output
///     arity: 1
///     arg_name: file
///   - long: verbose
/// groups:
///   - required: true
///     options:
///       - short: x
///       - short: y
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionTable {
    #[serde(default)]
    pub options: Vec<OptionSpec>,
    #[serde(default)]
    pub groups: Vec<OptionGroup>,
}

impl OptionTable {
    /// Loads a table, choosing the format from the file extension.
    ///
    /// `.json` files are read as JSON; anything else as YAML.
    pub fn load(path: &Path) -> Result<Self, String> {
        let raw = fs::read_to_string(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(&raw)
                .map_err(|err| format!("Invalid JSON table '{}': {err}", path.display()))
        } else {
            serde_yaml::from_str(&raw)
                .map_err(|err| format!("Invalid YAML table '{}': {err}", path.display()))
        }
    }

    /// Builds the registry: options first, then groups.
    pub fn to_options(&self) -> Options {
        let mut options = Options::new();
        for option in &self.options {
            options.add_option(option.clone());
        }
        for group in &self.groups {
            options.add_group(group.clone());
        }
        options
    }
}
