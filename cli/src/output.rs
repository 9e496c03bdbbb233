//! Output formatting for parse results.

use argline_parser::CommandLine;
use serde::Serialize;

/// Supported output formats.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Serializable view of a [`CommandLine`].
#[derive(Debug, Serialize)]
pub struct ParseReport {
    pub options: Vec<ReportedOption>,
    pub args: Vec<String>,
}

/// One option occurrence in a [`ParseReport`].
#[derive(Debug, Serialize)]
pub struct ReportedOption {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl From<&CommandLine<'_>> for ParseReport {
    fn from(cmd: &CommandLine<'_>) -> Self {
        let options = cmd
            .occurrences()
            .iter()
            .map(|occurrence| {
                let spec = occurrence.spec();
                ReportedOption {
                    key: occurrence.key().to_string(),
                    short: spec.short.clone(),
                    long: spec.long.clone(),
                    values: occurrence.values().to_vec(),
                }
            })
            .collect();

        Self {
            options,
            args: cmd.args().to_vec(),
        }
    }
}

/// Formats any serializable value in the requested output format.
pub fn format_output<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argline_core::{OptionSpec, Options};

    #[test]
    fn test_report_lists_occurrences_in_order() {
        let options = Options::new()
            .with_option(OptionSpec::short("I").with_long("include").with_arg())
            .with_option(OptionSpec::long("verbose"));
        let cmd = argline_parser::parse(&options, ["--verbose", "-I", "src", "main.c"]).unwrap();

        let report = ParseReport::from(&cmd);
        let json = format_output(&report, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["options"][0]["key"], "verbose");
        assert!(value["options"][0].get("values").is_none());
        assert_eq!(value["options"][1]["long"], "include");
        assert_eq!(value["options"][1]["values"][0], "src");
        assert_eq!(value["args"][0], "main.c");
    }

    #[test]
    fn test_yaml_output() {
        let report = ParseReport {
            options: Vec::new(),
            args: vec!["a".to_string()],
        };
        let yaml = format_output(&report, OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("args:"));
        assert!(yaml.contains("- a"));
    }
}
