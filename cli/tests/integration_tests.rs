//! Integration tests for the parse, help and validate subcommands.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn argline_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_argline"))
}

fn run(args: &[&str]) -> Output {
    Command::new(argline_bin())
        .args(args)
        .output()
        .expect("failed to run argline")
}

fn write_table(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("failed to write table");
    path
}

/// `-a`, required `-b <file>`, `--verbose`, and an optional `-x | -y` group.
fn sample_table(dir: &TempDir) -> PathBuf {
    write_table(
        dir,
        "table.yaml",
        r#"
options:
  - short: a
    description: Process everything
  - short: b
    long: build
    arity: 1
    arg_name: file
    required: true
    description: Build file to use
  - long: verbose
    description: Print more
groups:
  - options:
      - short: x
      - short: y
"#,
    )
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "argline failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("Invalid JSON output: {e}\n{stdout}"))
}

// ---- parse ----

#[test]
fn test_parse_prints_occurrences_and_args() {
    let dir = TempDir::new().unwrap();
    let table = sample_table(&dir);

    let output = run(&[
        "parse",
        "--table",
        path_arg(&table),
        "--",
        "-a",
        "--bu",
        "file.txt",
        "--verbose",
        "rest",
    ]);
    let json = stdout_json(&output);

    let keys: Vec<&str> = json["options"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["a", "b", "verbose"]);
    assert_eq!(json["options"][1]["values"][0], "file.txt");
    assert_eq!(json["args"][0], "rest");
}

#[test]
fn test_parse_yaml_output() {
    let dir = TempDir::new().unwrap();
    let table = sample_table(&dir);

    let output = run(&[
        "parse",
        "--table",
        path_arg(&table),
        "--format",
        "yaml",
        "--",
        "-b",
        "out",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_yaml::Value = serde_yaml::from_str(&stdout).unwrap();
    assert_eq!(parsed["options"][0]["key"].as_str(), Some("b"));
}

#[test]
fn test_parse_errors_exit_nonzero() {
    let dir = TempDir::new().unwrap();
    let table = sample_table(&dir);

    let output = run(&["parse", "--table", path_arg(&table), "--", "-z", "-b", "x"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: unrecognized option: -z"), "stderr: {stderr}");

    let output = run(&["parse", "--table", path_arg(&table), "--", "-a"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing required option(s): b"), "stderr: {stderr}");

    let output = run(&["parse", "--table", path_arg(&table), "--", "-x", "-y", "-b", "f"]);
    assert!(!output.status.success());
}

#[test]
fn test_parse_applies_defaults() {
    let dir = TempDir::new().unwrap();
    let table = sample_table(&dir);

    let output = run(&[
        "parse",
        "--table",
        path_arg(&table),
        "--default",
        "b=fallback.txt",
        "--default",
        "verbose=true",
        "--",
        "-a",
    ]);
    let json = stdout_json(&output);

    assert_eq!(json["options"][1]["key"], "b");
    assert_eq!(json["options"][1]["values"][0], "fallback.txt");
    assert_eq!(json["options"][2]["key"], "verbose");
}

#[test]
fn test_parse_stop_at_non_option() {
    let dir = TempDir::new().unwrap();
    let table = sample_table(&dir);

    let output = run(&[
        "parse",
        "--table",
        path_arg(&table),
        "--stop-at-non-option",
        "--",
        "-b",
        "x",
        "sub",
        "-a",
        "--",
        "-y",
    ]);
    let json = stdout_json(&output);

    assert_eq!(json["options"].as_array().unwrap().len(), 1);
    assert_eq!(json["args"], serde_json::json!(["sub", "-a", "--", "-y"]));
}

#[test]
fn test_parse_with_pattern() {
    let output = run(&["parse", "--pattern", "vn%!", "--", "-vn", "42"]);
    let json = stdout_json(&output);

    assert_eq!(json["options"][0]["key"], "v");
    assert_eq!(json["options"][1]["values"][0], "42");
}

#[test]
fn test_parse_json_table() {
    let dir = TempDir::new().unwrap();
    let table = write_table(
        &dir,
        "table.json",
        r#"{"options":[{"short":"D","arity":2,"value_separator":"="}]}"#,
    );

    let output = run(&["parse", "--table", path_arg(&table), "--", "-Dkey=value"]);
    let json = stdout_json(&output);

    assert_eq!(json["options"][0]["values"], serde_json::json!(["key", "value"]));
}

// ---- help ----

#[test]
fn test_help_renders_usage_and_options() {
    let dir = TempDir::new().unwrap();
    let table = sample_table(&dir);

    let output = run(&[
        "help",
        "--table",
        path_arg(&table),
        "--program",
        "tool",
        "--footer",
        "See the manual.",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.starts_with("usage: tool [-a] -b <file> [--verbose] [-x | -y]\n"),
        "stdout: {stdout}"
    );
    assert!(stdout.contains(" -b,--build <file>   Build file to use"));
    assert!(stdout.trim_end().ends_with("See the manual."));
}

#[test]
fn test_help_with_explicit_syntax() {
    let output = run(&["help", "--pattern", "ab:", "--syntax", "tool [options] FILE"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("usage: tool [options] FILE\n"));
}

// ---- validate ----

#[test]
fn test_validate_accepts_clean_table() {
    let dir = TempDir::new().unwrap();
    let table = sample_table(&dir);

    let output = run(&["validate", path_arg(&table)]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(": ok"));
}

#[test]
fn test_validate_reports_problems() {
    let dir = TempDir::new().unwrap();
    let table = write_table(
        &dir,
        "bad.yaml",
        r#"
options:
  - short: a
  - short: a
    long: again
  - short: "a b"
  - long: quiet
    value_separator: ","
"#,
    );

    let output = run(&["validate", path_arg(&table)]);
    assert!(!output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("duplicate option name: a"), "stdout: {stdout}");
    assert!(stdout.contains("illegal short option name"), "stdout: {stdout}");
    assert!(stdout.contains("value separator"), "stdout: {stdout}");
}

#[test]
fn test_missing_table_is_an_error() {
    let output = run(&["parse", "--table", "/nonexistent/table.yaml", "--", "-a"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
}
