mod output;
mod table;

use std::collections::HashSet;
use std::path::PathBuf;

use argline_core::{Options, ValidationError, parse_pattern, validate_options};
use argline_parser::{HelpFormatter, Parser as TokenParser};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

use output::{OutputFormat, ParseReport, format_output};
use table::OptionTable;

#[derive(Debug, Parser)]
#[command(name = "argline")]
#[command(about = "Parse command-line tokens against a declared option table")]
#[command(version)]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). Overrides RUST_LOG.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse tokens given after `--` and print the result.
    Parse(ParseArgs),
    /// Render usage and option help for a table.
    Help(HelpArgs),
    /// Check option tables for declaration problems.
    Validate(ValidateArgs),
}

/// Where the option registry comes from.
#[derive(Debug, Args)]
struct SourceArgs {
    /// Option table file (YAML, or JSON with a .json extension).
    #[arg(long, conflicts_with = "pattern", required_unless_present = "pattern")]
    table: Option<PathBuf>,
    /// Compact pattern instead of a table, e.g. "ab:c%!".
    #[arg(long)]
    pattern: Option<String>,
}

#[derive(Debug, Args)]
struct ParseArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Treat the first non-option token and everything after it as positional.
    #[arg(long)]
    stop_at_non_option: bool,
    /// Default applied when an option is absent (repeatable).
    #[arg(long = "default", value_name = "KEY=VALUE", value_parser = parse_default)]
    defaults: Vec<(String, String)>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Tokens to parse.
    #[arg(last = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct HelpArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Program name used in the generated usage line.
    #[arg(long, default_value = "app")]
    program: String,
    /// Explicit usage syntax instead of a generated one.
    #[arg(long)]
    syntax: Option<String>,
    /// Text printed between the usage line and the options.
    #[arg(long)]
    header: Option<String>,
    /// Text printed after the options.
    #[arg(long)]
    footer: Option<String>,
    /// Maximum line width.
    #[arg(long, default_value_t = 74)]
    width: usize,
    /// Keep declaration order instead of sorting by name.
    #[arg(long)]
    unsorted: bool,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Option table files.
    #[arg(required = true)]
    tables: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Help(args) => run_help(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn parse_default(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))
}

fn load_options(source: &SourceArgs) -> Result<Options, String> {
    match (&source.table, &source.pattern) {
        (Some(path), _) => {
            debug!(table = %path.display(), "Loading option table");
            Ok(OptionTable::load(path)?.to_options())
        }
        (None, Some(pattern)) => Ok(parse_pattern(pattern)),
        (None, None) => Err("either --table or --pattern is required".to_string()),
    }
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let options = load_options(&args.source)?;
    let cmd = TokenParser::new()
        .stop_at_non_option(args.stop_at_non_option)
        .parse_with_defaults(
            &options,
            &args.tokens,
            args.defaults.iter().map(|(key, value)| (key, value)),
        )
        .map_err(|err| err.to_string())?;

    let report = ParseReport::from(&cmd);
    println!("{}", format_output(&report, args.format)?);
    Ok(())
}

fn run_help(args: HelpArgs) -> Result<(), String> {
    let options = load_options(&args.source)?;
    let formatter = HelpFormatter::new()
        .with_width(args.width)
        .sorted(!args.unsorted);

    let (syntax, auto_usage) = match &args.syntax {
        Some(syntax) => (syntax.as_str(), false),
        None => (args.program.as_str(), true),
    };
    let help = formatter
        .render_help(
            syntax,
            args.header.as_deref(),
            &options,
            args.footer.as_deref(),
            auto_usage,
        )
        .map_err(|err| err.to_string())?;

    print!("{help}");
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut failed = 0;

    for path in &args.tables {
        let table = OptionTable::load(path)?;
        let issues = table_issues(&table);

        if issues.is_empty() {
            println!("{}: ok", path.display());
        } else {
            failed += 1;
            for issue in &issues {
                println!("{}: {issue}", path.display());
            }
        }
    }

    if failed > 0 {
        return Err(format!("{failed} table(s) have problems"));
    }
    Ok(())
}

/// Declaration problems, including keys the registry would silently
/// replace.
fn table_issues(table: &OptionTable) -> Vec<ValidationError> {
    let mut seen = HashSet::new();
    let mut issues: Vec<ValidationError> = table
        .options
        .iter()
        .chain(table.groups.iter().flat_map(|group| group.options.iter()))
        .map(|option| option.key())
        .filter(|key| !key.is_empty() && !seen.insert(*key))
        .map(|key| ValidationError::DuplicateName(key.to_string()))
        .collect();

    for issue in validate_options(&table.to_options()) {
        if !issues.contains(&issue) {
            issues.push(issue);
        }
    }
    issues
}
