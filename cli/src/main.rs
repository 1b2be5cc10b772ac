use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use cmdline_completion::{CompletionConfig, CompletionEngine};
use cmdline_core::{CommandCatalog, CommandRegistry, validate_catalog};
use cmdline_parser::{Binding, CommandParser, ParserConfig, Tokenizer, TokenizerConfig};
use cmdline_search::{SearchConfig, SearchMatch};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// CLI output format with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "cmdline")]
#[command(about = "Tokenize, parse, complete and match shell command lines")]
struct Cli {
    /// Engine configuration file (YAML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Output format.
    #[arg(long, global = true, default_value = "json")]
    format: CliOutputFormat,
    /// Log debug output to stderr. RUST_LOG takes precedence.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Split a line into words.
    Tokenize(TokenizeArgs),
    /// Parse a line against a command catalog.
    Parse(ParseArgs),
    /// Propose completions for the word under the cursor.
    Complete(CompleteArgs),
    /// Rank candidates against a search pattern.
    Match(MatchArgs),
    /// Validate one or more catalog files.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct TokenizeArgs {
    /// Line to tokenize.
    #[arg(allow_hyphen_values = true)]
    line: String,
    /// Cursor byte offset (default: end of line).
    #[arg(long)]
    cursor: Option<usize>,
    /// Accept unclosed quotes and trailing escapes.
    #[arg(long)]
    lenient: bool,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Catalog file (JSON, or YAML with a .yaml/.yml extension).
    #[arg(long)]
    catalog: PathBuf,
    /// Line to parse.
    #[arg(allow_hyphen_values = true)]
    line: String,
}

#[derive(Debug, Args)]
struct CompleteArgs {
    /// Catalog file (JSON, or YAML with a .yaml/.yml extension).
    #[arg(long)]
    catalog: PathBuf,
    /// Line to complete.
    #[arg(allow_hyphen_values = true)]
    line: String,
    /// Cursor byte offset (default: end of line).
    #[arg(long)]
    cursor: Option<usize>,
}

#[derive(Debug, Args)]
struct MatchArgs {
    /// Search pattern. A leading ' requests an exact match.
    #[arg(allow_hyphen_values = true)]
    pattern: String,
    /// Candidates to rank. Read one per line from stdin when omitted.
    candidates: Vec<String>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Catalog files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

/// Settings for every engine, one section each. Missing sections and fields
/// take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct EngineConfig {
    tokenizer: TokenizerConfig,
    parser: ParserConfig,
    completion: CompletionConfig,
    search: SearchConfig,
}

/// What `parse` prints: the command, its bindings and formatted errors.
#[derive(Debug, Serialize)]
struct ParseReport<'a> {
    command: Option<&'a str>,
    help_requested: bool,
    bindings: &'a [Binding],
    errors: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Command::Tokenize(args) => run_tokenize(args, &config, cli.format),
        Command::Parse(args) => run_parse(args, &config, cli.format),
        Command::Complete(args) => run_complete(args, &config, cli.format),
        Command::Match(args) => run_match(args, &config, cli.format),
        Command::Validate(args) => run_validate(args),
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_tokenize(args: TokenizeArgs, config: &EngineConfig, format: CliOutputFormat) -> Result<(), String> {
    let tokenizer = Tokenizer::with_config(config.tokenizer.clone());
    let cursor = cursor_or_end(args.cursor, &args.line)?;
    let parsed = if args.lenient {
        tokenizer.tokenize_lenient(&args.line, cursor)
    } else {
        tokenizer
            .tokenize(&args.line, cursor)
            .map_err(|err| err.to_string())?
    };
    emit(&parsed, format)
}

fn run_parse(args: ParseArgs, config: &EngineConfig, format: CliOutputFormat) -> Result<(), String> {
    let registry = load_registry(&args.catalog)?;
    let parser = CommandParser::with_config(config.parser.clone())
        .with_tokenizer(Tokenizer::with_config(config.tokenizer.clone()));
    let result = parser
        .parse_line(&args.line, &registry)
        .map_err(|err| err.to_string())?;

    let report = ParseReport {
        command: result.command_name(),
        help_requested: result.help_requested,
        bindings: &result.bindings,
        errors: result.format_errors(true),
    };
    emit(&report, format)?;

    if result.errors.is_empty() {
        Ok(())
    } else {
        Err(format!("{} parse error(s)", result.errors.len()))
    }
}

fn run_complete(args: CompleteArgs, config: &EngineConfig, format: CliOutputFormat) -> Result<(), String> {
    let registry = load_registry(&args.catalog)?;
    let cursor = cursor_or_end(args.cursor, &args.line)?;
    let engine = CompletionEngine::with_config(Arc::new(registry), config.completion)
        .with_tokenizer(Tokenizer::with_config(config.tokenizer.clone()))
        .with_parser_config(config.parser.clone())
        .with_matcher(SearchMatch::from_config(config.search));

    let proposals = engine.complete(&args.line, cursor);
    debug!(proposals = proposals.len(), "Completion finished");
    emit(&proposals, format)
}

fn run_match(args: MatchArgs, config: &EngineConfig, format: CliOutputFormat) -> Result<(), String> {
    let candidates = if args.candidates.is_empty() {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .map_err(|err| format!("Failed to read candidates from stdin: {err}"))?;
        input
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        args.candidates
    };

    let matcher = SearchMatch::from_config(config.search);
    let ranked = matcher.rank(&candidates, &args.pattern);
    info!(candidates = candidates.len(), matched = ranked.len(), "Ranked candidates");
    emit(&ranked, format)
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut commands = 0usize;
    let mut failures = Vec::new();

    for path in &args.inputs {
        let catalog = load_catalog(path)?;
        let errors = validate_catalog(&catalog);
        if errors.is_empty() {
            commands += catalog.command_count();
        } else {
            failures.extend(
                errors
                    .iter()
                    .map(|err| format!("{}: {err}", path.display())),
            );
        }
    }

    if !failures.is_empty() {
        return Err(format!(
            "{} catalog error(s):\n  {}",
            failures.len(),
            failures.join("\n  ")
        ));
    }
    println!(
        "Validated {} catalog file(s) with {commands} command(s).",
        args.inputs.len()
    );
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, String> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read config '{}': {err}", path.display()))?;
    serde_yaml::from_str(&raw)
        .map_err(|err| format!("Failed to parse config '{}': {err}", path.display()))
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

fn load_catalog(path: &Path) -> Result<CommandCatalog, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read catalog '{}': {err}", path.display()))?;
    let parsed = if is_yaml(path) {
        CommandCatalog::from_yaml(&raw).map_err(|err| err.to_string())
    } else {
        CommandCatalog::from_json(&raw).map_err(|err| err.to_string())
    };
    parsed.map_err(|err| format!("Failed to parse catalog '{}': {err}", path.display()))
}

fn load_registry(path: &Path) -> Result<CommandRegistry, String> {
    let catalog = load_catalog(path)?;
    CommandRegistry::from_catalog(catalog)
        .map_err(|err| format!("Invalid catalog '{}': {err}", path.display()))
}

fn cursor_or_end(cursor: Option<usize>, line: &str) -> Result<usize, String> {
    match cursor {
        None => Ok(line.len()),
        Some(cursor) if cursor <= line.len() => Ok(cursor),
        Some(cursor) => Err(format!(
            "--cursor {cursor} is past the end of the line ({} bytes)",
            line.len()
        )),
    }
}

fn emit<T: Serialize + ?Sized>(value: &T, format: CliOutputFormat) -> Result<(), String> {
    let raw = match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|err| format!("Failed to serialize output: {err}"))?,
        CliOutputFormat::Yaml => serde_yaml::to_string(value)
            .map_err(|err| format!("Failed to serialize output: {err}"))?,
    };
    println!("{}", raw.trim_end());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdline_search::Algorithm;

    #[test]
    fn test_engine_config_partial_yaml() {
        let yaml = r#"
parser:
  strict: false
search:
  fuzzy_algorithm: fuzzy_v1
"#;
        let config: EngineConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(!config.parser.strict);
        assert!(config.parser.case_sensitive_options);
        assert_eq!(config.search.fuzzy_algorithm, Algorithm::FuzzyV1);
        assert_eq!(config.tokenizer, TokenizerConfig::default());
        assert_eq!(config.completion, CompletionConfig::default());
    }

    #[test]
    fn test_missing_config_is_default() {
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_is_yaml_by_extension() {
        assert!(is_yaml(Path::new("catalog.yaml")));
        assert!(is_yaml(Path::new("catalog.YML")));
        assert!(!is_yaml(Path::new("catalog.json")));
        assert!(!is_yaml(Path::new("catalog")));
    }

    #[test]
    fn test_cursor_or_end() {
        assert_eq!(cursor_or_end(None, "abc").unwrap(), 3);
        assert_eq!(cursor_or_end(Some(1), "abc").unwrap(), 1);
        assert!(cursor_or_end(Some(4), "abc").is_err());
    }
}
