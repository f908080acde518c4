//! Purpose: `jsonmap` CLI entry point.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: Successful commands print exactly one JSON document on stdout.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
#![allow(clippy::result_large_err)]
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::{
    CommandFactory, Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind,
};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

mod command_dispatch;

use jsonmap::api::{
    DEFAULT_INDENT, Durability, Error, ErrorKind, Mapping, SaveOptions, load, parse_mapping,
    save_with, to_exit_code,
};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(clap_error_summary(&err))
                        .with_hint("Run `jsonmap --help` for usage."),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let color_mode = cli.color;
    command_dispatch::dispatch_command(cli.command).map_err(|err| (err, color_mode))
}

#[derive(Parser)]
#[command(
    name = "jsonmap",
    version,
    about = "Save and load JSON mappings as pretty-printed files",
    help_template = r#"{about-with-newline}
{before-help}USAGE
  {usage}

COMMANDS
{subcommands}

OPTIONS
{options}

{after-help}
"#,
    long_about = None,
    before_help = r#"A document is one JSON object. Saves replace the target file atomically.
"#,
    after_help = r#"EXAMPLES
  $ jsonmap save out.json '{"a": 1, "b": [1, 2, 3], "c": {"d": null}}'
  $ jsonmap load out.json
  $ echo '{"k": "v"}' | jsonmap save --sort-keys out.json
  $ jsonmap check out.json

LEARN MORE
  $ jsonmap <command> --help"#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics: auto|always|never"
    )]
    color: ColorMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    #[command(
        arg_required_else_help = true,
        about = "Write a JSON object to a file",
        long_about = r#"Write a JSON object to PATH, creating or replacing the file.

The document is read from the JSON argument, or from stdin when the argument
is omitted or `-`. It must be a single JSON object."#,
        after_help = r#"EXAMPLES
  $ jsonmap save out.json '{"a": 1}'
  $ cat config.json | jsonmap save --indent 4 --trailing-newline out.json

NOTES
  - Output uses two-space indentation unless --indent says otherwise (0 = compact)
  - The previous file stays intact if encoding or writing fails"#
    )]
    Save {
        #[arg(help = "Destination file", value_hint = ValueHint::FilePath)]
        path: PathBuf,
        #[arg(help = "JSON object to write (default: read stdin)")]
        json: Option<String>,
        #[arg(long, default_value_t = DEFAULT_INDENT, help = "Spaces per nesting level (0 = compact)")]
        indent: usize,
        #[arg(long, help = "Sort object keys at every depth")]
        sort_keys: bool,
        #[arg(long, help = "End the file with a newline")]
        trailing_newline: bool,
        #[arg(long, help = "fsync the file before replacing the target")]
        durable: bool,
    },
    #[command(
        arg_required_else_help = true,
        about = "Read a JSON object from a file",
        after_help = r#"EXAMPLES
  $ jsonmap load out.json
  $ jsonmap load --compact out.json"#
    )]
    Load {
        #[arg(help = "Source file", value_hint = ValueHint::FilePath)]
        path: PathBuf,
        #[arg(long, help = "Print on a single line")]
        compact: bool,
    },
    #[command(
        arg_required_else_help = true,
        about = "Verify that a file holds a JSON object",
        after_help = r#"EXAMPLES
  $ jsonmap check out.json"#
    )]
    Check {
        #[arg(help = "File to verify", value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
    #[command(
        arg_required_else_help = true,
        about = "Generate shell completions",
        after_help = r#"EXAMPLES
  $ jsonmap completion bash > ~/.local/share/bash-completion/completions/jsonmap
  $ jsonmap completion zsh > ~/.zfunc/_jsonmap"#
    )]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

fn read_document_input(json: Option<String>) -> Result<String, Error> {
    match json {
        Some(text) if text != "-" => Ok(text),
        _ => {
            let mut stdin = io::stdin();
            if stdin.is_terminal() {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message("missing JSON input")
                    .with_hint("Pass a JSON object as an argument or pipe one on stdin."));
            }
            let mut buf = String::new();
            stdin.read_to_string(&mut buf).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to read stdin")
                    .with_source(err)
            })?;
            Ok(buf)
        }
    }
}

fn emit_json(value: Value, pretty: bool) {
    let encoded = if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    };
    let json = encoded.unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

#[derive(Copy, Clone)]
enum AnsiColor {
    Red,
    Yellow,
}

impl AnsiColor {
    fn paint(self, label: &str, use_color: bool) -> String {
        let code = match self {
            AnsiColor::Red => "31",
            AnsiColor::Yellow => "33",
        };
        if use_color {
            format!("\u{1b}[{code}m{label}\u{1b}[0m")
        } else {
            label.to_string()
        }
    }
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let json = serde_json::to_string(&error_json(err)).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::NotFound => "not found".to_string(),
        ErrorKind::Permission => "permission denied".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
        ErrorKind::Parse => "invalid JSON".to_string(),
        ErrorKind::Serialization => "value cannot be serialized".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    std::iter::successors(err.source(), |&cause| cause.source())
        .map(|cause| cause.to_string())
        .collect()
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    if let Some((line, column)) = err.position() {
        inner.insert("line".to_string(), json!(line));
        inner.insert("column".to_string(), json!(column));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let detail = |label: &str, text: String| {
        format!("{} {text}", AnsiColor::Yellow.paint(label, use_color))
    };

    let mut lines = vec![format!(
        "{} {}",
        AnsiColor::Red.paint("error:", use_color),
        error_message(err)
    )];
    if let Some(hint) = err.hint() {
        lines.push(detail("hint:", hint.to_string()));
    }
    if let Some(path) = err.path() {
        lines.push(detail("path:", display_path(path)));
    }
    if let Some((line, column)) = err.position() {
        lines.push(detail("at:", format!("line {line}, column {column}")));
    }
    if let Some(cause) = error_causes(err).into_iter().next() {
        lines.push(detail("caused by:", cause));
    }
    lines.join("\n")
}

fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

/// First non-empty line of a clap error, without its `error:` prefix.
fn clap_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    rendered
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.strip_prefix("error:").unwrap_or(line).trim().to_string())
        .unwrap_or_else(|| "invalid arguments".to_string())
}
