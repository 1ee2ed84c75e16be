mod commands;
mod exit_code;
mod input;
mod session;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::exit_code::ExitCode;
use crate::session::Session;

#[derive(Parser)]
#[command(name = "snippet")]
#[command(about = "Analyze host-language code embedded in templates", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to snippet config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Force colored output even when not a TTY
    #[arg(long, global = true, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long, global = true, conflicts_with = "color")]
    no_color: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the assembled synthetic document
    Document {
        /// Scanner output (JSON)
        input: PathBuf,
    },

    /// Classify the template code into tokens
    Tokens {
        /// Scanner output (JSON)
        input: PathBuf,
    },

    /// Report errors in the template code
    Diagnostics {
        /// Scanner output (JSON)
        input: PathBuf,
    },

    /// List identifiers declared by the template's extension methods
    Identifiers {
        /// Scanner output (JSON)
        input: PathBuf,
    },

    /// List completion items for an expression bound to a context
    Completions {
        /// Scanner output (JSON)
        input: PathBuf,

        /// Template context name (e.g., "entity")
        #[arg(long)]
        context: String,
    },

    /// Compile the template code after promoting its methods
    Compile {
        /// Scanner output (JSON)
        input: PathBuf,

        /// Where to write the compiled source
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,
    },
}

impl Commands {
    fn input(&self) -> &PathBuf {
        match self {
            Self::Document { input }
            | Self::Tokens { input }
            | Self::Diagnostics { input }
            | Self::Identifiers { input }
            | Self::Completions { input, .. }
            | Self::Compile { input, .. } => input,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON output for tooling
    Json,
}

fn main() {
    let cli = Cli::parse();

    init_tracing();
    configure_colors(cli.color, cli.no_color);

    match run(&cli) {
        Ok(code) => code.exit(),
        Err(error) => {
            let code = ExitCode::for_error(&error);
            match cli.format {
                OutputFormat::Human => eprintln!("{} {error:#}", "✗".red().bold()),
                OutputFormat::Json => {
                    eprintln!("{}", serde_json::json!({ "error": format!("{error:#}") }));
                }
            }
            code.exit()
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let session = Session::open(cli.config.as_deref(), cli.command.input())?;
    let format = cli.format;

    match &cli.command {
        Commands::Document { .. } => commands::document::run(&session, format),
        Commands::Tokens { .. } => commands::tokens::run(&session, format),
        Commands::Diagnostics { .. } => commands::diagnostics::run(&session, format),
        Commands::Identifiers { .. } => commands::identifiers::run(&session, format),
        Commands::Completions { context, .. } => {
            commands::identifiers::run_completions(&session, context, format)
        }
        Commands::Compile { out, .. } => commands::compile::run(&session, out, format),
    }
}

/// Initialize tracing; silent unless `RUST_LOG` asks for output
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Configure colored output based on flags and environment variables.
///
/// Priority order (highest to lowest):
/// 1. `--color` flag (force colors on)
/// 2. `--no-color` flag (force colors off)
/// 3. `NO_COLOR` environment variable (if set to any value, disable colors)
/// 4. `CLICOLOR_FORCE` environment variable (if set to non-zero, force colors)
/// 5. `CLICOLOR` environment variable (if set to "0", disable colors)
/// 6. Default: colors enabled if stdout is a TTY (handled by `colored` crate)
///
/// See: <https://no-color.org/> and <https://bixense.com/clicolors/>
fn configure_colors(force_color: bool, no_color: bool) {
    use colored::control;

    if force_color {
        control::set_override(true);
    } else if no_color {
        control::set_override(false);
    } else if std::env::var_os("NO_COLOR").is_some() {
        control::set_override(false);
    } else if let Ok(val) = std::env::var("CLICOLOR_FORCE") {
        if !val.is_empty() && val != "0" {
            control::set_override(true);
        }
    } else if let Ok(val) = std::env::var("CLICOLOR") {
        if val == "0" {
            control::set_override(false);
        }
    }
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn parses_completions_with_global_flags() {
        let cli = Cli::try_parse_from([
            "snippet",
            "completions",
            "template.json",
            "--context",
            "entity",
            "--format",
            "json",
            "--config",
            ".snippetrc.yml",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from(".snippetrc.yml")));
        assert!(matches!(
            &cli.command,
            Commands::Completions { context, .. } if context == "entity"
        ));
        assert_eq!(cli.command.input(), &PathBuf::from("template.json"));
    }

    #[test]
    fn compile_requires_out() {
        assert!(Cli::try_parse_from(["snippet", "compile", "template.json"]).is_err());
        let cli =
            Cli::try_parse_from(["snippet", "compile", "template.json", "--out", "a.cs"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Human);
    }

    #[test]
    fn color_flags_conflict() {
        assert!(Cli::try_parse_from(["snippet", "--color", "--no-color", "tokens", "t.json"]).is_err());
    }
}
