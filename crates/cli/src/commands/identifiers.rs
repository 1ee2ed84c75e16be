use anyhow::{anyhow, Result};
use colored::Colorize;
use snippet_context::Identifier;

use crate::exit_code::ExitCode;
use crate::session::Session;
use crate::OutputFormat;

/// List identifiers synthesized from the template's extension methods.
pub fn run(session: &Session, format: OutputFormat) -> Result<ExitCode> {
    let identifiers = session.assembler.identifiers()?;
    print(&identifiers, format)?;
    Ok(ExitCode::Success)
}

/// List the completion items for an expression bound to `context`.
pub fn run_completions(session: &Session, context: &str, format: OutputFormat) -> Result<ExitCode> {
    let items = session
        .assembler
        .completions_for(context)?
        .ok_or_else(|| anyhow!("Unknown template context '{context}'"))?;
    print(&items, format)?;
    Ok(ExitCode::Success)
}

fn print(identifiers: &[Identifier], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            if identifiers.is_empty() {
                println!("{}", "(no identifiers)".dimmed());
            }
            for identifier in identifiers {
                let target = identifier
                    .target_context
                    .as_deref()
                    .map(|t| format!(" -> {t}"))
                    .unwrap_or_default();
                println!(
                    "{} {}{}  {}",
                    identifier.declared_context.cyan(),
                    identifier.name.bold(),
                    target.dimmed(),
                    identifier.summary.dimmed()
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(identifiers)?);
        }
    }
    Ok(())
}
