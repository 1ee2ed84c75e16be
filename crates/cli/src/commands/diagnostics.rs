use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use snippet_assembler::ErrorToken;
use snippet_types::DiagnosticSeverity;

use crate::commands::RangeJson;
use crate::exit_code::ExitCode;
use crate::session::Session;
use crate::OutputFormat;

#[derive(Serialize)]
pub(crate) struct DiagnosticJson<'a> {
    message: &'a str,
    severity: String,
    #[serde(flatten)]
    range: RangeJson,
}

impl<'a> From<&'a ErrorToken> for DiagnosticJson<'a> {
    fn from(token: &'a ErrorToken) -> Self {
        Self {
            message: &token.message,
            severity: token.severity.to_string(),
            range: token.range.into(),
        }
    }
}

/// Print one error token as `location severity: message`.
pub(crate) fn print_human(session: &Session, token: &ErrorToken) {
    let severity = match token.severity {
        DiagnosticSeverity::Error => "error:".red().bold(),
        DiagnosticSeverity::Warning => "warning:".yellow().bold(),
        DiagnosticSeverity::Information => "info:".blue().bold(),
    };
    println!(
        "{} {severity} {}",
        session.location(token.range).dimmed(),
        token.message
    );
}

pub fn run(session: &Session, format: OutputFormat) -> Result<ExitCode> {
    let errors = session.assembler.error_tokens()?;
    let error_count = errors.iter().filter(|e| e.severity.is_error()).count();

    match format {
        OutputFormat::Human => {
            for error in &errors {
                print_human(session, error);
            }
            if error_count == 0 {
                println!("{}", "✓ No errors in template code".green());
            } else {
                println!("{}", format!("✗ Found {error_count} error(s)").red());
            }
        }
        OutputFormat::Json => {
            let output: Vec<DiagnosticJson> = errors.iter().map(DiagnosticJson::from).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(if error_count == 0 {
        ExitCode::Success
    } else {
        ExitCode::DiagnosticError
    })
}
