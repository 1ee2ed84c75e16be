use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::commands::diagnostics::{print_human, DiagnosticJson};
use crate::exit_code::ExitCode;
use crate::session::Session;
use crate::OutputFormat;

pub fn run(session: &Session, out: &Path, format: OutputFormat) -> Result<ExitCode> {
    let report = session.assembler.compile(out)?;

    match format {
        OutputFormat::Human => {
            for error in &report.diagnostics {
                print_human(session, error);
            }
            for message in &report.unmapped {
                println!("{} {message}", "error (generated code):".red().bold());
            }
            if report.success {
                println!(
                    "{} {} ({} method(s) promoted)",
                    "✓ Compiled to".green(),
                    report.output_path.display(),
                    report.promoted_methods
                );
            } else {
                println!("{}", "✗ Compilation refused".red());
            }
        }
        OutputFormat::Json => {
            let diagnostics: Vec<DiagnosticJson> =
                report.diagnostics.iter().map(DiagnosticJson::from).collect();
            let output = serde_json::json!({
                "success": report.success,
                "output_path": report.output_path,
                "promoted_methods": report.promoted_methods,
                "diagnostics": diagnostics,
                "unmapped": report.unmapped,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(if report.success {
        ExitCode::Success
    } else {
        ExitCode::DiagnosticError
    })
}
