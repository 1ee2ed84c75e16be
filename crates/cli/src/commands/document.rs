use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use snippet_assembler::FragmentKind;

use crate::commands::RangeJson;
use crate::exit_code::ExitCode;
use crate::session::Session;
use crate::OutputFormat;

#[derive(Serialize)]
struct FragmentJson<'a> {
    kind: String,
    document: RangeJson,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<RangeJson>,
    text: &'a str,
}

/// Print the assembled document, or its fragment table as JSON.
pub fn run(session: &Session, format: OutputFormat) -> Result<ExitCode> {
    let assembler = &session.assembler;
    let text = assembler.document_text().unwrap_or_default();

    match format {
        OutputFormat::Human => {
            for fragment in assembler.fragments() {
                let piece = fragment.text();
                if fragment.kind() == FragmentKind::Boilerplate {
                    print!("{}", piece.dimmed());
                } else {
                    print!("{piece}");
                }
            }
            if !text.ends_with('\n') {
                println!();
            }
        }
        OutputFormat::Json => {
            let fragments: Vec<FragmentJson> = assembler
                .fragments()
                .iter()
                .map(|fragment| FragmentJson {
                    kind: fragment.kind().to_string(),
                    document: fragment.document_range().into(),
                    source: fragment.source_range().map(Into::into),
                    text: fragment.text(),
                })
                .collect();
            let output = serde_json::json!({ "text": text, "fragments": fragments });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(ExitCode::Success)
}
