use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use snippet_types::TokenCategory;

use crate::commands::RangeJson;
use crate::exit_code::ExitCode;
use crate::session::Session;
use crate::OutputFormat;

#[derive(Serialize)]
struct TokenJson {
    category: &'static str,
    #[serde(flatten)]
    range: RangeJson,
}

pub fn run(session: &Session, format: OutputFormat) -> Result<ExitCode> {
    let tokens = session.assembler.tokens()?;

    match format {
        OutputFormat::Human => {
            for token in &tokens {
                let category = token.category.as_str();
                let category = match token.category {
                    TokenCategory::Keyword => category.blue(),
                    TokenCategory::TypeName => category.cyan(),
                    TokenCategory::Identifier => category.normal(),
                    TokenCategory::StringLiteral => category.green(),
                    TokenCategory::Comment => category.dimmed(),
                };
                let excerpt = session
                    .excerpt(token.range)
                    .map(|text| format!(" {}", format!("`{text}`").dimmed()))
                    .unwrap_or_default();
                println!("{:>8} {category}{excerpt}", session.location(token.range));
            }
        }
        OutputFormat::Json => {
            let output: Vec<TokenJson> = tokens
                .iter()
                .map(|token| TokenJson {
                    category: token.category.as_str(),
                    range: token.range.into(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(ExitCode::Success)
}
