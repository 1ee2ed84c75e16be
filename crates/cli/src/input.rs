//! Scanner output consumed by the CLI.
//!
//! ```json
//! {
//!   "source": "<#@ using System; #>...",
//!   "fragments": [
//!     { "kind": "using", "text": "using System;", "start": 4 },
//!     { "kind": "lambda", "text": "(p) => p.IsKey", "start": 40, "parameter_type": "Property" }
//!   ]
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use snippet_assembler::{Assembler, AssemblerError};
use snippet_backend::AnalysisBackend;
use snippet_context::ContextRegistry;

/// Parameter type used when the scanner could not infer one
const DEFAULT_PARAMETER_TYPE: &str = "object";
/// Parameter name used when the lambda text has none
const DEFAULT_PARAMETER_NAME: &str = "it";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScannerInput {
    /// Full template text, used for line/column output
    #[serde(default)]
    pub source: Option<String>,
    pub fragments: Vec<InputFragment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InputFragment {
    Using {
        text: String,
        start: usize,
    },
    Block {
        text: String,
        start: usize,
    },
    Lambda {
        text: String,
        start: usize,
        #[serde(default)]
        parameter_type: Option<String>,
        #[serde(default)]
        parameter_name: Option<String>,
    },
}

impl ScannerInput {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Invalid input {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    /// Run one assembler cycle over the fragments, in source order.
    pub fn feed<B, R>(&self, assembler: &mut Assembler<B, R>) -> Result<(), AssemblerError>
    where
        B: AnalysisBackend,
        R: ContextRegistry,
    {
        let mut fragments: Vec<&InputFragment> = self.fragments.iter().collect();
        fragments.sort_by_key(|f| f.start());

        assembler.clear();
        for fragment in fragments {
            match fragment {
                InputFragment::Using { text, start } => assembler.add_using(text, *start)?,
                InputFragment::Block { text, start } => assembler.add_block(text, *start)?,
                InputFragment::Lambda {
                    text,
                    start,
                    parameter_type,
                    parameter_name,
                } => {
                    let name = parameter_name
                        .clone()
                        .or_else(|| lambda_parameter(text))
                        .unwrap_or_else(|| DEFAULT_PARAMETER_NAME.to_string());
                    let ty = parameter_type.as_deref().unwrap_or(DEFAULT_PARAMETER_TYPE);
                    assembler.add_lambda(text, ty, &name, *start)?;
                }
            }
        }
        assembler.finalize()
    }
}

impl InputFragment {
    pub const fn start(&self) -> usize {
        match self {
            Self::Using { start, .. } | Self::Block { start, .. } | Self::Lambda { start, .. } => {
                *start
            }
        }
    }
}

/// The parameter named before the arrow: `p` in `(p) => ...` or `p => ...`
fn lambda_parameter(text: &str) -> Option<String> {
    let (head, _) = text.split_once("=>")?;
    let name = head.trim().trim_start_matches('(').trim_end_matches(')').trim();
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_alphanumeric() || c == '_');
    valid.then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use snippet_backend::LexicalBackend;
    use snippet_context::StaticContextRegistry;

    #[test]
    fn test_parse_fragments() {
        let input = ScannerInput::parse(
            r#"{"fragments": [
                {"kind": "using", "text": "using System;", "start": 0},
                {"kind": "block", "text": "var x = 1;", "start": 20},
                {"kind": "lambda", "text": "(p) => p.IsKey", "start": 40, "parameter_type": "Property"}
            ]}"#,
        )
        .unwrap();

        assert!(input.source.is_none());
        assert_eq!(input.fragments.len(), 3);
        assert_eq!(
            input.fragments[2],
            InputFragment::Lambda {
                text: "(p) => p.IsKey".to_string(),
                start: 40,
                parameter_type: Some("Property".to_string()),
                parameter_name: None,
            }
        );
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(ScannerInput::parse(r#"{"fragments": [{"kind": "macro", "text": "", "start": 0}]}"#).is_err());
    }

    #[test]
    fn test_lambda_parameter() {
        assert_eq!(lambda_parameter("(p) => p.IsKey"), Some("p".to_string()));
        assert_eq!(lambda_parameter("item => item.Name"), Some("item".to_string()));
        assert_eq!(lambda_parameter("(a, b) => a"), None);
        assert_eq!(lambda_parameter("no arrow"), None);
    }

    #[test]
    fn test_feed_sorts_and_finalizes() {
        let input = ScannerInput::parse(
            r#"{"fragments": [
                {"kind": "lambda", "text": "x => x != null", "start": 30},
                {"kind": "using", "text": "using System;", "start": 0}
            ]}"#,
        )
        .unwrap();

        let mut assembler = Assembler::new(LexicalBackend::new(), StaticContextRegistry::new());
        input.feed(&mut assembler).unwrap();

        let text = assembler.document_text().unwrap();
        assert!(text.contains("bool __30(object x) { return x != null; }"));
        assert!(text.find("using System;\npublic").is_some());
    }

    #[test]
    fn test_feed_reports_malformed_lambda() {
        let input =
            ScannerInput::parse(r#"{"fragments": [{"kind": "lambda", "text": "x.Name", "start": 5}]}"#)
                .unwrap();
        let mut assembler = Assembler::new(LexicalBackend::new(), StaticContextRegistry::new());
        let err = input.feed(&mut assembler).unwrap_err();
        assert!(matches!(err, AssemblerError::MalformedLambda { source_start: 5 }));
    }
}
