use std::path::{Path, PathBuf};

use anyhow::Result;
use snippet_assembler::{Assembler, BoilerplateOptions};
use snippet_backend::LexicalBackend;
use snippet_config::SnippetConfig;
use snippet_context::StaticContextRegistry;
use snippet_types::{LineIndex, OffsetRange};

use crate::input::ScannerInput;

pub type CliAssembler = Assembler<LexicalBackend, StaticContextRegistry>;

/// A finalized assembler for one scanner input, plus what is needed to
/// print template positions.
pub struct Session {
    pub assembler: CliAssembler,
    source: Option<String>,
    line_index: Option<LineIndex>,
}

impl Session {
    pub fn open(config_path: Option<&Path>, input_path: &Path) -> Result<Self> {
        let config = resolve_config(config_path, input_path)?;
        let input = ScannerInput::load(input_path)?;

        let registry = config.registry();
        let backend = LexicalBackend::new().with_known_types(config.type_names());
        let mut assembler =
            Assembler::with_options(backend, registry, BoilerplateOptions::from(&config));
        input.feed(&mut assembler)?;

        tracing::debug!(
            input = %input_path.display(),
            fragments = input.fragments.len(),
            "Session ready"
        );

        let line_index = input.source.as_deref().map(LineIndex::new);
        Ok(Self {
            assembler,
            source: input.source,
            line_index,
        })
    }

    /// `line:col` (1-based) when the template text is known, the raw byte
    /// range otherwise.
    pub fn location(&self, range: OffsetRange) -> String {
        match &self.line_index {
            Some(index) => {
                let (line, col) = index.line_col(range.start);
                format!("{}:{}", line + 1, col + 1)
            }
            None => range.to_string(),
        }
    }

    /// The template text covered by `range`, if the template is known.
    pub fn excerpt(&self, range: OffsetRange) -> Option<&str> {
        self.source.as_deref()?.get(range.start..range.end)
    }
}

/// Explicit config, else the nearest config above the input, else defaults.
fn resolve_config(explicit: Option<&Path>, input_path: &Path) -> Result<SnippetConfig> {
    if let Some(path) = explicit {
        return Ok(snippet_config::load_config(path)?);
    }

    let start_dir = match input_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    match snippet_config::find_config(&start_dir)? {
        Some(path) => Ok(snippet_config::load_config(&path)?),
        None => {
            tracing::debug!("No config file found, using defaults");
            Ok(SnippetConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const INPUT: &str = r#"{
        "source": "<#@ using System; #>\n<# var x = 1; #>",
        "fragments": [
            {"kind": "using", "text": "using System;", "start": 4},
            {"kind": "block", "text": "var x = 1;", "start": 24}
        ]
    }"#;

    #[test]
    fn test_open_uses_discovered_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".snippetrc.yml"), "namespace: Discovered\n").unwrap();
        let input = dir.path().join("template.json");
        fs::write(&input, INPUT).unwrap();

        let session = Session::open(None, &input).unwrap();
        let text = session.assembler.document_text().unwrap();
        assert!(text.starts_with("namespace Discovered\n"));
    }

    #[test]
    fn test_explicit_config_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".snippetrc.yml"), "namespace: Discovered\n").unwrap();
        let explicit = dir.path().join("other.json");
        fs::write(&explicit, r#"{"namespace": "Explicit"}"#).unwrap();
        let input = dir.path().join("template.json");
        fs::write(&input, INPUT).unwrap();

        let session = Session::open(Some(&explicit), &input).unwrap();
        assert!(session
            .assembler
            .document_text()
            .unwrap()
            .starts_with("namespace Explicit\n"));
    }

    #[test]
    fn test_location_and_excerpt() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".snippetrc.json"), "{}").unwrap();
        let input = dir.path().join("template.json");
        fs::write(&input, INPUT).unwrap();

        let session = Session::open(None, &input).unwrap();
        let var = OffsetRange::new(24, 27);
        assert_eq!(session.location(var), "2:4");
        assert_eq!(session.excerpt(var), Some("var"));
    }
}
