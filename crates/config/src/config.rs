use serde::{Deserialize, Serialize};
use snippet_context::{ContextDescriptor, StaticContextRegistry};

/// Top-level snippet configuration.
///
/// Every field is optional in the file; missing fields fall back to the
/// defaults of [`SnippetConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnippetConfig {
    /// Namespace the synthetic document is wrapped in
    pub namespace: String,

    /// Namespaces imported by the document prologue
    pub imports: Vec<String>,

    /// Type aliases written into the prologue as `using Name = Target;`
    pub aliases: Vec<Alias>,

    /// Name of the static class holding code blocks and lambdas
    pub wrapper_type: String,

    /// Prefix of synthesized member names, hidden from completions
    pub synthetic_prefix: String,

    /// Host types highlighted and offered as type names
    pub known_types: Vec<String>,

    /// Template contexts and the host types they are bound to
    pub contexts: Vec<ContextDescriptor>,
}

/// A `using Name = Target;` alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
    pub target: String,
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self {
            namespace: "TemplateScratch".to_string(),
            imports: vec![
                "System".to_string(),
                "System.Collections.Generic".to_string(),
                "System.Linq".to_string(),
            ],
            aliases: Vec::new(),
            wrapper_type: "TemplateSnippets".to_string(),
            synthetic_prefix: "__".to_string(),
            known_types: Vec::new(),
            contexts: Vec::new(),
        }
    }
}

impl SnippetConfig {
    /// Build the context registry described by `contexts`.
    #[must_use]
    pub fn registry(&self) -> StaticContextRegistry {
        self.contexts.iter().cloned().collect()
    }

    /// Known types plus the host type of every context, deduplicated.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        let mut names: Vec<&str> = self
            .known_types
            .iter()
            .chain(self.contexts.iter().map(|c| &c.type_name))
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names.into_iter()
    }
}
