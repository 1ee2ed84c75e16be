//! Generated text surrounding the author fragments.

use snippet_config::SnippetConfig;

/// Shape of the generated prologue, wrapper and lambda methods
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoilerplateOptions {
    pub namespace: String,
    pub imports: Vec<String>,
    /// `(name, target)` pairs written as `using name = target;`
    pub aliases: Vec<(String, String)>,
    pub wrapper_type: String,
    /// Prefix of synthesized lambda method names
    pub synthetic_prefix: String,
}

impl Default for BoilerplateOptions {
    fn default() -> Self {
        Self::from(&SnippetConfig::default())
    }
}

impl From<&SnippetConfig> for BoilerplateOptions {
    fn from(config: &SnippetConfig) -> Self {
        Self {
            namespace: config.namespace.clone(),
            imports: config.imports.clone(),
            aliases: config
                .aliases
                .iter()
                .map(|alias| (alias.name.clone(), alias.target.clone()))
                .collect(),
            wrapper_type: config.wrapper_type.clone(),
            synthetic_prefix: config.synthetic_prefix.clone(),
        }
    }
}

impl BoilerplateOptions {
    /// Namespace opening, imports and aliases
    pub(crate) fn prologue(&self) -> String {
        let mut text = format!("namespace {}\n{{\n", self.namespace);
        for import in &self.imports {
            text.push_str(&format!("using {import};\n"));
        }
        for (name, target) in &self.aliases {
            text.push_str(&format!("using {name} = {target};\n"));
        }
        text
    }

    pub(crate) fn wrapper_open(&self) -> String {
        format!("public static class {}\n{{\n", self.wrapper_type)
    }

    pub(crate) const fn wrapper_close() -> &'static str {
        "}\n"
    }

    pub(crate) const fn epilogue() -> &'static str {
        "}\n"
    }

    /// Separator emitted after each author construct
    pub(crate) const fn line_break() -> &'static str {
        "\n"
    }

    /// Name of the method synthesized for the lambda at `source_start`
    #[must_use]
    pub fn lambda_method_name(&self, source_start: usize) -> String {
        format!("{}{source_start}", self.synthetic_prefix)
    }

    pub(crate) fn lambda_header(
        &self,
        source_start: usize,
        parameter_type: &str,
        parameter_name: &str,
    ) -> String {
        format!(
            "bool {}({parameter_type} {parameter_name}) {{ return ",
            self.lambda_method_name(source_start)
        )
    }

    pub(crate) const fn lambda_footer() -> &'static str {
        "; }"
    }
}
