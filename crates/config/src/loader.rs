use crate::{ConfigError, Result, SnippetConfig};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names to search for, in order of preference
const CONFIG_FILES: &[&str] = &[
    ".snippetrc.yml",
    ".snippetrc.yaml",
    ".snippetrc.json",
    "snippet.config.yml",
];

/// Find a snippet config file by walking up the directory tree from the given start directory.
/// Returns the path to the config file if found.
#[tracing::instrument(fields(start = %start_dir.display()))]
pub fn find_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    let mut current_dir = start_dir.to_path_buf();
    let mut checked_dirs = 0;

    loop {
        tracing::trace!(dir = %current_dir.display(), "Checking directory for config files");
        for file_name in CONFIG_FILES {
            let config_path = current_dir.join(file_name);
            if config_path.is_file() {
                tracing::info!(path = %config_path.display(), checked_dirs, "Found config file");
                return Ok(Some(config_path));
            }
        }

        checked_dirs += 1;
        if !current_dir.pop() {
            tracing::debug!(checked_dirs, "No config file found");
            break;
        }
    }

    Ok(None)
}

/// Load a snippet config from the specified path.
/// The format is chosen from the file extension.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<SnippetConfig> {
    tracing::debug!("Reading config file");
    let contents = fs::read_to_string(path)?;
    let config = load_config_from_str(&contents, path)?;
    tracing::info!(
        contexts = config.contexts.len(),
        known_types = config.known_types.len(),
        "Config loaded successfully"
    );
    Ok(config)
}

/// Load a snippet config from a string.
/// The path is used for error messages and format detection.
#[tracing::instrument(skip(contents), fields(path = %path.display(), size = contents.len()))]
pub fn load_config_from_str(contents: &str, path: &Path) -> Result<SnippetConfig> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

    let config = match extension {
        "yml" | "yaml" => {
            tracing::trace!("Parsing as YAML");
            parse_yaml(contents, path)?
        }
        "json" => {
            tracing::trace!("Parsing as JSON");
            parse_json(contents, path)?
        }
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    validate_config(&config, path)?;
    Ok(config)
}

fn parse_yaml(contents: &str, path: &Path) -> Result<SnippetConfig> {
    // An empty file means "all defaults"
    if contents.trim().is_empty() {
        return Ok(SnippetConfig::default());
    }
    serde_saphyr::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("YAML parse error: {e}"),
    })
}

fn parse_json(contents: &str, path: &Path) -> Result<SnippetConfig> {
    serde_json::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("JSON parse error: {e}"),
    })
}

#[tracing::instrument(skip(config, path), fields(path = %path.display()))]
fn validate_config(config: &SnippetConfig, path: &Path) -> Result<()> {
    let invalid = |message: String| ConfigError::Invalid {
        path: path.to_path_buf(),
        message,
    };

    if config.synthetic_prefix.is_empty() {
        return Err(invalid("synthetic_prefix must not be empty".to_string()));
    }
    if !is_dotted_name(&config.namespace) {
        return Err(invalid(format!("'{}' is not a valid namespace", config.namespace)));
    }
    if !is_dotted_name(&config.wrapper_type) || config.wrapper_type.contains('.') {
        return Err(invalid(format!(
            "'{}' is not a valid wrapper type name",
            config.wrapper_type
        )));
    }
    for import in &config.imports {
        if !is_dotted_name(import) {
            return Err(invalid(format!("'{import}' is not a valid import")));
        }
    }
    for alias in &config.aliases {
        if !is_dotted_name(&alias.name) || alias.target.trim().is_empty() {
            return Err(invalid(format!(
                "Alias '{}' must name an identifier and a non-empty target",
                alias.name
            )));
        }
    }

    let mut names = HashSet::new();
    for context in &config.contexts {
        if context.name.trim().is_empty() || context.type_name.trim().is_empty() {
            return Err(invalid(
                "Contexts need both a name and a type_name".to_string(),
            ));
        }
        if !names.insert(context.name.as_str()) {
            return Err(invalid(format!("Context '{}' is defined twice", context.name)));
        }
    }

    tracing::debug!("Config validation passed");
    Ok(())
}

/// `Name` or `Name.Other`, each segment a plain identifier
fn is_dotted_name(value: &str) -> bool {
    !value.is_empty()
        && value.split('.').all(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_')
                && chars.all(|c| c.is_alphanumeric() || c == '_')
        })
}
