//! Language Definition
//!
//! Loading of the AspScript language definition: directive whitelists,
//! block keywords, style languages and keyword documentation. The definition
//! ships embedded in the binary; a user file can override it.

pub mod schema;

pub use schema::{DirectivePolicy, KeywordDoc, LanguageSpec};

use std::path::Path;

use anyhow::{Context, Result};

use schema::LanguageFile;

/// Document language identifier the server engages on
pub const LANGUAGE_ID: &str = "aspscript";

/// The language definition compiled into the binary
pub const EMBEDDED_DEFINITION: &str = include_str!("../../resources/aspscript.lang.toml");

/// Load the embedded language definition
pub fn embedded_spec() -> LanguageSpec {
    match toml::from_str::<LanguageFile>(EMBEDDED_DEFINITION) {
        Ok(file) => LanguageSpec::from(file),
        Err(e) => {
            // Fallback to a minimal definition if parsing fails
            log::warn!(
                "Failed to parse embedded language definition: {}. Using minimal fallback.",
                e
            );
            minimal_spec()
        }
    }
}

/// Load a language definition from a TOML file
pub fn spec_from_path(path: &Path) -> Result<LanguageSpec> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read language definition: {}", path.display()))?;
    let file: LanguageFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse language definition: {}", path.display()))?;
    Ok(LanguageSpec::from(file))
}

/// Load the effective language definition: the override file if given and
/// readable, otherwise the embedded one
pub fn load_spec(override_path: Option<&Path>) -> LanguageSpec {
    if let Some(path) = override_path {
        match spec_from_path(path) {
            Ok(spec) => {
                log::info!("Loaded language definition from {}", path.display());
                return spec;
            }
            Err(e) => {
                log::warn!("{:#}. Falling back to the embedded definition.", e);
            }
        }
    }
    embedded_spec()
}

/// Minimal fallback in case the embedded TOML fails to parse
fn minimal_spec() -> LanguageSpec {
    use std::collections::HashSet;

    let set = |names: &[&str]| -> HashSet<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    };

    LanguageSpec {
        name: LANGUAGE_ID.to_string(),
        version: Some("minimal-fallback".to_string()),
        unknown_directive_severity: DirectivePolicy::Warning,
        events: set(&["click", "input", "change", "submit", "focus", "blur"]),
        bindings: set(&["bind"]),
        attributes: set(&["class", "style"]),
        blocks: set(&["if", "each", "for"]),
        branches: set(&["else"]),
        form_elements: vec![
            "input".to_string(),
            "textarea".to_string(),
            "select".to_string(),
        ],
        style_languages: vec![
            "css".to_string(),
            "scss".to_string(),
            "sass".to_string(),
            "less".to_string(),
            "stylus".to_string(),
        ],
        keywords: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_definition_parses() {
        let spec = embedded_spec();
        assert_eq!(spec.name, "aspscript");
        assert!(spec.events.contains("click"));
        assert!(spec.bindings.contains("bind"));
        assert!(spec.blocks.contains("if"));
        assert!(spec.branches.contains("else"));
        // Superset whitelist: stylus is supported alongside the classic four
        assert!(spec.is_known_style_language("stylus"));
        assert!(spec.is_known_style_language("css"));
    }

    #[test]
    fn embedded_definition_has_keyword_docs() {
        let spec = embedded_spec();
        assert!(spec.keyword("$state").is_some());
        assert!(spec.keyword("#bind").is_some());
        assert!(spec.keyword("onMount").is_some());
    }

    #[test]
    fn minimal_fallback_is_usable() {
        let spec = minimal_spec();
        assert!(spec.is_known_directive('@', "click"));
        assert!(spec.is_known_style_language("stylus"));
        assert!(spec.keywords.is_empty());
    }

    #[test]
    fn missing_override_falls_back_to_embedded() {
        let spec = load_spec(Some(Path::new("/nonexistent/aspscript.lang.toml")));
        assert_eq!(spec.name, "aspscript");
        assert!(spec.keyword("$state").is_some());
    }
}
