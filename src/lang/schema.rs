//! Language Definition Schema
//!
//! Types for the TOML language definition: directive whitelists, block
//! keywords, style languages and keyword documentation.

use serde::Deserialize;
use std::collections::HashSet;

/// Root definition file structure (matches TOML)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LanguageFile {
    pub language: LanguageMeta,
    #[serde(default)]
    pub policy: PolicyDef,
    pub directives: DirectiveTables,
    pub style: StyleDef,
    #[serde(default)]
    pub keywords: Vec<KeywordDoc>,
}

/// Language metadata
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LanguageMeta {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// Tunable diagnostic policy
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PolicyDef {
    #[serde(default)]
    pub unknown_directive_severity: DirectivePolicy,
}

/// Severity applied to inline directives missing from the whitelists
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DirectivePolicy {
    #[default]
    Warning,
    Information,
}

/// Directive whitelists, keyed by the prefix they apply to
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DirectiveTables {
    /// `@event="handler"`
    pub events: Vec<String>,
    /// `#bind="variable"`
    pub bindings: Vec<String>,
    /// `:attribute="expression"`
    pub attributes: Vec<String>,
    /// `{#keyword ...}` block openers
    pub blocks: Vec<String>,
    /// `{:keyword ...}` intermediate markers
    pub branches: Vec<String>,
    /// elements on which `#bind` is meaningful
    pub form_elements: Vec<String>,
}

/// Style section settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StyleDef {
    pub languages: Vec<String>,
}

/// Hover/completion documentation for one keyword or directive
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct KeywordDoc {
    pub name: String,
    pub detail: String,
    pub documentation: String,
}

/// Runtime language definition (optimized for lookups)
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageSpec {
    pub name: String,
    pub version: Option<String>,
    pub unknown_directive_severity: DirectivePolicy,
    pub events: HashSet<String>,
    pub bindings: HashSet<String>,
    pub attributes: HashSet<String>,
    pub blocks: HashSet<String>,
    pub branches: HashSet<String>,
    /// Kept in file order for message text
    pub form_elements: Vec<String>,
    /// Kept in file order for message text
    pub style_languages: Vec<String>,
    pub keywords: Vec<KeywordDoc>,
}

impl From<LanguageFile> for LanguageSpec {
    fn from(file: LanguageFile) -> Self {
        let to_set = |names: Vec<String>| names.into_iter().collect::<HashSet<_>>();

        Self {
            name: file.language.name,
            version: file.language.version,
            unknown_directive_severity: file.policy.unknown_directive_severity,
            events: to_set(file.directives.events),
            bindings: to_set(file.directives.bindings),
            attributes: to_set(file.directives.attributes),
            blocks: to_set(file.directives.blocks),
            branches: to_set(file.directives.branches),
            form_elements: file.directives.form_elements,
            style_languages: file.style.languages,
            keywords: file.keywords,
        }
    }
}

impl LanguageSpec {
    /// Check an inline directive name against the whitelist for its prefix
    pub fn is_known_directive(&self, prefix: char, name: &str) -> bool {
        match prefix {
            '@' => self.events.contains(name),
            '#' => self.bindings.contains(name),
            ':' => self.attributes.contains(name),
            _ => false,
        }
    }

    /// All directive names valid for a prefix, sorted for stable messages
    pub fn directive_names(&self, prefix: char) -> Vec<&str> {
        let set = match prefix {
            '@' => &self.events,
            '#' => &self.bindings,
            ':' => &self.attributes,
            _ => return Vec::new(),
        };
        let mut names: Vec<&str> = set.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Check a style `lang` attribute value against the whitelist
    pub fn is_known_style_language(&self, lang: &str) -> bool {
        self.style_languages.iter().any(|l| l == lang)
    }

    /// Find documentation for a keyword or directive token
    pub fn keyword(&self, name: &str) -> Option<&KeywordDoc> {
        self.keywords.iter().find(|kw| kw.name == name)
    }
}
