//! Analysis Engine
//!
//! Core diagnostic types and the document-level analysis entry point,
//! separated from parsing and LSP concerns. Analysis is a pure function of
//! the document text: it never fails, it only returns diagnostics.

use crate::lang::LanguageSpec;
use crate::parser::split_document;

use super::{directives, reactive, structure, style};

/// Severity of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A text range: 1-indexed lines, 0-indexed byte columns
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl Range {
    /// A range spanning `len` bytes from the start of one line
    pub fn line_span(line: usize, len: usize) -> Self {
        Self {
            start_line: line,
            start_col: 0,
            end_line: line,
            end_col: len,
        }
    }

    /// A range covering `cols` within one line
    pub fn cols(line: usize, start_col: usize, end_col: usize) -> Self {
        Self {
            start_line: line,
            start_col,
            end_line: line,
            end_col,
        }
    }
}

/// A diagnostic message for one rule violation
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub range: Range,
    pub message: String,
    pub severity: Severity,
    /// Stable identifier, kept across versions for the same semantic
    /// condition (quick-fix providers key off it)
    pub code: &'static str,
}

/// Stable diagnostic codes
pub mod codes {
    pub const INVALID_STRUCTURE: &str = "invalid-structure";
    pub const MULTIPLE_STYLES: &str = "multiple-styles";
    pub const NO_TEMPLATE: &str = "no-template";
    pub const DUPLICATE_STATE: &str = "duplicate-state";
    pub const DUPLICATE_COMPUTED: &str = "duplicate-computed";
    pub const DUPLICATE_FUNCTION: &str = "duplicate-function";
    pub const STATE_WITHOUT_LET: &str = "state-without-let";
    pub const UNKNOWN_DIRECTIVE: &str = "unknown-directive";
    pub const BIND_USAGE: &str = "bind-usage";
    pub const UNKNOWN_BLOCK_DIRECTIVE: &str = "unknown-block-directive";
    pub const UNKNOWN_BRANCH_DIRECTIVE: &str = "unknown-branch-directive";
    pub const UNMATCHED_CLOSING_DIRECTIVE: &str = "unmatched-closing-directive";
    pub const MISMATCHED_CLOSING_DIRECTIVE: &str = "mismatched-closing-directive";
    pub const UNCLOSED_BLOCK_DIRECTIVE: &str = "unclosed-block-directive";
    pub const UNCLOSED_BRACES: &str = "unclosed-braces";
    pub const UNKNOWN_STYLE_LANGUAGE: &str = "unknown-style-language";
    pub const EMPTY_STYLE: &str = "empty-style";
}

/// Result of analyzing a document or section
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisResult {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add_error(&mut self, range: Range, code: &'static str, message: String) {
        self.push(Severity::Error, range, code, message);
    }

    pub fn add_warning(&mut self, range: Range, code: &'static str, message: String) {
        self.push(Severity::Warning, range, code, message);
    }

    pub fn add_info(&mut self, range: Range, code: &'static str, message: String) {
        self.push(Severity::Info, range, code, message);
    }

    fn push(&mut self, severity: Severity, range: Range, code: &'static str, message: String) {
        self.diagnostics.push(Diagnostic {
            range,
            message,
            severity,
            code,
        });
    }

    pub fn is_valid(&self) -> bool {
        !self
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}

/// Analyze an entire component document.
///
/// Splits the text into sections and runs each present section through its
/// validator. All state (symbol sets, the directive stack) is scoped to this
/// call; analyzing the same text twice yields identical diagnostics.
pub fn analyze_document(text: &str, lang: &LanguageSpec) -> AnalysisResult {
    let sections = split_document(text);
    let mut result = AnalysisResult::new();

    structure::check_document(text, &sections, &mut result);

    if let Some(script) = &sections.script {
        reactive::check_script(script.content, script.start_line, &mut result);
    }

    if let Some(template) = &sections.template {
        directives::check_template(template.content, template.start_line, lang, &mut result);
    }

    if let Some(style) = &sections.style {
        style::check_style(
            style.content,
            style.start_line,
            style.raw_tag.unwrap_or(""),
            lang,
            &mut result,
        );
    }

    result
}
