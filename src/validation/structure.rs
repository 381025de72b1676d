//! Structural Validation
//!
//! Whole-document audits: script delimiter counts, style tag counts, missing
//! template markup. These run against the full text, not a single section,
//! so stray delimiters outside the recognized sections are still counted.

use std::sync::LazyLock;

use regex::Regex;

use crate::parser::SectionMap;

use super::engine::{codes, AnalysisResult, Range};

static STYLE_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<style\b").unwrap());

/// Audit document-level structure
pub fn check_document(text: &str, sections: &SectionMap<'_>, result: &mut AnalysisResult) {
    let delimiter_count = text.lines().filter(|line| line.trim() == "---").count();

    // Exactly 0 (no script block) or 2 (a well-formed one) delimiters are
    // valid; anything else is a single error regardless of the extra count.
    if delimiter_count != 0 && delimiter_count != 2 {
        result.add_error(
            document_start(text),
            codes::INVALID_STRUCTURE,
            "Invalid component structure. Expected exactly 2 \"---\" delimiters for the script section."
                .to_string(),
        );
    }

    let style_tag_count = STYLE_OPEN_RE.find_iter(text).count();
    if style_tag_count > 1 {
        result.add_warning(
            document_start(text),
            codes::MULTIPLE_STYLES,
            "Multiple <style> tags found. Only one <style> section is allowed per component."
                .to_string(),
        );
    }

    if sections.template.is_none() {
        result.add_info(
            document_start(text),
            codes::NO_TEMPLATE,
            "Component has no template markup.".to_string(),
        );
    }
}

/// Anchor range at document start, clamped to the first line's actual length
fn document_start(text: &str) -> Range {
    Range::line_span(1, text.lines().next().map_or(0, str::len))
}
