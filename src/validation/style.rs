//! Style Section Validation
//!
//! Checks the style section's body for emptiness and its opening tag's
//! `lang` attribute against the supported-language whitelist. The style
//! language body itself is never parsed.

use std::sync::LazyLock;

use regex::Regex;

use crate::lang::LanguageSpec;

use super::engine::{codes, AnalysisResult, Range};

static LANG_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"lang=["'](\w+)["']"#).unwrap());

/// Scan the style section. `start_line` is the 1-indexed document line of
/// the first content character (the opening tag's line, since content begins
/// right after `>`); `raw_tag` is the attribute text of that tag.
pub fn check_style(
    content: &str,
    start_line: usize,
    raw_tag: &str,
    lang: &LanguageSpec,
    result: &mut AnalysisResult,
) {
    if content.trim().is_empty() {
        let end_line = start_line + content.bytes().filter(|&b| b == b'\n').count();
        result.add_info(
            Range {
                start_line,
                start_col: 0,
                end_line,
                end_col: 0,
            },
            codes::EMPTY_STYLE,
            "Empty <style> block. Consider removing it.".to_string(),
        );
    }

    if let Some(caps) = LANG_ATTR_RE.captures(raw_tag) {
        let value = &caps[1];
        if !lang.is_known_style_language(value) {
            // `<style` + attributes + `>` all sit on the tag line
            let tag_len = "<style".len() + raw_tag.len() + 1;
            result.add_warning(
                Range::line_span(start_line, tag_len),
                codes::UNKNOWN_STYLE_LANGUAGE,
                format!(
                    "Unknown style language '{value}'. Supported: {}.",
                    lang.style_languages.join(", ")
                ),
            );
        }
    }
}
