//! Section Splitter
//!
//! Slices raw component text into script, template and style sections with
//! exact 1-indexed start lines. Single-pass regex extraction; the splitter
//! itself emits no diagnostics.

use std::sync::LazyLock;

use regex::Regex;

use super::section::{Section, SectionKind, SectionMap};

/// Script block: the document must open with a `---` line; the body runs
/// greedily to the last line consisting solely of `---`. Stray delimiter
/// lines elsewhere are not a script section (the structural validator audits
/// the whole-document delimiter count separately).
static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---[ \t]*\r?\n(?:(.*)\r?\n)?---[ \t]*(?:\r?\n|\z)").unwrap()
});

/// Style block: the first `<style ...>...</style>` region, non-greedy. Only
/// this occurrence is recognized even if more exist; extras are reported by
/// the structural validator, not here.
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<style([^>]*)>(.*?)</style>").unwrap());

/// Split a component document into its sections.
///
/// The template section is whatever lies between the end of the script
/// section (or start of document) and the start of the style section (or end
/// of document). An all-whitespace template span is absent, not empty.
pub fn split_document(text: &str) -> SectionMap<'_> {
    let mut sections = SectionMap::default();

    let mut template_from = 0;
    let mut template_to = text.len();

    if let Some(caps) = SCRIPT_RE.captures(text) {
        let whole = caps.get(0).unwrap();
        let (content, content_start) = match caps.get(1) {
            // The greedy body capture stops at `\n`; shed the `\r` of a CRLF
            // closing delimiter line
            Some(m) => (
                m.as_str().strip_suffix('\r').unwrap_or(m.as_str()),
                m.start(),
            ),
            // `---` immediately followed by `---`: empty body after the
            // opening delimiter line
            None => {
                let after_open = text.find('\n').map(|i| i + 1).unwrap_or(text.len());
                ("", after_open)
            }
        };
        sections.script = Some(Section {
            kind: SectionKind::Script,
            content,
            start_line: line_of_offset(text, content_start),
            raw_tag: None,
        });
        template_from = whole.end();
    }

    // The style search starts after the script so the two regions cannot
    // overlap; a style tag inside the script body only shows up in the
    // structural tag count.
    if let Some(caps) = STYLE_RE.captures(&text[template_from..]) {
        let whole = caps.get(0).unwrap();
        let body = caps.get(2).unwrap();
        sections.style = Some(Section {
            kind: SectionKind::Style,
            content: body.as_str(),
            start_line: line_of_offset(text, template_from + body.start()),
            raw_tag: Some(caps.get(1).unwrap().as_str()),
        });
        template_to = template_from + whole.start();
    }

    let span = &text[template_from..template_to];
    if !span.trim().is_empty() {
        sections.template = Some(Section {
            kind: SectionKind::Template,
            content: span,
            start_line: line_of_offset(text, template_from),
            raw_tag: None,
        });
    }

    sections
}

/// Byte span of the recognized `<style ...>...</style>` region, delimiters
/// included. Used by the empty-style quick fix.
pub fn style_block_span(text: &str) -> Option<(usize, usize)> {
    let from = SCRIPT_RE.find(text).map_or(0, |m| m.end());
    STYLE_RE
        .find(&text[from..])
        .map(|m| (from + m.start(), from + m.end()))
}

/// 1-indexed line containing the given byte offset
fn line_of_offset(text: &str, offset: usize) -> usize {
    text.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_full_component() {
        let text = "---\nlet a = $state(0)\n---\n<div>{a}</div>\n<style>\n.a { color: red; }\n</style>";
        let sections = split_document(text);

        let script = sections.script.expect("script section");
        assert_eq!(script.content, "let a = $state(0)");
        assert_eq!(script.start_line, 2);

        let template = sections.template.expect("template section");
        assert!(template.content.contains("<div>{a}</div>"));
        assert_eq!(template.start_line, 4);

        let style = sections.style.expect("style section");
        assert_eq!(style.content, "\n.a { color: red; }\n");
        assert_eq!(style.start_line, 5);
        assert_eq!(style.raw_tag, Some(""));
    }

    #[test]
    fn script_must_open_the_document() {
        let text = "<div></div>\n---\nlet a = 1\n---\n";
        let sections = split_document(text);
        assert!(sections.script.is_none());
        // Everything stays template text
        let template = sections.template.expect("template section");
        assert_eq!(template.start_line, 1);
        assert!(template.content.contains("let a = 1"));
    }

    #[test]
    fn script_body_runs_to_last_delimiter() {
        let text = "---\nlet a = 1\n---\nlet b = 2\n---\n";
        let sections = split_document(text);
        let script = sections.script.expect("script section");
        assert_eq!(script.content, "let a = 1\n---\nlet b = 2");
        assert!(sections.template.is_none());
    }

    #[test]
    fn empty_script_body() {
        let sections = split_document("---\n---\n<p>hi</p>\n");
        let script = sections.script.expect("script section");
        assert_eq!(script.content, "");
        assert_eq!(script.start_line, 2);
        assert_eq!(sections.template.expect("template").start_line, 3);
    }

    #[test]
    fn whitespace_only_template_is_absent() {
        let text = "---\nlet a = 1\n---\n  \n\n<style>.a {}</style>";
        let sections = split_document(text);
        assert!(sections.template.is_none());
        assert!(sections.style.is_some());
    }

    #[test]
    fn first_style_region_wins() {
        let text = "<style lang=\"scss\">.a {}</style>\n<style>.b {}</style>\n";
        let sections = split_document(text);
        let style = sections.style.expect("style section");
        assert_eq!(style.content, ".a {}");
        assert_eq!(style.raw_tag, Some(" lang=\"scss\""));
    }

    #[test]
    fn style_tag_attributes_captured() {
        let sections = split_document("<style lang='less'>\n</style>");
        let style = sections.style.expect("style section");
        assert_eq!(style.raw_tag, Some(" lang='less'"));
        assert_eq!(style.start_line, 1);
    }

    #[test]
    fn template_only_document() {
        let sections = split_document("<div>hello</div>");
        assert!(sections.script.is_none());
        assert!(sections.style.is_none());
        let template = sections.template.expect("template section");
        assert_eq!(template.content, "<div>hello</div>");
        assert_eq!(template.start_line, 1);
    }

    #[test]
    fn empty_document_has_no_sections() {
        let sections = split_document("");
        assert_eq!(sections, SectionMap::default());
    }

    #[test]
    fn crlf_delimiters() {
        let text = "---\r\nlet a = $state(0)\r\n---\r\n<div>{a}</div>\r\n";
        let sections = split_document(text);
        let script = sections.script.expect("script section");
        assert_eq!(script.content, "let a = $state(0)");
        assert_eq!(script.start_line, 2);
        assert!(sections.template.is_some());
    }

    #[test]
    fn style_block_span_covers_delimiters() {
        let text = "<div></div>\n<style>\n</style>\n";
        let (start, end) = style_block_span(text).expect("style span");
        assert_eq!(&text[start..end], "<style>\n</style>");
    }

    #[test]
    fn style_inside_script_body_is_not_a_section() {
        let text = "---\nlet css = \"<style>.a {}</style>\"\n---\n<p>x</p>\n";
        let sections = split_document(text);
        assert!(sections.style.is_none());
        let script = sections.script.expect("script section");
        assert!(script.content.contains("<style>"));
        assert_eq!(sections.template.expect("template").content.trim(), "<p>x</p>");
    }

    #[test]
    fn unterminated_delimiter_is_not_a_script() {
        // One opening `---` and no closing line: best-effort extraction
        // finds no script; the delimiter count audit reports it.
        let sections = split_document("---\nlet a = 1\n<div></div>\n");
        assert!(sections.script.is_none());
        assert!(sections.template.is_some());
    }
}
