//! Template Directive Validation
//!
//! Scans the template section for inline directives (`@event=`, `#bind=`,
//! `:attr=`), block directives (`{#if}` / `{:else}` / `{/if}`) and
//! interpolation brace balance. Block directives are matched with one stack
//! for the whole section; the stack is discarded at the end of the call.

use std::sync::LazyLock;

use regex::Regex;

use crate::lang::{DirectivePolicy, LanguageSpec};

use super::engine::{codes, AnalysisResult, Range};

/// Attribute-position directive: prefix + name preceded by whitespace and
/// followed by `=`, with optional `.modifier` suffixes
static INLINE_DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)([@#:])([A-Za-z][A-Za-z0-9]*)((?:\.[A-Za-z][A-Za-z0-9]*)*)=").unwrap()
});

/// Block tag inside interpolation braces: `{#name ...}`, `{:name ...}`,
/// `{/name}`
static BLOCK_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([#:/])([A-Za-z]\w*)[^}]*\}").unwrap());

/// One open block directive awaiting its closing tag
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveFrame {
    pub name: String,
    pub open_line: usize,
    span: (usize, usize),
}

/// Scan the template section. `start_line` is the 1-indexed document line of
/// the section's first line.
pub fn check_template(
    content: &str,
    start_line: usize,
    lang: &LanguageSpec,
    result: &mut AnalysisResult,
) {
    let mut stack: Vec<DirectiveFrame> = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = start_line + idx;
        check_inline_directives(line, line_no, lang, result);
        check_block_tags(line, line_no, lang, &mut stack, result);
        check_brace_balance(line, line_no, result);
    }

    // Anything left open is reported in push order, bottom of stack first
    for frame in stack {
        result.add_error(
            Range::cols(frame.open_line, frame.span.0, frame.span.1),
            codes::UNCLOSED_BLOCK_DIRECTIVE,
            format!(
                "Unclosed block directive '{{#{}}}' opened on line {}.",
                frame.name, frame.open_line
            ),
        );
    }
}

fn check_inline_directives(
    line: &str,
    line_no: usize,
    lang: &LanguageSpec,
    result: &mut AnalysisResult,
) {
    for caps in INLINE_DIRECTIVE_RE.captures_iter(line) {
        let prefix = caps[1].chars().next().unwrap();
        let name = caps.get(2).unwrap();
        let has_modifier = !caps[3].is_empty();
        let range = Range::cols(line_no, caps.get(1).unwrap().start(), name.end());

        // A `.modifier` suffix exempts the base name from the unknown check
        if !has_modifier && !lang.is_known_directive(prefix, name.as_str()) {
            let suggestions: Vec<String> = lang
                .directive_names(prefix)
                .iter()
                .map(|n| format!("{prefix}{n}"))
                .collect();
            let message = format!(
                "Unknown directive '{prefix}{}'. Did you mean one of: {}?",
                name.as_str(),
                suggestions.join(", ")
            );
            match lang.unknown_directive_severity {
                DirectivePolicy::Warning => {
                    result.add_warning(range, codes::UNKNOWN_DIRECTIVE, message);
                }
                DirectivePolicy::Information => {
                    result.add_info(range, codes::UNKNOWN_DIRECTIVE, message);
                }
            }
        }

        // Placement rule applies even when the name was already flagged
        if prefix == '#' && lang.bindings.contains(name.as_str()) {
            let on_form_element = lang
                .form_elements
                .iter()
                .any(|tag| line.contains(format!("<{tag}").as_str()));
            if !on_form_element {
                result.add_info(
                    range,
                    codes::BIND_USAGE,
                    format!(
                        "#{} directive should only be used on {} elements.",
                        name.as_str(),
                        element_list(&lang.form_elements)
                    ),
                );
            }
        }
    }
}

fn check_block_tags(
    line: &str,
    line_no: usize,
    lang: &LanguageSpec,
    stack: &mut Vec<DirectiveFrame>,
    result: &mut AnalysisResult,
) {
    for caps in BLOCK_TAG_RE.captures_iter(line) {
        let whole = caps.get(0).unwrap();
        let name = caps.get(2).unwrap().as_str();
        let range = Range::cols(line_no, whole.start(), whole.end());

        match &caps[1] {
            "#" => {
                if lang.blocks.contains(name) {
                    stack.push(DirectiveFrame {
                        name: name.to_string(),
                        open_line: line_no,
                        span: (whole.start(), whole.end()),
                    });
                } else {
                    result.add_warning(
                        range,
                        codes::UNKNOWN_BLOCK_DIRECTIVE,
                        format!("Unknown block directive '{{#{name}}}'."),
                    );
                }
            }
            ":" => {
                // Intermediate markers never touch the stack
                if !lang.branches.contains(name) {
                    result.add_warning(
                        range,
                        codes::UNKNOWN_BRANCH_DIRECTIVE,
                        format!("Unknown branch directive '{{:{name}}}'."),
                    );
                }
            }
            "/" => match stack.pop() {
                None => {
                    result.add_error(
                        range,
                        codes::UNMATCHED_CLOSING_DIRECTIVE,
                        format!("Unmatched closing directive '{{/{name}}}'. No block is open."),
                    );
                }
                Some(frame) if frame.name != name => {
                    result.add_error(
                        range,
                        codes::MISMATCHED_CLOSING_DIRECTIVE,
                        format!(
                            "Mismatched closing directive '{{/{name}}}': expected '{{/{}}}' for the block opened on line {}.",
                            frame.name, frame.open_line
                        ),
                    );
                }
                Some(_) => {}
            },
            _ => unreachable!(),
        }
    }
}

/// Per-line `{` / `}` count check. A heuristic: interpolation expressions
/// that legitimately span multiple lines will false-positive here.
fn check_brace_balance(line: &str, line_no: usize, result: &mut AnalysisResult) {
    let open = line.bytes().filter(|&b| b == b'{').count();
    let close = line.bytes().filter(|&b| b == b'}').count();
    if open != close {
        result.add_error(
            Range::line_span(line_no, line.len()),
            codes::UNCLOSED_BRACES,
            "Unclosed interpolation braces { }".to_string(),
        );
    }
}

/// "a, b or c" listing for messages
fn element_list(elements: &[String]) -> String {
    match elements {
        [] => String::new(),
        [only] => only.clone(),
        [head @ .., last] => format!("{} or {}", head.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::embedded_spec;
    use crate::validation::Severity;

    fn check(content: &str) -> AnalysisResult {
        let mut result = AnalysisResult::new();
        check_template(content, 1, &embedded_spec(), &mut result);
        result
    }

    #[test]
    fn known_directives_are_clean() {
        let result = check("<button @click=\"go\" :class=\"cls\">{label}</button>\n");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn unknown_event_directive_warns_with_suggestions() {
        let result = check("<button @clik=\"go\">x</button>\n");
        assert_eq!(result.diagnostics.len(), 1);
        let diag = &result.diagnostics[0];
        assert_eq!(diag.code, codes::UNKNOWN_DIRECTIVE);
        assert_eq!(diag.severity, Severity::Warning);
        assert!(diag.message.contains("'@clik'"));
        assert!(diag.message.contains("@click"));
    }

    #[test]
    fn unknown_directive_range_covers_token() {
        let line = "<button @clik=\"go\">x</button>";
        let result = check(line);
        let range = result.diagnostics[0].range;
        assert_eq!(&line[range.start_col..range.end_col], "@clik");
    }

    #[test]
    fn modifier_suffix_exempts_base_name() {
        // `@debounce` is not whitelisted, but the `.ms` modifier exempts it
        let result = check("<form @submit.prevent=\"save\" @debounce.ms=\"200\">x</form>\n");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn directive_without_equals_is_ignored() {
        // Not attribute position: no `=` after the name
        let result = check("<p>email @example marker</p>\n");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn bind_on_form_element_is_clean() {
        let result = check("<input #bind=\"name\" />\n<textarea #bind=\"body\"></textarea>\n");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn bind_elsewhere_yields_information() {
        let result = check("<div #bind=\"y\">x</div>\n");
        assert_eq!(result.diagnostics.len(), 1);
        let diag = &result.diagnostics[0];
        assert_eq!(diag.code, codes::BIND_USAGE);
        assert_eq!(diag.severity, Severity::Info);
        assert!(diag.message.contains("input, textarea or select"));
    }

    #[test]
    fn nested_blocks_match_cleanly() {
        let result = check("{#if show}\n{#each items}\n<p>{item}</p>\n{/each}\n{:else}\n<p>none</p>\n{/if}\n");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn mismatched_closing_cites_both_names_and_line() {
        let result = check("{#if x}\n<p>body</p>\n{/for}\n");
        assert_eq!(result.diagnostics.len(), 1);
        let diag = &result.diagnostics[0];
        assert_eq!(diag.code, codes::MISMATCHED_CLOSING_DIRECTIVE);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.range.start_line, 3);
        assert!(diag.message.contains("'{/for}'"));
        assert!(diag.message.contains("'{/if}'"));
        assert!(diag.message.contains("line 1"));
    }

    #[test]
    fn unmatched_closing_errors() {
        let result = check("<p>x</p>\n{/if}\n");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(
            result.diagnostics[0].code,
            codes::UNMATCHED_CLOSING_DIRECTIVE
        );
    }

    #[test]
    fn unknown_block_is_not_pushed() {
        // `{#unless}` is unknown: warned, and the later `{/if}` still pairs
        // with `{#if}`
        let result = check("{#if x}\n{#unless y}\n{/if}\n");
        let codes_seen: Vec<_> = result.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes_seen, vec![codes::UNKNOWN_BLOCK_DIRECTIVE]);
    }

    #[test]
    fn unknown_branch_warns_without_touching_stack() {
        let result = check("{#if x}\n{:otherwise}\n{/if}\n");
        let codes_seen: Vec<_> = result.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes_seen, vec![codes::UNKNOWN_BRANCH_DIRECTIVE]);
    }

    #[test]
    fn unclosed_blocks_reported_bottom_first() {
        let result = check("{#if a}\n{#each items}\n");
        let unclosed: Vec<_> = result
            .diagnostics
            .iter()
            .filter(|d| d.code == codes::UNCLOSED_BLOCK_DIRECTIVE)
            .collect();
        assert_eq!(unclosed.len(), 2);
        assert!(unclosed[0].message.contains("'{#if}'"));
        assert_eq!(unclosed[0].range.start_line, 1);
        assert!(unclosed[1].message.contains("'{#each}'"));
        assert_eq!(unclosed[1].range.start_line, 2);
    }

    #[test]
    fn brace_imbalance_errors_per_line() {
        let result = check("<p>{value</p>\n<p>ok {x}</p>\n<p>}</p>\n");
        let braces: Vec<_> = result
            .diagnostics
            .iter()
            .filter(|d| d.code == codes::UNCLOSED_BRACES)
            .collect();
        assert_eq!(braces.len(), 2);
        assert_eq!(braces[0].range.start_line, 1);
        assert_eq!(braces[1].range.start_line, 3);
    }

    #[test]
    fn start_line_offset_is_applied() {
        let mut result = AnalysisResult::new();
        check_template("{/if}\n", 10, &embedded_spec(), &mut result);
        assert_eq!(result.diagnostics[0].range.start_line, 10);
    }

    #[test]
    fn plain_interpolation_is_not_a_block_tag() {
        let result = check("<p>{value} {other}</p>\n");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn element_listing_reads_naturally() {
        let strings = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(element_list(&strings(&["input"])), "input");
        assert_eq!(
            element_list(&strings(&["input", "textarea", "select"])),
            "input, textarea or select"
        );
    }
}
