//! Reactive Variable Analysis
//!
//! Line-by-line scan of the script section: duplicate state/computed/function
//! declarations and `$state(` used without `let`. The three symbol sets are
//! scoped to a single call - no memory across runs, even for the same
//! document.
//!
//! The declaration patterns are shared with the symbol and definition
//! providers, which re-derive declaration sites independently.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::engine::{codes, AnalysisResult, Range};

/// `let <name> = $state(`
pub static STATE_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"let\s+(\w+)\s*=\s*\$state\s*\(").unwrap());

/// `$: <name> =` anchored at line start after optional whitespace
pub static COMPUTED_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\$:\s*(\w+)\s*=").unwrap());

/// `function <name>(`
pub static FUNCTION_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"function\s+(\w+)\s*\(").unwrap());

/// Exported props/emits declarations are host-facing and exempt from the
/// duplicate and misuse checks
static EXPORT_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*export\s+(?:let|const|function)\b").unwrap());

/// Scan the script section. `start_line` is the 1-indexed document line of
/// the section's first line.
pub fn check_script(content: &str, start_line: usize, result: &mut AnalysisResult) {
    let mut state_vars: HashSet<String> = HashSet::new();
    let mut computed_vars: HashSet<String> = HashSet::new();
    let mut functions: HashSet<String> = HashSet::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = start_line + idx;

        if EXPORT_DECL.is_match(line) {
            continue;
        }

        if let Some(caps) = STATE_DECL.captures(line) {
            let name = &caps[1];
            // Repeat occurrences error; the name is recorded either way so a
            // third occurrence errors again
            if !state_vars.insert(name.to_string()) {
                result.add_error(
                    Range::line_span(line_no, line.len()),
                    codes::DUPLICATE_STATE,
                    format!(
                        "Duplicate state variable '{name}'. Each state variable must have a unique name."
                    ),
                );
            }
        }

        if let Some(caps) = COMPUTED_DECL.captures(line) {
            let name = &caps[1];
            if !computed_vars.insert(name.to_string()) {
                result.add_error(
                    Range::line_span(line_no, line.len()),
                    codes::DUPLICATE_COMPUTED,
                    format!("Duplicate computed variable '{name}'."),
                );
            }
        }

        if let Some(caps) = FUNCTION_DECL.captures(line) {
            let name = &caps[1];
            if !functions.insert(name.to_string()) {
                result.add_error(
                    Range::line_span(line_no, line.len()),
                    codes::DUPLICATE_FUNCTION,
                    format!("Duplicate function '{name}'."),
                );
            }
        }

        if let Some(pos) = line.find("$state(") {
            if !line.contains("let ") && !is_commented(line, pos) {
                result.add_warning(
                    Range::line_span(line_no, line.len()),
                    codes::STATE_WITHOUT_LET,
                    "$state must be used with \"let\" keyword: let variable = $state(value)"
                        .to_string(),
                );
            }
        }
    }
}

/// Declaration site of `name` in script content: 0-indexed line and byte
/// column of the identifier. Used by the definition provider.
pub fn find_declaration(content: &str, name: &str) -> Option<(usize, usize)> {
    for (idx, line) in content.lines().enumerate() {
        for re in [&*STATE_DECL, &*COMPUTED_DECL, &*FUNCTION_DECL] {
            if let Some(caps) = re.captures(line) {
                let m = caps.get(1).unwrap();
                if m.as_str() == name {
                    return Some((idx, m.start()));
                }
            }
        }
    }
    None
}

/// True when the `$state(` occurrence at `pos` sits in a comment
fn is_commented(line: &str, pos: usize) -> bool {
    if line.trim_start().starts_with("//") {
        return true;
    }
    let before = &line[..pos];
    before.contains("//") || before.contains("/*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Severity;

    fn check(content: &str) -> AnalysisResult {
        let mut result = AnalysisResult::new();
        check_script(content, 1, &mut result);
        result
    }

    #[test]
    fn unique_declarations_are_clean() {
        let result = check("let a = $state(0)\nlet b = $state(1)\n$: c = a + b\nfunction d() {}\n");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn duplicate_state_errors_on_repeat_line() {
        let result = check("let a = $state(0)\nlet a = $state(1)\n");
        assert_eq!(result.diagnostics.len(), 1);
        let diag = &result.diagnostics[0];
        assert_eq!(diag.code, codes::DUPLICATE_STATE);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.range.start_line, 2);
        assert!(diag.message.contains("'a'"));
    }

    #[test]
    fn n_occurrences_yield_n_minus_one_errors() {
        let result = check("let a = $state(0)\nlet a = $state(1)\nlet a = $state(2)\n");
        let dupes: Vec<_> = result
            .diagnostics
            .iter()
            .filter(|d| d.code == codes::DUPLICATE_STATE)
            .collect();
        assert_eq!(dupes.len(), 2);
        assert_eq!(dupes[0].range.start_line, 2);
        assert_eq!(dupes[1].range.start_line, 3);
    }

    #[test]
    fn start_line_offset_is_applied() {
        let mut result = AnalysisResult::new();
        check_script("let a = $state(0)\nlet a = $state(1)\n", 5, &mut result);
        assert_eq!(result.diagnostics[0].range.start_line, 6);
    }

    #[test]
    fn duplicate_computed_has_own_set() {
        // `a` as state and `a` as computed do not collide
        let result = check("let a = $state(0)\n$: a = 1\n$: a = 2\n");
        let codes_seen: Vec<_> = result.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes_seen, vec![codes::DUPLICATE_COMPUTED]);
    }

    #[test]
    fn duplicate_function_has_distinct_code() {
        let result = check("function go() {}\nfunction go() {}\n");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].code, codes::DUPLICATE_FUNCTION);
    }

    #[test]
    fn state_without_let_warns() {
        let result = check("count = $state(0)\n");
        assert_eq!(result.diagnostics.len(), 1);
        let diag = &result.diagnostics[0];
        assert_eq!(diag.code, codes::STATE_WITHOUT_LET);
        assert_eq!(diag.severity, Severity::Warning);
    }

    #[test]
    fn commented_state_does_not_warn() {
        let result = check("// count = $state(0)\n  // x = $state(1)\nlet y = 1 /* $state(2) */\n");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn inline_comment_before_state_does_not_warn() {
        let result = check("doWork() // then: x = $state(0)\n");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn export_declarations_are_exempt() {
        let result = check("export let title = $state('')\nexport let title = $state('')\n");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn find_declaration_locates_each_family() {
        let content = "let a = $state(0)\n$: b = a * 2\nfunction go() {}\n";
        assert_eq!(find_declaration(content, "a"), Some((0, 4)));
        assert_eq!(find_declaration(content, "b"), Some((1, 3)));
        assert_eq!(find_declaration(content, "go"), Some((2, 9)));
        assert_eq!(find_declaration(content, "missing"), None);
    }
}
