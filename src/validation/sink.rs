//! Diagnostic Sink
//!
//! Ordered diagnostic lists keyed by document identity. Each analysis run
//! replaces a document's list wholesale - there is no merging or patching,
//! so stale diagnostics never outlive a re-analysis.

use std::collections::HashMap;

use super::engine::Diagnostic;

/// Per-document diagnostic storage
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    entries: HashMap<String, Vec<Diagnostic>>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the diagnostic list for a document
    pub fn set(&mut self, document: impl Into<String>, diagnostics: Vec<Diagnostic>) {
        self.entries.insert(document.into(), diagnostics);
    }

    /// Current diagnostics for a document, in analysis order
    pub fn get(&self, document: &str) -> Option<&[Diagnostic]> {
        self.entries.get(document).map(Vec::as_slice)
    }

    /// Drop a document's diagnostics entirely (e.g. when it is closed)
    pub fn remove(&mut self, document: &str) -> Option<Vec<Diagnostic>> {
        self.entries.remove(document)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{codes, Range, Severity};

    fn diagnostic(message: &str) -> Diagnostic {
        Diagnostic {
            range: Range::line_span(1, 10),
            message: message.to_string(),
            severity: Severity::Error,
            code: codes::DUPLICATE_STATE,
        }
    }

    #[test]
    fn set_replaces_not_merges() {
        let mut sink = DiagnosticSink::new();
        sink.set("file:///a.aspc", vec![diagnostic("first"), diagnostic("second")]);
        assert_eq!(sink.get("file:///a.aspc").unwrap().len(), 2);

        sink.set("file:///a.aspc", vec![diagnostic("third")]);
        let current = sink.get("file:///a.aspc").unwrap();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].message, "third");
    }

    #[test]
    fn documents_are_independent() {
        let mut sink = DiagnosticSink::new();
        sink.set("file:///a.aspc", vec![diagnostic("a")]);
        sink.set("file:///b.aspc", Vec::new());

        assert_eq!(sink.get("file:///a.aspc").unwrap().len(), 1);
        assert!(sink.get("file:///b.aspc").unwrap().is_empty());
        assert!(sink.get("file:///c.aspc").is_none());
    }

    #[test]
    fn set_empty_is_distinct_from_remove() {
        let mut sink = DiagnosticSink::new();
        sink.set("file:///a.aspc", vec![diagnostic("a")]);

        sink.set("file:///a.aspc", Vec::new());
        assert!(sink.get("file:///a.aspc").is_some());

        sink.remove("file:///a.aspc");
        assert!(sink.get("file:///a.aspc").is_none());
        assert!(sink.is_empty());
    }
}
