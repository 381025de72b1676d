//! Analysis Engine
//!
//! Clean separation of the analysis rules from parsing and LSP concerns.
//! One validator per concern; `engine::analyze_document` runs them all.

pub mod directives;
pub mod engine;
pub mod reactive;
pub mod sink;
pub mod structure;
pub mod style;

pub use engine::{analyze_document, codes, AnalysisResult, Diagnostic, Range, Severity};
pub use sink::DiagnosticSink;
