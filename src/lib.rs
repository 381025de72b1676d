//! AspScript Language Server
//!
//! A clean, fast Language Server Protocol implementation for AspScript
//! single-file components.
//!
//! This library provides:
//! - Component section splitting (script / template / style)
//! - Structural, reactive-variable, template-directive and style diagnostics
//! - LSP protocol implementation
//! - Embedded, overridable language definition tables
//! - Configuration management

pub mod config;
pub mod lang;
pub mod lsp;
pub mod parser;
pub mod validation;

// Re-exports for clean public API
pub use config::Config;
pub use lang::{LanguageSpec, LANGUAGE_ID};
pub use parser::{split_document, Section, SectionKind, SectionMap};
pub use validation::{analyze_document, AnalysisResult, Diagnostic, DiagnosticSink, Severity};
