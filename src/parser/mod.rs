//! Component Document Parsing
//!
//! Splitting of raw component text into named sections. Focused solely on
//! boundary extraction - validation lives in `crate::validation`.

pub mod section;
pub mod splitter;

pub use section::{Section, SectionKind, SectionMap};
pub use splitter::{split_document, style_block_span};
