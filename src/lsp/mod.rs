//! LSP Protocol Implementation
//!
//! Clean LSP backend focused only on protocol handling. The analysis core is
//! host-agnostic; the conversion to LSP diagnostic types happens in one
//! adapter in `handlers`.

pub mod backend;
pub mod document;
pub mod handlers;
pub mod server;

pub use backend::Backend;
