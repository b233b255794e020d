//! Library for loading RILL modules and linking their symbol references across module boundaries.
//!
//! A link session deserializes a set of imported module summaries and one local translation unit, resolves every symbol
//! reference in the unit against a per-session symbol table, computes linkage attributes for each resolved symbol, and
//! emits the linked result in textual or binary form.
//!
//! The types provided by this crate are thread-safe so that independent link sessions can run on separate threads; a
//! single session proceeds synchronously with no shared state between sessions.

mod state;

pub mod annotate;
pub mod emit;
pub mod error;
pub mod module;
pub mod resolver;
pub mod source;
pub mod symbol;

pub use annotate::Hint;
pub use error::LinkError;
pub use source::Source;
pub use state::{link, Output, State};
