//! Contains types for reading and writing RILL modules.

pub mod binary;
pub mod builder;
pub mod identifier;
pub mod instruction;
pub mod linkage;
pub mod module;
pub mod num;
pub mod reader;
pub mod record;
pub mod versioning;
pub mod writer;

pub use identifier::{Id, Identifier};
