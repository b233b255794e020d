//! The in-memory contents of a RILL module.

use crate::identifier::Id;
use crate::record::{ModuleIdentifier, SymbolRecord};
use crate::versioning::SupportedFormat;

/// The deserialized contents of a module: its identity and one summary per exported entity, in the order the producing
/// compilation stage emitted them. A module is immutable once deserialized within a link session.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Contents {
    pub format_version: SupportedFormat,
    pub identifier: ModuleIdentifier<'static>,
    pub symbols: Vec<SymbolRecord<'static>>,
}

impl Contents {
    pub fn new(identifier: ModuleIdentifier<'static>) -> Self {
        Self {
            format_version: SupportedFormat::CURRENT,
            identifier,
            symbols: Vec::new(),
        }
    }

    pub fn find_symbol(&self, name: &Id) -> Option<&SymbolRecord<'static>> {
        self.symbols.iter().find(|symbol| symbol.name() == name)
    }
}
