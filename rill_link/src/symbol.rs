//! Module for interacting with the symbols known to a link session.

use crate::error::{BodyError, LinkError, MissingBodyError};
use crate::module::{self, Module};
use rill::identifier::{Id, Identifier};
use rill::instruction::Instruction;
use rill::linkage::InlinePolicy;
use rill::record::{Linkage, SymbolKind, SymbolRecord};
use std::borrow::Borrow;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

/// Indicates whether a symbol was defined by the local translation unit or shipped with an imported module.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Origin {
    Local,
    Imported,
}

impl Display for Origin {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(match self {
            Self::Local => "local",
            Self::Imported => "imported",
        })
    }
}

/// A symbol registered with a link session.
///
/// Symbols are immutable for the duration of the session; the instructions of a serialized body are decoded at most
/// once, on first demand.
pub struct Symbol {
    record: SymbolRecord<'static>,
    origin: Origin,
    module: Weak<Module>,
    instructions: lazy_init::Lazy<Result<Box<[Instruction]>, BodyError>>,
}

impl Symbol {
    pub(crate) fn new(record: SymbolRecord<'static>, origin: Origin, module: Weak<Module>) -> Arc<Self> {
        Arc::new(Self {
            record,
            origin,
            module,
            instructions: lazy_init::Lazy::new(),
        })
    }

    #[inline]
    pub fn name(&self) -> &Id {
        self.record.name()
    }

    #[inline]
    pub fn kind(&self) -> SymbolKind {
        self.record.kind()
    }

    #[inline]
    pub fn origin(&self) -> Origin {
        self.origin
    }

    #[inline]
    pub fn declared_linkage(&self) -> Linkage {
        self.record.linkage()
    }

    pub fn is_exported(&self) -> bool {
        self.record.linkage() == Linkage::Public
    }

    #[inline]
    pub fn inline_policy(&self) -> InlinePolicy {
        self.record.inline_policy()
    }

    /// Returns `true` if the symbol's summary shipped with a serialized body.
    #[inline]
    pub fn body_present(&self) -> bool {
        self.record.body_present()
    }

    #[inline]
    pub fn record(&self) -> &SymbolRecord<'static> {
        &self.record
    }

    pub fn module(&self) -> &Weak<Module> {
        &self.module
    }

    /// Decodes the symbol's serialized body, caching the instructions for subsequent calls.
    ///
    /// # Errors
    ///
    /// Fails if the summary never shipped a body, or if the encoded body is malformed.
    pub fn instructions(&self) -> Result<&[Instruction], LinkError> {
        let body = match self.record.body() {
            Some(body) => body,
            None => return Err(MissingBodyError::new(self.name().to_owned()).into()),
        };

        self.instructions
            .get_or_create(|| {
                body.decode()
                    .map(Vec::into_boxed_slice)
                    .map_err(|error| BodyError::new(self.name().to_owned(), error))
            })
            .as_ref()
            .map(|instructions| &instructions[..])
            .map_err(|error| LinkError::new(error.clone()))
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("Symbol")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .field("origin", &self.origin)
            .finish()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name() && module::module_weak_eq(self.module(), other.module())
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state)
    }
}

impl Borrow<Id> for Symbol {
    fn borrow(&self) -> &Id {
        self.name()
    }
}

/// The error type used when two definitions claim the same mangled name within one link session.
#[derive(Clone, Debug, thiserror::Error)]
#[error("duplicate symbol @{name}: {duplicate} definition conflicts with existing {existing} definition")]
pub struct DuplicateSymbolError {
    name: Identifier,
    existing: Origin,
    duplicate: Origin,
}

impl DuplicateSymbolError {
    pub(crate) fn new(name: Identifier, existing: Origin, duplicate: Origin) -> Self {
        Self {
            name,
            existing,
            duplicate,
        }
    }

    #[inline]
    pub fn name(&self) -> &Id {
        &self.name
    }

    #[inline]
    pub fn existing(&self) -> Origin {
        self.existing
    }

    #[inline]
    pub fn duplicate(&self) -> Origin {
        self.duplicate
    }
}

/// The symbol table of a link session, mapping mangled names to symbols across every registered module.
#[derive(Debug, Default)]
pub struct Lookup {
    symbols: rustc_hash::FxHashMap<Identifier, Arc<Symbol>>,
}

impl Lookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts all of a module's symbols into the table.
    ///
    /// # Errors
    ///
    /// Fails with a [`DuplicateSymbolError`] if any mangled name is already present; nothing is inserted in that case,
    /// since silent shadowing would produce incorrect binaries.
    pub fn register(&mut self, module: &Arc<Module>) -> Result<(), DuplicateSymbolError> {
        for (index, symbol) in module.symbols().iter().enumerate() {
            let clash = self
                .symbols
                .get(symbol.name())
                .map(|existing| existing.origin())
                .or_else(|| {
                    module.symbols()[..index]
                        .iter()
                        .find(|earlier| earlier.name() == symbol.name())
                        .map(|earlier| earlier.origin())
                });

            if let Some(existing) = clash {
                return Err(DuplicateSymbolError::new(symbol.name().to_owned(), existing, symbol.origin()));
            }
        }

        for symbol in module.symbols() {
            self.symbols.insert(symbol.name().to_owned(), symbol.clone());
        }

        Ok(())
    }

    /// Looks up a symbol by mangled name. Absence is not an error.
    pub fn get(&self, name: &Id) -> Option<&Arc<Symbol>> {
        self.symbols.get(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Lookup, Origin};
    use crate::module::Module;
    use rill::identifier::Identifier;
    use rill::record::Linkage;
    use std::sync::Weak;

    fn name(s: &str) -> Identifier {
        Identifier::try_from(s).unwrap()
    }

    #[test]
    fn register_inserts_every_symbol_of_a_module() {
        let contents = rill_samples::translation_unit_with_helper(
            name("main"),
            name("main"),
            name("$s4main6helperyyF"),
            &[],
        )
        .into_contents();

        let module = Module::from_contents(contents, Origin::Local, Weak::new());
        let mut lookup = Lookup::new();
        assert!(lookup.is_empty());

        lookup.register(&module).unwrap();

        assert_eq!(lookup.len(), 2);
        assert!(!lookup.is_empty());
        assert_eq!(lookup.get(&name("main")).unwrap().name(), "main");
        assert_eq!(
            lookup.get(&name("$s4main6helperyyF")).unwrap().declared_linkage(),
            Linkage::Private
        );
    }
}
