//! Module for the state of a link session.

use crate::annotate::{self, Hint, Linked};
use crate::error::{LinkError, LinkErrorKind};
use crate::module::{Module, ModuleIdentifier};
use crate::resolver::{self, Status, UnresolvedReferenceError};
use crate::source::Source;
use crate::symbol::{self, Origin, Symbol};
use rill::identifier::Id;
use std::sync::{Arc, Mutex};

/// The state of a link session, containing every registered module and the symbol table built from them.
///
/// Modules are registered one at a time and stay registered for the lifetime of the session; the same state can serve
/// multiple [`link`] calls against different translation units.
pub struct State {
    modules: Mutex<Vec<Arc<Module>>>,
    symbols: Mutex<symbol::Lookup>,
}

impl State {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            modules: Mutex::new(Vec::new()),
            symbols: Mutex::new(symbol::Lookup::new()),
        })
    }

    /// Reads a module from a source and registers its symbols with the session.
    ///
    /// # Errors
    ///
    /// Fails if the source's contents are malformed, or if any of the module's symbols clashes with a name that is
    /// already registered. A module that fails registration contributes nothing to the session.
    pub fn load_module<S>(self: &Arc<Self>, source: S, origin: Origin) -> Result<Arc<Module>, LinkError>
    where
        S: Source,
        S::Error: Into<LinkErrorKind>,
    {
        let contents = source.read_contents().map_err(LinkError::new)?;
        let module = Module::from_contents(contents, origin, Arc::downgrade(self));
        self.symbols.lock().unwrap().register(&module)?;
        self.modules.lock().unwrap().push(module.clone());
        Ok(module)
    }

    /// Registers an imported dependency, making its symbols available for reference resolution.
    pub fn load_import<S>(self: &Arc<Self>, source: S) -> Result<Arc<Module>, LinkError>
    where
        S: Source,
        S::Error: Into<LinkErrorKind>,
    {
        self.load_module(source, Origin::Imported)
    }

    /// Registers the translation unit whose references are to be linked.
    pub fn load_translation_unit<S>(self: &Arc<Self>, source: S) -> Result<Arc<Module>, LinkError>
    where
        S: Source,
        S::Error: Into<LinkErrorKind>,
    {
        self.load_module(source, Origin::Local)
    }

    /// Looks up a symbol by mangled name across every registered module.
    pub fn lookup(&self, name: &Id) -> Option<Arc<Symbol>> {
        self.symbols.lock().unwrap().get(name).cloned()
    }

    /// A snapshot of the registered modules, in registration order.
    pub fn modules(&self) -> Vec<Arc<Module>> {
        self.modules.lock().unwrap().clone()
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("State")
            .field("modules", &self.modules.lock().unwrap())
            .finish()
    }
}

/// The result of linking one translation unit.
#[derive(Debug)]
#[non_exhaustive]
pub struct Output {
    /// The identifier of the translation unit the output was linked from.
    pub identifier: ModuleIdentifier,
    /// The linked symbols: local definitions in declaration order, then referenced external symbols grouped by the
    /// module that defines them, then stubs for unresolved references.
    pub symbols: Vec<Linked>,
    /// The batched unresolved reference diagnostic, or `None` if every reference resolved.
    pub unresolved: Option<UnresolvedReferenceError>,
}

/// Links a translation unit against the modules registered with a session.
///
/// Every distinct reference of the unit is resolved once; resolved external symbols are annotated according to the
/// inlining hint, and unresolved references become stubs reported alongside the output rather than failing the link.
///
/// # Errors
///
/// Fails if a serialized body selected by the hint is malformed, or if session data was dropped mid-link.
pub fn link(state: &Arc<State>, unit: &Arc<Module>, hint: Hint) -> Result<Output, LinkError> {
    let resolution = resolver::resolve_unit(state, unit)?;
    let mut symbols = Vec::with_capacity(unit.symbols().len() + resolution.outcomes().len());

    for symbol in unit.symbols() {
        symbols.push(annotate::annotate_definition(symbol));
    }

    // Referenced external symbols are grouped by defining module so the output is stable regardless of the order the
    // unit's bodies mention them.
    for module in state.modules() {
        if module.origin() != Origin::Imported {
            continue;
        }

        for symbol in module.symbols() {
            if let Some(outcome) = resolution.get(symbol.name()) {
                if outcome.status() == Status::External {
                    symbols.push(annotate::annotate(outcome, hint)?);
                }
            }
        }
    }

    for outcome in resolution.outcomes() {
        if outcome.status() == Status::Unresolved {
            symbols.push(annotate::annotate(outcome, hint)?);
        }
    }

    Ok(Output {
        identifier: unit.identifier().clone(),
        symbols,
        unresolved: resolution.unresolved(),
    })
}
