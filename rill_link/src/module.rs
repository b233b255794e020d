//! Module for interacting with RILL modules loaded into a link session.

use crate::error::{DroppedError, LinkError};
use crate::state::State;
use crate::symbol::{Origin, Symbol};
use std::borrow::Borrow;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Weak};

pub type ModuleIdentifier = rill::record::ModuleIdentifier<'static>;

/// A module registered with a link session, either the local translation unit or an imported dependency.
pub struct Module {
    state: Weak<State>,
    identifier: ModuleIdentifier,
    origin: Origin,
    symbols: Box<[Arc<Symbol>]>,
}

impl Module {
    pub(crate) fn from_contents(contents: rill::module::Contents, origin: Origin, state: Weak<State>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            state,
            identifier: contents.identifier,
            origin,
            symbols: contents
                .symbols
                .into_iter()
                .map(|record| Symbol::new(record, origin, this.clone()))
                .collect(),
        })
    }

    /// Attempts to upgrade a [`Weak`] pointer to a [`Module`], returning a [`LinkError`] if the module was dropped.
    ///
    /// Use this function when a reference to a module is required to do something.
    ///
    /// [`Weak`]: std::sync::Weak
    pub fn upgrade_weak(this: &Weak<Self>) -> Result<Arc<Self>, LinkError> {
        this.upgrade().ok_or_else(|| LinkError::new(DroppedError::new(())))
    }

    pub fn state(&self) -> &Weak<State> {
        &self.state
    }

    #[inline]
    pub fn identifier(&self) -> &ModuleIdentifier {
        &self.identifier
    }

    #[inline]
    pub fn name(&self) -> &rill::Id {
        self.identifier.name()
    }

    /// The name this module is given to the downstream native linker.
    #[inline]
    pub fn link_name(&self) -> &rill::Id {
        self.identifier.link_name()
    }

    #[inline]
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// The module's symbols, in the order the producing compilation stage emitted them.
    #[inline]
    pub fn symbols(&self) -> &[Arc<Symbol>] {
        &self.symbols
    }
}

impl Debug for Module {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("identifier", &self.identifier)
            .field("origin", &self.origin)
            .field("symbols", &self.symbols)
            .finish()
    }
}

impl std::cmp::PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl std::cmp::Eq for Module {}

pub(crate) fn module_weak_eq(a: &Weak<Module>, b: &Weak<Module>) -> bool {
    a.ptr_eq(b) || a.upgrade().zip(b.upgrade()).map_or(false, |(a, b)| a == b)
}

/// Helper struct for displaying the name and link name of a [`Module`] using [`Display`].
///
/// [`Display`]: std::fmt::Display
#[repr(transparent)]
pub struct Display<'a>(&'a Module);

impl<'a, T: Borrow<Module>> From<&'a T> for Display<'a> {
    fn from(reference: &'a T) -> Self {
        Self(reference.borrow())
    }
}

impl Debug for Display<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        Debug::fmt(self.0.identifier(), f)
    }
}

impl std::fmt::Display for Display<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} (links as {})", self.0.name(), self.0.link_name())
    }
}
