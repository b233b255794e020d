//! Module for the resolution of symbol references within a link session.
//!
//! A reference is a `call` to a mangled name inside the body of a locally defined symbol. Resolution is a read-only
//! walk over the session's symbol table; outcomes never own the symbols they refer to.

use crate::error::LinkError;
use crate::module::Module;
use crate::state::State;
use crate::symbol::{Origin, Symbol};
use rill::identifier::{Id, Identifier};
use rill::instruction::Instruction;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Weak};

/// Indicates where a reference's definition was found, if anywhere.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Status {
    /// The reference matches a symbol defined by the local translation unit.
    Local,
    /// The reference matches a symbol shipped with an imported module. Whether a body is available for cross-module
    /// inlining is a property of the resolved symbol, not of the status.
    External,
    /// No registered module defines the reference. Not fatal; the caller decides between stub emission and aborting.
    Unresolved,
}

/// The outcome of resolving one reference.
#[derive(Clone)]
pub struct Outcome {
    reference: Identifier,
    symbol: Weak<Symbol>,
    status: Status,
}

impl Outcome {
    #[inline]
    pub fn reference(&self) -> &Id {
        &self.reference
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    /// The resolved symbol, or `None` if the reference was unresolved or the session state was dropped.
    pub fn symbol(&self) -> Option<Arc<Symbol>> {
        self.symbol.upgrade()
    }
}

impl Debug for Outcome {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("Outcome")
            .field("reference", &self.reference)
            .field("status", &self.status)
            .finish()
    }
}

impl PartialEq for Outcome {
    fn eq(&self, other: &Self) -> bool {
        self.reference == other.reference && self.status == other.status && self.symbol.ptr_eq(&other.symbol)
    }
}

impl Eq for Outcome {}

/// Resolves a single reference against the session's symbol table.
///
/// Resolution is idempotent: resolving the same reference twice within one session yields identical outcomes.
pub fn resolve(state: &State, reference: &Id) -> Outcome {
    match state.lookup(reference) {
        Some(symbol) => Outcome {
            reference: reference.to_owned(),
            status: match symbol.origin() {
                Origin::Local => Status::Local,
                Origin::Imported => Status::External,
            },
            symbol: Arc::downgrade(&symbol),
        },
        None => Outcome {
            reference: reference.to_owned(),
            symbol: Weak::new(),
            status: Status::Unresolved,
        },
    }
}

/// The diagnostic reported when a translation unit contains references no registered module defines.
///
/// All unresolved references of one link attempt are batched into a single value so a caller sees every missing symbol
/// at once rather than one at a time.
#[derive(Clone, Debug, thiserror::Error)]
pub struct UnresolvedReferenceError {
    references: Box<[Identifier]>,
}

impl UnresolvedReferenceError {
    #[inline]
    pub fn references(&self) -> &[Identifier] {
        &self.references
    }
}

impl std::fmt::Display for UnresolvedReferenceError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str("unresolved references:")?;
        for (index, reference) in self.references.iter().enumerate() {
            write!(f, "{} @{}", if index == 0 { "" } else { "," }, reference)?;
        }
        Ok(())
    }
}

/// The outcomes of resolving every distinct reference of a translation unit, in first-seen order.
#[derive(Debug, Default)]
pub struct Resolution {
    outcomes: Vec<Outcome>,
    index: rustc_hash::FxHashMap<Identifier, usize>,
}

impl Resolution {
    #[inline]
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn get(&self, reference: &Id) -> Option<&Outcome> {
        self.index.get(reference).map(|&position| &self.outcomes[position])
    }

    /// Collects every unresolved reference into one batched diagnostic, or `None` if everything resolved.
    pub fn unresolved(&self) -> Option<UnresolvedReferenceError> {
        let references: Box<[Identifier]> = self
            .outcomes
            .iter()
            .filter(|outcome| outcome.status() == Status::Unresolved)
            .map(|outcome| outcome.reference().to_owned())
            .collect();

        if references.is_empty() {
            None
        } else {
            Some(UnresolvedReferenceError { references })
        }
    }

    fn insert(&mut self, outcome: Outcome) {
        self.index.insert(outcome.reference().to_owned(), self.outcomes.len());
        self.outcomes.push(outcome);
    }
}

/// Walks every local body of the translation unit in declaration order and resolves each distinct reference once.
///
/// # Errors
///
/// Fails only if a local body is malformed or session data was dropped; unresolved references are not errors here.
pub fn resolve_unit(state: &Arc<State>, unit: &Arc<Module>) -> Result<Resolution, LinkError> {
    let mut resolution = Resolution::default();

    for symbol in unit.symbols() {
        if !symbol.body_present() {
            continue;
        }

        for instruction in symbol.instructions()? {
            if let Instruction::Call(callee) = instruction {
                if !resolution.index.contains_key(callee) {
                    resolution.insert(resolve(state, callee));
                }
            }
        }
    }

    Ok(resolution)
}
