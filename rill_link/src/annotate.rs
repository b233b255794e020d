//! Module for the annotation pass that assigns linkage attributes to resolved symbols.
//!
//! Annotation consumes [`Outcome`] values produced by the resolver and decides, for each one, how the symbol appears
//! in the linked module. The records the decisions are computed from are never mutated.

use crate::error::LinkError;
use crate::resolver::{Outcome, Status};
use crate::symbol::Symbol;
use rill::identifier::Identifier;
use rill::linkage::{Attributes, InlinePolicy, Visibility};
use rill::record::Linkage;
use std::sync::Arc;

/// A request made by the optimizer about how aggressively external definitions should be made available for
/// cross-module inlining.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Hint {
    /// Link declarations only; external bodies are not pulled into the output.
    None,
    /// Pull the bodies of referenced external definitions into the output so the optimizer can inline across module
    /// boundaries.
    CrossModuleInline,
}

/// One entry of a linked module: either a fully annotated symbol, or a stub standing in for an unresolved reference.
#[derive(Clone, Debug)]
pub enum Linked {
    Symbol { symbol: Arc<Symbol>, attributes: Attributes },
    Stub { reference: Identifier },
}

impl Linked {
    /// The annotated symbol, or `None` for a stub.
    pub fn symbol(&self) -> Option<&Arc<Symbol>> {
        match self {
            Self::Symbol { symbol, .. } => Some(symbol),
            Self::Stub { .. } => None,
        }
    }

    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            Self::Symbol { attributes, .. } => Some(attributes),
            Self::Stub { .. } => None,
        }
    }
}

/// Annotates a symbol defined by the local translation unit.
///
/// Local definitions keep the linkage and inlining constraints their front-end declared, and are never marked
/// serialized in their own module.
pub fn annotate_definition(symbol: &Arc<Symbol>) -> Linked {
    let visibility = match symbol.declared_linkage() {
        Linkage::Public => Visibility::Public,
        Linkage::Private => Visibility::Private,
    };

    Linked::Symbol {
        symbol: symbol.clone(),
        attributes: Attributes::new(visibility, false, symbol.inline_policy()),
    }
}

/// Annotates the outcome of resolving one reference.
///
/// An external definition whose summary shipped a body is marked serialized only when the optimizer asked for
/// cross-module inlining; the body is decoded eagerly in that case so a malformed body fails the link instead of the
/// later consumer. Thin summaries never become serialized regardless of the hint.
///
/// # Errors
///
/// Fails if the session data backing the outcome was dropped, or if a body selected for serialization is malformed.
pub fn annotate(outcome: &Outcome, hint: Hint) -> Result<Linked, LinkError> {
    match outcome.status() {
        Status::Unresolved => Ok(Linked::Stub {
            reference: outcome.reference().to_owned(),
        }),
        Status::Local => {
            let symbol = upgrade(outcome)?;
            Ok(annotate_definition(&symbol))
        }
        Status::External => {
            let symbol = upgrade(outcome)?;
            let serialized = hint == Hint::CrossModuleInline && symbol.body_present();

            let attributes = if serialized {
                symbol.instructions()?;
                Attributes::new(Visibility::PublicExternal, true, symbol.inline_policy())
            } else if symbol.body_present() {
                Attributes::new(Visibility::PublicExternal, false, symbol.inline_policy())
            } else {
                Attributes::new(Visibility::PublicExternal, false, InlinePolicy::Default)
            };

            Ok(Linked::Symbol { symbol, attributes })
        }
    }
}

fn upgrade(outcome: &Outcome) -> Result<Arc<Symbol>, LinkError> {
    outcome
        .symbol()
        .ok_or_else(|| LinkError::new(crate::error::DroppedError::new(())))
}
