//! Types describing the linkage attributes attached to symbols by a link session.
//!
//! Attributes are computed by the annotation pass of a linker and describe how a symbol is exposed across compilation units
//! in the emitted module. They are never stored back into the symbol records they were computed from.

use std::fmt::{Display, Formatter};

/// Indicates how a linked symbol is exposed to other compilation units.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Visibility {
    /// The symbol is defined in the current module and can be referenced by others.
    Public,
    /// The symbol's definition lives in another module and was linked into the current one.
    PublicExternal,
    /// The symbol is only visible within the current module.
    Private,
}

impl Display for Visibility {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(match self {
            Self::Public => "public",
            Self::PublicExternal => "public_external",
            Self::Private => "private",
        })
    }
}

/// An inlining constraint declared on a symbol or requested by the optimizer.
///
/// The variants are ordered by how explicit the request is, with [`AlwaysInline`] being the strongest.
///
/// [`AlwaysInline`]: InlinePolicy::AlwaysInline
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum InlinePolicy {
    /// No constraint, the optimizer decides.
    Default,
    /// The symbol must not be inlined into its callers.
    NoInline,
    /// The symbol must be inlined into its callers.
    AlwaysInline,
}

impl Default for InlinePolicy {
    #[inline]
    fn default() -> Self {
        Self::Default
    }
}

impl InlinePolicy {
    /// Combines two inlining constraints on the same declaration.
    ///
    /// An explicit request always wins over [`Default`], and an explicit [`AlwaysInline`] is never overridden by
    /// [`NoInline`].
    ///
    /// [`Default`]: InlinePolicy::Default
    /// [`NoInline`]: InlinePolicy::NoInline
    /// [`AlwaysInline`]: InlinePolicy::AlwaysInline
    #[must_use]
    pub fn merge(self, other: InlinePolicy) -> InlinePolicy {
        std::cmp::max(self, other)
    }

    /// Gets the attribute marker used in textual dumps, or `None` if the policy is the default.
    pub fn marker(self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::NoInline => Some("[noinline]"),
            Self::AlwaysInline => Some("[always_inline]"),
        }
    }
}

/// The full set of linkage attributes computed for one linked symbol.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct Attributes {
    pub visibility: Visibility,
    /// Indicates that the symbol's body is shipped alongside its declaration to enable cross-module inlining.
    pub serialized: bool,
    pub inline_policy: InlinePolicy,
}

impl Attributes {
    pub fn new(visibility: Visibility, serialized: bool, inline_policy: InlinePolicy) -> Self {
        Self {
            visibility,
            serialized,
            inline_policy,
        }
    }
}

impl Display for Attributes {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        Display::fmt(&self.visibility, f)?;
        if self.serialized {
            f.write_str(" [serialized]")?;
        }
        if let Some(marker) = self.inline_policy.marker() {
            write!(f, " {}", marker)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Attributes, InlinePolicy, Visibility};

    #[test]
    fn explicit_always_inline_wins_over_noinline() {
        assert_eq!(
            InlinePolicy::NoInline.merge(InlinePolicy::AlwaysInline),
            InlinePolicy::AlwaysInline
        );
        assert_eq!(InlinePolicy::Default.merge(InlinePolicy::NoInline), InlinePolicy::NoInline);
        assert_eq!(InlinePolicy::Default.merge(InlinePolicy::Default), InlinePolicy::Default);
    }

    #[test]
    fn attributes_render_dump_syntax() {
        let attributes = Attributes::new(Visibility::PublicExternal, true, InlinePolicy::NoInline);
        assert_eq!(attributes.to_string(), "public_external [serialized] [noinline]");
        assert_eq!(
            Attributes::new(Visibility::Public, false, InlinePolicy::Default).to_string(),
            "public"
        );
    }
}
