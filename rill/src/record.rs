//! Types that represent the symbol summaries stored in a RILL module.

use crate::identifier::{Id, Identifier};
use crate::instruction::{self, Instruction};
use crate::linkage::InlinePolicy;
use std::borrow::Cow;

/// Indicates the kind of entity a symbol refers to.
///
/// The set of IR entity kinds is fixed, so it is modeled as a closed tagged variant rather than an open hierarchy.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum SymbolKind {
    Function = 0,
    Type = 1,
    Global = 2,
}

/// The linkage declared on a definition by the front-end that produced it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Linkage {
    /// The definition can be referenced from other modules.
    Public,
    /// The definition is only referenceable within its own module.
    Private,
}

impl Default for Linkage {
    #[inline]
    fn default() -> Self {
        Self::Public
    }
}

bitflags::bitflags! {
    /// The flag byte stored at the start of every encoded symbol record.
    #[repr(transparent)]
    pub struct SymbolFlags: u8 {
        const KIND_MASK = 0b0000_0011;
        const KIND_FUNCTION = 0;
        const KIND_TYPE = 0b0000_0001;
        const KIND_GLOBAL = 0b0000_0010;
        const EXPORTED = 0b0000_0100;
        const HAS_BODY = 0b0000_1000;
        const NO_INLINE = 0b0001_0000;
        const ALWAYS_INLINE = 0b0010_0000;
    }
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("{value:#02X} is not a valid symbol flags combination")]
pub struct InvalidFlagsError {
    value: u8,
}

impl SymbolFlags {
    pub fn kind(self) -> Result<SymbolKind, InvalidFlagsError> {
        match (self & Self::KIND_MASK).bits() {
            0 => Ok(SymbolKind::Function),
            1 => Ok(SymbolKind::Type),
            2 => Ok(SymbolKind::Global),
            _ => Err(InvalidFlagsError { value: self.bits() }),
        }
    }

    pub fn linkage(self) -> Linkage {
        if self.contains(Self::EXPORTED) {
            Linkage::Public
        } else {
            Linkage::Private
        }
    }

    pub fn inline_policy(self) -> Result<InlinePolicy, InvalidFlagsError> {
        match (self.contains(Self::NO_INLINE), self.contains(Self::ALWAYS_INLINE)) {
            (false, false) => Ok(InlinePolicy::Default),
            (true, false) => Ok(InlinePolicy::NoInline),
            (false, true) => Ok(InlinePolicy::AlwaysInline),
            (true, true) => Err(InvalidFlagsError { value: self.bits() }),
        }
    }

    pub fn from_byte(value: u8) -> Result<Self, InvalidFlagsError> {
        let flags = Self::from_bits(value).ok_or(InvalidFlagsError { value })?;
        flags.kind()?;
        flags.inline_policy()?;
        Ok(flags)
    }
}

/// The serialized body of a definition, kept in its encoded form until the instructions are actually needed.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct Body<'data>(Cow<'data, [u8]>);

impl<'data> Body<'data> {
    pub fn from_encoded<B: Into<Cow<'data, [u8]>>>(bytes: B) -> Self {
        Self(bytes.into())
    }

    /// Encodes the instructions into a new body.
    pub fn from_instructions(instructions: &[Instruction]) -> std::io::Result<Body<'static>> {
        let mut bytes = Vec::new();
        for instruction in instructions {
            instruction.write_to(&mut bytes)?;
        }
        Ok(Body(Cow::Owned(bytes)))
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    /// Decodes the instructions that make up this body.
    pub fn decode(&self) -> Result<Vec<Instruction>, instruction::DecodeError> {
        instruction::decode_all(&self.0)
    }

    pub fn into_owned(self) -> Body<'static> {
        Body(Cow::Owned(self.0.into_owned()))
    }
}

/// A summary of one exported entity of a module.
///
/// Records are created during deserialization or local compilation and are never mutated afterwards; linkage attributes
/// computed by an annotation pass are separate output, not written back into the record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SymbolRecord<'data> {
    name: Cow<'data, Id>,
    kind: SymbolKind,
    linkage: Linkage,
    inline_policy: InlinePolicy,
    body: Option<Body<'data>>,
}

impl<'data> SymbolRecord<'data> {
    pub fn new(
        name: Cow<'data, Id>,
        kind: SymbolKind,
        linkage: Linkage,
        inline_policy: InlinePolicy,
        body: Option<Body<'data>>,
    ) -> Self {
        Self {
            name,
            kind,
            linkage,
            inline_policy,
            body,
        }
    }

    /// Creates a bodiless function record with the default inline policy.
    pub fn function(name: Cow<'data, Id>, linkage: Linkage) -> Self {
        Self::new(name, SymbolKind::Function, linkage, InlinePolicy::Default, None)
    }

    #[must_use]
    pub fn with_body(mut self, body: Body<'data>) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_inline_policy(mut self, inline_policy: InlinePolicy) -> Self {
        self.inline_policy = inline_policy;
        self
    }

    #[inline]
    pub fn name(&self) -> &Id {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    #[inline]
    pub fn linkage(&self) -> Linkage {
        self.linkage
    }

    #[inline]
    pub fn inline_policy(&self) -> InlinePolicy {
        self.inline_policy
    }

    #[inline]
    pub fn body(&self) -> Option<&Body<'data>> {
        self.body.as_ref()
    }

    /// Returns `true` if the summary shipped with a serialized body, distinguishing full summaries from thin ones.
    #[inline]
    pub fn body_present(&self) -> bool {
        self.body.is_some()
    }

    /// Gets the flag byte stored in the binary form of this record.
    pub fn flags(&self) -> SymbolFlags {
        let mut flags = match self.kind {
            SymbolKind::Function => SymbolFlags::KIND_FUNCTION,
            SymbolKind::Type => SymbolFlags::KIND_TYPE,
            SymbolKind::Global => SymbolFlags::KIND_GLOBAL,
        };

        if self.linkage == Linkage::Public {
            flags |= SymbolFlags::EXPORTED;
        }

        if self.body.is_some() {
            flags |= SymbolFlags::HAS_BODY;
        }

        match self.inline_policy {
            InlinePolicy::Default => (),
            InlinePolicy::NoInline => flags |= SymbolFlags::NO_INLINE,
            InlinePolicy::AlwaysInline => flags |= SymbolFlags::ALWAYS_INLINE,
        }

        flags
    }

    pub fn into_owned(self) -> SymbolRecord<'static> {
        SymbolRecord {
            name: Cow::Owned(self.name.into_owned()),
            kind: self.kind,
            linkage: self.linkage,
            inline_policy: self.inline_policy,
            body: self.body.map(Body::into_owned),
        }
    }
}

/// Specifies the name of a module and the link name used for downstream native linking.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub struct ModuleIdentifier<'data> {
    name: Cow<'data, Id>,
    link_name: Cow<'data, Id>,
}

impl<'data> ModuleIdentifier<'data> {
    pub fn new(name: Cow<'data, Id>, link_name: Cow<'data, Id>) -> Self {
        Self { name, link_name }
    }

    pub fn new_owned(name: Identifier, link_name: Identifier) -> Self {
        Self::new(Cow::Owned(name), Cow::Owned(link_name))
    }

    pub fn new_borrowed(name: &'data Id, link_name: &'data Id) -> Self {
        Self::new(Cow::Borrowed(name), Cow::Borrowed(link_name))
    }

    #[inline]
    pub fn name(&self) -> &Id {
        &self.name
    }

    #[inline]
    pub fn link_name(&self) -> &Id {
        &self.link_name
    }

    pub fn into_owned(self) -> ModuleIdentifier<'static> {
        ModuleIdentifier {
            name: Cow::Owned(self.name.into_owned()),
            link_name: Cow::Owned(self.link_name.into_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[test]
    fn size_of_record_is_acceptable() {
        assert!(std::mem::size_of::<SymbolRecord>() <= 96)
    }

    #[test]
    fn flag_byte_round_trips() {
        let name = crate::Id::try_from_str("$s4core3fooyyF").unwrap();
        let record = SymbolRecord::function(Cow::Borrowed(name), Linkage::Public)
            .with_inline_policy(crate::linkage::InlinePolicy::NoInline)
            .with_body(Body::from_encoded(vec![1u8]));

        let flags = SymbolFlags::from_byte(record.flags().bits()).unwrap();
        assert_eq!(flags.kind().unwrap(), SymbolKind::Function);
        assert_eq!(flags.linkage(), Linkage::Public);
        assert!(flags.contains(SymbolFlags::HAS_BODY));
        assert_eq!(flags.inline_policy().unwrap(), crate::linkage::InlinePolicy::NoInline);
    }

    #[test]
    fn conflicting_inline_flags_are_rejected() {
        let bits = (SymbolFlags::NO_INLINE | SymbolFlags::ALWAYS_INLINE).bits();
        assert!(SymbolFlags::from_byte(bits).is_err());
    }
}
