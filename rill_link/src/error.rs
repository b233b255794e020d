//! Contains types representing errors encountered during a link session.

use rill::identifier::Identifier;

/// Indicates that a [`Weak`] reference to data is no longer valid since it was dropped.
///
/// In application code, this error is handled by immediately stopping the link as it usually indicates a bug in the
/// caller.
///
/// [`Weak`]: std::sync::Weak
#[derive(Clone, Debug, thiserror::Error)]
#[error("weak reference to data is no longer valid")]
pub struct DroppedError(());

impl DroppedError {
    pub(crate) fn new(x: ()) -> Self {
        Self(x)
    }
}

/// The error type used when decoding the serialized body of a symbol fails.
#[derive(Clone, Debug, thiserror::Error)]
#[error("serialized body of symbol @{name} is malformed: {source}")]
pub struct BodyError {
    name: Identifier,
    #[source]
    source: rill::instruction::DecodeError,
}

impl BodyError {
    pub(crate) fn new(name: Identifier, source: rill::instruction::DecodeError) -> Self {
        Self { name, source }
    }

    #[inline]
    pub fn name(&self) -> &rill::Id {
        &self.name
    }
}

/// The error type used when a body is demanded from a symbol whose summary never shipped one.
#[derive(Clone, Debug, thiserror::Error)]
#[error("symbol @{name} has no serialized body available")]
pub struct MissingBodyError {
    name: Identifier,
}

impl MissingBodyError {
    pub(crate) fn new(name: Identifier) -> Self {
        Self { name }
    }

    #[inline]
    pub fn name(&self) -> &rill::Id {
        &self.name
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LinkErrorKind {
    /// Indicates that data necessary for linking was unexpectedly dropped.
    #[error(transparent)]
    Dropped(#[from] DroppedError),
    /// Used when the binary contents of a module are malformed, which aborts the session for safety.
    #[error(transparent)]
    Malformed(#[from] rill::reader::Error),
    /// Used when two definitions claim the same mangled name; silent shadowing would produce incorrect binaries.
    #[error(transparent)]
    Duplicate(#[from] crate::symbol::DuplicateSymbolError),
    #[error(transparent)]
    MalformedBody(#[from] BodyError),
    #[error(transparent)]
    MissingBody(#[from] MissingBodyError),
}

/// The error type used when a link session fails.
///
/// An error of this kind is fatal: no partially linked output is produced, since linking against incomplete or
/// conflicting inputs is unsafe. Unresolved references are not errors of this kind; they are collected into a
/// [`UnresolvedReferenceError`] batch and surfaced alongside the output instead.
///
/// [`UnresolvedReferenceError`]: crate::resolver::UnresolvedReferenceError
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
#[repr(transparent)]
pub struct LinkError(Box<LinkErrorKind>);

impl LinkError {
    pub fn new<E: Into<LinkErrorKind>>(error: E) -> Self {
        Self(Box::new(error.into()))
    }

    #[inline]
    pub fn kind(&self) -> &LinkErrorKind {
        &self.0
    }
}

impl<E: Into<LinkErrorKind>> From<E> for LinkError {
    fn from(error: E) -> Self {
        Self::new(error)
    }
}

impl From<std::convert::Infallible> for LinkErrorKind {
    fn from(error: std::convert::Infallible) -> Self {
        match error {}
    }
}
