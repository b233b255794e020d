//! Code for interacting with RILL identifiers.
//!
//! Identifiers are used as the mangled names of symbols, which disambiguate overloads and modules in one flat namespace.

use std::borrow::Borrow;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Deref;

/// Represents a RILL identifier, which is a UTF-8 string that cannot be empty or contain any `null` bytes.
///
/// [`Id`] is to [`Identifier`] as [`str`] is to [`String`].
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Identifier(String);

/// Borrowed form of a RILL identifier.
#[derive(Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Id(str);

macro_rules! format_impls {
    ($implementor: ident) => {
        impl Debug for $implementor {
            fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
                Debug::fmt(&self.0, f)
            }
        }

        impl Display for $implementor {
            fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
                Display::fmt(&self.0, f)
            }
        }
    };
}

format_impls!(Identifier);
format_impls!(Id);

#[derive(Clone, Debug, thiserror::Error)]
#[non_exhaustive]
pub enum InvalidIdentifier {
    #[error("identifiers cannot be empty")]
    Empty,
    #[error("identifiers cannot contain null bytes")]
    ContainsNull,
}

/// Error type used when an identifier could not be parsed from raw bytes.
#[derive(Clone, Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidIdentifier),
    #[error(transparent)]
    InvalidSequence(#[from] std::string::FromUtf8Error),
}

impl Id {
    /// Creates a borrowed identifier without validating its contents.
    ///
    /// # Safety
    ///
    /// Callers must ensure the string is not empty and contains no `null` bytes.
    pub unsafe fn from_str_unchecked(identifier: &str) -> &Id {
        std::mem::transmute(identifier)
    }

    pub fn try_from_str(identifier: &str) -> Result<&Id, InvalidIdentifier> {
        <&Id>::try_from(identifier)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl Identifier {
    #[inline]
    pub fn as_id(&self) -> &Id {
        // Safety: contents were validated on construction.
        unsafe { Id::from_str_unchecked(&self.0) }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Interprets the bytes as an identifier, used when parsing the contents of a module.
    pub fn from_utf8(bytes: Vec<u8>) -> Result<Self, ParseError> {
        Ok(Self::try_from(String::from_utf8(bytes)?)?)
    }
}

impl Deref for Identifier {
    type Target = Id;

    fn deref(&self) -> &Id {
        self.as_id()
    }
}

impl Deref for Id {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl From<&Id> for Identifier {
    fn from(identifier: &Id) -> Self {
        Self(identifier.0.to_string())
    }
}

impl Borrow<Id> for Identifier {
    fn borrow(&self) -> &Id {
        self.as_id()
    }
}

impl AsRef<Id> for Identifier {
    fn as_ref(&self) -> &Id {
        self.as_id()
    }
}

impl ToOwned for Id {
    type Owned = Identifier;

    fn to_owned(&self) -> Identifier {
        Identifier::from(self)
    }
}

impl<'a> TryFrom<&'a str> for &'a Id {
    type Error = InvalidIdentifier;

    fn try_from(identifier: &'a str) -> Result<&'a Id, InvalidIdentifier> {
        if identifier.is_empty() {
            Err(InvalidIdentifier::Empty)
        } else if identifier.chars().any(|c| c == '\0') {
            Err(InvalidIdentifier::ContainsNull)
        } else {
            // Safety: validated above.
            Ok(unsafe { Id::from_str_unchecked(identifier) })
        }
    }
}

impl TryFrom<String> for Identifier {
    type Error = InvalidIdentifier;

    fn try_from(identifier: String) -> Result<Self, InvalidIdentifier> {
        <&Id>::try_from(identifier.as_str())?;
        Ok(Self(identifier))
    }
}

impl TryFrom<&str> for Identifier {
    type Error = InvalidIdentifier;

    fn try_from(identifier: &str) -> Result<Self, InvalidIdentifier> {
        <&Id>::try_from(identifier).map(Identifier::from)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        &self.0 == other
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

#[cfg(test)]
mod tests {
    use super::{Id, Identifier, InvalidIdentifier};

    #[test]
    fn empty_identifier_is_rejected() {
        assert!(matches!(Identifier::try_from(String::new()), Err(InvalidIdentifier::Empty)));
    }

    #[test]
    fn identifier_with_null_byte_is_rejected() {
        assert!(matches!(
            <&Id>::try_from("bad\0name"),
            Err(InvalidIdentifier::ContainsNull)
        ));
    }

    #[test]
    fn owned_and_borrowed_forms_hash_identically() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let owned = Identifier::try_from("$s4main3fooyyF").unwrap();
        let borrowed = Id::try_from_str("$s4main3fooyyF").unwrap();

        let hash_of = |value: &dyn Fn(&mut DefaultHasher)| {
            let mut hasher = DefaultHasher::new();
            value(&mut hasher);
            hasher.finish()
        };

        assert_eq!(
            hash_of(&|hasher| owned.hash(hasher)),
            hash_of(&|hasher| borrowed.hash(hasher))
        );
    }
}
