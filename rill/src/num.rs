//! Numeric types in the RILL binary format.
//!
//! All counts, lengths, and sizes in a RILL module are stored as unsigned LEB128 integers limited to 32 bits. Each byte
//! contributes 7 bits of the value, least significant group first, with the high bit of a byte indicating that another byte
//! follows. An encoding is at most 5 bytes long, and the final byte of a maximum length encoding may only use its low 4 bits.

use std::io::{Read, Write};

/// Error type used when a value is too large to be stored in a RILL module.
#[derive(Clone, Debug, thiserror::Error)]
#[error("the value {0} cannot be encoded as a variable-length integer")]
pub struct IntegerEncodingError(pub(crate) u128);

/// Error type used when a variable-length integer encoding is malformed.
#[derive(Clone, Debug, thiserror::Error)]
#[non_exhaustive]
pub enum IntegerDecodingError {
    #[error("variable-length integer encoding is longer than 5 bytes")]
    TooLong,
    #[error("variable-length integer does not fit in 32 bits")]
    Overflow,
}

/// An unsigned integer stored in a RILL module as a variable-length encoding of 1 to 5 bytes.
///
/// For more details, see the documentation for this module.
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct VarU32(u32);

impl VarU32 {
    pub const MIN: Self = Self(u32::MIN);

    pub const MAX: Self = Self(u32::MAX);

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn from_u8(value: u8) -> Self {
        Self(value as u32)
    }

    pub const fn from_u16(value: u16) -> Self {
        Self(value as u32)
    }

    /// Gets the number of bytes needed to encode this integer value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use rill::num::VarU32;
    /// assert_eq!(VarU32::from_u8(0x7F).byte_length().get(), 1);
    /// assert_eq!(VarU32::from_u8(0x80).byte_length().get(), 2);
    /// assert_eq!(VarU32::MAX.byte_length().get(), 5);
    /// ```
    pub fn byte_length(self) -> std::num::NonZeroU8 {
        let bits = u32::BITS - self.0.leading_zeros();
        // Safety: the computed length is always in the range 1..=5.
        unsafe { std::num::NonZeroU8::new_unchecked(std::cmp::max(1, (bits + 6) / 7) as u8) }
    }

    /// Writes the variable-length encoding of this integer value.
    pub fn write_to<W: Write>(self, mut destination: W) -> std::io::Result<()> {
        let mut value = self.0;
        loop {
            let group = (value & 0x7F) as u8;
            value >>= 7;
            if value == 0 {
                return destination.write_all(&[group]);
            }
            destination.write_all(&[group | 0x80])?;
        }
    }

    /// Reads a variable-length integer value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use rill::num::VarU32;
    /// assert!(matches!(VarU32::read_from([42u8].as_slice()), Ok(Ok(n)) if n.get() == 42));
    /// assert!(matches!(VarU32::read_from([0x80u8].as_slice()), Err(_)));
    /// ```
    pub fn read_from<R: Read>(mut source: R) -> std::io::Result<Result<Self, IntegerDecodingError>> {
        let mut value = 0u32;
        for index in 0u32..5 {
            let byte = {
                let mut buffer = [0u8];
                source.read_exact(&mut buffer)?;
                buffer[0]
            };

            let group = u32::from(byte & 0x7F);
            if index == 4 && group > 0xF {
                return Ok(Err(IntegerDecodingError::Overflow));
            }

            value |= group << (index * 7);

            if byte & 0x80 == 0 {
                return Ok(Ok(Self(value)));
            }
        }

        Ok(Err(IntegerDecodingError::TooLong))
    }
}

macro_rules! integer_format_trait_impl {
    ($trait: ty) => {
        impl $trait for VarU32 {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                <u32 as $trait>::fmt(&self.0, f)
            }
        }
    };
}

integer_format_trait_impl!(std::fmt::Debug);
integer_format_trait_impl!(std::fmt::Display);
integer_format_trait_impl!(std::fmt::UpperHex);
integer_format_trait_impl!(std::fmt::LowerHex);

impl From<u8> for VarU32 {
    #[inline]
    fn from(value: u8) -> Self {
        Self::from_u8(value)
    }
}

impl From<u16> for VarU32 {
    #[inline]
    fn from(value: u16) -> Self {
        Self::from_u16(value)
    }
}

impl From<u32> for VarU32 {
    #[inline]
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<VarU32> for u32 {
    #[inline]
    fn from(value: VarU32) -> u32 {
        value.0
    }
}

impl From<VarU32> for usize {
    fn from(value: VarU32) -> usize {
        // A 32-bit value always fits, the format does not support 16-bit hosts.
        value.0 as usize
    }
}

impl TryFrom<usize> for VarU32 {
    type Error = IntegerEncodingError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map(Self)
            .map_err(|_| IntegerEncodingError(value as u128))
    }
}

impl TryFrom<u64> for VarU32 {
    type Error = IntegerEncodingError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        u32::try_from(value).map(Self).map_err(|_| IntegerEncodingError(value.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::VarU32;

    #[test]
    fn encoding_round_trips_at_group_boundaries() {
        for value in [0u32, 1, 0x7F, 0x80, 0x3FFF, 0x4000, u32::MAX] {
            let mut buffer = Vec::new();
            VarU32::new(value).write_to(&mut buffer).unwrap();
            assert_eq!(buffer.len(), usize::from(VarU32::new(value).byte_length().get()));
            let decoded = VarU32::read_from(buffer.as_slice()).unwrap().unwrap();
            assert_eq!(decoded.get(), value);
        }
    }

    #[test]
    fn overlong_encoding_is_rejected() {
        let overlong = [0x80u8, 0x80, 0x80, 0x80, 0x80, 0x01];
        assert!(matches!(VarU32::read_from(overlong.as_slice()), Ok(Err(_))));
    }
}
