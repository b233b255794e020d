//! Low-level API to read the binary contents of a RILL module.
//!
//! Reading produces the module's symbol summaries without decoding any serialized bodies; bodies stay in their encoded
//! form until a consumer asks for their instructions.

use crate::binary;
use crate::identifier::{self, Identifier};
use crate::module;
use crate::num;
use crate::record::{self, Body, ModuleIdentifier, SymbolRecord};
use crate::versioning;
use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::io::Read;

/// Used when the magic value indicating the start of a RILL module is invalid.
#[derive(Clone, Debug)]
pub struct InvalidMagicError {
    actual: Box<[u8]>,
}

impl InvalidMagicError {
    fn new<A: Into<Box<[u8]>>>(actual: A) -> Self {
        Self { actual: actual.into() }
    }

    #[inline]
    pub fn actual_bytes(&self) -> &[u8] {
        &self.actual
    }
}

impl Display for InvalidMagicError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "expected magic {:?}, but got {:?}", binary::MAGIC, self.actual_bytes())
    }
}

impl std::error::Error for InvalidMagicError {}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    #[error(transparent)]
    InvalidMagic(#[from] InvalidMagicError),
    #[error("expected format version")]
    MissingFormatVersion,
    #[error(transparent)]
    UnsupportedFormatVersion(#[from] versioning::UnsupportedFormatError),
    #[error(transparent)]
    InvalidInteger(#[from] num::IntegerDecodingError),
    #[error("expected flag byte of symbol record")]
    MissingSymbolFlags,
    #[error(transparent)]
    InvalidSymbolFlags(#[from] record::InvalidFlagsError),
    #[error(transparent)]
    InvalidIdentifier(#[from] identifier::ParseError),
    #[error("expected {expected_size} bytes for {name} but got {actual_size}")]
    UnexpectedEndOfData {
        name: &'static str,
        expected_size: usize,
        actual_size: usize,
    },
    #[error("expected end of file")]
    ExpectedEOF,
    #[error(transparent)]
    IO(#[from] std::io::Error),
}

/// The error type used when a module's binary contents are malformed or truncated.
///
/// An error of this kind is fatal for the module it describes; a link session that encounters one aborts rather than
/// linking against partially read contents.
#[derive(Debug, thiserror::Error)]
pub struct Error {
    kind: Box<ErrorKind>,
    offset: usize,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "error occured at offset {:#X}: {}", self.offset, self.kind)
    }
}

impl Error {
    pub(crate) fn new<E: Into<ErrorKind>>(error: E, offset: usize) -> Self {
        Self {
            kind: Box::new(error.into()),
            offset,
        }
    }

    /// A byte offset into the module indicating where the error occured.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
struct Wrapper<R> {
    source: R,
    previous_offset: usize,
    offset: usize,
}

impl<R: Read> Wrapper<R> {
    fn new(source: R) -> Self {
        Self {
            source,
            offset: 0,
            previous_offset: 0,
        }
    }

    fn wrap_error<E: Into<ErrorKind>>(&self, error: E) -> Error {
        Error::new(error, self.previous_offset)
    }

    fn fail_with<T, E: Into<ErrorKind>>(&self, error: E) -> Result<T> {
        Err(self.wrap_error(error))
    }

    fn wrap_result<T, E: Into<ErrorKind>>(&self, result: std::result::Result<T, E>) -> Result<T> {
        result.map_err(|error| self.wrap_error(error))
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize> {
        self.previous_offset = self.offset;
        let result = self.source.read(buffer);
        let count = self.wrap_result(result)?;
        self.offset += count;
        Ok(count)
    }

    fn read_exact(&mut self, buffer: &mut [u8], name: &'static str) -> Result<()> {
        let count = self.read_bytes(buffer)?;
        if count != buffer.len() {
            return self.fail_with(ErrorKind::UnexpectedEndOfData {
                name,
                expected_size: buffer.len(),
                actual_size: count,
            });
        }
        Ok(())
    }

    /// Reads an unsigned LEB128 length value, failing with `missing` if the input ends before the encoding does.
    fn read_length(&mut self, missing: fn() -> ErrorKind) -> Result<usize> {
        let mut value = 0u32;
        for index in 0u32..5 {
            let mut byte = 0u8;
            if self.read_bytes(std::slice::from_mut(&mut byte))? == 0 {
                return self.fail_with(missing());
            }

            let group = u32::from(byte & 0x7F);
            if index == 4 && group > 0xF {
                return self.fail_with(num::IntegerDecodingError::Overflow);
            }

            value |= group << (index * 7);

            if byte & 0x80 == 0 {
                return Ok(value as usize);
            }
        }

        self.fail_with(num::IntegerDecodingError::TooLong)
    }

    fn read_identifier(&mut self, name: &'static str) -> Result<Identifier> {
        let length = self.read_length(move || ErrorKind::UnexpectedEndOfData {
            name: "identifier length",
            expected_size: 1,
            actual_size: 0,
        })?;

        let mut buffer = vec![0u8; length];
        self.read_exact(&mut buffer, name)?;
        self.wrap_result(Identifier::from_utf8(buffer))
    }
}

/// Allows the reading of the contents of a RILL module from a source.
///
/// # Examples
///
/// ```
/// # use rill::reader::Reader;
/// let input = "What happens if nonsense is used as input?";
/// let reader = Reader::new(input.as_bytes());
/// assert!(matches!(reader.read_contents(), Err(_)));
/// ```
#[derive(Debug)]
pub struct Reader<R> {
    source: Wrapper<R>,
}

impl<R: Read> Reader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source: Wrapper::new(source),
        }
    }

    /// Reads the header and every symbol summary, producing the module's contents.
    ///
    /// # Errors
    ///
    /// Fails if the magic or format version does not match the expected schema, or if the input is truncated or
    /// otherwise malformed.
    pub fn read_contents(mut self) -> Result<module::Contents> {
        let source = &mut self.source;

        {
            let mut magic_buffer = [0u8; binary::MAGIC.len()];
            let magic_length = source.read_bytes(&mut magic_buffer)?;
            if magic_length < magic_buffer.len() || magic_buffer != *binary::MAGIC {
                return source.fail_with(InvalidMagicError::new(&magic_buffer[0..magic_length]));
            }
        }

        let format_version = {
            let mut values = [0u8; 2];
            if source.read_bytes(&mut values)? < 2 {
                return source.fail_with(ErrorKind::MissingFormatVersion);
            }

            source.wrap_result(versioning::SupportedFormat::try_from(versioning::Format {
                major: values[0],
                minor: values[1],
            }))?
        };

        let name = source.read_identifier("module name")?;
        let link_name = source.read_identifier("module link name")?;

        let symbol_count = source.read_length(|| ErrorKind::UnexpectedEndOfData {
            name: "symbol count",
            expected_size: 1,
            actual_size: 0,
        })?;

        let mut symbols = Vec::with_capacity(symbol_count);
        for _ in 0..symbol_count {
            symbols.push(read_symbol(source)?);
        }

        {
            let mut excess = 0u8;
            if source.read_bytes(std::slice::from_mut(&mut excess))? != 0 {
                return source.fail_with(ErrorKind::ExpectedEOF);
            }
        }

        Ok(module::Contents {
            format_version,
            identifier: ModuleIdentifier::new_owned(name, link_name),
            symbols,
        })
    }
}

fn read_symbol<R: Read>(source: &mut Wrapper<R>) -> Result<SymbolRecord<'static>> {
    let flags = {
        let mut value = 0u8;
        if source.read_bytes(std::slice::from_mut(&mut value))? == 0 {
            return source.fail_with(ErrorKind::MissingSymbolFlags);
        }
        source.wrap_result(record::SymbolFlags::from_byte(value))?
    };

    let name = source.read_identifier("symbol name")?;

    let body = if flags.contains(record::SymbolFlags::HAS_BODY) {
        let length = source.read_length(|| ErrorKind::UnexpectedEndOfData {
            name: "body length",
            expected_size: 1,
            actual_size: 0,
        })?;

        let mut bytes = vec![0u8; length];
        source.read_exact(&mut bytes, "symbol body")?;
        Some(Body::from_encoded(bytes))
    } else {
        None
    };

    // Errors here are unreachable in practice since from_byte validated the combination.
    let kind = source.wrap_result(flags.kind())?;
    let inline_policy = source.wrap_result(flags.inline_policy())?;

    Ok(SymbolRecord::new(
        Cow::Owned(name),
        kind,
        flags.linkage(),
        inline_policy,
        body,
    ))
}

impl<R: Read> From<R> for Reader<R> {
    #[inline]
    fn from(source: R) -> Self {
        Self::new(source)
    }
}

#[cfg(test)]
mod tests {
    use super::Reader;

    #[test]
    fn unsupported_format_version_is_rejected() {
        let mut input = Vec::from(*crate::binary::MAGIC);
        input.extend_from_slice(&[0, 9]);
        let error = Reader::new(input.as_slice()).read_contents().unwrap_err();
        assert!(matches!(
            error.kind(),
            super::ErrorKind::UnsupportedFormatVersion(_)
        ));
    }

    #[test]
    fn error_reports_offset_of_bad_input() {
        let input = b"RILLX";
        let error = Reader::new(input.as_slice()).read_contents().unwrap_err();
        assert!(matches!(error.kind(), super::ErrorKind::MissingFormatVersion));
        assert_eq!(error.offset(), 4);
    }
}
