//! The instructions that make up the serialized bodies of RILL symbols.
//!
//! The linker only inspects bodies to discover outgoing symbol references, so the instruction set here is the minimal
//! closed set a body can contain. Bodies are stored in their encoded form inside symbol records and are only decoded on
//! demand.

use crate::identifier::{self, Identifier};
use crate::num::{self, VarU32};
use std::fmt::{Display, Formatter};
use std::io::Write;

/// Indicates the operation performed by an instruction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Opcode {
    Nop = 0,
    Ret = 1,
    Call = 2,
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("{value:#02X} is not a valid opcode")]
pub struct InvalidOpcodeError {
    value: u8,
}

impl TryFrom<u8> for Opcode {
    type Error = InvalidOpcodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Nop),
            1 => Ok(Self::Ret),
            2 => Ok(Self::Call),
            _ => Err(InvalidOpcodeError { value }),
        }
    }
}

impl From<Opcode> for u8 {
    #[inline]
    fn from(opcode: Opcode) -> u8 {
        opcode as u8
    }
}

/// A single instruction in a symbol's body. A `call` references its callee by mangled name, which is what the reference
/// resolver of a link session walks.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Instruction {
    Nop,
    Ret,
    Call(Identifier),
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Nop => Opcode::Nop,
            Self::Ret => Opcode::Ret,
            Self::Call(_) => Opcode::Call,
        }
    }

    /// Appends the encoded form of this instruction to a body byte stream.
    pub fn write_to<W: Write>(&self, mut destination: W) -> std::io::Result<()> {
        destination.write_all(&[u8::from(self.opcode())])?;
        if let Self::Call(callee) = self {
            let bytes = callee.as_bytes();
            match VarU32::try_from(bytes.len()) {
                Ok(length) => length.write_to(&mut destination)?,
                Err(error) => return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, error)),
            }
            destination.write_all(bytes)?;
        }
        Ok(())
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Nop => f.write_str("nop"),
            Self::Ret => f.write_str("ret"),
            Self::Call(callee) => write!(f, "call @{}", callee),
        }
    }
}

/// A list specifying the ways an encoded body can be malformed.
#[derive(Clone, Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error(transparent)]
    InvalidOpcode(#[from] InvalidOpcodeError),
    #[error("unexpected end of encoded body")]
    UnexpectedEnd,
    #[error(transparent)]
    InvalidInteger(#[from] num::IntegerDecodingError),
    #[error(transparent)]
    InvalidCallee(#[from] identifier::ParseError),
}

/// Decodes every instruction in an encoded body.
pub fn decode_all(mut bytes: &[u8]) -> Result<Vec<Instruction>, DecodeError> {
    let mut instructions = Vec::new();

    while let Some((&opcode, rest)) = bytes.split_first() {
        bytes = rest;
        instructions.push(match Opcode::try_from(opcode)? {
            Opcode::Nop => Instruction::Nop,
            Opcode::Ret => Instruction::Ret,
            Opcode::Call => {
                let length = VarU32::read_from(&mut bytes)
                    .map_err(|_| DecodeError::UnexpectedEnd)?
                    .map_err(DecodeError::from)?;

                let length = usize::from(length);
                if bytes.len() < length {
                    return Err(DecodeError::UnexpectedEnd);
                }

                let (name, rest) = bytes.split_at(length);
                bytes = rest;
                Instruction::Call(Identifier::from_utf8(name.to_vec())?)
            }
        });
    }

    Ok(instructions)
}

#[cfg(test)]
mod tests {
    use super::{decode_all, Instruction};
    use crate::identifier::Identifier;

    #[test]
    fn call_instruction_round_trips() {
        let callee = Identifier::try_from("$s4main5helloyyF").unwrap();
        let body = [Instruction::Call(callee), Instruction::Ret];

        let mut encoded = Vec::new();
        for instruction in &body {
            instruction.write_to(&mut encoded).unwrap();
        }

        assert_eq!(decode_all(&encoded).unwrap(), body);
    }

    #[test]
    fn truncated_callee_is_rejected() {
        // call with a declared name length of 10 but only 2 bytes following.
        let encoded = [2u8, 10, b'h', b'i'];
        assert!(matches!(decode_all(&encoded), Err(super::DecodeError::UnexpectedEnd)));
    }
}
