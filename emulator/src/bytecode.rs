//! Binary encoding of instructions
//!
//! An encoded instruction is a little-endian integer packed from three
//! fields: the opcode tag in the low 8 bits and two operands at
//! opcode-specific bit offsets. The byte width of an instruction is fixed by
//! its opcode, so a program image is a plain concatenation of encodings with
//! no separators: the opcode byte at the current offset tells the machine
//! how many bytes to consume next.

use parse_display::{Display, FromStr};
use thiserror::Error;

use crate::constants::Word;

/// Operation tag, stored in the low 8 bits of every encoded instruction.
///
/// The discriminants are the wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, FromStr)]
#[display(style = "SNAKE_CASE")]
#[repr(u8)]
pub enum Opcode {
    LoadConst = 120,
    LoadMem = 129,
    StoreMem = 123,
    Sqrt = 53,
}

/// Position of one operand field inside the packed integer, counted from the
/// least-significant bit.
#[derive(Debug, Clone, Copy)]
struct Field {
    offset: u32,
    width: u32,
}

const fn field(offset: u32, width: u32) -> Field {
    Field { offset, width }
}

impl Field {
    const fn mask(self) -> Word {
        (1 << self.width) - 1
    }

    const fn pack(self, value: Word) -> Word {
        (value & self.mask()) << self.offset
    }

    const fn extract(self, raw: Word) -> Word {
        (raw >> self.offset) & self.mask()
    }
}

/// Operand packing scheme of one opcode.
struct Layout {
    b: Field,
    c: Field,
}

impl Opcode {
    /// Total width of the encoded instruction, in bytes.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Opcode::LoadConst | Opcode::LoadMem | Opcode::StoreMem => 6,
            Opcode::Sqrt => 3,
        }
    }

    const fn layout(self) -> Layout {
        match self {
            Opcode::LoadConst => Layout {
                b: field(8, 27),
                c: field(35, 7),
            },
            Opcode::LoadMem => Layout {
                b: field(8, 26),
                c: field(34, 7),
            },
            Opcode::StoreMem => Layout {
                b: field(8, 7),
                c: field(15, 26),
            },
            Opcode::Sqrt => Layout {
                b: field(8, 7),
                c: field(15, 7),
            },
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = DecodeError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            120 => Ok(Opcode::LoadConst),
            129 => Ok(Opcode::LoadMem),
            123 => Ok(Opcode::StoreMem),
            53 => Ok(Opcode::Sqrt),
            _ => Err(DecodeError::UnknownOpcode(byte)),
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown opcode {0}")]
    UnknownOpcode(u8),

    #[error("truncated {opcode} instruction: expected {expected} bytes, got {got}")]
    Truncated {
        opcode: Opcode,
        expected: usize,
        got: usize,
    },

    #[error("empty instruction buffer")]
    Empty,
}

/// A decoded instruction: the opcode and its two operand fields.
///
/// How the operands are interpreted depends on the opcode; see
/// [`crate::runtime`] for the execution semantics and [`crate::assembler`]
/// for the source-level conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub b: Word,
    pub c: Word,
}

impl Instruction {
    #[must_use]
    pub const fn new(opcode: Opcode, b: Word, c: Word) -> Self {
        Self { opcode, b, c }
    }

    /// Width of the encoded form, in bytes.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.opcode.width()
    }

    /// Pack the instruction into its fixed-width little-endian encoding.
    ///
    /// An operand wider than its field wraps modulo the field width. This is
    /// the format's overflow policy, not an error condition.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let layout = self.opcode.layout();
        let raw = Word::from(self.opcode as u8) | layout.b.pack(self.b) | layout.c.pack(self.c);
        raw.to_le_bytes()[..self.opcode.width()].to_vec()
    }

    /// Decode one instruction from the start of `bytes`.
    ///
    /// Trailing bytes are ignored; the caller advances by
    /// [`Instruction::width`] to find the next instruction.
    ///
    /// # Errors
    ///
    /// Fails if the first byte is not a known opcode, or if `bytes` is
    /// shorter than the width that opcode requires.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let (&first, _) = bytes.split_first().ok_or(DecodeError::Empty)?;
        let opcode = Opcode::try_from(first)?;

        let width = opcode.width();
        if bytes.len() < width {
            return Err(DecodeError::Truncated {
                opcode,
                expected: width,
                got: bytes.len(),
            });
        }

        let mut raw = [0_u8; 8];
        raw[..width].copy_from_slice(&bytes[..width]);
        let raw = Word::from_le_bytes(raw);

        let layout = opcode.layout();
        Ok(Self {
            opcode,
            b: layout.b.extract(raw),
            c: layout.c.extract(raw),
        })
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.opcode {
            Opcode::LoadConst | Opcode::LoadMem => {
                write!(f, "{} {}, r{}", self.opcode, self.b, self.c)
            }
            Opcode::StoreMem => write!(f, "{} r{}, {}", self.opcode, self.b, self.c),
            Opcode::Sqrt => write!(f, "{} r{}, r{}", self.opcode, self.b, self.c),
        }
    }
}
