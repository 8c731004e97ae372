//! Assembly of mnemonic source text into a binary program image
//!
//! The text format is line oriented: one instruction per line, blank lines
//! skipped, tokens separated by whitespace. Operand conventions per
//! mnemonic:
//!
//! ```text
//! LOAD_CONST <value>, r<reg>
//! LOAD_MEM   <addr>,  r<reg>
//! STORE_MEM  r<reg>,  <addr>
//! SQRT       r<out>,  r<in>
//! ```
//!
//! Assembly stops at the first bad line; a partially valid source produces
//! nothing.

use nom::combinator::all_consuming;
use nom::Finish;
use thiserror::Error;
use tracing::debug;

use crate::bytecode::{Instruction, Opcode};

mod line;

use self::line::{parse_line, Line, Operand};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssemblerError {
    #[error("line {line}: unknown instruction {mnemonic:?}")]
    UnknownInstruction { line: usize, mnemonic: String },

    #[error("line {line}: invalid operands for {opcode}, expected {expected}")]
    InvalidOperands {
        line: usize,
        opcode: Opcode,
        expected: &'static str,
    },

    #[error("line {line}: could not parse {text:?}")]
    Syntax { line: usize, text: String },
}

/// An assembled program: the ordered instruction list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub instructions: Vec<Instruction>,
}

impl Program {
    /// Concatenate the instruction encodings into a flat binary image.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.instructions
            .iter()
            .flat_map(Instruction::encode)
            .collect()
    }
}

/// Translate assembly source into a [`Program`].
///
/// # Errors
///
/// Fails on the first line that does not assemble: an unparseable line, an
/// unknown mnemonic, or operands that do not fit the mnemonic's shape.
pub fn assemble(source: &str) -> Result<Program, AssemblerError> {
    let mut instructions = Vec::new();

    for (index, text) in source.lines().enumerate() {
        let number = index + 1;
        let (_, parsed) = all_consuming(parse_line)(text).finish().map_err(
            |_: nom::error::Error<&str>| AssemblerError::Syntax {
                line: number,
                text: text.trim().to_string(),
            },
        )?;

        let Some(parsed) = parsed else { continue };
        let instruction = translate(number, &parsed)?;
        debug!(line = number, "assembled {instruction}");
        instructions.push(instruction);
    }

    Ok(Program { instructions })
}

/// Map a parsed line onto an opcode and its `(B, C)` operand fields.
fn translate(number: usize, parsed: &Line<'_>) -> Result<Instruction, AssemblerError> {
    let opcode: Opcode = parsed.mnemonic.to_ascii_uppercase().parse().map_err(|_| {
        AssemblerError::UnknownInstruction {
            line: number,
            mnemonic: parsed.mnemonic.to_string(),
        }
    })?;

    let (b, c) = match (opcode, parsed.operands) {
        (Opcode::LoadConst | Opcode::LoadMem, (Operand::Literal(b), Operand::Register(c)))
        | (Opcode::StoreMem, (Operand::Register(b), Operand::Literal(c)))
        | (Opcode::Sqrt, (Operand::Register(b), Operand::Register(c))) => (b, c),
        _ => {
            return Err(AssemblerError::InvalidOperands {
                line: number,
                opcode,
                expected: operand_shape(opcode),
            })
        }
    };

    Ok(Instruction::new(opcode, b, c))
}

const fn operand_shape(opcode: Opcode) -> &'static str {
    match opcode {
        Opcode::LoadConst => "<value>, r<reg>",
        Opcode::LoadMem => "<addr>, r<reg>",
        Opcode::StoreMem => "r<reg>, <addr>",
        Opcode::Sqrt => "r<out>, r<in>",
    }
}
