use thiserror::Error;

use crate::bytecode::DecodeError;

use super::memory::MemoryError;
use super::registers::RegisterError;

/// A fatal execution fault. There is no recovery: a faulted machine must be
/// given a fresh program with [`super::Machine::load`] before further use.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Exception {
    #[error("unknown opcode {0}")]
    UnknownOpcode(u8),

    #[error("invalid instruction: {0}")]
    InvalidInstruction(DecodeError),

    #[error("invalid register access: {0}")]
    InvalidRegister(#[from] RegisterError),

    #[error("invalid memory access: {0}")]
    InvalidMemoryAccess(#[from] MemoryError),
}

impl From<DecodeError> for Exception {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::UnknownOpcode(byte) => Self::UnknownOpcode(byte),
            e => Self::InvalidInstruction(e),
        }
    }
}
