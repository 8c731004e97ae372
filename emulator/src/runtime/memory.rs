use thiserror::Error;

use crate::constants::{Word, MEMORY_SIZE};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("address {0} out of range")]
pub struct MemoryError(pub Word);

/// Flat data memory: [`MEMORY_SIZE`] word cells, zero-initialized.
///
/// Addresses come from 26-bit instruction fields, which reach far beyond the
/// actual cell count, so every access is bounds checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    cells: Box<[Word; MEMORY_SIZE]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self {
            // Build on the heap, the array is too big for the stack to be
            // comfortable
            cells: vec![0; MEMORY_SIZE]
                .into_boxed_slice()
                .try_into()
                .expect("cell count matches MEMORY_SIZE"),
        }
    }
}

impl Memory {
    /// Read a memory cell.
    ///
    /// # Errors
    ///
    /// Fails if the address is outside memory.
    pub fn get(&self, address: Word) -> Result<Word, MemoryError> {
        usize::try_from(address)
            .ok()
            .and_then(|address| self.cells.get(address))
            .copied()
            .ok_or(MemoryError(address))
    }

    /// Write a memory cell.
    ///
    /// # Errors
    ///
    /// Fails if the address is outside memory.
    pub fn set(&mut self, address: Word, value: Word) -> Result<(), MemoryError> {
        let cell = usize::try_from(address)
            .ok()
            .and_then(|address| self.cells.get_mut(address))
            .ok_or(MemoryError(address))?;
        *cell = value;
        Ok(())
    }

    /// Borrow the inclusive address range `start..=end`, for dumps.
    ///
    /// # Errors
    ///
    /// Fails if the range is reversed or runs past the end of memory.
    pub fn slice(&self, start: Word, end: Word) -> Result<&[Word], MemoryError> {
        let lo = usize::try_from(start).map_err(|_| MemoryError(start))?;
        let hi = usize::try_from(end).map_err(|_| MemoryError(end))?;
        self.cells.get(lo..=hi).ok_or(MemoryError(end))
    }
}
