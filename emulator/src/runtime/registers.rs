use thiserror::Error;

use crate::constants::{Word, REGISTER_COUNT};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("register index {0} out of range")]
pub struct RegisterError(pub Word);

/// The register file: [`REGISTER_COUNT`] word cells, zero-initialized.
///
/// Accesses are bounds checked; the instruction format's 7-bit register
/// fields cannot overflow the file, but the dump path takes arbitrary
/// caller-supplied indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    cells: Box<[Word; REGISTER_COUNT]>,
}

impl Default for Registers {
    fn default() -> Self {
        Self {
            cells: Box::new([0; REGISTER_COUNT]),
        }
    }
}

impl Registers {
    /// Read a register.
    ///
    /// # Errors
    ///
    /// Fails if the index is outside the register file.
    pub fn get(&self, index: Word) -> Result<Word, RegisterError> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.cells.get(index))
            .copied()
            .ok_or(RegisterError(index))
    }

    /// Write a register.
    ///
    /// # Errors
    ///
    /// Fails if the index is outside the register file.
    pub fn set(&mut self, index: Word, value: Word) -> Result<(), RegisterError> {
        let cell = usize::try_from(index)
            .ok()
            .and_then(|index| self.cells.get_mut(index))
            .ok_or(RegisterError(index))?;
        *cell = value;
        Ok(())
    }

    /// Borrow the inclusive index range `start..=end`, for dumps.
    ///
    /// # Errors
    ///
    /// Fails if the range is reversed or runs past the register file.
    pub fn slice(&self, start: Word, end: Word) -> Result<&[Word], RegisterError> {
        let lo = usize::try_from(start).map_err(|_| RegisterError(start))?;
        let hi = usize::try_from(end).map_err(|_| RegisterError(end))?;
        self.cells.get(lo..=hi).ok_or(RegisterError(end))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn bounds() {
        let mut registers = Registers::default();
        registers.set(255, 7).unwrap();
        assert_eq!(registers.get(255), Ok(7));
        assert_eq!(registers.get(256), Err(RegisterError(256)));
        assert_eq!(registers.set(256, 0), Err(RegisterError(256)));
    }

    #[test]
    fn slice_range() {
        let mut registers = Registers::default();
        registers.set(3, 9).unwrap();
        assert_eq!(registers.slice(2, 4), Ok(&[0, 9, 0][..]));
        assert_eq!(registers.slice(250, 256), Err(RegisterError(256)));
        assert!(registers.slice(4, 2).is_err());
    }
}
