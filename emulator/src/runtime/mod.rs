//! The execution engine
//!
//! [`Machine`] owns the register file, data memory, and a byte-offset
//! program counter over the loaded code. Each step decodes the instruction
//! at the counter, executes it, and advances the counter by that opcode's
//! width. Execution halts once the counter runs off the end of the code;
//! since every instruction width is positive and there are no jumps, every
//! program terminates.

use tracing::{debug, info};

use crate::bytecode::{Instruction, Opcode};

mod exception;
mod memory;
mod registers;

pub use self::exception::Exception;
pub use self::memory::{Memory, MemoryError};
pub use self::registers::{RegisterError, Registers};

/// Outcome of a single [`Machine::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// An instruction was executed; there may be more.
    Continuing,

    /// The program counter reached the end of the code; nothing was done.
    Halted,
}

/// The virtual machine: registers, memory, and the loaded program.
#[derive(Default, Clone)]
pub struct Machine {
    pub registers: Registers,
    pub memory: Memory,
    pc: usize,
    code: Vec<u8>,
}

impl std::fmt::Debug for Machine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Machine {{ pc: {}, code: {} bytes, registers: [...], memory: [...] }}",
            self.pc,
            self.code.len()
        )
    }
}

impl Machine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a binary program image and reset the program counter.
    ///
    /// The image is not validated here; a malformed image surfaces as an
    /// [`Exception`] during execution.
    pub fn load(&mut self, code: Vec<u8>) {
        debug!(bytes = code.len(), "loading program");
        self.code = code;
        self.pc = 0;
    }

    /// Current program counter: a byte offset into the loaded code.
    #[must_use]
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Fetch, decode and execute the instruction at the program counter.
    ///
    /// # Errors
    ///
    /// Returns an [`Exception`] on an unknown opcode, a truncated trailing
    /// instruction, or an out-of-range register or memory access. The fault
    /// is fatal: the machine should be reloaded before further use.
    pub fn step(&mut self) -> Result<Step, Exception> {
        if self.pc >= self.code.len() {
            return Ok(Step::Halted);
        }

        let instruction = Instruction::decode(&self.code[self.pc..])?;
        debug!(pc = self.pc, "executing {instruction}");

        match instruction.opcode {
            Opcode::LoadConst => {
                self.registers.set(instruction.c, instruction.b)?;
            }
            Opcode::LoadMem => {
                let value = self.memory.get(instruction.b)?;
                self.registers.set(instruction.c, value)?;
            }
            Opcode::StoreMem => {
                let value = self.registers.get(instruction.b)?;
                self.memory.set(instruction.c, value)?;
            }
            Opcode::Sqrt => {
                // Integer square root, truncated toward zero. Cells are
                // unsigned words, so there is no negative input case.
                let value = self.registers.get(instruction.c)?;
                self.registers.set(instruction.b, value.isqrt())?;
            }
        }

        self.pc += instruction.width();
        Ok(Step::Continuing)
    }

    /// Run the loaded program to completion.
    ///
    /// # Errors
    ///
    /// Propagates the first [`Exception`] raised by [`Machine::step`],
    /// aborting the run immediately.
    pub fn run(&mut self) -> Result<(), Exception> {
        let mut steps = 0_usize;
        while self.step()? == Step::Continuing {
            steps += 1;
        }
        info!(steps, pc = self.pc, "program halted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn image(instructions: &[Instruction]) -> Vec<u8> {
        instructions.iter().flat_map(Instruction::encode).collect()
    }

    #[test]
    fn empty_program_halts() {
        let mut machine = Machine::new();
        assert_eq!(machine.step(), Ok(Step::Halted));
        machine.run().unwrap();
        assert_eq!(machine.pc(), 0);
        assert_eq!(machine.registers, Registers::default());
        assert_eq!(machine.memory, Memory::default());
    }

    #[test]
    fn load_const() {
        let mut machine = Machine::new();
        machine.load(image(&[Instruction::new(Opcode::LoadConst, 234, 84)]));
        machine.run().unwrap();
        assert_eq!(machine.registers.get(84), Ok(234));
    }

    #[test]
    fn load_mem() {
        let mut machine = Machine::new();
        machine.memory.set(667, 999).unwrap();
        machine.load(image(&[Instruction::new(Opcode::LoadMem, 667, 50)]));
        machine.run().unwrap();
        assert_eq!(machine.registers.get(50), Ok(999));
    }

    #[test]
    fn store_mem() {
        let mut machine = Machine::new();
        machine.registers.set(109, 777).unwrap();
        machine.load(image(&[Instruction::new(Opcode::StoreMem, 109, 633)]));
        machine.run().unwrap();
        assert_eq!(machine.memory.get(633), Ok(777));
    }

    #[test]
    fn sqrt() {
        let mut machine = Machine::new();
        machine.registers.set(71, 144).unwrap();
        machine.load(image(&[Instruction::new(Opcode::Sqrt, 113, 71)]));
        machine.run().unwrap();
        assert_eq!(machine.registers.get(113), Ok(12));
    }

    #[test]
    fn sqrt_truncates_toward_zero() {
        let mut machine = Machine::new();
        machine.registers.set(0, 15).unwrap();
        machine.load(image(&[Instruction::new(Opcode::Sqrt, 1, 0)]));
        machine.run().unwrap();
        assert_eq!(machine.registers.get(1), Ok(3));
    }

    #[test]
    fn chained_program() {
        let mut machine = Machine::new();
        machine.load(image(&[
            Instruction::new(Opcode::LoadConst, 16, 10),
            Instruction::new(Opcode::Sqrt, 20, 10),
            Instruction::new(Opcode::StoreMem, 20, 500),
        ]));
        machine.run().unwrap();
        assert_eq!(machine.registers.get(20), Ok(4));
        assert_eq!(machine.memory.get(500), Ok(4));
        assert_eq!(machine.pc(), 15);
    }

    #[test]
    fn pc_advances_by_opcode_width() {
        let mut machine = Machine::new();
        machine.load(image(&[
            Instruction::new(Opcode::LoadConst, 4, 0),
            Instruction::new(Opcode::Sqrt, 1, 0),
        ]));
        assert_eq!(machine.step(), Ok(Step::Continuing));
        assert_eq!(machine.pc(), 6);
        assert_eq!(machine.step(), Ok(Step::Continuing));
        assert_eq!(machine.pc(), 9);
        assert_eq!(machine.step(), Ok(Step::Halted));
        assert_eq!(machine.pc(), 9);
    }

    #[test]
    fn load_resets_pc() {
        let mut machine = Machine::new();
        machine.load(image(&[Instruction::new(Opcode::LoadConst, 1, 0)]));
        machine.run().unwrap();
        assert_eq!(machine.pc(), 6);
        machine.load(image(&[Instruction::new(Opcode::LoadConst, 2, 0)]));
        assert_eq!(machine.pc(), 0);
    }

    #[test]
    fn unknown_opcode_faults() {
        let mut machine = Machine::new();
        machine.load(vec![0xAA, 0, 0]);
        assert_eq!(machine.run(), Err(Exception::UnknownOpcode(0xAA)));
    }

    #[test]
    fn truncated_code_faults() {
        let mut machine = Machine::new();
        let mut code = Instruction::new(Opcode::LoadConst, 1, 2).encode();
        code.truncate(4);
        machine.load(code);
        assert!(matches!(
            machine.run(),
            Err(Exception::InvalidInstruction(_))
        ));
    }

    #[test]
    fn memory_out_of_range_faults() {
        let mut machine = Machine::new();
        // The 26-bit address field reaches far beyond the 2048 cells
        machine.load(image(&[Instruction::new(Opcode::LoadMem, 1 << 20, 0)]));
        assert_eq!(
            machine.run(),
            Err(Exception::InvalidMemoryAccess(MemoryError(1 << 20)))
        );
    }
}
