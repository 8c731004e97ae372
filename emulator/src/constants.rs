/// Integer type held by register and memory cells.
pub type Word = u64;

/// Number of cells in the register file.
pub const REGISTER_COUNT: usize = 256;

/// Number of cells in data memory.
pub const MEMORY_SIZE: usize = 2048;
