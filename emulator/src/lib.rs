pub mod assembler;
pub mod bytecode;
pub mod constants;
pub mod runtime;

pub use self::assembler::{assemble, Program};
pub use self::bytecode::{Instruction, Opcode};
pub use self::runtime::{Exception, Machine, Step};
