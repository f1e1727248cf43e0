//! Instruction decoding
//!
//! ModR/M parsing, the canonical 8086 effective-address table, and the
//! tagged operand type the executor reads and writes through.

pub mod modrm;
pub mod operands;

pub use modrm::{AddressingMode, ModRm};
pub use operands::Operand;
