//! Execution faults that stop the CPU

use thiserror::Error;

/// A condition that halts execution mid-run.
///
/// Every variant carries the 20-bit physical address of the start of the
/// faulting instruction, prefixes included.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The opcode byte does not name an 8086 instruction.
    #[error("undefined opcode {opcode:#04x} at {addr:#07x}")]
    UndefinedOpcode { opcode: u8, addr: u32 },

    /// DIV/IDIV by zero, quotient overflow, or AAM with base 0.
    #[error("divide fault at {addr:#07x}")]
    Divide { addr: u32 },

    /// An encoding the instruction cannot accept, such as LEA with a
    /// register operand or a far CALL/JMP through a register.
    #[error("{mnemonic} with invalid operand form at {addr:#07x}")]
    InvalidOperand { mnemonic: &'static str, addr: u32 },
}
