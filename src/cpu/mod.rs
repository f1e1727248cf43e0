//! 8086 CPU emulation module
//!
//! The core splits the way the hardware does:
//! - `state`: registers, flags, prefix latches, the `step` loop
//! - `decode`: ModR/M and effective-address decoding
//! - `exec`: one handler per opcode family, wired through a dispatch table

pub mod decode;
pub mod exec;
pub mod fault;
pub mod harness;
pub mod state;

pub use fault::Fault;
pub use harness::CpuHarness;
pub use state::{Cpu, Repeat};
