//! CPU test harness
//!
//! A minimal CPU-plus-memory pair for exercising instructions without any
//! surrounding machine. Used by the integration tests and handy from a
//! debugger.

use crate::cpu::{Cpu, Fault};
use crate::memory::Memory;

/// Test harness bundling one CPU with its memory.
pub struct CpuHarness {
    pub cpu: Cpu,
    pub mem: Memory,
}

impl CpuHarness {
    /// A fresh CPU in reset state over zeroed memory.
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            mem: Memory::new(),
        }
    }

    /// Load code at segment:0 and point CS:IP at it.
    pub fn load_program(&mut self, code: &[u8], segment: u16) {
        self.mem.load(code, (segment as u32) << 4);
        self.cpu.write_seg(crate::cpu::state::SEG_CS, segment);
        self.cpu.ip = 0;
    }

    /// Execute one instruction.
    pub fn step(&mut self) -> Result<(), Fault> {
        self.cpu.step(&mut self.mem)
    }

    /// Execute `n` instructions, stopping early on a fault.
    pub fn step_n(&mut self, n: usize) -> Result<(), Fault> {
        for _ in 0..n {
            self.step()?;
        }
        Ok(())
    }

    /// Reset the CPU, leaving memory as it is.
    pub fn reset(&mut self) {
        self.cpu.reset();
    }
}

impl Default for CpuHarness {
    fn default() -> Self {
        Self::new()
    }
}
