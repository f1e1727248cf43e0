//! Flag transfer and single-bit flag handlers
//!
//! PUSHF/POPF, SAHF/LAHF and the CLC/STC/CMC/CLI/STI/CLD/STD block.

use crate::cpu::exec::stack::{pop_word, push_word};
use crate::cpu::state::REG_AH;
use crate::cpu::{Cpu, Fault};
use crate::memory::Memory;

/// PUSHF (0x9C): push the flags word, reserved bits in hardware state.
pub fn pushf(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    let flags = cpu.get_flags();
    push_word(cpu, mem, flags);
    Ok(())
}

/// POPF (0x9D): pop into the flags word.
pub fn popf(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    let flags = pop_word(cpu, mem);
    cpu.set_flags(flags);
    Ok(())
}

/// SAHF (0x9E): AH into the low flags byte. Bit 1 still reads 1 and bits
/// 3 and 5 still read 0 afterwards.
pub fn sahf(cpu: &mut Cpu, _mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    let ah = cpu.read_reg8(REG_AH) as u16;
    let flags = (cpu.get_flags() & 0xFF00) | ah;
    cpu.set_flags(flags);
    Ok(())
}

/// LAHF (0x9F): low flags byte into AH, fixed bits included.
pub fn lahf(cpu: &mut Cpu, _mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    cpu.write_reg8(REG_AH, cpu.get_flags() as u8);
    Ok(())
}

/// CLC (0xF8)
pub fn clc(cpu: &mut Cpu, _mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    cpu.set_flag(Cpu::CF, false);
    Ok(())
}

/// STC (0xF9)
pub fn stc(cpu: &mut Cpu, _mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    cpu.set_flag(Cpu::CF, true);
    Ok(())
}

/// CMC (0xF5)
pub fn cmc(cpu: &mut Cpu, _mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    let cf = cpu.get_flag(Cpu::CF);
    cpu.set_flag(Cpu::CF, !cf);
    Ok(())
}

/// CLI (0xFA)
pub fn cli(cpu: &mut Cpu, _mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    cpu.set_flag(Cpu::IF, false);
    Ok(())
}

/// STI (0xFB)
pub fn sti(cpu: &mut Cpu, _mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    cpu.set_flag(Cpu::IF, true);
    Ok(())
}

/// CLD (0xFC)
pub fn cld(cpu: &mut Cpu, _mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    cpu.set_flag(Cpu::DF, false);
    Ok(())
}

/// STD (0xFD)
pub fn std(cpu: &mut Cpu, _mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    cpu.set_flag(Cpu::DF, true);
    Ok(())
}
