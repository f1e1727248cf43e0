//! String primitive handlers (MOVS, CMPS, SCAS, LODS, STOS)
//!
//! The source is DS:SI (a latched segment override replaces DS), the
//! destination ES:DI (never overridable). After each primitive SI/DI move
//! by the operand size, down when DF is set. One `step` runs exactly one
//! primitive; under a REP latch the instruction pointer loops back to the
//! start of the whole instruction while the repeat condition holds, so the
//! driving loop iterates the primitive CX times.

use crate::cpu::exec::arithmetic;
use crate::cpu::state::{REG_AL, REG_AX, REG_CX, REG_DI, REG_SI, SEG_DS, SEG_ES};
use crate::cpu::{Cpu, Fault, Repeat};
use crate::memory::Memory;

/// MOVS (0xA4 byte, 0xA5 word): copy [DS:SI] to [ES:DI].
pub fn movs(cpu: &mut Cpu, mem: &mut Memory, opcode: u8) -> Result<(), Fault> {
    let word = opcode & 1 != 0;
    if rep_done(cpu) {
        return Ok(());
    }
    let src_seg = source_segment(cpu);
    let si = cpu.read_reg16(REG_SI);
    let es = cpu.read_seg(SEG_ES);
    let di = cpu.read_reg16(REG_DI);
    if word {
        let value = cpu.read_mem16(mem, src_seg, si);
        cpu.write_mem16(mem, es, di, value);
    } else {
        let value = cpu.read_mem8(mem, src_seg, si);
        cpu.write_mem8(mem, es, di, value);
    }
    advance_si(cpu, word);
    advance_di(cpu, word);
    rep_next(cpu);
    Ok(())
}

/// CMPS (0xA6 byte, 0xA7 word): compare [DS:SI] against [ES:DI].
pub fn cmps(cpu: &mut Cpu, mem: &mut Memory, opcode: u8) -> Result<(), Fault> {
    let word = opcode & 1 != 0;
    if rep_done(cpu) {
        return Ok(());
    }
    let src_seg = source_segment(cpu);
    let si = cpu.read_reg16(REG_SI);
    let es = cpu.read_seg(SEG_ES);
    let di = cpu.read_reg16(REG_DI);
    if word {
        let a = cpu.read_mem16(mem, src_seg, si);
        let b = cpu.read_mem16(mem, es, di);
        arithmetic::sub16(cpu, a, b, 0);
    } else {
        let a = cpu.read_mem8(mem, src_seg, si);
        let b = cpu.read_mem8(mem, es, di);
        arithmetic::sub8(cpu, a, b, 0);
    }
    advance_si(cpu, word);
    advance_di(cpu, word);
    rep_next_conditional(cpu);
    Ok(())
}

/// SCAS (0xAE byte, 0xAF word): compare the accumulator against [ES:DI].
pub fn scas(cpu: &mut Cpu, mem: &mut Memory, opcode: u8) -> Result<(), Fault> {
    let word = opcode & 1 != 0;
    if rep_done(cpu) {
        return Ok(());
    }
    let es = cpu.read_seg(SEG_ES);
    let di = cpu.read_reg16(REG_DI);
    if word {
        let b = cpu.read_mem16(mem, es, di);
        let a = cpu.read_reg16(REG_AX);
        arithmetic::sub16(cpu, a, b, 0);
    } else {
        let b = cpu.read_mem8(mem, es, di);
        let a = cpu.read_reg8(REG_AL);
        arithmetic::sub8(cpu, a, b, 0);
    }
    advance_di(cpu, word);
    rep_next_conditional(cpu);
    Ok(())
}

/// LODS (0xAC byte, 0xAD word): load [DS:SI] into the accumulator.
pub fn lods(cpu: &mut Cpu, mem: &mut Memory, opcode: u8) -> Result<(), Fault> {
    let word = opcode & 1 != 0;
    if rep_done(cpu) {
        return Ok(());
    }
    let src_seg = source_segment(cpu);
    let si = cpu.read_reg16(REG_SI);
    if word {
        let value = cpu.read_mem16(mem, src_seg, si);
        cpu.write_reg16(REG_AX, value);
    } else {
        let value = cpu.read_mem8(mem, src_seg, si);
        cpu.write_reg8(REG_AL, value);
    }
    advance_si(cpu, word);
    rep_next(cpu);
    Ok(())
}

/// STOS (0xAA byte, 0xAB word): store the accumulator at [ES:DI].
pub fn stos(cpu: &mut Cpu, mem: &mut Memory, opcode: u8) -> Result<(), Fault> {
    let word = opcode & 1 != 0;
    if rep_done(cpu) {
        return Ok(());
    }
    let es = cpu.read_seg(SEG_ES);
    let di = cpu.read_reg16(REG_DI);
    if word {
        let value = cpu.read_reg16(REG_AX);
        cpu.write_mem16(mem, es, di, value);
    } else {
        let value = cpu.read_reg8(REG_AL);
        cpu.write_mem8(mem, es, di, value);
    }
    advance_di(cpu, word);
    rep_next(cpu);
    Ok(())
}

fn source_segment(cpu: &Cpu) -> u16 {
    cpu.read_seg(cpu.segment_override.unwrap_or(SEG_DS))
}

fn advance_si(cpu: &mut Cpu, word: bool) {
    let delta = delta(cpu, word);
    let si = cpu.read_reg16(REG_SI).wrapping_add(delta);
    cpu.write_reg16(REG_SI, si);
}

fn advance_di(cpu: &mut Cpu, word: bool) {
    let delta = delta(cpu, word);
    let di = cpu.read_reg16(REG_DI).wrapping_add(delta);
    cpu.write_reg16(REG_DI, di);
}

fn delta(cpu: &Cpu, word: bool) -> u16 {
    let size: u16 = if word { 2 } else { 1 };
    if cpu.get_flag(Cpu::DF) {
        size.wrapping_neg()
    } else {
        size
    }
}

/// A latched REP with CX already zero skips the primitive entirely.
fn rep_done(cpu: &Cpu) -> bool {
    cpu.repeat != Repeat::None && cpu.read_reg16(REG_CX) == 0
}

/// Unconditional REP continuation (MOVS, LODS, STOS): decrement CX and
/// loop IP back to the instruction start, prefixes included, while CX is
/// non-zero.
fn rep_next(cpu: &mut Cpu) {
    if cpu.repeat == Repeat::None {
        return;
    }
    let cx = cpu.read_reg16(REG_CX).wrapping_sub(1);
    cpu.write_reg16(REG_CX, cx);
    if cx != 0 {
        cpu.ip = cpu.instr_ip;
    }
}

/// REPE/REPNE continuation (CMPS, SCAS): as above, but the zero flag must
/// still satisfy the prefix condition to keep going.
fn rep_next_conditional(cpu: &mut Cpu) {
    let wanted_zf = match cpu.repeat {
        Repeat::None => return,
        Repeat::Repe => true,
        Repeat::Repne => false,
    };
    let cx = cpu.read_reg16(REG_CX).wrapping_sub(1);
    cpu.write_reg16(REG_CX, cx);
    if cx != 0 && cpu.get_flag(Cpu::ZF) == wanted_zf {
        cpu.ip = cpu.instr_ip;
    }
}
