//! Data transfer handlers (MOV, XCHG, LEA, LDS/LES)
//!
//! None of these touch flags.

use crate::cpu::state::{REG_AL, REG_AX, SEG_DS, SEG_ES};
use crate::cpu::{Cpu, Fault};
use crate::memory::Memory;

/// MOV r/m, r (0x88 byte, 0x89 word).
pub fn mov_rm_r(cpu: &mut Cpu, mem: &mut Memory, opcode: u8) -> Result<(), Fault> {
    let byte = opcode & 1 == 0;
    let modrm = cpu.fetch_modrm(mem);
    let value = cpu.read_operand(mem, modrm.reg_operand(byte));
    let dst = modrm.rm_operand(cpu, byte);
    cpu.write_operand(mem, dst, value);
    Ok(())
}

/// MOV r, r/m (0x8A byte, 0x8B word).
pub fn mov_r_rm(cpu: &mut Cpu, mem: &mut Memory, opcode: u8) -> Result<(), Fault> {
    let byte = opcode & 1 == 0;
    let modrm = cpu.fetch_modrm(mem);
    let value = cpu.read_operand(mem, modrm.rm_operand(cpu, byte));
    cpu.write_operand(mem, modrm.reg_operand(byte), value);
    Ok(())
}

/// MOV r/m16, Sreg (0x8C).
pub fn mov_rm_seg(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    let modrm = cpu.fetch_modrm(mem);
    let value = cpu.read_operand(mem, modrm.seg_operand());
    let dst = modrm.rm_operand(cpu, false);
    cpu.write_operand(mem, dst, value);
    Ok(())
}

/// MOV Sreg, r/m16 (0x8E). A write to CS is accepted, as on the 8086.
pub fn mov_seg_rm(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    let modrm = cpu.fetch_modrm(mem);
    let value = cpu.read_operand(mem, modrm.rm_operand(cpu, false));
    cpu.write_operand(mem, modrm.seg_operand(), value);
    Ok(())
}

/// MOV r, imm (0xB0-0xBF). The register number is the low three opcode
/// bits; bit 3 selects byte (0) or word (1).
pub fn mov_r_imm(cpu: &mut Cpu, mem: &mut Memory, opcode: u8) -> Result<(), Fault> {
    let reg = opcode & 0b111;
    if opcode < 0xB8 {
        let imm = cpu.fetch_u8(mem);
        cpu.write_reg8(reg, imm);
    } else {
        let imm = cpu.fetch_u16(mem);
        cpu.write_reg16(reg, imm);
    }
    Ok(())
}

/// MOV r/m, imm (0xC6 byte, 0xC7 word; Group 11 with reg=0).
///
/// Other reg encodings still consume the full length but write nothing.
pub fn mov_rm_imm(cpu: &mut Cpu, mem: &mut Memory, opcode: u8) -> Result<(), Fault> {
    let byte = opcode == 0xC6;
    let modrm = cpu.fetch_modrm(mem);
    let dst = modrm.rm_operand(cpu, byte);
    let imm = if byte {
        cpu.fetch_u8(mem) as u16
    } else {
        cpu.fetch_u16(mem)
    };
    if modrm.reg == 0 {
        cpu.write_operand(mem, dst, imm);
    }
    Ok(())
}

/// MOV between the accumulator and a direct DS:disp16 address (0xA0-0xA3).
/// A latched segment override replaces DS.
pub fn mov_direct(cpu: &mut Cpu, mem: &mut Memory, opcode: u8) -> Result<(), Fault> {
    let offset = cpu.fetch_u16(mem);
    let segment = cpu.read_seg(cpu.segment_override.unwrap_or(SEG_DS));
    match opcode {
        0xA0 => {
            let value = cpu.read_mem8(mem, segment, offset);
            cpu.write_reg8(REG_AL, value);
        }
        0xA1 => {
            let value = cpu.read_mem16(mem, segment, offset);
            cpu.write_reg16(REG_AX, value);
        }
        0xA2 => {
            let value = cpu.read_reg8(REG_AL);
            cpu.write_mem8(mem, segment, offset, value);
        }
        _ => {
            let value = cpu.read_reg16(REG_AX);
            cpu.write_mem16(mem, segment, offset, value);
        }
    }
    Ok(())
}

/// XCHG r/m, r (0x86 byte, 0x87 word). With a memory operand this is a
/// read-modify-write of one resolved address.
pub fn xchg_rm_r(cpu: &mut Cpu, mem: &mut Memory, opcode: u8) -> Result<(), Fault> {
    let byte = opcode & 1 == 0;
    let modrm = cpu.fetch_modrm(mem);
    let rm = modrm.rm_operand(cpu, byte);
    let reg = modrm.reg_operand(byte);
    let rm_value = cpu.read_operand(mem, rm);
    let reg_value = cpu.read_operand(mem, reg);
    cpu.write_operand(mem, rm, reg_value);
    cpu.write_operand(mem, reg, rm_value);
    Ok(())
}

/// XCHG AX, r16 (0x91-0x97; 0x90 is NOP).
pub fn xchg_ax_r16(cpu: &mut Cpu, _mem: &mut Memory, opcode: u8) -> Result<(), Fault> {
    let reg = opcode & 0b111;
    let ax = cpu.read_reg16(REG_AX);
    let value = cpu.read_reg16(reg);
    cpu.write_reg16(REG_AX, value);
    cpu.write_reg16(reg, ax);
    Ok(())
}

/// LEA r16, m (0x8D): the effective offset itself, unsegmented, with no
/// memory access. A register operand is not a valid encoding.
pub fn lea(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    let modrm = cpu.fetch_modrm(mem);
    let offset = modrm
        .effective_offset(cpu)
        .ok_or(Fault::InvalidOperand {
            mnemonic: "LEA",
            addr: cpu.instr_addr(),
        })?;
    cpu.write_operand(mem, modrm.reg_operand(false), offset);
    Ok(())
}

/// LES r16, m16:16 (0xC4): load the register and ES from a four-byte
/// memory operand.
pub fn les(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    load_far_pointer(cpu, mem, SEG_ES, "LES")
}

/// LDS r16, m16:16 (0xC5): load the register and DS from a four-byte
/// memory operand.
pub fn lds(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    load_far_pointer(cpu, mem, SEG_DS, "LDS")
}

fn load_far_pointer(
    cpu: &mut Cpu,
    mem: &mut Memory,
    seg: u8,
    mnemonic: &'static str,
) -> Result<(), Fault> {
    let modrm = cpu.fetch_modrm(mem);
    let offset = modrm.effective_offset(cpu).ok_or(Fault::InvalidOperand {
        mnemonic,
        addr: cpu.instr_addr(),
    })?;
    let segment = modrm.segment(cpu);
    let value = cpu.read_mem16(mem, segment, offset);
    let pointer_seg = cpu.read_mem16(mem, segment, offset.wrapping_add(2));
    cpu.write_operand(mem, modrm.reg_operand(false), value);
    cpu.write_seg(seg, pointer_seg);
    Ok(())
}
