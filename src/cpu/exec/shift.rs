//! Shift and rotate handlers (Group 2, opcodes 0xD0-0xD3)
//!
//! The reg field of the ModR/M byte selects ROL, ROR, RCL, RCR, SHL/SAL,
//! SHR or SAR; D0/D1 shift by 1, D2/D3 by CL masked to 5 bits. CF always
//! receives the last bit moved out. The shift variants update SF/ZF/PF and
//! clear AF; the rotates leave those alone. OF follows the count=1 rule
//! applied to the final bit configuration for every non-zero count.

use crate::cpu::decode::Operand;
use crate::cpu::state::REG_CL;
use crate::cpu::{Cpu, Fault};
use crate::memory::Memory;

/// Group 2 dispatcher for 0xD0-0xD3.
pub fn group2(cpu: &mut Cpu, mem: &mut Memory, opcode: u8) -> Result<(), Fault> {
    let byte = opcode & 1 == 0;
    let modrm = cpu.fetch_modrm(mem);
    let rm = modrm.rm_operand(cpu, byte);
    let count = if opcode < 0xD2 {
        1
    } else {
        cpu.read_reg8(REG_CL) & 0x1F
    };
    if count == 0 {
        return Ok(());
    }
    match modrm.reg {
        0 => rol(cpu, mem, rm, byte, count),
        1 => ror(cpu, mem, rm, byte, count),
        2 => rcl(cpu, mem, rm, byte, count),
        3 => rcr(cpu, mem, rm, byte, count),
        4 | 6 => shl(cpu, mem, rm, byte, count),
        5 => shr(cpu, mem, rm, byte, count),
        7 => sar(cpu, mem, rm, byte, count),
        _ => unreachable!(),
    }
    Ok(())
}

fn msb(value: u16, byte: bool) -> bool {
    value & if byte { 0x80 } else { 0x8000 } != 0
}

fn next_msb(value: u16, byte: bool) -> bool {
    value & if byte { 0x40 } else { 0x4000 } != 0
}

/// ROL: rotate left; CF picks up the bit rotated into the LSB.
fn rol(cpu: &mut Cpu, mem: &mut Memory, rm: Operand, byte: bool, count: u8) {
    let value = cpu.read_operand(mem, rm);
    let result = if byte {
        (value as u8).rotate_left(count as u32 % 8) as u16
    } else {
        value.rotate_left(count as u32 % 16)
    };
    cpu.write_operand(mem, rm, result);
    let cf = result & 1 != 0;
    cpu.set_flag(Cpu::CF, cf);
    cpu.set_flag(Cpu::OF, cf != msb(result, byte));
}

/// ROR: rotate right; CF picks up the bit rotated into the MSB.
fn ror(cpu: &mut Cpu, mem: &mut Memory, rm: Operand, byte: bool, count: u8) {
    let value = cpu.read_operand(mem, rm);
    let result = if byte {
        (value as u8).rotate_right(count as u32 % 8) as u16
    } else {
        value.rotate_right(count as u32 % 16)
    };
    cpu.write_operand(mem, rm, result);
    cpu.set_flag(Cpu::CF, msb(result, byte));
    cpu.set_flag(Cpu::OF, msb(result, byte) != next_msb(result, byte));
}

/// RCL: 9-bit (or 17-bit) rotation through CF.
fn rcl(cpu: &mut Cpu, mem: &mut Memory, rm: Operand, byte: bool, count: u8) {
    let mut result = cpu.read_operand(mem, rm);
    let mut cf = cpu.get_flag(Cpu::CF);
    for _ in 0..count {
        let out = msb(result, byte);
        result = if byte {
            ((result << 1) & 0xFF) | cf as u16
        } else {
            (result << 1) | cf as u16
        };
        cf = out;
    }
    cpu.write_operand(mem, rm, result);
    cpu.set_flag(Cpu::CF, cf);
    cpu.set_flag(Cpu::OF, cf != msb(result, byte));
}

/// RCR: 9-bit (or 17-bit) rotation through CF, the other way.
fn rcr(cpu: &mut Cpu, mem: &mut Memory, rm: Operand, byte: bool, count: u8) {
    let mut result = cpu.read_operand(mem, rm);
    let mut cf = cpu.get_flag(Cpu::CF);
    for _ in 0..count {
        let out = result & 1 != 0;
        result = (result >> 1) | ((cf as u16) << if byte { 7 } else { 15 });
        cf = out;
    }
    cpu.write_operand(mem, rm, result);
    cpu.set_flag(Cpu::CF, cf);
    cpu.set_flag(Cpu::OF, msb(result, byte) != next_msb(result, byte));
}

/// SHL/SAL: shift left, zeros in from the right.
fn shl(cpu: &mut Cpu, mem: &mut Memory, rm: Operand, byte: bool, count: u8) {
    let value = cpu.read_operand(mem, rm);
    let count = count as u16;
    let size = if byte { 8 } else { 16 };
    let cf = count <= size && (value >> (size - count)) & 1 != 0;
    let result = if count >= size {
        0
    } else if byte {
        (value << count) & 0xFF
    } else {
        value << count
    };
    cpu.write_operand(mem, rm, result);
    shift_flags(cpu, result, byte, cf);
    cpu.set_flag(Cpu::OF, msb(result, byte) != cf);
}

/// SHR: logical shift right, zeros in from the left.
fn shr(cpu: &mut Cpu, mem: &mut Memory, rm: Operand, byte: bool, count: u8) {
    let value = cpu.read_operand(mem, rm);
    let count = count as u16;
    let size = if byte { 8 } else { 16 };
    let cf = count <= size && (value >> (count - 1)) & 1 != 0;
    let result = if count >= size { 0 } else { value >> count };
    cpu.write_operand(mem, rm, result);
    shift_flags(cpu, result, byte, cf);
    cpu.set_flag(Cpu::OF, msb(value, byte));
}

/// SAR: arithmetic shift right, the sign bit fills in from the left.
fn sar(cpu: &mut Cpu, mem: &mut Memory, rm: Operand, byte: bool, count: u8) {
    let value = cpu.read_operand(mem, rm);
    let (result, cf) = if byte {
        let wide = value as u8 as i8 as i32;
        let cf = (wide >> (count as u32 - 1).min(31)) & 1 != 0;
        (((wide >> (count as u32).min(31)) as u8) as u16, cf)
    } else {
        let wide = value as i16 as i32;
        let cf = (wide >> (count as u32 - 1).min(31)) & 1 != 0;
        ((wide >> (count as u32).min(31)) as u16, cf)
    };
    cpu.write_operand(mem, rm, result);
    shift_flags(cpu, result, byte, cf);
    cpu.set_flag(Cpu::OF, false);
}

/// Result flags shared by the three shift variants.
fn shift_flags(cpu: &mut Cpu, result: u16, byte: bool, cf: bool) {
    if byte {
        cpu.set_szp8(result as u8);
    } else {
        cpu.set_szp16(result);
    }
    cpu.set_flag(Cpu::AF, false);
    cpu.set_flag(Cpu::CF, cf);
}
