//! Control flow handlers (Jcc, LOOP, JMP, CALL, RET, INT, Groups 4/5)

use crate::cpu::exec::arithmetic;
use crate::cpu::exec::stack::{pop_word, push_register_or_memory, push_word};
use crate::cpu::state::{REG_CX, REG_SP, SEG_CS};
use crate::cpu::{Cpu, Fault};
use crate::memory::Memory;

/// Conditional jumps (0x70-0x7F, with 0x60-0x6F as 8086 aliases).
///
/// IP has already advanced past the encoding when the sign-extended
/// displacement is applied. The predicate is the canonical low-nibble
/// table: JO, JNO, JB, JNB, JZ, JNZ, JBE, JNBE, JS, JNS, JP, JNP, JL,
/// JNL, JLE, JNLE.
pub fn jcc(cpu: &mut Cpu, mem: &mut Memory, opcode: u8) -> Result<(), Fault> {
    let disp = cpu.fetch_i8(mem) as i16 as u16;
    let taken = match opcode & 0x0F {
        0x0 => cpu.get_flag(Cpu::OF),
        0x1 => !cpu.get_flag(Cpu::OF),
        0x2 => cpu.get_flag(Cpu::CF),
        0x3 => !cpu.get_flag(Cpu::CF),
        0x4 => cpu.get_flag(Cpu::ZF),
        0x5 => !cpu.get_flag(Cpu::ZF),
        0x6 => cpu.get_flag(Cpu::CF) || cpu.get_flag(Cpu::ZF),
        0x7 => !cpu.get_flag(Cpu::CF) && !cpu.get_flag(Cpu::ZF),
        0x8 => cpu.get_flag(Cpu::SF),
        0x9 => !cpu.get_flag(Cpu::SF),
        0xA => cpu.get_flag(Cpu::PF),
        0xB => !cpu.get_flag(Cpu::PF),
        0xC => cpu.get_flag(Cpu::SF) != cpu.get_flag(Cpu::OF),
        0xD => cpu.get_flag(Cpu::SF) == cpu.get_flag(Cpu::OF),
        0xE => cpu.get_flag(Cpu::ZF) || (cpu.get_flag(Cpu::SF) != cpu.get_flag(Cpu::OF)),
        _ => !cpu.get_flag(Cpu::ZF) && (cpu.get_flag(Cpu::SF) == cpu.get_flag(Cpu::OF)),
    };
    if taken {
        cpu.ip = cpu.ip.wrapping_add(disp);
    }
    Ok(())
}

/// JCXZ (0xE3): branch iff CX is zero.
pub fn jcxz(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    let disp = cpu.fetch_i8(mem) as i16 as u16;
    if cpu.read_reg16(REG_CX) == 0 {
        cpu.ip = cpu.ip.wrapping_add(disp);
    }
    Ok(())
}

/// LOOP (0xE2): decrement CX, branch while non-zero.
pub fn loop_op(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    let disp = cpu.fetch_i8(mem) as i16 as u16;
    let cx = cpu.read_reg16(REG_CX).wrapping_sub(1);
    cpu.write_reg16(REG_CX, cx);
    if cx != 0 {
        cpu.ip = cpu.ip.wrapping_add(disp);
    }
    Ok(())
}

/// LOOPZ/LOOPE (0xE1): branch while CX != 0 and ZF set.
pub fn loopz(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    let disp = cpu.fetch_i8(mem) as i16 as u16;
    let cx = cpu.read_reg16(REG_CX).wrapping_sub(1);
    cpu.write_reg16(REG_CX, cx);
    if cx != 0 && cpu.get_flag(Cpu::ZF) {
        cpu.ip = cpu.ip.wrapping_add(disp);
    }
    Ok(())
}

/// LOOPNZ/LOOPNE (0xE0): branch while CX != 0 and ZF clear.
pub fn loopnz(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    let disp = cpu.fetch_i8(mem) as i16 as u16;
    let cx = cpu.read_reg16(REG_CX).wrapping_sub(1);
    cpu.write_reg16(REG_CX, cx);
    if cx != 0 && !cpu.get_flag(Cpu::ZF) {
        cpu.ip = cpu.ip.wrapping_add(disp);
    }
    Ok(())
}

/// JMP short (0xEB): sign-extended 8-bit displacement.
pub fn jmp_short(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    let disp = cpu.fetch_i8(mem) as i16 as u16;
    cpu.ip = cpu.ip.wrapping_add(disp);
    Ok(())
}

/// JMP near (0xE9): 16-bit displacement.
pub fn jmp_near(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    let disp = cpu.fetch_u16(mem);
    cpu.ip = cpu.ip.wrapping_add(disp);
    Ok(())
}

/// JMP far direct (0xEA): imm16 offset then imm16 segment.
pub fn jmp_far(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    let new_ip = cpu.fetch_u16(mem);
    let new_cs = cpu.fetch_u16(mem);
    cpu.write_seg(SEG_CS, new_cs);
    cpu.ip = new_ip;
    Ok(())
}

/// CALL near relative (0xE8): push next-IP, then add the displacement.
pub fn call_near(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    let disp = cpu.fetch_u16(mem);
    let return_ip = cpu.ip;
    push_word(cpu, mem, return_ip);
    cpu.ip = return_ip.wrapping_add(disp);
    Ok(())
}

/// CALL far direct (0x9A): push CS, push next-IP, load the new CS:IP.
pub fn call_far(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    let new_ip = cpu.fetch_u16(mem);
    let new_cs = cpu.fetch_u16(mem);
    let cs = cpu.read_seg(SEG_CS);
    let return_ip = cpu.ip;
    push_word(cpu, mem, cs);
    push_word(cpu, mem, return_ip);
    cpu.write_seg(SEG_CS, new_cs);
    cpu.ip = new_ip;
    Ok(())
}

/// RET near (0xC3).
pub fn ret_near(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    cpu.ip = pop_word(cpu, mem);
    Ok(())
}

/// RET near imm16 (0xC2): releases that many bytes of arguments.
pub fn ret_near_imm(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    let release = cpu.fetch_u16(mem);
    cpu.ip = pop_word(cpu, mem);
    let sp = cpu.read_reg16(REG_SP).wrapping_add(release);
    cpu.write_reg16(REG_SP, sp);
    Ok(())
}

/// RET far (0xCB; 0xC9 decodes the same way on the 8086).
pub fn ret_far(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    cpu.ip = pop_word(cpu, mem);
    let cs = pop_word(cpu, mem);
    cpu.write_seg(SEG_CS, cs);
    Ok(())
}

/// RET far imm16 (0xCA; 0xC8 decodes the same way on the 8086).
pub fn ret_far_imm(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    let release = cpu.fetch_u16(mem);
    cpu.ip = pop_word(cpu, mem);
    let cs = pop_word(cpu, mem);
    cpu.write_seg(SEG_CS, cs);
    let sp = cpu.read_reg16(REG_SP).wrapping_add(release);
    cpu.write_reg16(REG_SP, sp);
    Ok(())
}

/// INT imm8 (0xCD).
pub fn int_n(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    let vector = cpu.fetch_u8(mem);
    enter_interrupt(cpu, mem, vector);
    Ok(())
}

/// INT3 (0xCC): the one-byte breakpoint encoding.
pub fn int3(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    enter_interrupt(cpu, mem, 3);
    Ok(())
}

/// INTO (0xCE): vector 4, only when OF is set.
pub fn into(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    if cpu.get_flag(Cpu::OF) {
        enter_interrupt(cpu, mem, 4);
    }
    Ok(())
}

/// IRET (0xCF): pop IP, CS, FLAGS.
pub fn iret(cpu: &mut Cpu, mem: &mut Memory, _opcode: u8) -> Result<(), Fault> {
    cpu.ip = pop_word(cpu, mem);
    let cs = pop_word(cpu, mem);
    cpu.write_seg(SEG_CS, cs);
    let flags = pop_word(cpu, mem);
    cpu.set_flags(flags);
    Ok(())
}

/// Common interrupt entry: push FLAGS, CS, next-IP (so IP pops first),
/// clear IF and TF, then load CS:IP from the four-byte vector at
/// `vector * 4` (IP word first, CS word second).
pub(crate) fn enter_interrupt(cpu: &mut Cpu, mem: &mut Memory, vector: u8) {
    let flags = cpu.get_flags();
    push_word(cpu, mem, flags);
    cpu.set_flag(Cpu::IF, false);
    cpu.set_flag(Cpu::TF, false);

    let cs = cpu.read_seg(SEG_CS);
    let return_ip = cpu.ip;
    push_word(cpu, mem, cs);
    push_word(cpu, mem, return_ip);

    let table = vector as u32 * 4;
    cpu.ip = mem.read_u16(table);
    let new_cs = mem.read_u16(table + 2);
    cpu.write_seg(SEG_CS, new_cs);
}

/// Group 4 (0xFE): byte INC/DEC r/m only; other reg values are not
/// instructions.
pub fn group4(cpu: &mut Cpu, mem: &mut Memory, opcode: u8) -> Result<(), Fault> {
    let modrm = cpu.fetch_modrm(mem);
    let rm = modrm.rm_operand(cpu, true);
    match modrm.reg {
        0 => arithmetic::inc_operand(cpu, mem, rm, true),
        1 => arithmetic::dec_operand(cpu, mem, rm, true),
        _ => {
            return Err(Fault::UndefinedOpcode {
                opcode,
                addr: cpu.instr_addr(),
            })
        }
    }
    Ok(())
}

/// Group 5 (0xFF): INC/DEC/CALL/JMP/PUSH r/m16 by reg field.
pub fn group5(cpu: &mut Cpu, mem: &mut Memory, opcode: u8) -> Result<(), Fault> {
    let modrm = cpu.fetch_modrm(mem);
    let rm = modrm.rm_operand(cpu, false);
    match modrm.reg {
        0 => arithmetic::inc_operand(cpu, mem, rm, false),
        1 => arithmetic::dec_operand(cpu, mem, rm, false),
        2 => {
            // CALL near indirect.
            let target = cpu.read_operand(mem, rm);
            let return_ip = cpu.ip;
            push_word(cpu, mem, return_ip);
            cpu.ip = target;
        }
        3 => {
            // CALL far through a four-byte memory operand.
            let (new_ip, new_cs) = read_far_operand(cpu, mem, &modrm, "CALL far")?;
            let cs = cpu.read_seg(SEG_CS);
            let return_ip = cpu.ip;
            push_word(cpu, mem, cs);
            push_word(cpu, mem, return_ip);
            cpu.write_seg(SEG_CS, new_cs);
            cpu.ip = new_ip;
        }
        4 => {
            // JMP near indirect.
            cpu.ip = cpu.read_operand(mem, rm);
        }
        5 => {
            // JMP far through memory.
            let (new_ip, new_cs) = read_far_operand(cpu, mem, &modrm, "JMP far")?;
            cpu.write_seg(SEG_CS, new_cs);
            cpu.ip = new_ip;
        }
        6 => push_register_or_memory(cpu, mem, rm),
        _ => {
            return Err(Fault::UndefinedOpcode {
                opcode,
                addr: cpu.instr_addr(),
            })
        }
    }
    Ok(())
}

/// Read the offset:segment pair of a far indirect operand. The second word
/// sits at EA+2 with 16-bit offset wrap, in the same segment. A register
/// form is not a valid encoding.
fn read_far_operand(
    cpu: &mut Cpu,
    mem: &Memory,
    modrm: &crate::cpu::decode::ModRm,
    mnemonic: &'static str,
) -> Result<(u16, u16), Fault> {
    let offset = modrm.effective_offset(cpu).ok_or(Fault::InvalidOperand {
        mnemonic,
        addr: cpu.instr_addr(),
    })?;
    let segment = modrm.segment(cpu);
    let new_ip = cpu.read_mem16(mem, segment, offset);
    let new_cs = cpu.read_mem16(mem, segment, offset.wrapping_add(2));
    Ok((new_ip, new_cs))
}
