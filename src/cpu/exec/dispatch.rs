//! Opcode dispatch table
//!
//! Maps all 256 opcode bytes to their family handlers. Prefix bytes
//! (0x26/0x2E/0x36/0x3E segment overrides, 0xF2/0xF3 repeats) are consumed
//! by the prefix scan in `Cpu::step` and never reach the table; their
//! entries report an undefined opcode if anything ever routes them here.

use crate::cpu::exec::Handler;
use crate::cpu::exec::{
    arithmetic, control_flow, data_transfer, flags, handlers, io, logic, shift, stack, string,
};

/// One entry per opcode byte.
pub static DISPATCH_TABLE: [Handler; 256] = [
    // 0x00-0x0F: ADD, OR, segment stack ops
    arithmetic::add_op,   // 0x00: ADD r/m8, r8
    arithmetic::add_op,   // 0x01: ADD r/m16, r16
    arithmetic::add_op,   // 0x02: ADD r8, r/m8
    arithmetic::add_op,   // 0x03: ADD r16, r/m16
    arithmetic::add_op,   // 0x04: ADD AL, imm8
    arithmetic::add_op,   // 0x05: ADD AX, imm16
    stack::push_seg,      // 0x06: PUSH ES
    stack::pop_seg,       // 0x07: POP ES
    logic::or_op,         // 0x08: OR r/m8, r8
    logic::or_op,         // 0x09: OR r/m16, r16
    logic::or_op,         // 0x0A: OR r8, r/m8
    logic::or_op,         // 0x0B: OR r16, r/m16
    logic::or_op,         // 0x0C: OR AL, imm8
    logic::or_op,         // 0x0D: OR AX, imm16
    stack::push_seg,      // 0x0E: PUSH CS
    stack::pop_seg,       // 0x0F: POP CS (valid on the 8086)
    // 0x10-0x1F: ADC, SBB, segment stack ops
    arithmetic::adc_op,   // 0x10: ADC r/m8, r8
    arithmetic::adc_op,   // 0x11: ADC r/m16, r16
    arithmetic::adc_op,   // 0x12: ADC r8, r/m8
    arithmetic::adc_op,   // 0x13: ADC r16, r/m16
    arithmetic::adc_op,   // 0x14: ADC AL, imm8
    arithmetic::adc_op,   // 0x15: ADC AX, imm16
    stack::push_seg,      // 0x16: PUSH SS
    stack::pop_seg,       // 0x17: POP SS
    arithmetic::sbb_op,   // 0x18: SBB r/m8, r8
    arithmetic::sbb_op,   // 0x19: SBB r/m16, r16
    arithmetic::sbb_op,   // 0x1A: SBB r8, r/m8
    arithmetic::sbb_op,   // 0x1B: SBB r16, r/m16
    arithmetic::sbb_op,   // 0x1C: SBB AL, imm8
    arithmetic::sbb_op,   // 0x1D: SBB AX, imm16
    stack::push_seg,      // 0x1E: PUSH DS
    stack::pop_seg,       // 0x1F: POP DS
    // 0x20-0x2F: AND, SUB, decimal adjusts
    logic::and_op,        // 0x20: AND r/m8, r8
    logic::and_op,        // 0x21: AND r/m16, r16
    logic::and_op,        // 0x22: AND r8, r/m8
    logic::and_op,        // 0x23: AND r16, r/m16
    logic::and_op,        // 0x24: AND AL, imm8
    logic::and_op,        // 0x25: AND AX, imm16
    handlers::undefined,  // 0x26: ES: prefix (consumed by the prefix scan)
    arithmetic::daa,      // 0x27: DAA
    arithmetic::sub_op,   // 0x28: SUB r/m8, r8
    arithmetic::sub_op,   // 0x29: SUB r/m16, r16
    arithmetic::sub_op,   // 0x2A: SUB r8, r/m8
    arithmetic::sub_op,   // 0x2B: SUB r16, r/m16
    arithmetic::sub_op,   // 0x2C: SUB AL, imm8
    arithmetic::sub_op,   // 0x2D: SUB AX, imm16
    handlers::undefined,  // 0x2E: CS: prefix (consumed by the prefix scan)
    arithmetic::das,      // 0x2F: DAS
    // 0x30-0x3F: XOR, CMP, ASCII adjusts
    logic::xor_op,        // 0x30: XOR r/m8, r8
    logic::xor_op,        // 0x31: XOR r/m16, r16
    logic::xor_op,        // 0x32: XOR r8, r/m8
    logic::xor_op,        // 0x33: XOR r16, r/m16
    logic::xor_op,        // 0x34: XOR AL, imm8
    logic::xor_op,        // 0x35: XOR AX, imm16
    handlers::undefined,  // 0x36: SS: prefix (consumed by the prefix scan)
    arithmetic::aaa,      // 0x37: AAA
    arithmetic::cmp_op,   // 0x38: CMP r/m8, r8
    arithmetic::cmp_op,   // 0x39: CMP r/m16, r16
    arithmetic::cmp_op,   // 0x3A: CMP r8, r/m8
    arithmetic::cmp_op,   // 0x3B: CMP r16, r/m16
    arithmetic::cmp_op,   // 0x3C: CMP AL, imm8
    arithmetic::cmp_op,   // 0x3D: CMP AX, imm16
    handlers::undefined,  // 0x3E: DS: prefix (consumed by the prefix scan)
    arithmetic::aas,      // 0x3F: AAS
    // 0x40-0x4F: INC/DEC r16
    arithmetic::inc_r16,  // 0x40: INC AX
    arithmetic::inc_r16,  // 0x41: INC CX
    arithmetic::inc_r16,  // 0x42: INC DX
    arithmetic::inc_r16,  // 0x43: INC BX
    arithmetic::inc_r16,  // 0x44: INC SP
    arithmetic::inc_r16,  // 0x45: INC BP
    arithmetic::inc_r16,  // 0x46: INC SI
    arithmetic::inc_r16,  // 0x47: INC DI
    arithmetic::dec_r16,  // 0x48: DEC AX
    arithmetic::dec_r16,  // 0x49: DEC CX
    arithmetic::dec_r16,  // 0x4A: DEC DX
    arithmetic::dec_r16,  // 0x4B: DEC BX
    arithmetic::dec_r16,  // 0x4C: DEC SP
    arithmetic::dec_r16,  // 0x4D: DEC BP
    arithmetic::dec_r16,  // 0x4E: DEC SI
    arithmetic::dec_r16,  // 0x4F: DEC DI
    // 0x50-0x5F: PUSH/POP r16
    stack::push_r16,      // 0x50: PUSH AX
    stack::push_r16,      // 0x51: PUSH CX
    stack::push_r16,      // 0x52: PUSH DX
    stack::push_r16,      // 0x53: PUSH BX
    stack::push_r16,      // 0x54: PUSH SP (pushes the decremented value)
    stack::push_r16,      // 0x55: PUSH BP
    stack::push_r16,      // 0x56: PUSH SI
    stack::push_r16,      // 0x57: PUSH DI
    stack::pop_r16,       // 0x58: POP AX
    stack::pop_r16,       // 0x59: POP CX
    stack::pop_r16,       // 0x5A: POP DX
    stack::pop_r16,       // 0x5B: POP BX
    stack::pop_r16,       // 0x5C: POP SP
    stack::pop_r16,       // 0x5D: POP BP
    stack::pop_r16,       // 0x5E: POP SI
    stack::pop_r16,       // 0x5F: POP DI
    // 0x60-0x6F: aliases of the conditional jumps on the 8086
    control_flow::jcc,    // 0x60: JO (alias of 0x70)
    control_flow::jcc,    // 0x61: JNO (alias of 0x71)
    control_flow::jcc,    // 0x62: JB/JC (alias of 0x72)
    control_flow::jcc,    // 0x63: JNB/JNC (alias of 0x73)
    control_flow::jcc,    // 0x64: JZ/JE (alias of 0x74)
    control_flow::jcc,    // 0x65: JNZ/JNE (alias of 0x75)
    control_flow::jcc,    // 0x66: JBE (alias of 0x76)
    control_flow::jcc,    // 0x67: JNBE/JA (alias of 0x77)
    control_flow::jcc,    // 0x68: JS (alias of 0x78)
    control_flow::jcc,    // 0x69: JNS (alias of 0x79)
    control_flow::jcc,    // 0x6A: JP (alias of 0x7A)
    control_flow::jcc,    // 0x6B: JNP (alias of 0x7B)
    control_flow::jcc,    // 0x6C: JL (alias of 0x7C)
    control_flow::jcc,    // 0x6D: JNL (alias of 0x7D)
    control_flow::jcc,    // 0x6E: JLE (alias of 0x7E)
    control_flow::jcc,    // 0x6F: JNLE/JG (alias of 0x7F)
    // 0x70-0x7F: conditional jumps, short displacement
    control_flow::jcc,    // 0x70: JO
    control_flow::jcc,    // 0x71: JNO
    control_flow::jcc,    // 0x72: JB/JC
    control_flow::jcc,    // 0x73: JNB/JNC
    control_flow::jcc,    // 0x74: JZ/JE
    control_flow::jcc,    // 0x75: JNZ/JNE
    control_flow::jcc,    // 0x76: JBE
    control_flow::jcc,    // 0x77: JNBE/JA
    control_flow::jcc,    // 0x78: JS
    control_flow::jcc,    // 0x79: JNS
    control_flow::jcc,    // 0x7A: JP
    control_flow::jcc,    // 0x7B: JNP
    control_flow::jcc,    // 0x7C: JL
    control_flow::jcc,    // 0x7D: JNL
    control_flow::jcc,    // 0x7E: JLE
    control_flow::jcc,    // 0x7F: JNLE/JG
    // 0x80-0x8F: immediate ALU group, TEST, XCHG, MOV, LEA
    arithmetic::group1,         // 0x80: ALU r/m8, imm8
    arithmetic::group1,         // 0x81: ALU r/m16, imm16
    arithmetic::group1,         // 0x82: alias of 0x80
    arithmetic::group1,         // 0x83: ALU r/m16, sign-extended imm8
    logic::test_op,             // 0x84: TEST r/m8, r8
    logic::test_op,             // 0x85: TEST r/m16, r16
    data_transfer::xchg_rm_r,   // 0x86: XCHG r/m8, r8
    data_transfer::xchg_rm_r,   // 0x87: XCHG r/m16, r16
    data_transfer::mov_rm_r,    // 0x88: MOV r/m8, r8
    data_transfer::mov_rm_r,    // 0x89: MOV r/m16, r16
    data_transfer::mov_r_rm,    // 0x8A: MOV r8, r/m8
    data_transfer::mov_r_rm,    // 0x8B: MOV r16, r/m16
    data_transfer::mov_rm_seg,  // 0x8C: MOV r/m16, Sreg
    data_transfer::lea,         // 0x8D: LEA r16, m
    data_transfer::mov_seg_rm,  // 0x8E: MOV Sreg, r/m16
    stack::pop_rm,              // 0x8F: POP r/m16
    // 0x90-0x9F: XCHG AX, conversions, far CALL, flag transfers
    handlers::nop,              // 0x90: NOP (XCHG AX, AX)
    data_transfer::xchg_ax_r16, // 0x91: XCHG AX, CX
    data_transfer::xchg_ax_r16, // 0x92: XCHG AX, DX
    data_transfer::xchg_ax_r16, // 0x93: XCHG AX, BX
    data_transfer::xchg_ax_r16, // 0x94: XCHG AX, SP
    data_transfer::xchg_ax_r16, // 0x95: XCHG AX, BP
    data_transfer::xchg_ax_r16, // 0x96: XCHG AX, SI
    data_transfer::xchg_ax_r16, // 0x97: XCHG AX, DI
    arithmetic::cbw,            // 0x98: CBW
    arithmetic::cwd,            // 0x99: CWD
    control_flow::call_far,     // 0x9A: CALL far direct
    handlers::undefined,        // 0x9B: WAIT (not emulated)
    flags::pushf,               // 0x9C: PUSHF
    flags::popf,                // 0x9D: POPF
    flags::sahf,                // 0x9E: SAHF
    flags::lahf,                // 0x9F: LAHF
    // 0xA0-0xAF: direct MOV, string primitives, TEST accumulator
    data_transfer::mov_direct,  // 0xA0: MOV AL, [disp16]
    data_transfer::mov_direct,  // 0xA1: MOV AX, [disp16]
    data_transfer::mov_direct,  // 0xA2: MOV [disp16], AL
    data_transfer::mov_direct,  // 0xA3: MOV [disp16], AX
    string::movs,               // 0xA4: MOVSB
    string::movs,               // 0xA5: MOVSW
    string::cmps,               // 0xA6: CMPSB
    string::cmps,               // 0xA7: CMPSW
    logic::test_op,             // 0xA8: TEST AL, imm8
    logic::test_op,             // 0xA9: TEST AX, imm16
    string::stos,               // 0xAA: STOSB
    string::stos,               // 0xAB: STOSW
    string::lods,               // 0xAC: LODSB
    string::lods,               // 0xAD: LODSW
    string::scas,               // 0xAE: SCASB
    string::scas,               // 0xAF: SCASW
    // 0xB0-0xBF: MOV immediate to register
    data_transfer::mov_r_imm,   // 0xB0: MOV AL, imm8
    data_transfer::mov_r_imm,   // 0xB1: MOV CL, imm8
    data_transfer::mov_r_imm,   // 0xB2: MOV DL, imm8
    data_transfer::mov_r_imm,   // 0xB3: MOV BL, imm8
    data_transfer::mov_r_imm,   // 0xB4: MOV AH, imm8
    data_transfer::mov_r_imm,   // 0xB5: MOV CH, imm8
    data_transfer::mov_r_imm,   // 0xB6: MOV DH, imm8
    data_transfer::mov_r_imm,   // 0xB7: MOV BH, imm8
    data_transfer::mov_r_imm,   // 0xB8: MOV AX, imm16
    data_transfer::mov_r_imm,   // 0xB9: MOV CX, imm16
    data_transfer::mov_r_imm,   // 0xBA: MOV DX, imm16
    data_transfer::mov_r_imm,   // 0xBB: MOV BX, imm16
    data_transfer::mov_r_imm,   // 0xBC: MOV SP, imm16
    data_transfer::mov_r_imm,   // 0xBD: MOV BP, imm16
    data_transfer::mov_r_imm,   // 0xBE: MOV SI, imm16
    data_transfer::mov_r_imm,   // 0xBF: MOV DI, imm16
    // 0xC0-0xCF: RET, LES/LDS, MOV immediate, INT
    handlers::undefined,        // 0xC0: (80186 shift group, not an 8086 opcode)
    handlers::undefined,        // 0xC1: (80186 shift group, not an 8086 opcode)
    control_flow::ret_near_imm, // 0xC2: RET imm16
    control_flow::ret_near,     // 0xC3: RET
    data_transfer::les,         // 0xC4: LES r16, m16:16
    data_transfer::lds,         // 0xC5: LDS r16, m16:16
    data_transfer::mov_rm_imm,  // 0xC6: MOV r/m8, imm8
    data_transfer::mov_rm_imm,  // 0xC7: MOV r/m16, imm16
    control_flow::ret_far_imm,  // 0xC8: RETF imm16 (8086 alias of 0xCA)
    control_flow::ret_far,      // 0xC9: RETF (8086 alias of 0xCB)
    control_flow::ret_far_imm,  // 0xCA: RETF imm16
    control_flow::ret_far,      // 0xCB: RETF
    control_flow::int3,         // 0xCC: INT3
    control_flow::int_n,        // 0xCD: INT imm8
    control_flow::into,         // 0xCE: INTO
    control_flow::iret,         // 0xCF: IRET
    // 0xD0-0xDF: shifts/rotates, ASCII adjusts, FPU escapes
    shift::group2,              // 0xD0: shift/rotate r/m8, 1
    shift::group2,              // 0xD1: shift/rotate r/m16, 1
    shift::group2,              // 0xD2: shift/rotate r/m8, CL
    shift::group2,              // 0xD3: shift/rotate r/m16, CL
    arithmetic::aam,            // 0xD4: AAM imm8
    arithmetic::aad,            // 0xD5: AAD imm8
    handlers::undefined,        // 0xD6: SALC (undocumented, not emulated)
    handlers::undefined,        // 0xD7: XLAT (not emulated)
    handlers::esc,              // 0xD8: ESC (length-only)
    handlers::esc,              // 0xD9: ESC (length-only)
    handlers::esc,              // 0xDA: ESC (length-only)
    handlers::esc,              // 0xDB: ESC (length-only)
    handlers::esc,              // 0xDC: ESC (length-only)
    handlers::esc,              // 0xDD: ESC (length-only)
    handlers::esc,              // 0xDE: ESC (length-only)
    handlers::esc,              // 0xDF: ESC (length-only)
    // 0xE0-0xEF: loops, I/O, CALL/JMP
    control_flow::loopnz,       // 0xE0: LOOPNZ/LOOPNE
    control_flow::loopz,        // 0xE1: LOOPZ/LOOPE
    control_flow::loop_op,      // 0xE2: LOOP
    control_flow::jcxz,         // 0xE3: JCXZ
    io::in_imm,                 // 0xE4: IN AL, imm8
    io::in_imm,                 // 0xE5: IN AX, imm8
    io::out_imm,                // 0xE6: OUT imm8, AL
    io::out_imm,                // 0xE7: OUT imm8, AX
    control_flow::call_near,    // 0xE8: CALL near relative
    control_flow::jmp_near,     // 0xE9: JMP near
    control_flow::jmp_far,      // 0xEA: JMP far direct
    control_flow::jmp_short,    // 0xEB: JMP short
    io::in_dx,                  // 0xEC: IN AL, DX
    io::in_dx,                  // 0xED: IN AX, DX
    io::out_dx,                 // 0xEE: OUT DX, AL
    io::out_dx,                 // 0xEF: OUT DX, AX
    // 0xF0-0xFF: HLT, CMC, groups, flag bit ops
    handlers::undefined,        // 0xF0: LOCK (not emulated)
    handlers::undefined,        // 0xF1: (undocumented)
    handlers::undefined,        // 0xF2: REPNE prefix (consumed by the prefix scan)
    handlers::undefined,        // 0xF3: REP/REPE prefix (consumed by the prefix scan)
    handlers::hlt,              // 0xF4: HLT
    flags::cmc,                 // 0xF5: CMC
    arithmetic::group3,         // 0xF6: TEST/NOT/NEG/MUL/IMUL/DIV/IDIV r/m8
    arithmetic::group3,         // 0xF7: TEST/NOT/NEG/MUL/IMUL/DIV/IDIV r/m16
    flags::clc,                 // 0xF8: CLC
    flags::stc,                 // 0xF9: STC
    flags::cli,                 // 0xFA: CLI
    flags::sti,                 // 0xFB: STI
    flags::cld,                 // 0xFC: CLD
    flags::std,                 // 0xFD: STD
    control_flow::group4,       // 0xFE: INC/DEC r/m8
    control_flow::group5,       // 0xFF: INC/DEC/CALL/JMP/PUSH r/m16
];
