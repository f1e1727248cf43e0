//! Flag transfer and flag bit instruction tests

use ox86::cpu::{Cpu, CpuHarness};

#[test]
fn test_clc_stc() {
    let mut harness = CpuHarness::new();
    harness.cpu.set_flag(Cpu::CF, true);

    harness.load_program(&[0xF8, 0xF9], 0); // CLC; STC
    harness.step().unwrap();
    assert!(!harness.cpu.get_flag(Cpu::CF));

    harness.step().unwrap();
    assert!(harness.cpu.get_flag(Cpu::CF));
    assert_eq!(harness.cpu.ip, 2);
}

#[test]
fn test_cmc() {
    let mut harness = CpuHarness::new();
    harness.load_program(&[0xF5, 0xF5], 0); // CMC twice
    harness.cpu.set_flag(Cpu::CF, false);

    harness.step().unwrap();
    assert!(harness.cpu.get_flag(Cpu::CF));

    harness.step().unwrap();
    assert!(!harness.cpu.get_flag(Cpu::CF));
}

#[test]
fn test_cli_sti() {
    let mut harness = CpuHarness::new();
    harness.load_program(&[0xFB, 0xFA], 0); // STI; CLI

    harness.step().unwrap();
    assert!(harness.cpu.get_flag(Cpu::IF));

    harness.step().unwrap();
    assert!(!harness.cpu.get_flag(Cpu::IF));
}

#[test]
fn test_cld_std() {
    let mut harness = CpuHarness::new();
    harness.load_program(&[0xFD, 0xFC], 0); // STD; CLD

    harness.step().unwrap();
    assert!(harness.cpu.get_flag(Cpu::DF));

    harness.step().unwrap();
    assert!(!harness.cpu.get_flag(Cpu::DF));
}

#[test]
fn test_lahf_fixed_bits() {
    let mut harness = CpuHarness::new();
    harness.load_program(&[0x9F], 0); // LAHF with all flags clear

    harness.step().unwrap();
    let ah = harness.cpu.read_reg8(4); // AH
    assert_eq!(ah & 0x02, 0x02); // bit 1 always reads 1
    assert_eq!(ah & 0x28, 0x00); // bits 3 and 5 always read 0
}

#[test]
fn test_sahf_loads_low_flags() {
    let mut harness = CpuHarness::new();
    harness.load_program(&[0x9E], 0); // SAHF
    harness.cpu.write_reg8(4, 0xFF); // AH: try to set everything

    harness.step().unwrap();
    assert!(harness.cpu.get_flag(Cpu::SF));
    assert!(harness.cpu.get_flag(Cpu::ZF));
    assert!(harness.cpu.get_flag(Cpu::AF));
    assert!(harness.cpu.get_flag(Cpu::PF));
    assert!(harness.cpu.get_flag(Cpu::CF));
    // The reserved low bits stay fixed
    assert_eq!(harness.cpu.get_flags() & 0x2A, 0x02);
}

#[test]
fn test_sahf_does_not_touch_high_flags() {
    let mut harness = CpuHarness::new();
    harness.load_program(&[0x9E], 0); // SAHF
    harness.cpu.set_flag(Cpu::OF, true);
    harness.cpu.set_flag(Cpu::DF, true);
    harness.cpu.write_reg8(4, 0x00); // AH

    harness.step().unwrap();
    assert!(harness.cpu.get_flag(Cpu::OF));
    assert!(harness.cpu.get_flag(Cpu::DF));
    assert!(!harness.cpu.get_flag(Cpu::CF));
}

#[test]
fn test_lahf_sahf_roundtrip() {
    let mut harness = CpuHarness::new();
    harness.load_program(&[0x9F, 0x9E], 0); // LAHF; SAHF
    harness.cpu.set_flag(Cpu::SF, true);
    harness.cpu.set_flag(Cpu::CF, true);
    let before = harness.cpu.get_flags();

    harness.step().unwrap();
    harness.step().unwrap();
    assert_eq!(harness.cpu.get_flags(), before);
    assert_eq!(harness.cpu.get_flags() & 0x02, 0x02);
}

#[test]
fn test_pushf_writes_hardware_image() {
    let mut harness = CpuHarness::new();
    harness.load_program(&[0x9C], 0); // PUSHF
    harness.cpu.set_flag(Cpu::CF, true);

    harness.step().unwrap();
    let sp = harness.cpu.regs[4];
    assert_eq!(sp, 0xFFFC);
    let pushed = harness.mem.read_u16(sp as u32); // SS = 0
    assert_eq!(pushed & 0x0001, 0x0001); // CF
    assert_eq!(pushed & 0xF002, 0xF002); // reserved bits read as 1
}

#[test]
fn test_popf_normalizes() {
    let mut harness = CpuHarness::new();
    harness.load_program(&[0x9D], 0); // POPF
    harness.cpu.regs[4] = 0x0100; // SP
    harness.mem.write_u16(0x0100, 0xFFFF);

    harness.step().unwrap();
    assert_eq!(harness.cpu.get_flags(), 0xFFD7);
    assert_eq!(harness.cpu.regs[4], 0x0102); // SP
}

#[test]
fn test_pushf_popf_roundtrip() {
    let mut harness = CpuHarness::new();
    harness.load_program(&[0x9C, 0x9D], 0); // PUSHF; POPF
    harness.cpu.set_flag(Cpu::OF, true);
    harness.cpu.set_flag(Cpu::AF, true);
    let before = harness.cpu.get_flags();

    harness.step().unwrap();
    harness.step().unwrap();
    assert_eq!(harness.cpu.get_flags(), before);
    assert_eq!(harness.cpu.regs[4], 0xFFFE); // SP back where it started
}

#[test]
fn test_flags_string_order() {
    let mut harness = CpuHarness::new();
    harness.cpu.set_flag(Cpu::ZF, true);
    harness.cpu.set_flag(Cpu::CF, true);

    assert_eq!(harness.cpu.flags_string(), "oditsZapC");
}
