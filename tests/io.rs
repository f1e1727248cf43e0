//! I/O port instruction tests
//!
//! No devices exist: reads are all-ones, writes vanish, IP still moves.

use ox86::cpu::CpuHarness;

#[test]
fn test_in_al_imm8() {
    let mut harness = CpuHarness::new();
    harness.load_program(&[0xE4, 0x60], 0); // IN AL, 0x60
    harness.cpu.regs[0] = 0x1200; // AH preserved, AL overwritten

    harness.step().unwrap();
    assert_eq!(harness.cpu.read_reg8(0), 0xFF); // AL
    assert_eq!(harness.cpu.read_reg8(4), 0x12); // AH
    assert_eq!(harness.cpu.ip, 2);
}

#[test]
fn test_in_ax_imm8() {
    let mut harness = CpuHarness::new();
    harness.load_program(&[0xE5, 0x40], 0); // IN AX, 0x40

    harness.step().unwrap();
    assert_eq!(harness.cpu.regs[0], 0xFFFF); // AX
    assert_eq!(harness.cpu.ip, 2);
}

#[test]
fn test_in_from_dx() {
    let mut harness = CpuHarness::new();
    harness.load_program(&[0xEC, 0xED], 0); // IN AL, DX; IN AX, DX
    harness.cpu.regs[2] = 0x03F8; // DX

    harness.step().unwrap();
    assert_eq!(harness.cpu.read_reg8(0), 0xFF); // AL
    assert_eq!(harness.cpu.ip, 1);

    harness.step().unwrap();
    assert_eq!(harness.cpu.regs[0], 0xFFFF); // AX
    assert_eq!(harness.cpu.ip, 2);
}

#[test]
fn test_out_discards() {
    let mut harness = CpuHarness::new();
    // OUT 0x60, AL; OUT DX, AX
    harness.load_program(&[0xE6, 0x60, 0xEF], 0);
    harness.cpu.regs[0] = 0xA5A5; // AX
    harness.cpu.regs[2] = 0x03F8; // DX

    harness.step().unwrap();
    assert_eq!(harness.cpu.ip, 2);

    harness.step().unwrap();
    assert_eq!(harness.cpu.ip, 3);
    assert_eq!(harness.cpu.regs[0], 0xA5A5); // AX untouched
}
