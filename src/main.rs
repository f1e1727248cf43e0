//! BIOS image runner
//!
//! Loads a ROM image into the 1 MiB address space (by convention at
//! 0xF0000, so the reset vector at F000:FFF0 lands on the ROM's entry
//! jump) and drives the CPU until it halts, faults, or runs out of steps.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ox86::cpu::state::SEG_CS;
use ox86::cpu::Cpu;
use ox86::memory::Memory;

#[derive(Parser)]
#[command(about = "Run a BIOS image on the 8086 core")]
struct Args {
    /// ROM image to load
    bios: PathBuf,

    /// Physical load address of the image (hex)
    #[arg(long, default_value = "F0000", value_parser = parse_hex)]
    load_addr: u32,

    /// Maximum number of instructions to execute
    #[arg(long, default_value_t = 1_000_000)]
    steps: u64,

    /// Print registers and flags after every instruction
    #[arg(long)]
    trace: bool,

    /// Write the final 1 MiB memory image to this file
    #[arg(long)]
    ram_dump: Option<PathBuf>,
}

fn parse_hex(value: &str) -> Result<u32, String> {
    let digits = value.trim_start_matches("0x").trim_start_matches("0X");
    u32::from_str_radix(digits, 16).map_err(|err| err.to_string())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let image = fs::read(&args.bios)
        .with_context(|| format!("failed to read ROM image {}", args.bios.display()))?;

    let mut mem = Memory::new();
    mem.load(&image, args.load_addr);
    let mut cpu = Cpu::new();

    let mut executed = 0u64;
    while cpu.running && executed < args.steps {
        if let Err(fault) = cpu.step(&mut mem) {
            eprintln!("stopped: {fault}");
            break;
        }
        executed += 1;
        if args.trace {
            print_state(&cpu);
        }
    }

    println!(
        "executed {} instructions, stopped at {:04X}:{:04X}",
        executed,
        cpu.read_seg(SEG_CS),
        cpu.ip
    );

    if let Some(path) = args.ram_dump {
        fs::write(&path, mem.bytes())
            .with_context(|| format!("failed to write RAM dump {}", path.display()))?;
        println!("wrote {} bytes to {}", mem.bytes().len(), path.display());
    }

    Ok(())
}

fn print_state(cpu: &Cpu) {
    println!(
        "{:04X}:{:04X}  AX={:04X} BX={:04X} CX={:04X} DX={:04X} \
         SP={:04X} BP={:04X} SI={:04X} DI={:04X}  [{}]",
        cpu.read_seg(SEG_CS),
        cpu.ip,
        cpu.regs[0],
        cpu.regs[3],
        cpu.regs[1],
        cpu.regs[2],
        cpu.regs[4],
        cpu.regs[5],
        cpu.regs[6],
        cpu.regs[7],
        cpu.flags_string()
    );
}
