//! Single-step reference test runner
//!
//! Consumes per-opcode `XX.json.gz` files of single-instruction test cases
//! captured from real hardware: each case gives initial registers, sparse
//! initial RAM and the instruction bytes, then the expected final
//! registers and RAM. Every case runs one `step` on a fresh CPU and must
//! reproduce every reported register and memory byte.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use flate2::read::GzDecoder;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use ox86::cpu::state::{
    REG_AX, REG_BP, REG_BX, REG_CX, REG_DI, REG_DX, REG_SI, REG_SP, SEG_CS, SEG_DS, SEG_ES, SEG_SS,
};
use ox86::cpu::Cpu;
use ox86::memory::Memory;

#[derive(Parser)]
#[command(about = "Run single-step reference tests against the 8086 core")]
struct Args {
    /// Directory holding the per-opcode .json.gz files
    #[arg(short, long, default_value = "tests/8086/v1")]
    dir: PathBuf,

    /// Run only this opcode (file stem, e.g. "A4")
    opcode: Option<String>,

    /// Report every case, not just failures
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Deserialize)]
struct Case {
    name: String,
    bytes: Vec<u8>,
    initial: CpuImage,
    #[serde(rename = "final")]
    end: CpuImage,
}

#[derive(Deserialize)]
struct CpuImage {
    regs: Regs,
    #[serde(default)]
    ram: Vec<(u32, u8)>,
}

/// Register image. Fields absent from a final state are expected to be
/// unchanged, so everything is optional.
#[derive(Deserialize, Default)]
#[serde(default)]
struct Regs {
    ax: Option<u16>,
    bx: Option<u16>,
    cx: Option<u16>,
    dx: Option<u16>,
    cs: Option<u16>,
    ss: Option<u16>,
    ds: Option<u16>,
    es: Option<u16>,
    sp: Option<u16>,
    bp: Option<u16>,
    si: Option<u16>,
    di: Option<u16>,
    ip: Option<u16>,
    flags: Option<u16>,
}

#[derive(Default)]
struct Stats {
    total_cases: usize,
    failed_cases: usize,
    total_files: usize,
    passed_files: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut stats = Stats::default();

    if let Some(opcode) = &args.opcode {
        let path = args.dir.join(format!("{opcode}.json.gz"));
        run_file(&path, &mut stats, args.verbose)?;
    } else {
        let mut files: Vec<PathBuf> = std::fs::read_dir(&args.dir)
            .with_context(|| format!("failed to read {}", args.dir.display()))?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.to_string_lossy().ends_with(".json.gz"))
            .collect();
        files.sort();
        if files.is_empty() {
            bail!("no .json.gz files in {}", args.dir.display());
        }
        for path in files {
            run_file(&path, &mut stats, args.verbose)?;
        }
    }

    println!(
        "\n{}/{} cases passed, {}/{} opcode files clean",
        stats.total_cases - stats.failed_cases,
        stats.total_cases,
        stats.passed_files,
        stats.total_files,
    );
    if stats.failed_cases > 0 {
        bail!("{} failing cases", stats.failed_cases);
    }
    Ok(())
}

fn run_file(path: &Path, stats: &mut Stats, verbose: bool) -> Result<()> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let cases: Vec<Case> = serde_json::from_reader(BufReader::new(GzDecoder::new(file)))
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let mut failed = 0;
    for case in &cases {
        let mismatches = run_case(case);
        if mismatches.is_empty() {
            if verbose {
                println!("  PASS: {}", case.name);
            }
        } else {
            failed += 1;
            if verbose || failed <= 10 {
                println!("  FAIL: {}", case.name);
                for line in &mismatches {
                    println!("        {line}");
                }
            }
        }
    }

    stats.total_cases += cases.len();
    stats.failed_cases += failed;
    stats.total_files += 1;
    if failed == 0 {
        stats.passed_files += 1;
        println!("ok   {}: {} cases", path.display(), cases.len());
    } else {
        println!(
            "FAIL {}: {}/{} cases",
            path.display(),
            cases.len() - failed,
            cases.len()
        );
    }
    Ok(())
}

fn run_case(case: &Case) -> Vec<String> {
    let mut cpu = Cpu::new();
    let mut mem = Memory::new();

    apply_regs(&mut cpu, &case.initial.regs);
    for &(addr, value) in &case.initial.ram {
        mem.write_u8(addr, value);
    }
    let pc = Cpu::compute_address(cpu.read_seg(SEG_CS), cpu.ip);
    mem.load(&case.bytes, pc);

    // A fault still leaves architectural state worth comparing.
    let _ = cpu.step(&mut mem);

    let mut mismatches = Vec::new();
    let expected = &case.end.regs;
    let mut check = |name: &str, expected: Option<u16>, actual: u16| {
        if let Some(expected) = expected {
            if expected != actual {
                mismatches.push(format!("{name} = {actual:#06X} (expected {expected:#06X})"));
            }
        }
    };
    check("ax", expected.ax, cpu.read_reg16(REG_AX));
    check("bx", expected.bx, cpu.read_reg16(REG_BX));
    check("cx", expected.cx, cpu.read_reg16(REG_CX));
    check("dx", expected.dx, cpu.read_reg16(REG_DX));
    check("cs", expected.cs, cpu.read_seg(SEG_CS));
    check("ss", expected.ss, cpu.read_seg(SEG_SS));
    check("ds", expected.ds, cpu.read_seg(SEG_DS));
    check("es", expected.es, cpu.read_seg(SEG_ES));
    check("sp", expected.sp, cpu.read_reg16(REG_SP));
    check("bp", expected.bp, cpu.read_reg16(REG_BP));
    check("si", expected.si, cpu.read_reg16(REG_SI));
    check("di", expected.di, cpu.read_reg16(REG_DI));
    check("ip", expected.ip, cpu.ip);
    check("flags", expected.flags, cpu.get_flags());

    for &(addr, value) in &case.end.ram {
        let actual = mem.read_u8(addr);
        if actual != value {
            mismatches.push(format!(
                "[{addr:#07X}] = {actual:#04X} (expected {value:#04X})"
            ));
        }
    }
    mismatches
}

fn apply_regs(cpu: &mut Cpu, regs: &Regs) {
    let general = [
        (REG_AX, regs.ax),
        (REG_BX, regs.bx),
        (REG_CX, regs.cx),
        (REG_DX, regs.dx),
        (REG_SP, regs.sp),
        (REG_BP, regs.bp),
        (REG_SI, regs.si),
        (REG_DI, regs.di),
    ];
    for (reg, value) in general {
        if let Some(value) = value {
            cpu.write_reg16(reg, value);
        }
    }
    let segments = [
        (SEG_CS, regs.cs),
        (SEG_SS, regs.ss),
        (SEG_DS, regs.ds),
        (SEG_ES, regs.es),
    ];
    for (seg, value) in segments {
        if let Some(value) = value {
            cpu.write_seg(seg, value);
        }
    }
    if let Some(ip) = regs.ip {
        cpu.ip = ip;
    }
    if let Some(flags) = regs.flags {
        cpu.set_flags(flags);
    }
}
