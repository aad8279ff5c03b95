//! vic6502 - run a raw 6502 image until it halts

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use log::{error, info};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use vic6502::disassembler::{disassemble_range, format_listing_line};
use vic6502::{Breakpoints, MachineConfig, Profile, SelfJumpHalt, Trace};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Raw binary image to load
    image: PathBuf,

    /// Load address of the image (hex)
    #[arg(long, default_value = "0000", value_parser = parse_address)]
    at: u16,

    /// Start address (hex); defaults to the reset vector
    #[arg(long, value_parser = parse_address)]
    start: Option<u16>,

    /// RAM expansion in KB (0, 3, 8, 16, 24, 32)
    #[arg(long, default_value_t = 0)]
    expansion: u16,

    /// Directory holding the chargen, basic and kernal ROMs
    #[arg(long)]
    rom_dir: Option<PathBuf>,

    /// Halt when PC reaches this address (hex); repeatable
    #[arg(long = "break", value_parser = parse_address)]
    breakpoints: Vec<u16>,

    /// Give up after this many cycles
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Log every instruction (implies -vv)
    #[arg(long)]
    trace: bool,

    /// Print the most executed addresses on exit
    #[arg(long)]
    profile: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Parses `$C000`, `0xC000` or bare hex `C000`.
fn parse_address(s: &str) -> Result<u16, String> {
    let digits = s
        .strip_prefix('$')
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid address '{}': {}", s, e))
}

fn log_level(args: &Args) -> LevelFilter {
    if args.trace {
        return LevelFilter::Trace;
    }
    match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn run(args: Args) -> Result<()> {
    let image = args.image.display();
    let config = MachineConfig {
        expansion: args.expansion,
        rom_dir: args.rom_dir.clone(),
        images: vec![(args.image.clone(), args.at)],
        start: args.start,
    };

    let mut cpu = config
        .build()
        .with_context(|| format!("Failed to build machine for {}", image))?;

    info!("Running {} from ${:04X}", image, cpu.pc());

    if !args.breakpoints.is_empty() {
        cpu.add_hook(Breakpoints::from_iter(args.breakpoints.iter().copied()));
    }
    cpu.add_hook(SelfJumpHalt);
    if args.trace {
        cpu.add_hook(Trace);
    }
    let profile = Profile::new();
    if args.profile {
        cpu.add_hook(profile.clone());
    }

    let outcome = match args.max_cycles {
        Some(budget) => cpu.run_for_cycles(budget),
        None => cpu.run().map(Some),
    };
    let trap = outcome
        .with_context(|| format!("Execution failed ({})", cpu.registers()))?;

    if args.profile {
        println!("Hottest addresses:");
        for line in profile.report(cpu.memory(), 10) {
            println!("{}", line);
        }
    }

    let Some(trap) = trap else {
        bail!(
            "cycle budget of {} exhausted ({})",
            args.max_cycles.unwrap_or_default(),
            cpu.registers()
        );
    };

    println!("Halted: {} after {} cycles", trap, cpu.cycles());
    println!("{}", cpu.registers());
    for instruction in disassemble_range(cpu.memory(), trap.pc, 3) {
        println!("  {}", format_listing_line(&instruction));
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = TermLogger::init(
        log_level(&args),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialise logging: {}", e);
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_forms() {
        assert_eq!(parse_address("$0400"), Ok(0x0400));
        assert_eq!(parse_address("0x3399"), Ok(0x3399));
        assert_eq!(parse_address("fffc"), Ok(0xFFFC));
        assert!(parse_address("10000").is_err());
        assert!(parse_address("$zz").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "vic6502",
            "test.bin",
            "--start",
            "$0400",
            "--break",
            "3399",
            "--break",
            "0x1234",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.at, 0x0000);
        assert_eq!(args.start, Some(0x0400));
        assert_eq!(args.breakpoints, vec![0x3399, 0x1234]);
        assert_eq!(log_level(&args), LevelFilter::Trace);
    }
}
