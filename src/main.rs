//! infeed-emu: cycle model of a convolution front-end input fetch path

use std::env;

use infeed_emu::config::{self, Config};
use infeed_emu::engine::FetchEngine;
use infeed_emu::mem::BankedRam;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init();

    let mut config = Config::load();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--base" => {
                config.base_addr = Some(flag_value(&mut iter, "--base")? as u32);
            }
            "--cycles" => {
                config.cycles = Some(flag_value(&mut iter, "--cycles")?);
            }
            "--advance-period" => {
                config.advance_period = Some(flag_value(&mut iter, "--advance-period")? as u32);
            }
            "--image" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--image requires a path"))?;
                config.image = Some(path.clone());
            }
            other => {
                return Err(anyhow::anyhow!("Unknown argument '{}' (try --help)", other));
            }
        }
    }

    // Memory contents: a file image when given, an address ramp otherwise.
    let mut ram = BankedRam::new();
    match config.image() {
        Some(path) => {
            println!("Loading image: {}", path);
            let data = std::fs::read(path)?;
            ram.load_bytes(0, &data)?;
            println!("Loaded {} bytes at address 0", data.len());
        }
        None => {
            ram.fill_ramp();
            println!("No image configured; memory holds an address ramp");
        }
    }

    let mut engine = FetchEngine::new(ram).with_advance_period(config.advance_period());
    engine.set_base_addr(config.base_addr());
    engine.start();

    println!(
        "Scanning from 0x{:05x} for {} cycles (advance every {} cycle{})",
        config.base_addr(),
        config.cycles(),
        config.advance_period(),
        if config.advance_period() == 1 { "" } else { "s" },
    );

    let samples = engine.run(config.cycles());

    print_first_windows(&samples);

    let stats = engine.stats();
    println!();
    println!("Run Summary");
    println!("===========");
    println!("Cycles:      {}", stats.cycles);
    println!("Windows:     {}", stats.samples);
    println!("Addresses:   {}", stats.addresses);
    println!("Row wraps:   {}", stats.row_wraps);

    Ok(())
}

/// Fetch and parse the integer value following a flag.
fn flag_value<'a>(
    iter: &mut impl Iterator<Item = &'a String>,
    flag: &str,
) -> anyhow::Result<u64> {
    let value = iter
        .next()
        .ok_or_else(|| anyhow::anyhow!("{} requires a value", flag))?;
    config::parse_int(value)
        .ok_or_else(|| anyhow::anyhow!("{} expects an integer, got '{}'", flag, value))
}

/// Show the window pair produced at each of the first few scan addresses.
fn print_first_windows(samples: &[infeed_emu::engine::WindowSample]) {
    println!();
    println!("First window pairs:");
    let mut last_addr = None;
    let mut shown = 0usize;
    for sample in samples {
        if last_addr == Some(sample.addr) {
            continue;
        }
        last_addr = Some(sample.addr);
        println!(
            "  0x{:05x}: out0=0x{:08x}  out1=0x{:08x}",
            sample.addr, sample.pair.out0, sample.pair.out1
        );
        shown += 1;
        if shown == 16 {
            break;
        }
    }
    if shown == 0 {
        println!("  (none; run was too short to fill the pipeline)");
    }
}

/// Print usage information.
fn print_help() {
    println!("infeed-emu: cycle model of a convolution front-end input fetch path");
    println!();
    println!("Usage: infeed-emu [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --base <addr>         First window address (decimal or 0x hex)");
    println!("  --cycles <n>          Clock cycles to run (default 2000)");
    println!("  --advance-period <n>  Cycles between advance pulses (default 1)");
    println!("  --image <path>        Raw byte image loaded at address 0");
    println!("  -h, --help            Show this help");
    if let Some(path) = Config::user_config_path() {
        println!();
        println!("Config files: ./infeed-emu.toml, {}", path.display());
    }
}
