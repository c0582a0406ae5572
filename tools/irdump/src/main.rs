//! a64tcg-irdump: A64 code → IR dump tool.
//!
//! Takes A64 instruction words (on the command line or as a raw
//! little-endian code image), translates them block by block into IR,
//! and prints the IR in a human-readable format.

use std::fs;
use std::io::{self, BufWriter, Write};

use a64tcg_core::dump::dump_ops_with;
use a64tcg_core::Context;
use a64tcg_frontend::aarch64::ext::A64Cfg;
use a64tcg_frontend::aarch64::insn_decode::mnemonic;
use a64tcg_frontend::aarch64::translate_block;
use anyhow::{bail, Context as _, Result};
use clap::{Arg, ArgAction, Command};
use log::{info, warn};

struct Args {
    words: Vec<u32>,
    start: u64,
    count: Option<usize>,
    max_insns: u32,
    integer_only: bool,
    output: Option<String>,
}

fn parse_hex_u64(s: &str) -> Result<u64> {
    let s = s.trim_start_matches("0x");
    u64::from_str_radix(s, 16).with_context(|| format!("invalid hex value `{s}`"))
}

fn parse_word(s: &str) -> Result<u32> {
    let v = parse_hex_u64(s)?;
    u32::try_from(v).with_context(|| format!("`{s}` is wider than 32 bits"))
}

/// Split a raw code image into little-endian words.
fn image_words(data: &[u8]) -> Result<Vec<u32>> {
    if data.len() % 4 != 0 {
        bail!("code image length {} is not a multiple of 4", data.len());
    }
    Ok(data
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

fn parse_args() -> Result<Args> {
    let matches = Command::new("a64tcg-irdump")
        .about("Translate A64 instruction words and dump the IR")
        .arg(
            Arg::new("words")
                .value_name("HEX")
                .help("Instruction words, e.g. 7ee28c20")
                .num_args(0..)
                .conflicts_with("image"),
        )
        .arg(
            Arg::new("image")
                .short('i')
                .long("image")
                .value_name("FILE")
                .help("Raw little-endian code image"),
        )
        .arg(
            Arg::new("start")
                .long("start")
                .value_name("HEX")
                .help("Guest address of the first word")
                .default_value("0"),
        )
        .arg(
            Arg::new("count")
                .long("count")
                .value_name("N")
                .help("Max blocks to translate"),
        )
        .arg(
            Arg::new("max-insns")
                .long("max-insns")
                .value_name("N")
                .help("Max insns per block")
                .default_value("512"),
        )
        .arg(
            Arg::new("integer-only")
                .long("integer-only")
                .help("Translate for a core without FP and AdvSIMD")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output to file"),
        )
        .get_matches();

    let words = match matches.get_one::<String>("image") {
        Some(path) => {
            let data = fs::read(path).with_context(|| format!("failed to read {path}"))?;
            image_words(&data)?
        }
        None => matches
            .get_many::<String>("words")
            .into_iter()
            .flatten()
            .map(|s| parse_word(s))
            .collect::<Result<Vec<_>>>()?,
    };
    if words.is_empty() {
        bail!("no instruction words given");
    }

    let start = matches
        .get_one::<String>("start")
        .map(|s| parse_hex_u64(s))
        .transpose()?
        .unwrap_or(0);
    if start % 4 != 0 {
        bail!("start address 0x{start:x} is not 4-byte aligned");
    }
    let count = matches
        .get_one::<String>("count")
        .map(|s| s.parse::<usize>().context("invalid count"))
        .transpose()?;
    let max_insns = matches
        .get_one::<String>("max-insns")
        .map(|s| s.parse::<u32>().context("invalid max-insns"))
        .transpose()?
        .unwrap_or(512);

    Ok(Args {
        words,
        start,
        count,
        max_insns,
        integer_only: matches.get_flag("integer-only"),
        output: matches.get_one::<String>("output").cloned(),
    })
}

/// Translate every block of `args.words` and dump it to `out`.
fn dump_blocks(args: &Args, out: &mut impl Write) -> Result<usize> {
    let base = if args.integer_only {
        A64Cfg::INTEGER_ONLY
    } else {
        A64Cfg::ARMV8A
    };
    let cfg = base.with_max_insns(args.max_insns);
    let end = (args.words.len() as u64)
        .checked_mul(4)
        .and_then(|len| args.start.checked_add(len))
        .with_context(|| format!("code at 0x{:x} runs past the address space", args.start))?;
    let max_count = args.count.unwrap_or(usize::MAX);

    let mut pc = args.start;
    let mut tb_count = 0usize;
    while pc < end && tb_count < max_count {
        let idx = ((pc - args.start) / 4) as usize;
        let window = &args.words[idx..];

        let mut ir = Context::new();
        let dc = translate_block(&mut ir, pc, window, cfg)?;

        writeln!(out, "TB #{tb_count} @ 0x{pc:x}")?;
        let first = pc;
        dump_ops_with(&ir, &mut *out, |pc, w| {
            let word = window[((pc - first) / 4) as usize];
            let name = mnemonic(word).unwrap_or("<unallocated>");
            write!(w, "  {word:08x}  {name}")
        })?;
        writeln!(out)?;

        pc = match dc.error {
            Some(err) => {
                warn!("{err}");
                // Resume past the word that closed the block.
                dc.base.pc_next + 4
            }
            None => dc.base.pc_next,
        };
        tb_count += 1;
    }
    Ok(tb_count)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let args = parse_args()?;
    info!(
        "{} word(s) at 0x{:x}, {}",
        args.words.len(),
        args.start,
        if args.integer_only { "integer-only" } else { "armv8-a" }
    );

    let count = match &args.output {
        Some(path) => {
            let f = fs::File::create(path).with_context(|| format!("cannot create {path}"))?;
            let mut w = BufWriter::new(f);
            let n = dump_blocks(&args, &mut w)?;
            w.flush()?;
            n
        }
        None => {
            let mut w = BufWriter::new(io::stdout().lock());
            let n = dump_blocks(&args, &mut w)?;
            w.flush()?;
            n
        }
    };
    info!("translated {count} block(s)");
    Ok(())
}
