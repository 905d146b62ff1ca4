use clap::Parser;
use eightpiece::magic::{AttackBuilder, Magic, BISHOP_DELTAS, MAGIC_SEED, ROOK_DELTAS};
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Search rook and bishop magics and print them as Rust constants", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = MAGIC_SEED)]
    seed: u64,

    /// Candidates per square at the full mask width
    #[arg(short, long, default_value_t = 1 << 22)]
    tries: usize,

    /// Candidates per narrower width after a success; 0 keeps the full width
    #[arg(long, default_value_t = 0)]
    shrink_tries: usize,

    /// Write to this file instead of stdout, e.g. src/magic_consts.rs
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn constant_array<T: std::fmt::Display>(out: &mut String, name: &str, ty: &str, values: impl Iterator<Item = T>) {
    let values: Vec<T> = values.collect();
    let _ = writeln!(out, "pub(crate) const {}: [{}; 64] = [", name, ty);
    for row in values.chunks(4) {
        let cells: Vec<String> = row.iter().map(|v| format!("{},", v)).collect();
        let _ = writeln!(out, "    {}", cells.join(" "));
    }
    let _ = writeln!(out, "];");
}

fn render(rook: &[Magic], bishop: &[Magic]) -> String {
    let mut out = String::new();
    out.push_str("//! Rook and bishop magics, a1 = 0. Regenerate with `cargo run --release --bin magics`.\n");
    for (name, table) in [("ROOK", rook), ("BISHOP", bishop)] {
        out.push('\n');
        constant_array(
            &mut out,
            &format!("{}_MAGICS", name),
            "u64",
            table.iter().map(|m| format!("{:#018x}", m.magic)),
        );
        out.push('\n');
        constant_array(&mut out, &format!("{}_SHIFTS", name), "u32", table.iter().map(|m| m.shift));
    }
    out
}

fn main() -> ExitCode {
    let args = Args::parse();
    let start = Instant::now();
    let mut builder = AttackBuilder::new(args.seed).with_shrink_tries(args.shrink_tries);

    let mut tables = Vec::with_capacity(2);
    for deltas in [&ROOK_DELTAS, &BISHOP_DELTAS] {
        let mut table = Vec::with_capacity(64);
        for sq in 0..64 {
            match builder.search(sq, deltas, args.tries) {
                Ok(found) => table.push(found),
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
        tables.push(table);
    }

    let source = render(&tables[0], &tables[1]);
    eprintln!(
        "found 128 magics in {} ms ({} rook and {} bishop entries)",
        start.elapsed().as_millis(),
        tables[0].iter().map(|m| m.attacks.len()).sum::<usize>(),
        tables[1].iter().map(|m| m.attacks.len()).sum::<usize>()
    );

    match args.output {
        Some(path) => {
            if let Err(e) = fs::write(&path, source) {
                eprintln!("cannot write {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        }
        None => print!("{}", source),
    }
    ExitCode::SUCCESS
}
