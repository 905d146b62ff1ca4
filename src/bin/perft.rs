use clap::Parser;
use eightpiece::piece::Variant;
use eightpiece::position::Position;
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Position as _};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Count move-generation leaves", long_about = None)]
struct Args {
    /// Standard or Eightpiece
    #[arg(short, long, default_value = "Eightpiece")]
    variant: String,

    /// Start from this FEN instead of the variant start position
    #[arg(short, long)]
    fen: Option<String>,

    #[arg(short, long, default_value_t = 4)]
    depth: usize,

    /// Print the leaf count below every root move
    #[arg(long)]
    divide: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    eightpiece::init();

    let Some(variant) = Variant::from_name(&args.variant) else {
        eprintln!("unknown variant '{}'", args.variant);
        return ExitCode::from(2);
    };
    let fen = args.fen.clone().unwrap_or_else(|| variant.start_fen().to_string());

    let mut pos = Position::new(variant);
    if let Err(e) = pos.parse_fen(&fen) {
        eprintln!("bad FEN '{}': {}", fen, e);
        return ExitCode::from(2);
    }

    println!("Running {} perft on FEN: '{}' at depth {}", variant, fen, args.depth);

    let start = Instant::now();
    let nodes = if args.divide {
        let mut total = 0;
        for (mv, n) in pos.divide(args.depth) {
            println!("{}: {}", mv, n);
            total += n;
        }
        total
    } else {
        pos.perft(args.depth)
    };
    let duration = start.elapsed();
    println!(
        "perft({}) = {} nodes ({} ms, {:.2} Mnps)",
        args.depth,
        nodes,
        duration.as_millis(),
        nodes as f64 / (duration.as_micros().max(1) as f64)
    );

    if variant != Variant::Standard {
        return ExitCode::SUCCESS;
    }

    let reference: Chess = match fen.parse::<Fen>().map(|f| f.into_position(CastlingMode::Standard)) {
        Ok(Ok(p)) => p,
        _ => {
            eprintln!("shakmaty cannot read this FEN, skipping cross-check");
            return ExitCode::SUCCESS;
        }
    };
    let expected = perft_shakmaty(&reference, args.depth);
    if expected != nodes {
        eprintln!("MISMATCH: shakmaty counts {} nodes", expected);
        return ExitCode::FAILURE;
    }
    println!("shakmaty agrees");
    ExitCode::SUCCESS
}

fn perft_shakmaty(pos: &Chess, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    for m in pos.legal_moves() {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += perft_shakmaty(&new_pos, depth - 1);
    }
    nodes
}
