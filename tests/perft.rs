use eightpiece::piece::Variant;
use eightpiece::position::Position;
use eightpiece::state::START_FEN;
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Position as _};

fn perft_shakmaty(pos: &Chess, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0u64;
    for m in pos.legal_moves() {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += perft_shakmaty(&new_pos, depth - 1);
    }
    nodes
}

fn standard(fen: &str) -> Position {
    eightpiece::init();
    let mut pos = Position::new(Variant::Standard);
    pos.parse_fen(fen).expect("valid FEN");
    pos
}

fn cross_check(fen: &str, max_depth: usize) {
    let reference: Chess = fen
        .parse::<Fen>()
        .expect("shakmaty FEN")
        .into_position(CastlingMode::Standard)
        .expect("shakmaty position");
    let mut pos = standard(fen);
    for depth in 1..=max_depth {
        let expected = perft_shakmaty(&reference, depth);
        let got = pos.perft(depth);
        assert_eq!(got, expected, "perft mismatch at depth {} for {}", depth, fen);
    }
}

#[test]
fn perft_regression_starting_pos() {
    let mut pos = standard(START_FEN);
    assert_eq!(pos.perft(1), 20);
    assert_eq!(pos.perft(2), 400);
    assert_eq!(pos.perft(3), 8902);
    assert_eq!(pos.ply(), 0);
}

#[test]
fn perft_matches_shakmaty_kiwipete() {
    cross_check("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1", 2);
}

#[test]
fn perft_matches_shakmaty_endgame_ep() {
    cross_check("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 3);
}

#[test]
fn perft_matches_shakmaty_promotions() {
    cross_check("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1", 2);
    cross_check("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8", 2);
}

#[test]
fn divide_sums_to_perft() {
    eightpiece::init();
    let mut pos = Position::new(Variant::EightPiece);
    let total: u64 = pos.divide(2).iter().map(|(_, n)| n).sum();
    assert_eq!(total, pos.perft(2));
    assert_eq!(pos.divide(1).len() as u64, pos.perft(1));
}
