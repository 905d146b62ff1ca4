use eightpiece::eval::{evaluate, Score, INFINITE_SCORE, MATE_SCORE};
use eightpiece::piece::Variant;
use eightpiece::position::Position;
use eightpiece::search::{Search, SearchParams};
use eightpiece::state::{EIGHTPIECE_START_FEN, START_FEN};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn position(variant: Variant, fen: &str) -> Position {
    eightpiece::init();
    let mut pos = Position::new(variant);
    pos.parse_fen(fen).expect("valid FEN");
    pos
}

/// Plain negamax with the same terminal rules as the search.
fn negamax(pos: &mut Position, ply: usize, max_depth: usize) -> Score {
    if ply > 0 {
        if let Some(score) = pos.game_end(ply) {
            return score;
        }
    }
    if ply >= max_depth {
        return evaluate(pos.current());
    }
    let moves = pos.legal_moves();
    if moves.is_empty() {
        return if pos.current().is_checked_us() {
            -MATE_SCORE + ply as Score
        } else {
            0
        };
    }
    let mut best = -INFINITE_SCORE;
    for mv in moves {
        pos.push(mv);
        best = best.max(-negamax(pos, ply + 1, max_depth));
        pos.pop();
    }
    best
}

fn search(variant: Variant, fen: &str, depth: usize, params: SearchParams) -> eightpiece::search::SearchOutcome {
    let pos = position(variant, fen);
    let mut s = Search::new(pos, params.max_depth(depth));
    s.search(depth)
}

#[test]
fn search_is_deterministic() {
    let params = SearchParams::new().stack_reduction(true).null_move_pruning(true);
    let a = search(Variant::EightPiece, EIGHTPIECE_START_FEN, 3, params.clone());
    let b = search(Variant::EightPiece, EIGHTPIECE_START_FEN, 3, params);
    assert_eq!(a.best, b.best);
    assert_eq!(a.score, b.score);
    assert_eq!(a.pv, b.pv);
    let nodes = |o: &eightpiece::search::SearchOutcome| o.infos.iter().map(|i| i.nodes).collect::<Vec<_>>();
    assert_eq!(nodes(&a), nodes(&b));
}

#[test]
fn depth_one_returns_a_legal_opening_move() {
    for (variant, fen) in [(Variant::Standard, START_FEN), (Variant::EightPiece, EIGHTPIECE_START_FEN)] {
        let out = search(variant, fen, 1, SearchParams::new());
        let legal = position(variant, fen).legal_moves();
        let best = out.best.expect("a move");
        assert!(legal.contains(&best), "{} is not legal in {}", best, variant);
        assert_eq!(out.depth, 1);
        assert_eq!(out.infos.len(), 1);
        assert_eq!(out.pv.first(), Some(&best));
    }
}

#[test]
fn alpha_beta_matches_minimax() {
    let cases = [
        (Variant::Standard, START_FEN, 3),
        (Variant::Standard, "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3", 3),
        (Variant::EightPiece, EIGHTPIECE_START_FEN, 2),
        (Variant::EightPiece, "4k3/8/8/3j4/4N3/2S5/8/Ln3K3 w - - 0 1", 3),
    ];
    for (variant, fen, depth) in cases {
        let out = search(variant, fen, depth, SearchParams::new().exhaustive());
        let mut pos = position(variant, fen);
        let expected = negamax(&mut pos, 0, depth);
        assert_eq!(out.score, expected, "score mismatch for {} at depth {}", fen, depth);
        assert_eq!(out.depth, depth);
    }
}

#[test]
fn mate_is_scored_in_both_variants() {
    for variant in [Variant::Standard, Variant::EightPiece] {
        let out = search(variant, "k7/8/1K6/8/8/8/8/7R w - - 0 1", 4, SearchParams::new());
        assert_eq!(out.best.map(|m| m.to_uci()), Some("h1h8".to_string()));
        assert_eq!(out.score, MATE_SCORE - 1);

        // the side to move is already mated
        let out = search(variant, "k7/1Q6/1K6/8/8/8/8/8 b - - 0 1", 2, SearchParams::new());
        assert_eq!(out.best, None);
        assert_eq!(out.score, -MATE_SCORE);
    }
}

#[test]
fn stalemate_scores_zero_in_both_variants() {
    for variant in [Variant::Standard, Variant::EightPiece] {
        let out = search(variant, "k7/8/1Q6/8/8/8/8/7K b - - 0 1", 3, SearchParams::new());
        assert_eq!(out.best, None);
        assert_eq!(out.score, 0);
    }
}

#[test]
fn raised_stop_flag_keeps_a_legal_move() {
    let pos = position(Variant::Standard, START_FEN);
    let legal = pos.legal_moves();
    let stop = Arc::new(AtomicBool::new(true));
    let mut s = Search::with_stop_flag(pos, SearchParams::new(), Arc::clone(&stop));
    let out = s.search(6);
    assert!(stop.load(Ordering::Relaxed));
    assert_eq!(out.depth, 0);
    assert!(out.infos.is_empty());
    assert!(legal.contains(&out.best.expect("fallback move")));
    assert_eq!(s.position().ply(), 0);
}

#[test]
fn pruning_keeps_the_mate() {
    let params = SearchParams::new()
        .null_move_pruning(true)
        .null_move_min_depth(2)
        .stack_reduction(true)
        .aspiration_window(true);
    let out = search(Variant::Standard, "k7/8/1K6/8/8/8/8/7R w - - 0 1", 6, params);
    assert_eq!(out.score, MATE_SCORE - 1);
}

#[test]
fn aspiration_window_agrees_with_full_window() {
    // the rook wins the loose queen
    let fen = "4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1";
    let full = search(Variant::Standard, fen, 5, SearchParams::new());
    let narrow = search(Variant::Standard, fen, 5, SearchParams::new().aspiration_window(true));
    assert_eq!(full.depth, 5);
    assert_eq!(narrow.depth, 5);
    assert_eq!(full.best.map(|m| m.to_uci()), Some("d2d5".to_string()));
    assert_eq!(narrow.best, full.best);
    assert_eq!(narrow.score, full.score);
}
