//! Eight-piece rules exercised through the position stack.

use eightpiece::error::FenError;
use eightpiece::moves::MoveType;
use eightpiece::piece::{Color, Figure, Variant};
use eightpiece::position::Position;

fn eightpiece(fen: &str) -> Position {
    eightpiece::init();
    let mut pos = Position::new(Variant::EightPiece);
    pos.parse_fen(fen).expect("valid FEN");
    pos
}

fn placement(pos: &Position) -> String {
    pos.current().to_fen().split(' ').next().unwrap_or_default().to_string()
}

#[test]
fn start_position_round_trips() {
    let pos = Position::new(Variant::EightPiece);
    assert_eq!(pos.current().to_fen(), Variant::EightPiece.start_fen());
    let moves = pos.legal_moves();
    assert!(!moves.is_empty());
    assert!(moves.iter().all(|m| m.kind() != MoveType::Castle));
}

#[test]
fn lancer_move_sets_new_facing() {
    let mut pos = eightpiece("4k3/8/8/8/8/8/8/Ln4K2 w - - 0 1");
    pos.push_uci("a1a4le").unwrap();
    assert_eq!(placement(&pos), "4k3/8/8/8/Le7/8/8/5K2");
    assert_eq!(pos.current().piece_at(24).figure(), Figure::LancerE);
    pos.pop();
    assert_eq!(placement(&pos), "4k3/8/8/8/8/8/8/Ln4K2");
}

#[test]
fn bare_lancer_symbol_is_rejected() {
    eightpiece::init();
    let mut pos = Position::new(Variant::EightPiece);
    assert_eq!(
        pos.parse_fen("4k3/8/8/8/8/8/8/l3K3 w - - 0 1"),
        Err(FenError::UnknownPiece("l".to_string()))
    );
    assert!(matches!(
        pos.parse_fen("8/8/8 w - - 0 1"),
        Err(FenError::InsufficientPieces { filled: 24 })
    ));
    assert_eq!(pos.current().to_fen(), Variant::EightPiece.start_fen());
}

#[test]
fn sentry_push_records_disabled_move() {
    let mut pos = eightpiece("4k3/8/8/8/2p5/3S4/8/4K3 w - - 0 1");
    pos.push_uci("d3c4p@c5").unwrap();
    assert_eq!(placement(&pos), "4k3/8/8/2p5/2S5/8/8/4K3");
    let fen = pos.current().to_fen();
    assert!(fen.ends_with(" c5c4"), "{}", fen);

    // the seventh field survives a round trip
    let reread = eightpiece(&fen);
    assert_eq!(reread.zobrist(), pos.zobrist());
    assert_eq!(reread.legal_moves(), pos.legal_moves());
    assert!(pos.push_uci("c5c4").is_err());
}

#[test]
fn jailed_king_passes() {
    let mut pos = eightpiece("4k3/8/8/8/8/8/j7/K7 w - - 0 1");
    let mv = pos.push_uci("a1a1").unwrap();
    assert!(mv.is_pass());
    assert_eq!(pos.turn(), Color::Black);
    assert_eq!(pos.current().king_square(Color::White), Some(0));
}

#[test]
fn castling_with_a_jailer_partner() {
    let mut pos = eightpiece("4k3/8/8/8/8/8/8/J3K3 w Q - 0 1");
    pos.push_uci("e1c1").unwrap();
    assert_eq!(placement(&pos), "4k3/8/8/8/8/8/8/2KJ4");
    assert_eq!(pos.current().castling_rights.to_fen(), "-");
}

#[test]
fn capturing_a_partner_clears_both_rights() {
    let mut pos = eightpiece("r3k3/8/8/8/8/8/8/R3K3 w Qq - 0 1");
    pos.push_uci("a1a8").unwrap();
    let fen = pos.current().to_fen();
    assert_eq!(fen.split(' ').nth(2), Some("-"));
}

#[test]
fn repetition_inside_the_game_line() {
    let mut pos = eightpiece(Variant::EightPiece.start_fen());
    for mv in ["g1f3", "g8f6", "f3g1", "f6g8"] {
        pos.push_uci(mv).unwrap();
    }
    assert_eq!(pos.game_end(4), Some(0));
}
