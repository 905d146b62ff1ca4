//! Display move text in the style of standard algebraic notation.

use crate::bitboard::{file_of, rank_of, square_to_uci};
use crate::moves::{Move, MoveType};
use crate::piece::{direction_name, Figure};
use crate::state::State;

/// Display text of `mv` played from `state`. The move must be legal there.
pub fn move_to_san(state: &State, mv: Move) -> String {
    let mut san = match mv.kind() {
        MoveType::Null if mv.is_null() => return "--".to_string(),
        MoveType::Null => "pass".to_string(),
        MoveType::Castle => {
            if file_of(mv.to_sq()) > file_of(mv.from_sq()) {
                "O-O".to_string()
            } else {
                "O-O-O".to_string()
            }
        }
        _ => piece_move_text(state, mv),
    };

    let mut next = *state;
    next.make_move(mv);
    let replies = next.has_legal_move();
    if next.is_checked_us() {
        san.push(if replies { '+' } else { '#' });
    } else if !replies {
        san.push('=');
    }
    san
}

fn piece_move_text(state: &State, mv: Move) -> String {
    let from = mv.from_sq();
    let to = mv.to_sq();
    let piece = state.piece_at(from);
    let fig = piece.figure();
    let capture = state.is_capture(mv) && mv.kind() != MoveType::SentryPush;
    let mut san = String::new();

    if fig == Figure::Pawn {
        if capture {
            san.push((b'a' + file_of(from) as u8) as char);
            san.push('x');
        }
        san.push_str(&square_to_uci(to));
    } else {
        san.push_str(fig.san_letter());
        san.push_str(&disambiguation(state, mv));
        if capture {
            san.push('x');
        }
        san.push_str(&square_to_uci(to));
    }

    match mv.kind() {
        MoveType::Promotion if fig == Figure::Pawn => {
            san.push('=');
            san.push_str(&mv.promo_piece().fen_symbol().to_ascii_uppercase());
        }
        MoveType::Promotion => {
            if let Some(dir) = mv.promo_piece().figure().lancer_direction() {
                san.push('=');
                san.push_str(direction_name(dir));
            }
        }
        MoveType::SentryPush => {
            san.push('>');
            if state.piece_at(mv.promo_sq()).is_some() {
                san.push('x');
            }
            san.push_str(&square_to_uci(mv.promo_sq()));
        }
        _ => {}
    }
    san
}

/// File, then rank, then both, when another piece of the same figure can
/// reach the same square.
fn disambiguation(state: &State, mv: Move) -> String {
    let from = mv.from_sq();
    let fig = state.piece_at(from).figure();
    let rivals: Vec<usize> = state
        .legal_moves()
        .into_iter()
        .filter(|m| {
            m.kind() == mv.kind()
                && m.to_sq() == mv.to_sq()
                && m.from_sq() != from
                && state.piece_at(m.from_sq()).figure() == fig
        })
        .map(|m| m.from_sq())
        .collect();

    if rivals.is_empty() {
        return String::new();
    }
    let file = (b'a' + file_of(from) as u8) as char;
    let rank = (b'1' + rank_of(from) as u8) as char;
    if rivals.iter().all(|&r| file_of(r) != file_of(from)) {
        file.to_string()
    } else if rivals.iter().all(|&r| rank_of(r) != rank_of(from)) {
        rank.to_string()
    } else {
        format!("{}{}", file, rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Color, Piece, Variant};

    fn st(variant: Variant, fen: &str) -> State {
        crate::init();
        State::from_fen(variant, fen).unwrap()
    }

    #[test]
    fn pawn_and_piece_moves() {
        let s = st(Variant::Standard, crate::state::START_FEN);
        assert_eq!(move_to_san(&s, Move::normal(12, 28)), "e4");
        assert_eq!(move_to_san(&s, Move::normal(6, 21)), "Nf3");
    }

    #[test]
    fn disambiguates_by_file_then_rank() {
        let s = st(Variant::Standard, "4k3/8/8/8/8/8/4K3/R6R w - - 0 1");
        assert_eq!(move_to_san(&s, Move::normal(0, 3)), "Rad1");
        let s = st(Variant::Standard, "4k3/8/8/8/R7/8/8/R3K3 w - - 0 1");
        assert_eq!(move_to_san(&s, Move::normal(0, 8)), "R1a2");
    }

    #[test]
    fn castling_captures_and_promotions() {
        let s = st(Variant::Standard, "r3k3/1P6/8/8/8/8/8/4K2R w K - 0 1");
        assert_eq!(move_to_san(&s, Move::castle(4, 6)), "O-O");
        let q = Piece::new(Color::White, Figure::Queen);
        assert_eq!(move_to_san(&s, Move::promotion(49, 56, q)), "bxa8=Q+");
    }

    #[test]
    fn mate_and_stalemate_suffixes() {
        let s = st(Variant::Standard, "k7/8/1K6/8/8/8/8/7R w - - 0 1");
        assert_eq!(move_to_san(&s, Move::normal(7, 63)), "Rh8#");
        let s = st(Variant::Standard, "k7/8/1K6/8/8/8/8/2Q5 w - - 0 1");
        assert_eq!(move_to_san(&s, Move::normal(2, 50)), "Qc7=");
    }

    #[test]
    fn variant_moves() {
        let s = st(Variant::EightPiece, "4k3/8/8/8/2p5/3S4/8/4K3 w - - 0 1");
        let pawn = s.piece_at(26);
        assert_eq!(move_to_san(&s, Move::sentry_push(19, 26, pawn, 34)), "Sc4>c5");
        let s = st(Variant::EightPiece, "4k3/8/8/8/8/8/8/Ln3K3 w - - 0 1");
        let mv = Move::promotion(0, 16, Piece::lancer(Color::White, 2));
        assert_eq!(move_to_san(&s, mv), "La3=e");
    }
}
