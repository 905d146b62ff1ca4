//! Packed 32-bit moves.
//!
//! Layout, low bits first:
//! `from` (6) | `to` (6) | promotion square (6) | promotion piece (6) | kind (8).
//!
//! A sentry push stores the sentry square in `from`, the pushed piece's square
//! in `to`, the pushed piece's destination in the promotion square and the
//! piece that lands there in the promotion piece. Lancer moves are promotion
//! moves whose promotion piece carries the new facing.

use crate::bitboard::{square_to_uci, Square};
use crate::piece::{Piece, NO_PIECE};
use std::fmt;

const SQUARE_MASK: u32 = 0x3f;
const PIECE_MASK: u32 = 0x3f;
const KIND_MASK: u32 = 0xff;

const TO_SHIFT: u32 = 6;
const PROMO_SQ_SHIFT: u32 = 12;
const PROMO_PIECE_SHIFT: u32 = 18;
const KIND_SHIFT: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveType {
    Normal = 0,
    Promotion = 1,
    SentryPush = 2,
    Castle = 3,
    Null = 4,
}

impl MoveType {
    fn from_bits(bits: u32) -> MoveType {
        match bits {
            1 => MoveType::Promotion,
            2 => MoveType::SentryPush,
            3 => MoveType::Castle,
            4 => MoveType::Null,
            _ => MoveType::Normal,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u32);

impl Move {
    /// Pass move used by null-move pruning.
    pub const NULL: Move = Move((MoveType::Null as u32) << KIND_SHIFT);

    pub fn new(from: Square, to: Square, promo_sq: Square, promo_piece: Piece, kind: MoveType) -> Move {
        Move(
            (from as u32 & SQUARE_MASK)
                | (to as u32 & SQUARE_MASK) << TO_SHIFT
                | (promo_sq as u32 & SQUARE_MASK) << PROMO_SQ_SHIFT
                | (promo_piece.bits() & PIECE_MASK) << PROMO_PIECE_SHIFT
                | (kind as u32) << KIND_SHIFT,
        )
    }

    #[inline]
    pub fn normal(from: Square, to: Square) -> Move {
        Move::new(from, to, 0, NO_PIECE, MoveType::Normal)
    }

    #[inline]
    pub fn promotion(from: Square, to: Square, piece: Piece) -> Move {
        Move::new(from, to, 0, piece, MoveType::Promotion)
    }

    #[inline]
    pub fn sentry_push(from: Square, to: Square, pushed: Piece, target: Square) -> Move {
        Move::new(from, to, target, pushed, MoveType::SentryPush)
    }

    #[inline]
    pub fn castle(king_from: Square, king_to: Square) -> Move {
        Move::new(king_from, king_to, 0, NO_PIECE, MoveType::Castle)
    }

    /// Pass of a jailed king; distinct from [`Move::NULL`] through the piece field.
    #[inline]
    pub fn pass(king_sq: Square, king: Piece) -> Move {
        Move::new(king_sq, king_sq, king_sq, king, MoveType::Null)
    }

    #[inline]
    pub const fn from_bits(bits: u32) -> Move {
        Move(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn from_sq(self) -> Square {
        (self.0 & SQUARE_MASK) as Square
    }

    #[inline]
    pub fn to_sq(self) -> Square {
        ((self.0 >> TO_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub fn promo_sq(self) -> Square {
        ((self.0 >> PROMO_SQ_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub fn promo_piece(self) -> Piece {
        Piece::from_bits((self.0 >> PROMO_PIECE_SHIFT) & PIECE_MASK)
    }

    #[inline]
    pub fn kind(self) -> MoveType {
        MoveType::from_bits((self.0 >> KIND_SHIFT) & KIND_MASK)
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self == Move::NULL
    }

    #[inline]
    pub fn is_pass(self) -> bool {
        self.kind() == MoveType::Null && !self.is_null()
    }

    /// Coordinate notation.
    pub fn to_uci(self) -> String {
        match self.kind() {
            MoveType::Null if self.is_null() => "0000".to_string(),
            MoveType::Promotion => format!(
                "{}{}{}",
                square_to_uci(self.from_sq()),
                square_to_uci(self.to_sq()),
                self.promo_piece().figure().symbol()
            ),
            MoveType::SentryPush => format!(
                "{}{}{}@{}",
                square_to_uci(self.from_sq()),
                square_to_uci(self.to_sq()),
                self.promo_piece().figure().symbol(),
                square_to_uci(self.promo_sq())
            ),
            _ => format!("{}{}", square_to_uci(self.from_sq()), square_to_uci(self.to_sq())),
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {:?})", self.to_uci(), self.kind())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}

/// Which moves a generator call should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenKind(u8);

impl GenKind {
    pub const QUIET: GenKind = GenKind(1);
    pub const VIOLENT: GenKind = GenKind(2);
    pub const ALL: GenKind = GenKind(3);

    #[inline]
    pub fn is_quiet(self) -> bool {
        self.0 & 1 != 0
    }

    #[inline]
    pub fn is_violent(self) -> bool {
        self.0 & 2 != 0
    }

    #[inline]
    pub fn without_violent(self) -> GenKind {
        GenKind(self.0 & 1)
    }
}

pub fn moves_to_uci(moves: &[Move]) -> String {
    moves.iter().map(|m| m.to_uci()).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Color, Figure};

    #[test]
    fn codec_fields_survive() {
        let pieces = [
            NO_PIECE,
            Piece::new(Color::White, Figure::Pawn),
            Piece::new(Color::Black, Figure::Jailer),
            Piece::lancer(Color::White, 7),
        ];
        let kinds = [
            MoveType::Normal,
            MoveType::Promotion,
            MoveType::SentryPush,
            MoveType::Castle,
            MoveType::Null,
        ];
        for &(from, to, psq) in &[(0, 63, 17), (12, 28, 0), (63, 0, 63), (35, 36, 44)] {
            for &piece in &pieces {
                for &kind in &kinds {
                    let mv = Move::new(from, to, psq, piece, kind);
                    assert_eq!(mv.from_sq(), from);
                    assert_eq!(mv.to_sq(), to);
                    assert_eq!(mv.promo_sq(), psq);
                    assert_eq!(mv.promo_piece(), piece);
                    assert_eq!(mv.kind(), kind);
                }
            }
        }
    }

    #[test]
    fn uci_text() {
        assert_eq!(Move::normal(12, 28).to_uci(), "e2e4");
        assert_eq!(Move::NULL.to_uci(), "0000");
        let lancer = Move::promotion(1, 18, Piece::lancer(Color::White, 1));
        assert_eq!(lancer.to_uci(), "b1c3lne");
        let push = Move::sentry_push(2, 11, Piece::new(Color::Black, Figure::Pawn), 19);
        assert_eq!(push.to_uci(), "c1d2p@d3");
        let queen = Move::promotion(52, 60, Piece::new(Color::White, Figure::Queen));
        assert_eq!(queen.to_uci(), "e7e8q");
    }

    #[test]
    fn pass_is_not_null() {
        let pass = Move::pass(0, Piece::new(Color::White, Figure::King));
        assert!(pass.is_pass());
        assert!(!pass.is_null());
        assert!(Move::NULL.is_null());
        assert!(!Move::NULL.is_pass());
        assert_eq!(pass.to_uci(), "a1a1");
    }

    #[test]
    fn gen_kinds() {
        assert!(GenKind::ALL.is_quiet() && GenKind::ALL.is_violent());
        assert!(!GenKind::QUIET.is_violent());
        assert!(!GenKind::ALL.without_violent().is_violent());
    }
}
