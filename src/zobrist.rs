// Zobrist hashing with precomputed tables
use crate::bitboard::{file_of, iter_bits, Square};
use crate::piece::{Color, Piece, PIECE_COUNT};
use crate::state::{CastlingSide, State};
use std::sync::OnceLock;

pub struct ZobristKeys {
    pub piece: [[u64; 64]; PIECE_COUNT],
    /// Xored in while Black is to move.
    pub side: u64,
    /// Indexed by `color * 2 + side`.
    pub castling: [u64; 4],
    pub ep_file: [u64; 8],
}

static ZOBRIST: OnceLock<ZobristKeys> = OnceLock::new();

fn split_mix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

fn build_keys() -> ZobristKeys {
    let mut state = 0x5eed_0000_0000_0005u64;
    let mut next = move || {
        state = state.wrapping_add(0x9e3779b97f4a7c15);
        split_mix64(state)
    };

    let mut piece = [[0u64; 64]; PIECE_COUNT];
    for row in piece.iter_mut() {
        for key in row.iter_mut() {
            *key = next();
        }
    }
    let side = next();
    let castling = [next(), next(), next(), next()];
    let mut ep_file = [0u64; 8];
    for key in ep_file.iter_mut() {
        *key = next();
    }

    ZobristKeys {
        piece,
        side,
        castling,
        ep_file,
    }
}

#[inline]
pub fn keys() -> &'static ZobristKeys {
    ZOBRIST.get_or_init(build_keys)
}

pub fn init_zobrist() {
    keys();
}

#[inline]
pub fn piece_key(piece: Piece, sq: Square) -> u64 {
    keys().piece[piece.index()][sq]
}

#[inline]
pub fn side_key(color: Color) -> u64 {
    match color {
        Color::White => 0,
        Color::Black => keys().side,
    }
}

#[inline]
pub fn castling_key(color: Color, side: CastlingSide) -> u64 {
    keys().castling[color.index() * 2 + side.index()]
}

#[inline]
pub fn ep_key(ep: Option<Square>) -> u64 {
    match ep {
        Some(sq) => keys().ep_file[file_of(sq)],
        None => 0,
    }
}

/// From-scratch key of `state`; must match the incrementally kept one.
pub fn recalc_zobrist_full(state: &State) -> u64 {
    let mut h = 0u64;
    for color in Color::ALL {
        for sq in iter_bits(state.by_color[color.index()]) {
            h ^= piece_key(state.piece_at(sq), sq);
        }
    }
    h ^= side_key(state.turn);
    for color in Color::ALL {
        for side in CastlingSide::ALL {
            if state.castling_rights.can_castle(color, side) {
                h ^= castling_key(color, side);
            }
        }
    }
    h ^= ep_key(state.ep_square);
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_distinct_and_stable() {
        let k = keys();
        let mut seen = std::collections::HashSet::new();
        for row in k.piece.iter() {
            for &key in row.iter() {
                assert!(seen.insert(key));
            }
        }
        assert!(seen.insert(k.side));
        assert_eq!(side_key(Color::White), 0);
        assert_eq!(keys().side, build_keys().side);
    }
}
