// Bitboard masks, fills, iterators and jump tables used by move generation and search

use crate::piece::Color;
use std::sync::OnceLock;

pub type Bitboard = u64;
pub type Square = usize;

// File masks (A is column 0, H column 7)
pub const FILE_A: Bitboard = 0x0101010101010101;
pub const FILE_H: Bitboard = 0x8080808080808080;

pub const NOT_FILE_A: Bitboard = !FILE_A;
pub const NOT_FILE_H: Bitboard = !FILE_H;

// Rank masks (A1 is square 0)
pub const RANK_1: Bitboard = 0x00000000000000FF;
pub const RANK_8: Bitboard = 0xFF00000000000000;

pub const NUM_DIRECTIONS: usize = 8;

/// (file delta, rank delta) per direction, clockwise from north.
/// Lancer facings share this order.
pub const DIRECTION_DELTAS: [(i8, i8); NUM_DIRECTIONS] = [
    (0, 1),   // N
    (1, 1),   // NE
    (1, 0),   // E
    (1, -1),  // SE
    (0, -1),  // S
    (-1, -1), // SW
    (-1, 0),  // W
    (-1, 1),  // NW
];

pub const DIRECTION_NAMES: [&str; NUM_DIRECTIONS] = ["n", "ne", "e", "se", "s", "sw", "w", "nw"];

#[inline]
pub const fn rank_of(sq: Square) -> usize {
    sq / 8
}

#[inline]
pub const fn file_of(sq: Square) -> usize {
    sq % 8
}

#[inline]
pub const fn square_at(rank: usize, file: usize) -> Square {
    rank * 8 + file
}

#[inline]
pub const fn bit(sq: Square) -> Bitboard {
    1u64 << sq
}

#[inline]
pub const fn rank_bb(rank: usize) -> Bitboard {
    RANK_1 << (8 * rank)
}

#[inline]
pub const fn file_bb(file: usize) -> Bitboard {
    FILE_A << file
}

/// Square reached by `steps` steps in direction `dir`, if still on the board.
pub fn offset_square(sq: Square, dir: usize, steps: i8) -> Option<Square> {
    let (df, dr) = DIRECTION_DELTAS[dir];
    let file = file_of(sq) as i8 + df * steps;
    let rank = rank_of(sq) as i8 + dr * steps;
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some(square_at(rank as usize, file as usize))
    } else {
        None
    }
}

/// Normalized direction index from `from` towards `to` when both lie on a
/// common rank, file or diagonal.
pub fn direction_between(from: Square, to: Square) -> Option<usize> {
    if from == to {
        return None;
    }
    let df = file_of(to) as i8 - file_of(from) as i8;
    let dr = rank_of(to) as i8 - rank_of(from) as i8;
    if df != 0 && dr != 0 && df.abs() != dr.abs() {
        return None;
    }
    let step = (df.signum(), dr.signum());
    DIRECTION_DELTAS.iter().position(|&d| d == step)
}

// ============================================================================
// SHIFTS, FILLS AND SPANS
// ============================================================================

#[inline]
pub const fn north(bb: Bitboard) -> Bitboard {
    bb << 8
}

#[inline]
pub const fn south(bb: Bitboard) -> Bitboard {
    bb >> 8
}

#[inline]
pub const fn east(bb: Bitboard) -> Bitboard {
    (bb & NOT_FILE_H) << 1
}

#[inline]
pub const fn west(bb: Bitboard) -> Bitboard {
    (bb & NOT_FILE_A) >> 1
}

pub const fn north_fill(mut bb: Bitboard) -> Bitboard {
    bb |= bb << 8;
    bb |= bb << 16;
    bb |= bb << 32;
    bb
}

pub const fn south_fill(mut bb: Bitboard) -> Bitboard {
    bb |= bb >> 8;
    bb |= bb >> 16;
    bb |= bb >> 32;
    bb
}

/// Every square on a file that holds a set square.
pub const fn fill(bb: Bitboard) -> Bitboard {
    north_fill(bb) | south_fill(bb)
}

pub const fn north_span(bb: Bitboard) -> Bitboard {
    north_fill(north(bb))
}

pub const fn south_span(bb: Bitboard) -> Bitboard {
    south_fill(south(bb))
}

pub fn forward_fill(color: Color, bb: Bitboard) -> Bitboard {
    match color {
        Color::White => north_fill(bb),
        Color::Black => south_fill(bb),
    }
}

pub fn backward_fill(color: Color, bb: Bitboard) -> Bitboard {
    match color {
        Color::White => south_fill(bb),
        Color::Black => north_fill(bb),
    }
}

/// Squares strictly in front of `bb` from `color`'s point of view.
pub fn forward_span(color: Color, bb: Bitboard) -> Bitboard {
    match color {
        Color::White => north_span(bb),
        Color::Black => south_span(bb),
    }
}

pub fn backward_span(color: Color, bb: Bitboard) -> Bitboard {
    match color {
        Color::White => south_span(bb),
        Color::Black => north_span(bb),
    }
}

// Bit operations
#[inline]
pub fn pop_lsb(bb: &mut Bitboard) -> Option<Square> {
    if *bb == 0 {
        return None;
    }
    let lsb = bb.trailing_zeros() as Square;
    *bb &= *bb - 1;
    Some(lsb)
}

#[inline]
pub fn lsb_index(bb: Bitboard) -> Option<Square> {
    if bb == 0 {
        None
    } else {
        Some(bb.trailing_zeros() as Square)
    }
}

#[inline]
pub fn msb_index(bb: Bitboard) -> Option<Square> {
    if bb == 0 {
        None
    } else {
        Some(63 - bb.leading_zeros() as Square)
    }
}

#[inline]
pub fn count_bits(bb: Bitboard) -> u32 {
    bb.count_ones()
}

pub struct BitIter {
    bb: Bitboard,
}

impl Iterator for BitIter {
    type Item = Square;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        pop_lsb(&mut self.bb)
    }
}

#[inline]
pub fn iter_bits(bb: Bitboard) -> BitIter {
    BitIter { bb }
}

// ============================================================================
// SQUARE NAMES
// ============================================================================

pub fn square_to_uci(sq: Square) -> String {
    let file = (b'a' + file_of(sq) as u8) as char;
    let rank = (b'1' + rank_of(sq) as u8) as char;
    format!("{}{}", file, rank)
}

pub fn parse_square(text: &str) -> Option<Square> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let file = bytes[0].wrapping_sub(b'a');
    let rank = bytes[1].wrapping_sub(b'1');
    if file < 8 && rank < 8 {
        Some(square_at(rank as usize, file as usize))
    } else {
        None
    }
}

// ============================================================================
// JUMP AND RAY TABLES
// ============================================================================

struct JumpTables {
    knight: [Bitboard; 64],
    king: [Bitboard; 64],
    rays: [[Bitboard; 64]; NUM_DIRECTIONS],
}

static JUMP_TABLES: OnceLock<JumpTables> = OnceLock::new();

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

fn jump_mask(sq: Square, offsets: &[(i8, i8)]) -> Bitboard {
    let file = file_of(sq) as i8;
    let rank = rank_of(sq) as i8;
    offsets
        .iter()
        .map(|&(df, dr)| (file + df, rank + dr))
        .filter(|&(f, r)| (0..8).contains(&f) && (0..8).contains(&r))
        .fold(0, |acc, (f, r)| acc | bit(square_at(r as usize, f as usize)))
}

fn build_jump_tables() -> JumpTables {
    let mut knight = [0; 64];
    let mut king = [0; 64];
    let mut rays = [[0; 64]; NUM_DIRECTIONS];

    for sq in 0..64 {
        knight[sq] = jump_mask(sq, &KNIGHT_OFFSETS);
        king[sq] = jump_mask(sq, &DIRECTION_DELTAS);
        for (dir, ray) in rays.iter_mut().enumerate() {
            let mut steps = 1;
            while let Some(target) = offset_square(sq, dir, steps) {
                ray[sq] |= bit(target);
                steps += 1;
            }
        }
    }

    JumpTables { knight, king, rays }
}

#[inline]
fn jump_tables() -> &'static JumpTables {
    JUMP_TABLES.get_or_init(build_jump_tables)
}

#[inline(always)]
pub fn init_attack_tables() {
    jump_tables();
}

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    jump_tables().knight[sq]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    jump_tables().king[sq]
}

/// Squares from which an enemy jailer immobilizes a piece on `sq`.
#[inline]
pub fn jailer_adjacent(sq: Square) -> Bitboard {
    jump_tables().king[sq]
}

/// Open ray leaving `sq` in direction `dir`, excluding `sq`.
#[inline]
pub fn ray(dir: usize, sq: Square) -> Bitboard {
    jump_tables().rays[dir][sq]
}

/// Directions whose rays grow towards higher square indices.
#[inline]
pub const fn is_positive_direction(dir: usize) -> bool {
    matches!(dir, 0 | 1 | 2 | 7)
}
