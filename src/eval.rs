//! Static evaluation: tapered material plus mobility and castling terms.
//!
//! Every piece has a per-square table of middle-game / end-game values
//! ([`Accum`]). The board keeps the per-color material sums incrementally;
//! mobility and castling are computed when a leaf is scored.

use crate::bitboard::{count_bits, file_of, iter_bits, rank_of, square_at, DIRECTION_DELTAS};
use crate::magic::{bishop_mobility, knight_mobility, queen_mobility, rook_mobility};
use crate::movegen::lancer_mobility;
use crate::moves::GenKind;
use crate::piece::{Color, Figure, Piece, COLOR_FIGURE, FIGURE_COUNT, PIECE_COUNT};
use crate::state::{CastlingSide, State};
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::sync::OnceLock;

pub type Score = i32;

/// Bound for static scores; anything beyond is a mate score.
pub const MAX_SCORE: Score = 9000;
pub const MATE_SCORE: Score = 10000;
pub const INFINITE_SCORE: Score = 20000;

/// Middle-game material of both sides at the start of a game.
pub const INITIAL_MATERIAL: Score = 2 * 4220;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accum {
    pub m: Score,
    pub e: Score,
}

impl Accum {
    pub const ZERO: Accum = Accum { m: 0, e: 0 };

    pub const fn new(m: Score, e: Score) -> Accum {
        Accum { m, e }
    }

    pub fn scaled(self, factor: Score) -> Accum {
        Accum::new(self.m * factor, self.e * factor)
    }

    /// Blend by `phase / INITIAL_MATERIAL`, where phase is the remaining
    /// middle-game material.
    pub fn taper(self, phase: Score) -> Score {
        let phase = phase.clamp(0, INITIAL_MATERIAL);
        (self.m * phase + self.e * (INITIAL_MATERIAL - phase)) / INITIAL_MATERIAL
    }
}

impl Add for Accum {
    type Output = Accum;
    fn add(self, rhs: Accum) -> Accum {
        Accum::new(self.m + rhs.m, self.e + rhs.e)
    }
}

impl Sub for Accum {
    type Output = Accum;
    fn sub(self, rhs: Accum) -> Accum {
        Accum::new(self.m - rhs.m, self.e - rhs.e)
    }
}

impl Neg for Accum {
    type Output = Accum;
    fn neg(self) -> Accum {
        Accum::new(-self.m, -self.e)
    }
}

impl AddAssign for Accum {
    fn add_assign(&mut self, rhs: Accum) {
        *self = *self + rhs;
    }
}

impl SubAssign for Accum {
    fn sub_assign(&mut self, rhs: Accum) {
        *self = *self - rhs;
    }
}

// ============================================================================
// MATERIAL VALUES (centipawns, middle game / end game)
// ============================================================================
const PAWN_VALUE: Accum = Accum::new(100, 120);
const CENTER_PAWN_VALUE: Accum = Accum::new(150, 120);
const SEMI_CENTER_PAWN_VALUE: Accum = Accum::new(125, 120);
const KNIGHT_VALUE: Accum = Accum::new(300, 300);
const KNIGHT_ON_EDGE_DEDUCTION: Accum = Accum::new(50, 50);
const KNIGHT_CLOSE_TO_EDGE_DEDUCTION: Accum = Accum::new(25, 25);
const BISHOP_VALUE: Accum = Accum::new(300, 320);
const ROOK_VALUE: Accum = Accum::new(500, 520);
const QUEEN_VALUE: Accum = Accum::new(900, 920);
const LANCER_VALUE: Accum = Accum::new(700, 720);
const LANCER_HOME_BONUS: Accum = Accum::new(100, 0);
const LANCER_FACING_OUT_VALUE: Accum = Accum::new(0, 0);
const SENTRY_VALUE: Accum = Accum::new(320, 320);
const JAILER_VALUE: Accum = Accum::new(400, 420);

// Per reachable square
const MOBILITY_WEIGHTS: [Accum; FIGURE_COUNT] = {
    let mut w = [Accum::ZERO; FIGURE_COUNT];
    w[Figure::Knight as usize] = Accum::new(4, 4);
    w[Figure::Bishop as usize] = Accum::new(3, 3);
    w[Figure::Rook as usize] = Accum::new(2, 4);
    w[Figure::Queen as usize] = Accum::new(1, 2);
    let mut l = Figure::LancerN as usize;
    while l <= Figure::LancerNW as usize {
        w[l] = Accum::new(2, 2);
        l += 1;
    }
    w[Figure::Sentry as usize] = Accum::new(3, 3);
    w[Figure::Jailer as usize] = Accum::new(2, 2);
    w
};

const CASTLING_RIGHT_BONUS: Accum = Accum::new(10, 0);
const LOST_CASTLING_PENALTY: Accum = Accum::new(-40, 0);

type MaterialTable = [Accum; 64];

static MATERIAL_TABLES: OnceLock<[MaterialTable; PIECE_COUNT]> = OnceLock::new();

/// White-oriented table mirrored for Black.
fn pov(table: MaterialTable, color: Color) -> MaterialTable {
    if color == Color::White {
        return table;
    }
    let mut mirrored = [Accum::ZERO; 64];
    for (sq, value) in mirrored.iter_mut().enumerate() {
        *value = table[sq ^ 56];
    }
    mirrored
}

fn lancer_table(color: Color, dir: usize) -> MaterialTable {
    let mut table = [LANCER_VALUE; 64];
    let home_rank = match color {
        Color::White => 1,
        Color::Black => 6,
    };
    let (df, dr) = DIRECTION_DELTAS[dir];
    for file in 0..8 {
        let facing_inward = (file < 6 && dir == 2) || (file > 2 && dir == 6);
        if facing_inward {
            table[square_at(home_rank, file)] += LANCER_HOME_BONUS;
        }
        for rank in 0..8 {
            let facing_out = (file == 0 && df < 0) || (file == 7 && df > 0) || (rank == 0 && dr < 0) || (rank == 7 && dr > 0);
            if facing_out {
                table[square_at(rank, file)] = LANCER_FACING_OUT_VALUE;
            }
        }
    }
    table
}

fn build_material_tables() -> [MaterialTable; PIECE_COUNT] {
    let mut tables = [[Accum::ZERO; 64]; PIECE_COUNT];
    for color in Color::ALL {
        for fig in Figure::ALL {
            let piece = COLOR_FIGURE[color.index()][fig.index()];
            let table = match fig {
                Figure::Pawn => {
                    let mut t = [PAWN_VALUE; 64];
                    // e4 e5 d4 d5
                    for sq in [28, 36, 27, 35] {
                        t[sq] = CENTER_PAWN_VALUE;
                    }
                    // c3 e3
                    for sq in [18, 20] {
                        t[sq] = SEMI_CENTER_PAWN_VALUE;
                    }
                    pov(t, color)
                }
                Figure::Knight => {
                    let mut t = [KNIGHT_VALUE; 64];
                    for (sq, value) in t.iter_mut().enumerate() {
                        let (rank, file) = (rank_of(sq), file_of(sq));
                        if rank == 0 || rank == 7 {
                            *value -= KNIGHT_ON_EDGE_DEDUCTION;
                        } else if file == 1 || file == 6 {
                            *value -= KNIGHT_CLOSE_TO_EDGE_DEDUCTION;
                        }
                        if file == 0 || file == 7 {
                            *value -= KNIGHT_ON_EDGE_DEDUCTION;
                        } else if rank == 1 || rank == 6 {
                            *value -= KNIGHT_CLOSE_TO_EDGE_DEDUCTION;
                        }
                    }
                    pov(t, color)
                }
                Figure::Bishop => [BISHOP_VALUE; 64],
                Figure::Rook => [ROOK_VALUE; 64],
                Figure::Queen => [QUEEN_VALUE; 64],
                Figure::Sentry => [SENTRY_VALUE; 64],
                Figure::Jailer => [JAILER_VALUE; 64],
                f => match f.lancer_direction() {
                    Some(dir) => lancer_table(color, dir),
                    None => [Accum::ZERO; 64],
                },
            };
            tables[piece.index()] = table;
        }
    }
    tables
}

pub fn init_material_tables() {
    MATERIAL_TABLES.get_or_init(build_material_tables);
}

#[inline]
pub fn material_value(piece: Piece, sq: usize) -> Accum {
    MATERIAL_TABLES.get_or_init(build_material_tables)[piece.index()][sq]
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Remaining middle-game material of both sides.
pub fn phase(state: &State) -> Score {
    state.material[0].m + state.material[1].m
}

pub fn mobility(state: &State, color: Color) -> Accum {
    let us = state.by_color[color.index()];
    let them = state.by_color[color.opposite().index()];
    let free = us & !state.jailed_mask(color);
    let mut acc = Accum::ZERO;

    for sq in iter_bits(free) {
        let fig = state.piece_at(sq).figure();
        let reach = match fig {
            Figure::Knight => knight_mobility(GenKind::ALL, sq, us, them),
            Figure::Bishop | Figure::Sentry => bishop_mobility(GenKind::ALL, sq, us, them),
            Figure::Rook => rook_mobility(GenKind::ALL, sq, us, them),
            Figure::Jailer => rook_mobility(GenKind::QUIET, sq, us, them),
            Figure::Queen => queen_mobility(GenKind::ALL, sq, us, them),
            f => match f.lancer_direction() {
                Some(dir) => lancer_mobility(GenKind::ALL, dir, sq, us, them),
                None => 0,
            },
        };
        acc += MOBILITY_WEIGHTS[fig.index()].scaled(count_bits(reach) as Score);
    }
    acc
}

pub fn castling(state: &State, color: Color) -> Accum {
    let mut acc = Accum::ZERO;
    for side in CastlingSide::ALL {
        if state.castling_rights.can_castle(color, side) {
            acc += CASTLING_RIGHT_BONUS;
        }
    }
    if state.lost_castling[color.index()] {
        acc += LOST_CASTLING_PENALTY;
    }
    acc
}

/// Static score from the side to move's point of view, within `±MAX_SCORE`.
pub fn evaluate(state: &State) -> Score {
    let us = state.turn;
    let them = us.opposite();
    let phase = phase(state);

    let material = state.material[us.index()] - state.material[them.index()];
    let positional = mobility(state, us) - mobility(state, them) + castling(state, us) - castling(state, them);

    (material.taper(phase) + positional.taper(phase)).clamp(-MAX_SCORE, MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Variant;

    #[test]
    fn start_positions_are_balanced() {
        crate::init();
        for variant in [Variant::Standard, Variant::EightPiece] {
            let st = State::from_fen(variant, variant.start_fen()).unwrap();
            assert_eq!(evaluate(&st), 0, "{}", variant);
            assert!(phase(&st) <= INITIAL_MATERIAL);
        }
    }

    #[test]
    fn pawn_tables_mirror() {
        let wp = Piece::new(Color::White, Figure::Pawn);
        let bp = Piece::new(Color::Black, Figure::Pawn);
        assert_eq!(material_value(wp, 28), CENTER_PAWN_VALUE);
        assert_eq!(material_value(bp, 28 ^ 56), CENTER_PAWN_VALUE);
        assert_eq!(material_value(wp, 20), SEMI_CENTER_PAWN_VALUE);
    }

    #[test]
    fn knights_lose_value_on_the_rim() {
        let n = Piece::new(Color::White, Figure::Knight);
        assert_eq!(material_value(n, 27), KNIGHT_VALUE);
        assert!(material_value(n, 0).m < material_value(n, 9).m);
        assert!(material_value(n, 9).m < material_value(n, 27).m);
    }

    #[test]
    fn lancer_facing_off_board_is_worthless() {
        // north-facing lancer on the last rank
        let ln = Piece::lancer(Color::White, 0);
        assert_eq!(material_value(ln, 60), LANCER_FACING_OUT_VALUE);
        assert_eq!(material_value(ln, 27), LANCER_VALUE);
        let le = Piece::lancer(Color::White, 2);
        assert_eq!(material_value(le, square_at(1, 2)), LANCER_VALUE + LANCER_HOME_BONUS);
    }

    #[test]
    fn material_edge_is_positive_for_side_up_a_queen() {
        crate::init();
        let st = State::from_fen(Variant::Standard, "4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        assert!(evaluate(&st) > 500);
        let st = State::from_fen(Variant::Standard, "4k3/8/8/8/8/8/8/3QK3 b - - 0 1").unwrap();
        assert!(evaluate(&st) < -500);
    }

    #[test]
    fn taper_blends_by_phase() {
        let acc = Accum::new(100, 300);
        assert_eq!(acc.taper(INITIAL_MATERIAL), 100);
        assert_eq!(acc.taper(0), 300);
        assert_eq!(acc.taper(INITIAL_MATERIAL / 2), 200);
    }
}
