//! Magic bitboards for O(1) sliding piece attack generation
//!
//! For every square the relevant blocker mask of a slider is hashed by a
//! multiplicative "magic" into a dense index. The magics ship as constants in
//! `magic_consts`; [`AttackBuilder`] is the offline search that produced them
//! (see the `magics` binary). At start-up only the dense attack tables are
//! filled, once, into a `OnceLock`.

use crate::bitboard::{bit, file_of, king_attacks, knight_attacks, rank_of, square_at, Bitboard, Square};
use crate::error::MagicError;
use crate::magic_consts::{BISHOP_MAGICS, BISHOP_SHIFTS, ROOK_MAGICS, ROOK_SHIFTS};
use crate::moves::GenKind;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::OnceLock;

pub const ROOK_DELTAS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
pub const BISHOP_DELTAS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Seed the shipped magics were searched with.
pub const MAGIC_SEED: u64 = 0x8_1ece_5eed;
const DEFAULT_SHRINK_TRIES: usize = 256;

// ============================================================================
// MASKS AND SLOW RAY CASTING
// ============================================================================

fn step(sq: Square, (df, dr): (i8, i8)) -> Option<Square> {
    let file = file_of(sq) as i8 + df;
    let rank = rank_of(sq) as i8 + dr;
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some(square_at(rank as usize, file as usize))
    } else {
        None
    }
}

/// Squares whose occupancy can change the attack set: every ray square except
/// the last one before the edge.
pub fn relevant_mask(sq: Square, deltas: &[(i8, i8)]) -> Bitboard {
    let mut mask = 0;
    for &delta in deltas {
        let mut cur = sq;
        while let Some(next) = step(cur, delta) {
            if step(next, delta).is_none() {
                break;
            }
            mask |= bit(next);
            cur = next;
        }
    }
    mask
}

/// Brute-force attack set, blockers included.
pub fn ray_attacks(sq: Square, deltas: &[(i8, i8)], occ: Bitboard) -> Bitboard {
    let mut attacks = 0;
    for &delta in deltas {
        let mut cur = sq;
        while let Some(next) = step(cur, delta) {
            attacks |= bit(next);
            if occ & bit(next) != 0 {
                break;
            }
            cur = next;
        }
    }
    attacks
}

/// Generate all blocker subsets for a given mask
pub fn enumerate_subsets(mask: Bitboard) -> Vec<Bitboard> {
    let mut subsets = Vec::with_capacity(1 << mask.count_ones());
    let mut subset = 0u64;
    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    subsets
}

// ============================================================================
// MAGIC ENTRIES AND SEARCH
// ============================================================================

/// One square's hash parameters plus its dense attack table.
#[derive(Debug, Clone)]
pub struct Magic {
    pub mask: Bitboard,
    pub magic: u64,
    pub shift: u32,
    pub attacks: Vec<Bitboard>,
}

impl Magic {
    #[inline]
    pub fn index(&self, occ: Bitboard) -> usize {
        ((occ & self.mask).wrapping_mul(self.magic) >> self.shift) as usize
    }

    #[inline]
    pub fn attacks(&self, occ: Bitboard) -> Bitboard {
        self.attacks[self.index(occ)]
    }

    pub fn index_bits(&self) -> u32 {
        64 - self.shift
    }

    /// Dense table for a known magic. Fails if two occupancies with different
    /// attack sets share an index.
    pub fn from_constant(sq: Square, deltas: &[(i8, i8)], magic: u64, shift: u32) -> Result<Magic, MagicError> {
        let mask = relevant_mask(sq, deltas);
        let bits = match 64u32.checked_sub(shift) {
            Some(b) if (1..=32).contains(&b) && mask.count_ones() <= b => b,
            _ => return Err(MagicError::Collision { square: sq, magic }),
        };
        let mut entry = Magic {
            mask,
            magic,
            shift,
            attacks: vec![0; 1 << bits],
        };
        let mut filled = vec![false; entry.attacks.len()];
        for occ in enumerate_subsets(mask) {
            let index = entry.index(occ);
            let attacks = ray_attacks(sq, deltas, occ);
            if filled[index] && entry.attacks[index] != attacks {
                return Err(MagicError::Collision { square: sq, magic });
            }
            filled[index] = true;
            entry.attacks[index] = attacks;
        }
        Ok(entry)
    }
}

/// Randomized magic finder.
pub struct AttackBuilder {
    rng: StdRng,
    shrink_tries: usize,
    table: Vec<Bitboard>,
    stamps: Vec<u32>,
    epoch: u32,
}

impl AttackBuilder {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            shrink_tries: DEFAULT_SHRINK_TRIES,
            table: Vec::new(),
            stamps: Vec::new(),
            epoch: 0,
        }
    }

    /// Candidates tried at each width below the full mask width.
    pub fn with_shrink_tries(mut self, tries: usize) -> Self {
        self.shrink_tries = tries;
        self
    }

    fn candidate(&mut self) -> u64 {
        self.rng.gen::<u64>() & self.rng.gen::<u64>() & self.rng.gen::<u64>()
    }

    /// Find a collision-free magic for `sq` along `deltas`.
    ///
    /// The index width starts at the number of mask bits; after each success
    /// the search continues one bit narrower with `shrink_tries` candidates
    /// and keeps the narrowest magic found. Failing at the full width within
    /// `tries` candidates is an error.
    pub fn search(&mut self, sq: Square, deltas: &[(i8, i8)], tries: usize) -> Result<Magic, MagicError> {
        let mask = relevant_mask(sq, deltas);
        let occupancies = enumerate_subsets(mask);
        let attack_sets: Vec<Bitboard> = occupancies.iter().map(|&occ| ray_attacks(sq, deltas, occ)).collect();

        let full_bits = mask.count_ones().max(1);
        let mut best: Option<Magic> = None;
        let mut bits = full_bits;
        let mut budget = tries;

        while bits >= 1 {
            match self.search_width(mask, bits, &occupancies, &attack_sets, budget) {
                Some(found) => {
                    best = Some(found);
                    bits -= 1;
                    budget = self.shrink_tries;
                }
                None => break,
            }
        }

        best.ok_or(MagicError::NotFound {
            square: sq,
            bits: full_bits,
            tries,
        })
    }

    fn search_width(
        &mut self,
        mask: Bitboard,
        bits: u32,
        occupancies: &[Bitboard],
        attack_sets: &[Bitboard],
        tries: usize,
    ) -> Option<Magic> {
        let size = 1usize << bits;
        let shift = 64 - bits;
        if self.table.len() < size {
            self.table.resize(size, 0);
            self.stamps.resize(size, 0);
        }

        for _ in 0..tries {
            let magic = self.candidate();
            if (mask.wrapping_mul(magic) & 0xFF00_0000_0000_0000).count_ones() < 6 {
                continue;
            }

            self.epoch = self.epoch.wrapping_add(1);
            if self.epoch == 0 {
                self.stamps.iter_mut().for_each(|s| *s = 0);
                self.epoch = 1;
            }

            let mut ok = true;
            for (&occ, &attacks) in occupancies.iter().zip(attack_sets) {
                let index = (occ.wrapping_mul(magic) >> shift) as usize;
                if self.stamps[index] != self.epoch {
                    self.stamps[index] = self.epoch;
                    self.table[index] = attacks;
                } else if self.table[index] != attacks {
                    ok = false;
                    break;
                }
            }

            if ok {
                let mut dense = vec![0; size];
                for (&occ, &attacks) in occupancies.iter().zip(attack_sets) {
                    dense[(occ.wrapping_mul(magic) >> shift) as usize] = attacks;
                }
                return Some(Magic {
                    mask,
                    magic,
                    shift,
                    attacks: dense,
                });
            }
        }
        None
    }
}

// ============================================================================
// TABLE INITIALIZATION
// ============================================================================

struct MagicTables {
    rook: Vec<Magic>,
    bishop: Vec<Magic>,
}

static MAGIC_TABLES: OnceLock<MagicTables> = OnceLock::new();

fn build_slider(deltas: &[(i8, i8)], magics: &[u64; 64], shifts: &[u32; 64]) -> Result<Vec<Magic>, MagicError> {
    (0..64)
        .map(|sq| Magic::from_constant(sq, deltas, magics[sq], shifts[sq]))
        .collect()
}

fn build_magic_tables() -> Result<MagicTables, MagicError> {
    let rook = build_slider(&ROOK_DELTAS, &ROOK_MAGICS, &ROOK_SHIFTS)?;
    let bishop = build_slider(&BISHOP_DELTAS, &BISHOP_MAGICS, &BISHOP_SHIFTS)?;
    log::debug!(
        "magic tables ready: {} rook and {} bishop entries",
        rook.iter().map(|m| m.attacks.len()).sum::<usize>(),
        bishop.iter().map(|m| m.attacks.len()).sum::<usize>()
    );
    Ok(MagicTables { rook, bishop })
}

/// Fill the attack tables from the shipped magics. Safe to call more than once.
pub fn try_init() -> Result<(), MagicError> {
    if MAGIC_TABLES.get().is_none() {
        let tables = build_magic_tables()?;
        // a concurrent caller may have won the race with identical tables
        let _ = MAGIC_TABLES.set(tables);
    }
    Ok(())
}

#[inline]
fn tables() -> &'static MagicTables {
    MAGIC_TABLES.get_or_init(|| match build_magic_tables() {
        Ok(tables) => tables,
        Err(e) => panic!("attack tables unavailable ({}); call magic::try_init at start-up", e),
    })
}

// ============================================================================
// PUBLIC API
// ============================================================================

#[inline]
pub fn rook_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    tables().rook[sq].attacks(occ)
}

#[inline]
pub fn bishop_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    tables().bishop[sq].attacks(occ)
}

#[inline]
pub fn queen_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    rook_attacks(sq, occ) | bishop_attacks(sq, occ)
}

/// Destination filter for a generation kind.
#[inline]
pub fn targets(kind: GenKind, us: Bitboard, them: Bitboard) -> Bitboard {
    let mut t = 0;
    if kind.is_quiet() {
        t |= !(us | them);
    }
    if kind.is_violent() {
        t |= them;
    }
    t
}

pub fn bishop_mobility(kind: GenKind, sq: Square, us: Bitboard, them: Bitboard) -> Bitboard {
    bishop_attacks(sq, us | them) & targets(kind, us, them)
}

pub fn rook_mobility(kind: GenKind, sq: Square, us: Bitboard, them: Bitboard) -> Bitboard {
    rook_attacks(sq, us | them) & targets(kind, us, them)
}

pub fn queen_mobility(kind: GenKind, sq: Square, us: Bitboard, them: Bitboard) -> Bitboard {
    queen_attacks(sq, us | them) & targets(kind, us, them)
}

pub fn knight_mobility(kind: GenKind, sq: Square, us: Bitboard, them: Bitboard) -> Bitboard {
    knight_attacks(sq) & targets(kind, us, them)
}

pub fn king_mobility(kind: GenKind, sq: Square, us: Bitboard, them: Bitboard) -> Bitboard {
    king_attacks(sq) & targets(kind, us, them)
}
