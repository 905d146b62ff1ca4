//! Direct-mapped caches owned by one search: the PV cache and the subtree
//! size cache used for move ordering.

use crate::moves::Move;

/// Moves kept per PV entry, most recent alpha improvement first.
pub const PV_MOVES: usize = 4;

/// Subtree sizes are recorded only this close to the root.
pub const SUBTREE_MAX_PLY: usize = 8;

const EMPTY_PLY: u8 = u8::MAX;

#[inline]
fn slot(key: u64, mask: usize) -> usize {
    ((key ^ (key >> 32)) as usize) & mask
}

/// PV cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PvEntry {
    pub key: u64,
    /// Ply at which the entry was written
    pub ply: u8,
    pub len: u8,
    pub moves: [Move; PV_MOVES],
}

impl PvEntry {
    fn empty() -> Self {
        Self {
            key: 0,
            ply: EMPTY_PLY,
            len: 0,
            moves: [Move::NULL; PV_MOVES],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ply == EMPTY_PLY
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves[..self.len as usize]
    }

    pub fn best(&self) -> Option<Move> {
        self.moves().first().copied()
    }

    /// Move to the front, dropping the oldest move when full.
    fn promote(&mut self, mv: Move) {
        let len = self.len as usize;
        let pos = self.moves[..len].iter().position(|&m| m == mv);
        let end = match pos {
            Some(p) => p,
            None if len < PV_MOVES => {
                self.len += 1;
                len
            }
            None => PV_MOVES - 1,
        };
        self.moves.copy_within(0..end, 1);
        self.moves[0] = mv;
    }
}

pub struct PvTable {
    entries: Vec<PvEntry>,
    mask: usize,
}

impl PvTable {
    pub fn new(bits: u32) -> Self {
        let size = 1usize << bits;
        Self {
            entries: vec![PvEntry::empty(); size],
            mask: size - 1,
        }
    }

    pub fn clear(&mut self) {
        self.entries.fill(PvEntry::empty());
    }

    pub fn get(&self, key: u64) -> Option<&PvEntry> {
        let entry = &self.entries[slot(key, self.mask)];
        (!entry.is_empty() && entry.key == key).then_some(entry)
    }

    pub fn best_move(&self, key: u64) -> Option<Move> {
        self.get(key).and_then(PvEntry::best)
    }

    /// Rank of `mv` among the cached moves of `key`, 0 for the best.
    pub fn rank_of(&self, key: u64, mv: Move) -> Option<usize> {
        self.get(key).and_then(|e| e.moves().iter().position(|&m| m == mv))
    }

    pub fn remove(&mut self, key: u64) {
        let idx = slot(key, self.mask);
        if self.entries[idx].key == key {
            self.entries[idx] = PvEntry::empty();
        }
    }

    /// Record an alpha improvement. A different key takes the slot only if
    /// written at the same or a shallower ply.
    pub fn record(&mut self, key: u64, ply: usize, mv: Move) {
        let ply = ply.min(EMPTY_PLY as usize - 1) as u8;
        let entry = &mut self.entries[slot(key, self.mask)];
        if !entry.is_empty() && entry.key == key {
            entry.ply = entry.ply.min(ply);
            entry.promote(mv);
            return;
        }
        if entry.is_empty() || ply <= entry.ply {
            *entry = PvEntry::empty();
            entry.key = key;
            entry.ply = ply;
            entry.promote(mv);
        }
    }

    /// Slots in use
    pub fn used(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_empty()).count()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct SubtreeEntry {
    /// Key mixed with the move; zero marks an empty slot
    check: u64,
    ply: u8,
    size: u64,
}

/// Node counts below (position, move) pairs from earlier iterations.
pub struct SubtreeTable {
    entries: Vec<SubtreeEntry>,
    mask: usize,
}

fn mix(key: u64, mv: Move) -> u64 {
    let mut z = key ^ (mv.bits() as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    (z ^ (z >> 31)).max(1)
}

impl SubtreeTable {
    pub fn new(bits: u32) -> Self {
        let size = 1usize << bits;
        Self {
            entries: vec![SubtreeEntry::default(); size],
            mask: size - 1,
        }
    }

    pub fn clear(&mut self) {
        self.entries.fill(SubtreeEntry::default());
    }

    pub fn get(&self, key: u64, mv: Move) -> Option<u64> {
        let check = mix(key, mv);
        let entry = &self.entries[slot(check, self.mask)];
        (entry.check == check).then_some(entry.size)
    }

    /// Store unless the slot holds a record from a shallower ply.
    pub fn record(&mut self, key: u64, mv: Move, ply: usize, size: u64) {
        if ply >= SUBTREE_MAX_PLY {
            return;
        }
        let check = mix(key, mv);
        let entry = &mut self.entries[slot(check, self.mask)];
        if entry.check != 0 && (ply as u8) > entry.ply {
            return;
        }
        *entry = SubtreeEntry {
            check,
            ply: ply as u8,
            size,
        };
    }
}
