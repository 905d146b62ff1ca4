//! Search parameters and configuration
//!
//! Controls depth, multi-PV, pruning and reduction behaviour and the
//! sizes of the per-search caches.

use crate::position::SEARCH_MAX_DEPTH;

pub const MAX_MULTI_PV: usize = 20;

/// Search parameters for the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Maximum iterative deepening depth in plies
    pub max_depth: usize,

    /// Number of principal variations reported per depth
    pub multi_pv: usize,

    /// Enable null-move pruning
    pub null_move_pruning: bool,

    /// First ply at which a null move may be tried
    pub null_move_min_depth: usize,

    /// Plies removed from the null-move subtree
    pub null_move_reduction: usize,

    /// Enable reduction of the tail of the ordered move list
    pub stack_reduction: bool,

    /// Divisor of the number of moves kept at full depth
    pub pruning_agressivity: usize,

    /// Plies removed from reduced moves
    pub pruning_reduction: usize,

    /// Start deeper iterations with a narrow window around the last score
    pub aspiration_window: bool,

    /// log2 of the PV cache size
    pub pv_table_bits: u32,

    /// log2 of the subtree size cache
    pub subtree_table_bits: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_depth: 10,
            multi_pv: 1,
            null_move_pruning: false,
            null_move_min_depth: 4,
            null_move_reduction: 1,
            stack_reduction: false,
            pruning_agressivity: 1,
            pruning_reduction: 1,
            aspiration_window: false,
            pv_table_bits: 16,
            subtree_table_bits: 18,
        }
    }
}

impl SearchParams {
    /// Create new search params with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum depth in plies, capped at the stack limit
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.clamp(1, SEARCH_MAX_DEPTH);
        self
    }

    pub fn multi_pv(mut self, lines: usize) -> Self {
        self.multi_pv = lines.clamp(1, MAX_MULTI_PV);
        self
    }

    /// Enable or disable null-move pruning
    pub fn null_move_pruning(mut self, enable: bool) -> Self {
        self.null_move_pruning = enable;
        self
    }

    pub fn null_move_min_depth(mut self, depth: usize) -> Self {
        self.null_move_min_depth = depth;
        self
    }

    pub fn null_move_reduction(mut self, plies: usize) -> Self {
        self.null_move_reduction = plies;
        self
    }

    /// Enable or disable stack reduction
    pub fn stack_reduction(mut self, enable: bool) -> Self {
        self.stack_reduction = enable;
        self
    }

    pub fn pruning_agressivity(mut self, divisor: usize) -> Self {
        self.pruning_agressivity = divisor.max(1);
        self
    }

    pub fn pruning_reduction(mut self, plies: usize) -> Self {
        self.pruning_reduction = plies;
        self
    }

    pub fn aspiration_window(mut self, enable: bool) -> Self {
        self.aspiration_window = enable;
        self
    }

    /// Set cache sizes as powers of two
    pub fn table_bits(mut self, pv_bits: u32, subtree_bits: u32) -> Self {
        self.pv_table_bits = pv_bits;
        self.subtree_table_bits = subtree_bits;
        self
    }

    /// Plain alpha-beta: every pruning and reduction switched off.
    pub fn exhaustive(self) -> Self {
        self.null_move_pruning(false).stack_reduction(false).aspiration_window(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_clamps() {
        let p = SearchParams::new().max_depth(500).multi_pv(0).pruning_agressivity(0);
        assert_eq!(p.max_depth, SEARCH_MAX_DEPTH);
        assert_eq!(p.multi_pv, 1);
        assert_eq!(p.pruning_agressivity, 1);
    }

    #[test]
    fn exhaustive_turns_pruning_off() {
        let p = SearchParams::new().null_move_pruning(true).stack_reduction(true).exhaustive();
        assert!(!p.null_move_pruning && !p.stack_reduction && !p.aspiration_window);
    }
}
