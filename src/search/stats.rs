//! Search statistics and performance metrics
//!
//! Tracks nodes, cutoffs, reductions and timing for one search.

use std::time::{Duration, Instant};

/// Search statistics
#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    /// Total nodes searched
    pub nodes: u64,

    /// Beta cutoffs
    pub cutoffs: u64,

    /// Null moves played
    pub null_moves: u64,

    /// Null-move cutoffs
    pub null_move_cutoffs: u64,

    /// Moves searched at reduced depth
    pub reductions: u64,

    /// Aspiration window re-searches
    pub aspiration_retries: u64,

    /// Search start time
    pub start_time: Option<Instant>,

    /// Time spent searching
    pub search_time: Duration,

    /// Nodes per second rate
    pub nps: u64,
}

impl SearchStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear counters and start timing
    pub fn start_timing(&mut self) {
        *self = Self::default();
        self.start_time = Some(Instant::now());
    }

    /// Update elapsed time and NPS
    pub fn update_timing(&mut self) {
        if let Some(start) = self.start_time {
            self.search_time = start.elapsed();
            let elapsed_ms = self.search_time.as_millis() as u64;
            if elapsed_ms > 0 {
                self.nps = (self.nodes * 1000) / elapsed_ms;
            }
        }
    }

    #[inline]
    pub fn inc_node(&mut self) {
        self.nodes += 1;
    }

    pub fn inc_cutoff(&mut self) {
        self.cutoffs += 1;
    }

    pub fn inc_null_move(&mut self) {
        self.null_moves += 1;
    }

    pub fn inc_null_move_cutoff(&mut self) {
        self.null_move_cutoffs += 1;
    }

    pub fn inc_reduction(&mut self) {
        self.reductions += 1;
    }

    pub fn inc_aspiration_retry(&mut self) {
        self.aspiration_retries += 1;
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.search_time.as_millis() as u64
    }

    /// Cutoff rate as percentage of nodes
    pub fn cutoff_rate(&self) -> f64 {
        if self.nodes == 0 {
            0.0
        } else {
            self.cutoffs as f64 * 100.0 / self.nodes as f64
        }
    }
}
