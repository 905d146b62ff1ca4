//! Main search engine implementation
//!
//! Iterative deepening alpha-beta over the position stack, with optional
//! null-move pruning, stack reduction of the ordered move tail, aspiration
//! windows and multi-PV. Move ordering reads the PV cache and the subtree
//! size cache filled by earlier iterations.

use super::params::SearchParams;
use super::stats::SearchStats;
use super::tables::{PvTable, SubtreeTable};
use crate::eval::{evaluate, Score, INFINITE_SCORE, MATE_SCORE, MAX_SCORE};
use crate::moves::{moves_to_uci, GenKind, Move};
use crate::position::{Position, SEARCH_MAX_DEPTH};
use log::{debug, info};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Moves always searched at full depth, and the smallest list that is reduced.
pub const MIN_REDUCE_LIMIT: usize = 3;

const ASPIRATION_WINDOW: Score = 50;
const ASPIRATION_TRIES: usize = 4;
const ASPIRATION_MIN_DEPTH: usize = 5;

const CHECKPOINT_NODES: u64 = 4096;
const CHECKPOINT_INTERVAL: Duration = Duration::from_secs(5);

/// Phase of the per-node move supply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplyPhase {
    PopNull,
    GenAll,
    PopAll,
    GenDone,
}

#[derive(Debug, Clone, Copy)]
struct OrderedMove {
    mv: Move,
    /// Position in the cached PV list, `usize::MAX` when absent
    pv_rank: usize,
    capture: bool,
    threat: u32,
    subtree: u64,
    reduce: usize,
}

struct MoveSupply {
    phase: SupplyPhase,
    generated: Vec<Move>,
    moves: Vec<OrderedMove>,
    next: usize,
}

impl MoveSupply {
    fn new() -> Self {
        Self {
            phase: SupplyPhase::GenDone,
            generated: Vec::with_capacity(128),
            moves: Vec::with_capacity(128),
            next: 0,
        }
    }

    fn reset(&mut self, allow_null: bool) {
        self.phase = if allow_null {
            SupplyPhase::PopNull
        } else {
            SupplyPhase::GenAll
        };
        self.moves.clear();
        self.next = 0;
    }
}

/// Bounds and depth limits of one node
#[derive(Debug, Clone, Copy)]
struct Node {
    alpha: Score,
    beta: Score,
    ply: usize,
    max_depth: usize,
    null_move_made: bool,
}

/// One reported line of a completed iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchInfo {
    pub multipv: Option<usize>,
    pub depth: usize,
    pub time_ms: u64,
    pub nodes: u64,
    pub nps: u64,
    pub score: Score,
    pub pv: Vec<Move>,
}

impl fmt::Display for SearchInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("info ")?;
        if let Some(k) = self.multipv {
            write!(f, "multipv {} ", k)?;
        }
        write!(
            f,
            "depth {} time {} nodes {} nps {} score cp {} pv {}",
            self.depth,
            self.time_ms,
            self.nodes,
            self.nps,
            self.score,
            moves_to_uci(&self.pv)
        )
    }
}

/// Result of a search: the last completed iteration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub best: Option<Move>,
    pub ponder: Option<Move>,
    pub score: Score,
    pub depth: usize,
    pub pv: Vec<Move>,
    pub infos: Vec<SearchInfo>,
}

#[inline]
fn isqrt(n: usize) -> usize {
    let mut r = (n as f64).sqrt() as usize;
    while r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }
    r
}

/// Main search engine
pub struct Search {
    /// Position stack, searched in place
    pos: Position,

    params: SearchParams,

    stats: SearchStats,

    pv_table: PvTable,

    subtree_table: SubtreeTable,

    /// Raised from outside to abort; the running iteration is discarded
    stop: Arc<AtomicBool>,

    /// One move supply per ply
    supplies: Vec<MoveSupply>,

    ignore_root_moves: Vec<Move>,

    last_root_score: Score,

    last_checkpoint: Instant,

    /// Stack pointer of the root when the search started
    root: usize,
}

impl Search {
    pub fn new(pos: Position, params: SearchParams) -> Self {
        Self::with_stop_flag(pos, params, Arc::new(AtomicBool::new(false)))
    }

    pub fn with_stop_flag(pos: Position, params: SearchParams, stop: Arc<AtomicBool>) -> Self {
        Self {
            pos,
            pv_table: PvTable::new(params.pv_table_bits),
            subtree_table: SubtreeTable::new(params.subtree_table_bits),
            params,
            stats: SearchStats::new(),
            stop,
            supplies: (0..=SEARCH_MAX_DEPTH).map(|_| MoveSupply::new()).collect(),
            ignore_root_moves: Vec::new(),
            last_root_score: 0,
            last_checkpoint: Instant::now(),
            root: 0,
        }
    }

    pub fn position(&self) -> &Position {
        &self.pos
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn pv_table(&self) -> &PvTable {
        &self.pv_table
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    #[inline]
    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Iterative deepening up to `max_depth`, collecting every completed depth.
    pub fn search(&mut self, max_depth: usize) -> SearchOutcome {
        self.search_with(max_depth, |_| {})
    }

    /// Like [`Search::search`], handing each line to `on_info` as soon as
    /// its depth completes.
    pub fn search_with<F>(&mut self, max_depth: usize, mut on_info: F) -> SearchOutcome
    where
        F: FnMut(&SearchInfo),
    {
        let max_depth = max_depth.clamp(1, SEARCH_MAX_DEPTH);
        self.pv_table.clear();
        self.subtree_table.clear();
        self.stats.start_timing();
        self.last_checkpoint = Instant::now();
        self.last_root_score = 0;
        self.root = self.pos.ply();

        let mut outcome = SearchOutcome::default();
        let root_moves = self.pos.legal_moves();
        if root_moves.is_empty() {
            outcome.score = if self.pos.current().is_checked_us() { -MATE_SCORE } else { 0 };
            return outcome;
        }

        info!(
            "search {} depth {} multipv {} fen {}",
            self.pos.variant(),
            max_depth,
            self.params.multi_pv,
            self.pos.current().to_fen()
        );

        let lines_wanted = self.params.multi_pv.clamp(1, root_moves.len());

        'deepening: for depth in 1..=max_depth {
            self.ignore_root_moves.clear();
            let mut lines: Vec<(Score, Vec<Move>)> = Vec::with_capacity(lines_wanted);

            for _ in 0..lines_wanted {
                let score = self.alpha_beta(depth);
                if self.stopped() {
                    debug!("search stopped during depth {}", depth);
                    break 'deepening;
                }
                let pv = self.get_pv(depth);
                let Some(&first) = pv.first() else {
                    break;
                };
                self.ignore_root_moves.push(first);
                lines.push((score, pv));
            }
            if lines.is_empty() {
                break;
            }

            lines.sort_by(|a, b| b.0.cmp(&a.0));
            self.stats.update_timing();

            for (i, (score, pv)) in lines.iter().enumerate() {
                let line = SearchInfo {
                    multipv: (self.params.multi_pv > 1).then_some(i + 1),
                    depth,
                    time_ms: self.stats.elapsed_ms(),
                    nodes: self.stats.nodes,
                    nps: self.stats.nps,
                    score: *score,
                    pv: pv.clone(),
                };
                info!("{}", line);
                on_info(&line);
                outcome.infos.push(line);
            }

            let (best_score, best_pv) = &lines[0];
            self.last_root_score = *best_score;
            outcome.best = best_pv.first().copied();
            outcome.ponder = best_pv.get(1).copied();
            outcome.score = *best_score;
            outcome.depth = depth;
            outcome.pv = best_pv.clone();

            if best_score.abs() > MAX_SCORE {
                break;
            }
        }

        self.ignore_root_moves.clear();
        if outcome.best.is_none() {
            outcome.best = root_moves.first().copied();
        }
        outcome
    }

    /// One root search at `max_depth`, first inside aspiration windows when enabled.
    pub fn alpha_beta(&mut self, max_depth: usize) -> Score {
        let root_key = self.pos.zobrist();
        self.pv_table.remove(root_key);

        if self.params.aspiration_window && max_depth >= ASPIRATION_MIN_DEPTH {
            let mut window = ASPIRATION_WINDOW;
            for _ in 0..ASPIRATION_TRIES {
                let alpha = self.last_root_score - window;
                let beta = self.last_root_score + window;
                let score = self.root_search(alpha, beta, max_depth);
                if self.stopped() || (score > alpha && score < beta) {
                    return score;
                }
                let side = if score <= alpha { "low" } else { "high" };
                debug!("aspiration fail {} at depth {}: window {} score {}", side, max_depth, window, score);
                self.stats.inc_aspiration_retry();
                window *= 2;
            }
        }

        self.root_search(-INFINITE_SCORE, INFINITE_SCORE, max_depth)
    }

    fn root_search(&mut self, alpha: Score, beta: Score, max_depth: usize) -> Score {
        self.alpha_beta_rec(Node {
            alpha,
            beta,
            ply: 0,
            max_depth,
            null_move_made: false,
        })
    }

    fn alpha_beta_rec(&mut self, node: Node) -> Score {
        self.stats.inc_node();
        if self.stats.nodes % CHECKPOINT_NODES == 0 {
            self.checkpoint();
        }

        if node.ply > 0 {
            if let Some(score) = self.pos.game_end(node.ply) {
                return score;
            }
        }
        if node.ply >= node.max_depth || self.stopped() {
            return evaluate(self.pos.current());
        }

        let key = self.pos.zobrist();
        let allow_null = self.params.null_move_pruning
            && !node.null_move_made
            && node.ply >= self.params.null_move_min_depth
            && self.pv_table.get(key).is_none();
        self.supplies[node.ply].reset(allow_null);

        let mut alpha = node.alpha;
        let mut has_legal = false;

        while let Some((mv, reduce)) = self.next_move(node.ply, key) {
            if node.ply == 0 && self.ignore_root_moves.contains(&mv) {
                continue;
            }

            let mover = self.pos.turn();
            let nodes_before = self.stats.nodes;
            self.pos.push(mv);
            if self.pos.current().is_checked(mover) {
                self.pos.pop();
                continue;
            }

            let is_null = mv.is_null();
            if is_null {
                debug_assert!(!node.null_move_made, "null move below a null move");
                self.stats.inc_null_move();
            } else {
                has_legal = true;
            }
            let child_max = if is_null {
                node.max_depth.saturating_sub(self.params.null_move_reduction)
            } else if reduce > 0 {
                self.stats.inc_reduction();
                node.max_depth.saturating_sub(reduce).max(node.ply + 2).min(node.max_depth)
            } else {
                node.max_depth
            };

            let score = -self.alpha_beta_rec(Node {
                alpha: -node.beta,
                beta: -alpha,
                ply: node.ply + 1,
                max_depth: child_max,
                // no second null move anywhere below this one
                null_move_made: node.null_move_made || is_null,
            });
            self.pos.pop();

            if self.stopped() {
                return alpha;
            }

            if !is_null {
                let size = (self.stats.nodes - nodes_before) << (2 * reduce.min(16));
                self.subtree_table.record(key, mv, node.ply, size);
            }

            if score > alpha {
                if is_null {
                    // a pass may refute but never raises alpha
                    if score >= node.beta {
                        self.stats.inc_null_move_cutoff();
                        return node.beta;
                    }
                    continue;
                }
                self.pv_table.record(key, node.ply, mv);
                if score >= node.beta {
                    self.stats.inc_cutoff();
                    return node.beta;
                }
                alpha = score;
            }
        }

        if !has_legal {
            if self.pos.current().is_checked_us() {
                return -MATE_SCORE + node.ply as Score;
            }
            return 0;
        }
        alpha
    }

    /// Next move of the supply at `ply` and the plies to reduce it by.
    fn next_move(&mut self, ply: usize, key: u64) -> Option<(Move, usize)> {
        loop {
            match self.supplies[ply].phase {
                SupplyPhase::PopNull => {
                    self.supplies[ply].phase = SupplyPhase::GenAll;
                    return Some((Move::NULL, 0));
                }
                SupplyPhase::GenAll => {
                    self.fill_supply(ply, key);
                    self.supplies[ply].phase = SupplyPhase::PopAll;
                }
                SupplyPhase::PopAll => {
                    let supply = &mut self.supplies[ply];
                    if let Some(om) = supply.moves.get(supply.next).copied() {
                        supply.next += 1;
                        return Some((om.mv, om.reduce));
                    }
                    supply.phase = SupplyPhase::GenDone;
                }
                SupplyPhase::GenDone => return None,
            }
        }
    }

    /// Generate, order and mark reductions for the node at `ply`.
    fn fill_supply(&mut self, ply: usize, key: u64) {
        let state = self.pos.current();
        let supply = &mut self.supplies[ply];
        supply.generated.clear();
        state.generate_moves(GenKind::ALL, &mut supply.generated);

        supply.moves.clear();
        for &mv in &supply.generated {
            supply.moves.push(OrderedMove {
                mv,
                pv_rank: self.pv_table.rank_of(key, mv).unwrap_or(usize::MAX),
                capture: state.is_capture(mv),
                threat: state.king_zone_threat(mv),
                subtree: self.subtree_table.get(key, mv).unwrap_or(0),
                reduce: 0,
            });
        }

        supply.moves.sort_by(|a, b| {
            a.pv_rank
                .cmp(&b.pv_rank)
                .then(b.capture.cmp(&a.capture))
                .then(b.threat.cmp(&a.threat))
                .then(b.subtree.cmp(&a.subtree))
        });

        let n = supply.moves.len();
        if self.params.stack_reduction && n > MIN_REDUCE_LIMIT {
            let keep = MIN_REDUCE_LIMIT.max(4 * isqrt(n) / self.params.pruning_agressivity.max(1));
            for om in supply.moves.iter_mut().skip(keep) {
                if om.pv_rank == usize::MAX && !om.capture {
                    om.reduce = self.params.pruning_reduction;
                }
            }
        }
    }

    /// Principal variation from the PV cache, validated move by move.
    pub fn get_pv(&mut self, depth: usize) -> Vec<Move> {
        let start = self.pos.ply();
        let mut pv = Vec::with_capacity(depth);
        while pv.len() < depth {
            let Some(mv) = self.pv_table.best_move(self.pos.zobrist()) else {
                break;
            };
            if !self.pos.legal_moves().contains(&mv) {
                break;
            }
            self.pos.push(mv);
            pv.push(mv);
            if self.pos.game_end(pv.len()).is_some() {
                break;
            }
        }
        while self.pos.ply() > start {
            self.pos.pop();
        }
        pv
    }

    fn checkpoint(&mut self) {
        if self.last_checkpoint.elapsed() < CHECKPOINT_INTERVAL {
            return;
        }
        self.stats.update_timing();
        debug!(
            "checkpoint nodes {} time {} nps {} ply {}",
            self.stats.nodes,
            self.stats.elapsed_ms(),
            self.stats.nps,
            self.pos.ply() - self.root
        );
        self.last_checkpoint = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Variant;

    fn search_for(variant: Variant, fen: &str, params: SearchParams) -> Search {
        crate::init();
        let mut pos = Position::new(variant);
        pos.parse_fen(fen).unwrap();
        Search::new(pos, params)
    }

    #[test]
    fn isqrt_floors() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(15), 3);
        assert_eq!(isqrt(16), 4);
        assert_eq!(isqrt(40), 6);
    }

    #[test]
    fn finds_mate_in_one() {
        let mut s = search_for(Variant::Standard, "k7/8/1K6/8/8/8/8/7R w - - 0 1", SearchParams::new());
        let out = s.search(3);
        assert_eq!(out.best, Some(Move::normal(7, 63)));
        assert_eq!(out.score, MATE_SCORE - 1);
        // stops once the mate is confirmed
        assert!(out.depth < 3);
    }

    #[test]
    fn null_move_flag_covers_the_whole_subtree() {
        const FEN: &str = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        let params = SearchParams::new().null_move_pruning(true).null_move_min_depth(2);
        let node = |null_move_made| Node {
            alpha: -INFINITE_SCORE,
            beta: INFINITE_SCORE,
            ply: 2,
            max_depth: 5,
            null_move_made,
        };

        let mut fresh = search_for(Variant::Standard, FEN, params.clone());
        fresh.alpha_beta_rec(node(false));
        assert!(fresh.stats().null_moves > 0);

        // entered through a null move two plies up: no pass at any depth below
        let mut below_null = search_for(Variant::Standard, FEN, params);
        below_null.alpha_beta_rec(node(true));
        assert_eq!(below_null.stats().null_moves, 0);
        assert_eq!(below_null.position().ply(), 0);
    }

    #[test]
    fn info_line_format() {
        let info = SearchInfo {
            multipv: Some(2),
            depth: 3,
            time_ms: 10,
            nodes: 100,
            nps: 10000,
            score: -15,
            pv: vec![Move::normal(12, 28), Move::normal(52, 36)],
        };
        assert_eq!(
            info.to_string(),
            "info multipv 2 depth 3 time 10 nodes 100 nps 10000 score cp -15 pv e2e4 e7e5"
        );
    }

    #[test]
    fn lines_are_reported_as_depths_complete() {
        let mut s = search_for(Variant::Standard, crate::state::START_FEN, SearchParams::new());
        let mut seen = Vec::new();
        let out = s.search_with(3, |info| seen.push(info.clone()));
        assert_eq!(seen.iter().map(|i| i.depth).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(seen, out.infos);
    }

    #[test]
    fn root_pv_is_cached() {
        let mut s = search_for(Variant::Standard, crate::state::START_FEN, SearchParams::new());
        let out = s.search(2);
        let root = s.position().zobrist();
        assert_eq!(s.pv_table().best_move(root), out.best);
        assert_eq!(out.pv.len(), 2);
        assert_eq!(s.position().ply(), 0);
    }

    #[test]
    fn multi_pv_reports_distinct_sorted_lines() {
        let params = SearchParams::new().multi_pv(3);
        let mut s = search_for(Variant::Standard, crate::state::START_FEN, params);
        let out = s.search(2);
        let last: Vec<&SearchInfo> = out.infos.iter().filter(|i| i.depth == 2).collect();
        assert_eq!(last.len(), 3);
        assert!(last.windows(2).all(|w| w[0].score >= w[1].score));
        assert_ne!(last[0].pv[0], last[1].pv[0]);
        assert_ne!(last[1].pv[0], last[2].pv[0]);
        assert_eq!(last[0].multipv, Some(1));
    }
}
