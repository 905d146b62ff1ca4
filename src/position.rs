//! Game position as a stack of [`State`] snapshots.
//!
//! `push` copies the current slot forward and applies the move there, so
//! `pop` is a pointer decrement. Slots are reused, never freed.

use crate::error::{FenError, MoveError};
use crate::eval::{Score, MATE_SCORE};
use crate::moves::Move;
use crate::notation::move_to_san;
use crate::piece::{Color, Variant};
use crate::state::State;
use crate::zobrist::recalc_zobrist_full;

/// Deepest search line in plies.
pub const SEARCH_MAX_DEPTH: usize = 100;
/// Slots allocated up front; the stack grows past this only for long games.
pub const MAX_STATES: usize = SEARCH_MAX_DEPTH + 1;

#[derive(Clone)]
pub struct Position {
    states: Vec<State>,
    ptr: usize,
    variant: Variant,
}

impl Default for Position {
    fn default() -> Self {
        Position::new(Variant::default())
    }
}

impl Position {
    pub fn new(variant: Variant) -> Position {
        let mut pos = Position {
            states: Vec::with_capacity(MAX_STATES),
            ptr: 0,
            variant,
        };
        pos.init(variant);
        pos
    }

    /// Reset to the start position of `variant`.
    pub fn init(&mut self, variant: Variant) {
        self.variant = variant;
        self.states.clear();
        self.states.push(State::start(variant));
        self.ptr = 0;
    }

    /// Back to the root slot, keeping the root position.
    pub fn reset(&mut self) {
        self.ptr = 0;
    }

    /// Replace the root with `fen`. On error the position is unchanged.
    pub fn parse_fen(&mut self, fen: &str) -> Result<(), FenError> {
        let root = State::from_fen(self.variant, fen)?;
        self.states.clear();
        self.states.push(root);
        self.ptr = 0;
        Ok(())
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    #[inline]
    pub fn current(&self) -> &State {
        &self.states[self.ptr]
    }

    #[inline]
    pub fn ply(&self) -> usize {
        self.ptr
    }

    #[inline]
    pub fn zobrist(&self) -> u64 {
        self.current().zobrist
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.current().turn
    }

    pub fn push(&mut self, mv: Move) {
        let mut next = *self.current();
        next.make_move(mv);
        debug_assert_eq!(next.zobrist, recalc_zobrist_full(&next), "zobrist drift after {}", mv);
        debug_assert!(next.king_flags_consistent(), "king flags out of sync after {}", mv);

        self.ptr += 1;
        if self.ptr == self.states.len() {
            self.states.push(next);
        } else {
            self.states[self.ptr] = next;
        }
    }

    /// Play a move given in coordinate notation, checked against the legal list.
    pub fn push_uci(&mut self, text: &str) -> Result<Move, MoveError> {
        if text.len() < 4 {
            return Err(MoveError::Malformed(text.to_string()));
        }
        let mv = self
            .legal_moves()
            .into_iter()
            .find(|m| m.to_uci() == text)
            .ok_or_else(|| MoveError::Illegal(text.to_string()))?;
        self.push(mv);
        Ok(mv)
    }

    pub fn pop(&mut self) {
        if self.ptr > 0 {
            self.ptr -= 1;
        }
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.current().legal_moves()
    }

    /// Terminal score for the side to move when the line already ended:
    /// its king was taken, or the position repeats an earlier one.
    pub fn game_end(&self, ply: usize) -> Option<Score> {
        let cur = self.current();
        if cur.king_captured(cur.turn) {
            return Some(-MATE_SCORE + ply as Score);
        }
        let key = cur.zobrist;
        let repeated = self.states[..self.ptr.saturating_sub(1)].iter().any(|s| s.zobrist == key);
        if repeated {
            return Some(0);
        }
        None
    }

    /// Moves from the root to the current slot.
    pub fn moves(&self) -> Vec<Move> {
        self.states[1..=self.ptr].iter().filter_map(|s| s.last_move).collect()
    }

    /// The game line in display text with move numbers.
    pub fn line(&self) -> String {
        let mut out = Vec::new();
        for i in 0..self.ptr {
            let before = &self.states[i];
            let Some(mv) = self.states[i + 1].last_move else {
                continue;
            };
            let san = move_to_san(before, mv);
            match before.turn {
                Color::White => out.push(format!("{}. {}", before.fullmove_number, san)),
                Color::Black if i == 0 => out.push(format!("{}... {}", before.fullmove_number, san)),
                Color::Black => out.push(san),
            }
        }
        out.join(" ")
    }

    pub fn pretty_print_string(&self) -> String {
        let cur = self.current();
        let mut out = cur.pretty_string();
        out.push_str(&format!("Fen: {}\n", cur.to_fen()));
        out.push_str(&format!("Key: {:016x}\n", cur.zobrist));
        let line = self.line();
        if !line.is_empty() {
            out.push_str(&format!("Line: {}\n", line));
        }
        out
    }

    /// Leaf count of the legal move tree.
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for mv in moves {
            self.push(mv);
            nodes += self.perft(depth - 1);
            self.pop();
        }
        nodes
    }

    /// Per-root-move leaf counts.
    pub fn divide(&mut self, depth: usize) -> Vec<(Move, u64)> {
        let moves = self.legal_moves();
        let mut counts = Vec::with_capacity(moves.len());
        for mv in moves {
            self.push(mv);
            counts.push((mv, self.perft(depth.saturating_sub(1))));
            self.pop();
        }
        counts
    }
}
