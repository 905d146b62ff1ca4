//! One board snapshot: placement, occupancy, rights, clocks and the
//! incrementally kept Zobrist key and material sums.
//!
//! [`State::put`] and [`State::remove`] are the only primitives that touch
//! occupancy, material and the key; the `set_*` mutators xor out the old key
//! contribution before xoring in the new one.

use crate::bitboard::{
    bit, east, file_of, iter_bits, parse_square, rank_of, square_at, square_to_uci, west, Bitboard, Square,
};
use crate::error::FenError;
use crate::eval::{material_value, Accum};
use crate::moves::{Move, MoveType};
use crate::piece::{Color, Figure, Piece, Variant, FIGURE_COUNT, NO_PIECE};
use crate::zobrist::{castling_key, ep_key, piece_key, side_key};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
pub const EIGHTPIECE_START_FEN: &str = "jlsesqkbnr/pppppppp/8/8/8/8/PPPPPPPP/JLneSQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    King = 0,
    Queen = 1,
}

impl CastlingSide {
    pub const ALL: [CastlingSide; 2] = [CastlingSide::King, CastlingSide::Queen];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Corner file of the castling partner.
    pub const fn partner_file(self) -> usize {
        match self {
            CastlingSide::King => 7,
            CastlingSide::Queen => 0,
        }
    }

    /// Files the king and its partner land on.
    pub const fn target_files(self) -> (usize, usize) {
        match self {
            CastlingSide::King => (6, 5),
            CastlingSide::Queen => (2, 3),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRight {
    pub can_castle: bool,
    pub partner_sq: Square,
    pub partner: Piece,
    /// Squares strictly between king and partner.
    pub between: Bitboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights([[CastlingRight; 2]; 2]);

impl CastlingRights {
    #[inline]
    pub fn get(&self, color: Color, side: CastlingSide) -> &CastlingRight {
        &self.0[color.index()][side.index()]
    }

    #[inline]
    pub fn can_castle(&self, color: Color, side: CastlingSide) -> bool {
        self.get(color, side).can_castle
    }

    pub fn any(&self, color: Color) -> bool {
        CastlingSide::ALL.iter().any(|&side| self.can_castle(color, side))
    }

    pub fn clear(&mut self, color: Color, side: CastlingSide) {
        self.0[color.index()][side.index()] = CastlingRight::default();
    }

    pub fn grant(&mut self, color: Color, side: CastlingSide, right: CastlingRight) {
        self.0[color.index()][side.index()] = right;
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::new();
        for (color, letters) in [(Color::White, ['K', 'Q']), (Color::Black, ['k', 'q'])] {
            for side in CastlingSide::ALL {
                if self.can_castle(color, side) {
                    out.push(letters[side.index()]);
                }
            }
        }
        if out.is_empty() {
            out.push('-');
        }
        out
    }
}

/// King square of one color and whether it was taken off the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KingInfo {
    pub square: Option<Square>,
    pub captured: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct State {
    pub variant: Variant,
    pub pieces: [Piece; 64],
    pub by_color: [Bitboard; 2],
    pub by_figure: [Bitboard; FIGURE_COUNT],
    /// All lancers regardless of facing.
    pub by_lancer: Bitboard,
    pub turn: Color,
    pub castling_rights: CastlingRights,
    pub ep_square: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    pub zobrist: u64,
    pub king_infos: [KingInfo; 2],
    pub material: [Accum; 2],
    /// King moved without castling while rights were still held.
    pub lost_castling: [bool; 2],
    /// `(pushed piece square, its origin)` after a sentry push.
    pub disabled_move: Option<(Square, Square)>,
    pub last_move: Option<Move>,
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "State({})", self.to_fen())
    }
}

impl State {
    /// Empty board, White to move.
    pub fn empty(variant: Variant) -> State {
        State {
            variant,
            pieces: [NO_PIECE; 64],
            by_color: [0; 2],
            by_figure: [0; FIGURE_COUNT],
            by_lancer: 0,
            turn: Color::White,
            castling_rights: CastlingRights::default(),
            ep_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            zobrist: 0,
            king_infos: [KingInfo::default(); 2],
            material: [Accum::ZERO; 2],
            lost_castling: [false; 2],
            disabled_move: None,
            last_move: None,
        }
    }

    pub fn start(variant: Variant) -> State {
        // start positions are constants and always parse
        State::from_fen(variant, variant.start_fen()).unwrap_or_else(|_| State::empty(variant))
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Piece {
        self.pieces[sq]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.by_color[0] | self.by_color[1]
    }

    #[inline]
    pub fn occup_us(&self) -> Bitboard {
        self.by_color[self.turn.index()]
    }

    #[inline]
    pub fn occup_them(&self) -> Bitboard {
        self.by_color[self.turn.opposite().index()]
    }

    #[inline]
    pub fn pieces_of(&self, color: Color, figure: Figure) -> Bitboard {
        self.by_color[color.index()] & self.by_figure[figure.index()]
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.king_infos[color.index()].square
    }

    #[inline]
    pub fn king_captured(&self, color: Color) -> bool {
        self.king_infos[color.index()].captured
    }

    // ========================================================================
    // MUTATORS
    // ========================================================================

    /// Place `piece` on an empty square.
    pub fn put(&mut self, piece: Piece, sq: Square) {
        if piece.is_none() {
            return;
        }
        let color = piece.color();
        let fig = piece.figure();
        let b = bit(sq);

        self.pieces[sq] = piece;
        self.by_color[color.index()] |= b;
        self.by_figure[fig.index()] |= b;
        if fig.is_lancer() {
            self.by_lancer |= b;
        }
        if fig == Figure::King {
            self.king_infos[color.index()] = KingInfo {
                square: Some(sq),
                captured: false,
            };
        }
        self.material[color.index()] += material_value(piece, sq);
        self.zobrist ^= piece_key(piece, sq);
    }

    /// Clear `sq`, returning what stood there. No-op on an empty square.
    pub fn remove(&mut self, sq: Square) -> Piece {
        let piece = self.pieces[sq];
        if piece.is_none() {
            return NO_PIECE;
        }
        let color = piece.color();
        let fig = piece.figure();
        let b = !bit(sq);

        self.pieces[sq] = NO_PIECE;
        self.by_color[color.index()] &= b;
        self.by_figure[fig.index()] &= b;
        self.by_lancer &= b;
        if fig == Figure::King {
            self.king_infos[color.index()] = KingInfo {
                square: None,
                captured: true,
            };
        }
        self.material[color.index()] -= material_value(piece, sq);
        self.zobrist ^= piece_key(piece, sq);
        piece
    }

    pub fn set_side_to_move(&mut self, color: Color) {
        self.zobrist ^= side_key(self.turn);
        self.turn = color;
        self.zobrist ^= side_key(self.turn);
    }

    pub fn set_castling_rights(&mut self, rights: CastlingRights) {
        for color in Color::ALL {
            for side in CastlingSide::ALL {
                if self.castling_rights.can_castle(color, side) != rights.can_castle(color, side) {
                    self.zobrist ^= castling_key(color, side);
                }
            }
        }
        self.castling_rights = rights;
    }

    pub fn set_ep_square(&mut self, ep: Option<Square>) {
        self.zobrist ^= ep_key(self.ep_square);
        self.ep_square = ep;
        self.zobrist ^= ep_key(self.ep_square);
    }

    /// Back rank squares of a castle: king target and partner target.
    pub fn castling_targets(color: Color, side: CastlingSide) -> (Square, Square) {
        let rank = back_rank(color);
        let (king_file, partner_file) = side.target_files();
        (square_at(rank, king_file), square_at(rank, partner_file))
    }

    /// Castling right derived from the current placement, if the king stands
    /// on its back rank with a rook or jailer in the corner.
    fn derive_castling_right(&self, color: Color, side: CastlingSide) -> Option<CastlingRight> {
        let king_sq = self.king_square(color)?;
        let rank = back_rank(color);
        if rank_of(king_sq) != rank {
            return None;
        }
        let partner_sq = square_at(rank, side.partner_file());
        let partner = self.piece_at(partner_sq);
        if partner.color() != color || !matches!(partner.figure(), Figure::Rook | Figure::Jailer) {
            return None;
        }
        let (lo, hi) = if partner_sq < king_sq {
            (partner_sq, king_sq)
        } else {
            (king_sq, partner_sq)
        };
        let between = (lo + 1..hi).fold(0, |acc, sq| acc | bit(sq));
        Some(CastlingRight {
            can_castle: true,
            partner_sq,
            partner,
            between,
        })
    }

    /// Apply `mv` in place. The move is trusted to come from the generator.
    pub fn make_move(&mut self, mv: Move) {
        let us = self.turn;
        let from = mv.from_sq();
        let to = mv.to_sq();
        let moved = self.piece_at(from);
        let old_ep = self.ep_square;
        let mut capture = false;
        let mut pawn_move = false;
        let mut new_ep = None;

        self.disabled_move = None;

        match mv.kind() {
            MoveType::Null => {}
            MoveType::Castle => {
                let side = if file_of(to) > file_of(from) {
                    CastlingSide::King
                } else {
                    CastlingSide::Queen
                };
                let partner_sq = self.castling_rights.get(us, side).partner_sq;
                let partner = self.remove(partner_sq);
                let king = self.remove(from);
                let (king_to, partner_to) = State::castling_targets(us, side);
                self.put(king, king_to);
                self.put(partner, partner_to);
            }
            MoveType::SentryPush => {
                let target = mv.promo_sq();
                self.remove(from);
                self.remove(to);
                capture = self.remove(target).is_some();
                self.put(moved, to);
                self.put(mv.promo_piece(), target);
                self.disabled_move = Some((target, to));
            }
            MoveType::Normal | MoveType::Promotion => {
                capture = self.remove(to).is_some();
                self.remove(from);
                if moved.figure() == Figure::Pawn {
                    pawn_move = true;
                    if Some(to) == old_ep && file_of(from) != file_of(to) {
                        let behind = match us {
                            Color::White => to - 8,
                            Color::Black => to + 8,
                        };
                        self.remove(behind);
                        capture = true;
                    }
                    if rank_of(from).abs_diff(rank_of(to)) == 2 {
                        let beside = east(bit(to)) | west(bit(to));
                        if beside & self.pieces_of(us.opposite(), Figure::Pawn) != 0 {
                            new_ep = Some((from + to) / 2);
                        }
                    }
                }
                let placed = if mv.kind() == MoveType::Promotion {
                    mv.promo_piece()
                } else {
                    moved
                };
                self.put(placed, to);
            }
        }

        self.update_castling_rights(mv, moved);
        self.set_ep_square(new_ep);

        if capture || pawn_move {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.set_side_to_move(us.opposite());
        self.last_move = Some(mv);
    }

    fn update_castling_rights(&mut self, mv: Move, moved: Piece) {
        let mut rights = self.castling_rights;
        let us = self.turn;
        let null = mv.kind() == MoveType::Null;

        if !null && moved.figure() == Figure::King {
            if mv.kind() != MoveType::Castle && rights.any(us) {
                self.lost_castling[us.index()] = true;
            }
            for side in CastlingSide::ALL {
                rights.clear(us, side);
            }
        }

        if mv.kind() == MoveType::SentryPush && mv.promo_piece().figure() == Figure::King {
            let owner = mv.promo_piece().color();
            for side in CastlingSide::ALL {
                rights.clear(owner, side);
            }
        }

        if !null {
            let mut touched = bit(mv.from_sq()) | bit(mv.to_sq());
            if mv.kind() == MoveType::SentryPush {
                touched |= bit(mv.promo_sq());
            }
            for color in Color::ALL {
                for side in CastlingSide::ALL {
                    let right = rights.get(color, side);
                    if right.can_castle && touched & bit(right.partner_sq) != 0 {
                        rights.clear(color, side);
                    }
                }
            }
        }

        if rights != self.castling_rights {
            self.set_castling_rights(rights);
        }
    }

    // ========================================================================
    // POSITION STRINGS
    // ========================================================================

    /// Parse a position string; the seventh field holds the disabled move.
    pub fn from_fen(variant: Variant, fen: &str) -> Result<State, FenError> {
        let mut st = State::empty(variant);
        let mut fields = fen.split_whitespace();
        let placement = fields.next().unwrap_or("");
        st.parse_placement(placement)?;

        let turn = match fields.next() {
            Some("b") => Color::Black,
            _ => Color::White,
        };
        st.set_side_to_move(turn);

        let castling = fields.next().unwrap_or("-");
        let mut rights = CastlingRights::default();
        for c in castling.chars() {
            let (color, side) = match c {
                'K' => (Color::White, CastlingSide::King),
                'Q' => (Color::White, CastlingSide::Queen),
                'k' => (Color::Black, CastlingSide::King),
                'q' => (Color::Black, CastlingSide::Queen),
                _ => continue,
            };
            if let Some(right) = st.derive_castling_right(color, side) {
                rights.grant(color, side, right);
            }
        }
        st.set_castling_rights(rights);

        let ep = fields.next().and_then(parse_square);
        st.set_ep_square(ep);

        st.halfmove_clock = fields.next().and_then(|s| s.parse().ok()).unwrap_or(0);
        st.fullmove_number = fields.next().and_then(|s| s.parse().ok()).unwrap_or(1);

        st.disabled_move = match fields.next() {
            None | Some("-") => None,
            Some(text) => Some(parse_disabled_move(text)?),
        };

        Ok(st)
    }

    fn parse_placement(&mut self, placement: &str) -> Result<(), FenError> {
        let chars: Vec<char> = placement.chars().collect();
        let mut rank = 7usize;
        let mut file = 0usize;
        let mut filled = 0usize;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            i += 1;
            if c == '/' {
                if rank == 0 {
                    return Err(FenError::RankOverflow { rank: 9 });
                }
                rank -= 1;
                file = 0;
                continue;
            }
            if let Some(run) = c.to_digit(10) {
                file += run as usize;
                filled += run as usize;
                if file > 8 {
                    return Err(FenError::RankOverflow { rank: rank + 1 });
                }
                continue;
            }

            let mut symbol = c.to_string();
            if c.eq_ignore_ascii_case(&'l') {
                symbol.push_str(&lancer_suffix(&chars[i..]));
                i += symbol.len() - 1;
            }
            let piece = Piece::from_fen_symbol(&symbol).ok_or_else(|| FenError::UnknownPiece(symbol.clone()))?;
            if file >= 8 {
                return Err(FenError::RankOverflow { rank: rank + 1 });
            }
            self.put(piece, square_at(rank, file));
            file += 1;
            filled += 1;
        }

        if filled < 64 {
            return Err(FenError::InsufficientPieces { filled });
        }
        Ok(())
    }

    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                let piece = self.piece_at(square_at(rank, file));
                if piece.is_none() {
                    empty += 1;
                    continue;
                }
                if empty > 0 {
                    placement.push_str(&empty.to_string());
                    empty = 0;
                }
                placement.push_str(&piece.fen_symbol());
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let turn = match self.turn {
            Color::White => "w",
            Color::Black => "b",
        };
        let ep = self.ep_square.map_or_else(|| "-".to_string(), square_to_uci);
        let mut fen = format!(
            "{} {} {} {} {} {}",
            placement,
            turn,
            self.castling_rights.to_fen(),
            ep,
            self.halfmove_clock,
            self.fullmove_number
        );
        if let Some((from, to)) = self.disabled_move {
            fen.push(' ');
            fen.push_str(&square_to_uci(from));
            fen.push_str(&square_to_uci(to));
        }
        fen
    }

    /// Board diagram with 3 character cells, rank 8 on top.
    pub fn pretty_string(&self) -> String {
        let mut out = String::new();
        for rank in (0..8).rev() {
            out.push_str(&format!("{} ", rank + 1));
            for file in 0..8 {
                out.push_str(&self.piece_at(square_at(rank, file)).pretty_symbol());
            }
            out.push('\n');
        }
        out.push_str("   a  b  c  d  e  f  g  h\n");
        out
    }

    /// From-scratch occupancy, material and king data; must agree with the
    /// incrementally kept fields.
    pub fn calculate_occupancy_and_material(&self) -> State {
        let mut fresh = *self;
        fresh.by_color = [0; 2];
        fresh.by_figure = [0; FIGURE_COUNT];
        fresh.by_lancer = 0;
        fresh.material = [Accum::ZERO; 2];
        for color in Color::ALL {
            fresh.king_infos[color.index()].square = None;
        }
        for sq in 0..64 {
            let piece = self.pieces[sq];
            if piece.is_none() {
                continue;
            }
            let c = piece.color().index();
            fresh.by_color[c] |= bit(sq);
            fresh.by_figure[piece.figure().index()] |= bit(sq);
            if piece.figure().is_lancer() {
                fresh.by_lancer |= bit(sq);
            }
            if piece.figure() == Figure::King {
                fresh.king_infos[c] = KingInfo {
                    square: Some(sq),
                    captured: false,
                };
            }
            fresh.material[c] += material_value(piece, sq);
        }
        fresh
    }

    /// True when every captured-king flag agrees with the king bitboard.
    pub fn king_flags_consistent(&self) -> bool {
        Color::ALL.iter().all(|&color| {
            let kings = self.pieces_of(color, Figure::King);
            let info = self.king_infos[color.index()];
            match info.square {
                Some(sq) => kings & bit(sq) != 0 && !info.captured,
                None => kings == 0,
            }
        })
    }

    pub fn iter_pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        iter_bits(self.by_color[color.index()]).map(move |sq| (sq, self.pieces[sq]))
    }
}

#[inline]
pub const fn back_rank(color: Color) -> usize {
    match color {
        Color::White => 0,
        Color::Black => 7,
    }
}

/// Facing letters after an `l`: a two letter diagonal when it reads as one,
/// else a single orthogonal letter.
fn lancer_suffix(rest: &[char]) -> String {
    let two: String = rest.iter().take(2).collect();
    if matches!(two.as_str(), "ne" | "nw" | "se" | "sw") {
        return two;
    }
    match rest.first() {
        Some(&c) if matches!(c, 'n' | 'e' | 's' | 'w') => c.to_string(),
        _ => String::new(),
    }
}

/// Disabled-move field: `<from><to>`, e.g. `c5c4`.
fn parse_disabled_move(text: &str) -> Result<(Square, Square), FenError> {
    let invalid = || FenError::InvalidSquare(text.to_string());
    if text.len() != 4 || !text.is_char_boundary(2) {
        return Err(invalid());
    }
    let from = parse_square(&text[..2]).ok_or_else(invalid)?;
    let to = parse_square(&text[2..]).ok_or_else(invalid)?;
    Ok((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zobrist::recalc_zobrist_full;

    fn st(fen: &str) -> State {
        crate::init();
        State::from_fen(Variant::EightPiece, fen).unwrap()
    }

    #[test]
    fn fen_round_trip() {
        for fen in [
            START_FEN,
            EIGHTPIECE_START_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "4k3/8/8/3Lsw4/8/8/8/4K3 b - - 12 40",
            "4k3/8/8/8/2P5/3S4/8/4K3 w - - 0 1 c4d3",
        ] {
            assert_eq!(st(fen).to_fen(), fen);
        }
    }

    #[test]
    fn placement_errors() {
        crate::init();
        assert!(matches!(
            State::from_fen(Variant::Standard, "8/8/8 w - - 0 1"),
            Err(FenError::InsufficientPieces { filled: 24 })
        ));
        assert!(matches!(
            State::from_fen(Variant::Standard, "9/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::RankOverflow { .. })
        ));
        assert!(matches!(
            State::from_fen(Variant::Standard, "x7/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::UnknownPiece(_))
        ));
        assert!(matches!(
            State::from_fen(Variant::EightPiece, "l7/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::UnknownPiece(_))
        ));
    }

    #[test]
    fn malformed_fields_fall_back() {
        let s = st("4k3/8/8/8/8/8/8/4K3 x zz e9 a b");
        assert_eq!(s.turn, Color::White);
        assert!(!s.castling_rights.any(Color::White));
        assert_eq!(s.ep_square, None);
        assert_eq!((s.halfmove_clock, s.fullmove_number), (0, 1));
        assert_eq!(s.disabled_move, None);
    }

    #[test]
    fn disabled_move_field_must_name_squares() {
        crate::init();
        let s = st("4k3/8/8/8/8/8/8/4K3 w - - 0 1 -");
        assert_eq!(s.disabled_move, None);
        assert_eq!(
            State::from_fen(Variant::EightPiece, "4k3/8/8/8/8/8/8/4K3 w - - 0 1 c5z9").err(),
            Some(FenError::InvalidSquare("c5z9".to_string()))
        );
    }

    #[test]
    fn lancer_symbols_next_to_knights() {
        // black north lancer followed by a black knight
        let s = st("lnn6/8/8/8/8/8/8/4K2k w - - 0 1");
        assert_eq!(s.piece_at(56), Piece::lancer(Color::Black, 0));
        assert_eq!(s.piece_at(57), Piece::new(Color::Black, Figure::Knight));
    }

    #[test]
    fn castling_rights_cache_partner() {
        let s = st(EIGHTPIECE_START_FEN);
        let q = s.castling_rights.get(Color::White, CastlingSide::Queen);
        assert!(q.can_castle);
        assert_eq!(q.partner_sq, 0);
        assert_eq!(q.partner.figure(), Figure::Jailer);
        assert_eq!(q.between, bit(1) | bit(2) | bit(3));
        let k = s.castling_rights.get(Color::Black, CastlingSide::King);
        assert_eq!(k.partner_sq, 63);
        assert_eq!(k.between, bit(61) | bit(62));
    }

    #[test]
    fn incremental_state_matches_recalc() {
        let mut s = st("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        s.make_move(Move::castle(4, 6));
        assert_eq!(s.piece_at(6).figure(), Figure::King);
        assert_eq!(s.piece_at(5).figure(), Figure::Rook);
        assert!(!s.castling_rights.any(Color::White));
        assert!(!s.lost_castling[0]);
        assert_eq!(s.zobrist, recalc_zobrist_full(&s));
        assert!(s == s.calculate_occupancy_and_material());

        s.make_move(Move::normal(60, 59));
        assert!(s.lost_castling[1]);
        assert_eq!(s.zobrist, recalc_zobrist_full(&s));
    }

    #[test]
    fn en_passant_only_with_a_neighbour() {
        let mut s = st("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
        s.make_move(Move::normal(12, 28));
        assert_eq!(s.ep_square, None);

        let mut s = st("4k3/8/8/8/3p4/8/4P3/4K3 w - - 0 1");
        s.make_move(Move::normal(12, 28));
        assert_eq!(s.ep_square, Some(20));
        assert_eq!(s.zobrist, recalc_zobrist_full(&s));
        s.make_move(Move::normal(27, 20));
        assert!(s.piece_at(28).is_none());
        assert_eq!(s.halfmove_clock, 0);
        assert_eq!(s.zobrist, recalc_zobrist_full(&s));
    }

    #[test]
    fn sentry_push_sets_disabled_move() {
        // white sentry d3 pushes the black pawn on c4 to c5
        let mut s = st("4k3/8/8/8/2p5/3S4/8/4K3 w - - 0 1");
        let pawn = s.piece_at(26);
        s.make_move(Move::sentry_push(19, 26, pawn, 34));
        assert_eq!(s.piece_at(26).figure(), Figure::Sentry);
        assert_eq!(s.piece_at(34), pawn);
        assert_eq!(s.disabled_move, Some((34, 26)));
        assert_eq!(s.zobrist, recalc_zobrist_full(&s));
        s.make_move(Move::normal(60, 61));
        assert_eq!(s.disabled_move, None);
    }

    #[test]
    fn capturing_a_king_sets_the_flag() {
        let mut s = st("4k3/8/8/8/8/8/8/4KQ2 w - - 0 1");
        assert!(s.king_flags_consistent());
        s.make_move(Move::normal(5, 60));
        assert!(s.king_captured(Color::Black));
        assert!(s.king_flags_consistent());
    }

    #[test]
    fn partner_square_clears_rights_for_both_colors() {
        let mut s = st("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        s.make_move(Move::normal(0, 56));
        assert!(!s.castling_rights.can_castle(Color::White, CastlingSide::Queen));
        assert!(!s.castling_rights.can_castle(Color::Black, CastlingSide::Queen));
        assert!(s.castling_rights.can_castle(Color::Black, CastlingSide::King));
        assert_eq!(s.zobrist, recalc_zobrist_full(&s));
    }
}
