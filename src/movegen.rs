//! Pseudo-legal and legal move generation for both variants.
//!
//! Generation is bitboard driven: sliders and jumpers read the attack
//! tables, pawns read per-square descriptors, and the variant pieces are
//! layered on top. Legality is decided by playing the move on a copy and
//! testing whether the mover's king is attacked afterwards.

use crate::bitboard::{
    bit, direction_between, iter_bits, jailer_adjacent, king_attacks, knight_attacks, lsb_index, msb_index,
    offset_square, ray, rank_of, Bitboard, Square, NUM_DIRECTIONS, is_positive_direction,
};
use crate::magic::{bishop_attacks, bishop_mobility, king_mobility, knight_mobility, queen_mobility, rook_attacks, rook_mobility, targets};
use crate::moves::{GenKind, Move, MoveType};
use crate::piece::{Color, Figure, Piece};
use crate::state::{back_rank, CastlingSide, State};
use std::sync::OnceLock;

// ============================================================================
// PAWN DESCRIPTORS
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct PawnInfo {
    pub push_one: Option<Square>,
    /// Only set on the pawn's start rank.
    pub push_two: Option<Square>,
    pub captures: Bitboard,
}

static PAWN_INFOS: OnceLock<[[PawnInfo; 64]; 2]> = OnceLock::new();

fn build_pawn_infos() -> [[PawnInfo; 64]; 2] {
    let mut infos = [[PawnInfo::default(); 64]; 2];
    for color in Color::ALL {
        let (forward, start_rank, capture_dirs) = match color {
            Color::White => (0, 1, [1, 7]),
            Color::Black => (4, 6, [3, 5]),
        };
        for sq in 0..64 {
            let info = &mut infos[color.index()][sq];
            info.push_one = offset_square(sq, forward, 1);
            if rank_of(sq) == start_rank {
                info.push_two = offset_square(sq, forward, 2);
            }
            for dir in capture_dirs {
                if let Some(target) = offset_square(sq, dir, 1) {
                    info.captures |= bit(target);
                }
            }
        }
    }
    infos
}

#[inline]
pub fn pawn_info(color: Color, sq: Square) -> &'static PawnInfo {
    &PAWN_INFOS.get_or_init(build_pawn_infos)[color.index()][sq]
}

pub fn init_pawn_infos() {
    PAWN_INFOS.get_or_init(build_pawn_infos);
}

#[inline]
pub fn promotion_rank(color: Color) -> usize {
    back_rank(color.opposite())
}

// ============================================================================
// LANCERS
// ============================================================================

/// Squares a lancer facing `dir` reaches: the ray up to the first own piece,
/// jumping over enemy pieces, each of which it may capture.
pub fn lancer_mobility(kind: GenKind, dir: usize, sq: Square, us: Bitboard, them: Bitboard) -> Bitboard {
    let full = ray(dir, sq);
    let own = full & us;
    let blocker = if is_positive_direction(dir) {
        lsb_index(own)
    } else {
        msb_index(own)
    };
    let reach = match blocker {
        Some(b) => full & !ray(dir, b) & !bit(b),
        None => full,
    };
    reach & targets(kind, us, them)
}

/// Neighbours of `sq` a pushed lancer can be nudged onto, turning away from `dir`.
fn nudge_squares(sq: Square, dir: usize) -> Bitboard {
    (0..NUM_DIRECTIONS)
        .filter(|&d| d != dir)
        .filter_map(|d| offset_square(sq, d, 1))
        .fold(0, |acc, t| acc | bit(t))
}

/// How a figure produces its moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Empty,
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
    Lancer(usize),
    Sentry,
    Jailer,
}

fn family(fig: Figure) -> Family {
    match fig {
        Figure::NoFigure | Figure::Lancer => Family::Empty,
        Figure::Pawn => Family::Pawn,
        Figure::Knight => Family::Knight,
        Figure::Bishop => Family::Bishop,
        Figure::Rook => Family::Rook,
        Figure::Queen => Family::Queen,
        Figure::King => Family::King,
        Figure::Sentry => Family::Sentry,
        Figure::Jailer => Family::Jailer,
        f => f.lancer_direction().map_or(Family::Empty, Family::Lancer),
    }
}

/// Generation context: whose moves, against which occupancy, and whose
/// jailers (if any) freeze the moving pieces.
#[derive(Debug, Clone, Copy)]
struct GenCtx {
    kind: GenKind,
    color: Color,
    us: Bitboard,
    them: Bitboard,
    jail: Option<Color>,
}

impl State {
    // ========================================================================
    // JAIL
    // ========================================================================

    /// True if an enemy jailer of `color` stands next to `sq`.
    #[inline]
    pub fn is_jailed(&self, sq: Square, color: Color) -> bool {
        jailer_adjacent(sq) & self.pieces_of(color.opposite(), Figure::Jailer) != 0
    }

    /// Squares where pieces of `color` are frozen by enemy jailers.
    pub fn jailed_mask(&self, color: Color) -> Bitboard {
        iter_bits(self.pieces_of(color.opposite(), Figure::Jailer)).fold(0, |acc, j| acc | jailer_adjacent(j))
    }

    // ========================================================================
    // GENERATION
    // ========================================================================

    /// Pseudo-legal moves of the side to move, appended to `moves`.
    pub fn generate_moves(&self, kind: GenKind, moves: &mut Vec<Move>) {
        let color = self.turn;
        let ctx = GenCtx {
            kind,
            color,
            us: self.by_color[color.index()],
            them: self.by_color[color.opposite().index()],
            jail: Some(color),
        };

        for sq in iter_bits(ctx.us) {
            self.gen_piece_moves(ctx, self.piece_at(sq), sq, moves);
        }

        if kind.is_quiet() {
            self.gen_castling_moves(color, moves);
        }

        if let Some(king_sq) = self.king_square(color) {
            if self.is_jailed(king_sq, color) {
                moves.push(Move::pass(king_sq, self.piece_at(king_sq)));
            }
        }
    }

    pub fn pseudo_legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        self.generate_moves(GenKind::ALL, &mut moves);
        moves
    }

    /// Applies the jail and disabled-move filters and expands promotions.
    fn append_move(&self, moves: &mut Vec<Move>, mv: Move, jail: Option<Color>) {
        let from = mv.from_sq();
        if let Some(color) = jail {
            if self.is_jailed(from, color) {
                return;
            }
        }

        if self.is_disabled(from, mv.to_sq()) {
            return;
        }

        let piece = self.piece_at(from);
        if mv.kind() == MoveType::Normal
            && piece.figure() == Figure::Pawn
            && rank_of(mv.to_sq()) == promotion_rank(piece.color())
        {
            for &fig in self.variant.promotion_figures() {
                moves.push(Move::promotion(from, mv.to_sq(), Piece::new(piece.color(), fig)));
            }
            return;
        }

        moves.push(mv);
    }

    /// The way back of the last push, and everything behind it, is closed.
    fn is_disabled(&self, from: Square, to: Square) -> bool {
        let Some((disabled_from, disabled_to)) = self.disabled_move else {
            return false;
        };
        if from != disabled_from {
            return false;
        }
        let blocked = direction_between(disabled_from, disabled_to);
        to == disabled_to || (blocked.is_some() && blocked == direction_between(from, to))
    }

    fn append_targets(&self, moves: &mut Vec<Move>, from: Square, to: Bitboard, jail: Option<Color>) {
        for t in iter_bits(to) {
            self.append_move(moves, Move::normal(from, t), jail);
        }
    }

    /// Moves of `piece` standing on `sq`, generated for `ctx.color`.
    fn gen_piece_moves(&self, ctx: GenCtx, piece: Piece, sq: Square, moves: &mut Vec<Move>) {
        if let Some(color) = ctx.jail {
            if self.is_jailed(sq, color) {
                return;
            }
        }
        let GenCtx { kind, us, them, jail, .. } = ctx;
        match family(piece.figure()) {
            Family::Empty => {}
            Family::Pawn => self.gen_pawn_moves(ctx, sq, false, moves),
            Family::Knight => self.append_targets(moves, sq, knight_mobility(kind, sq, us, them), jail),
            Family::Bishop => self.append_targets(moves, sq, bishop_mobility(kind, sq, us, them), jail),
            Family::Rook => self.append_targets(moves, sq, rook_mobility(kind, sq, us, them), jail),
            Family::Queen => self.append_targets(moves, sq, queen_mobility(kind, sq, us, them), jail),
            Family::King => self.append_targets(moves, sq, king_mobility(kind, sq, us, them), jail),
            Family::Jailer => {
                if kind.is_quiet() {
                    self.append_targets(moves, sq, rook_mobility(GenKind::QUIET, sq, us, them), jail);
                }
            }
            Family::Lancer(dir) => self.gen_lancer_moves(ctx, dir, sq, false, moves),
            Family::Sentry => self.gen_sentry_moves(ctx, sq, moves),
        }
    }

    fn gen_pawn_moves(&self, ctx: GenCtx, sq: Square, single_step_only: bool, moves: &mut Vec<Move>) {
        let info = pawn_info(ctx.color, sq);
        let empty = !(ctx.us | ctx.them);

        if ctx.kind.is_quiet() {
            if let Some(one) = info.push_one.filter(|&t| empty & bit(t) != 0) {
                self.append_move(moves, Move::normal(sq, one), ctx.jail);
                if !single_step_only {
                    if let Some(two) = info.push_two.filter(|&t| empty & bit(t) != 0) {
                        self.append_move(moves, Move::normal(sq, two), ctx.jail);
                    }
                }
            }
        }

        if ctx.kind.is_violent() {
            for t in iter_bits(info.captures) {
                if ctx.them & bit(t) != 0 || (!single_step_only && self.ep_square == Some(t)) {
                    self.append_move(moves, Move::normal(sq, t), ctx.jail);
                }
            }
        }
    }

    /// Lancer moves along `dir`. Unless `keep_direction` is set, each
    /// destination comes with one move per facing. A lancer that was just
    /// pushed also moves along every other direction.
    fn gen_lancer_moves(&self, ctx: GenCtx, dir: usize, sq: Square, keep_direction: bool, moves: &mut Vec<Move>) {
        let reach = lancer_mobility(ctx.kind, dir, sq, ctx.us, ctx.them);
        for to in iter_bits(reach) {
            if keep_direction {
                self.append_move(moves, Move::promotion(sq, to, Piece::lancer(ctx.color, dir)), ctx.jail);
            } else {
                for facing in 0..NUM_DIRECTIONS {
                    self.append_move(moves, Move::promotion(sq, to, Piece::lancer(ctx.color, facing)), ctx.jail);
                }
            }
        }

        if self.disabled_move.map(|(from, _)| from) == Some(sq) {
            for other in (0..NUM_DIRECTIONS).filter(|&d| d != dir) {
                for to in iter_bits(lancer_mobility(ctx.kind, other, sq, ctx.us, ctx.them)) {
                    self.append_move(moves, Move::promotion(sq, to, Piece::lancer(ctx.color, other)), ctx.jail);
                }
            }
        }
    }

    fn gen_sentry_moves(&self, ctx: GenCtx, sq: Square, moves: &mut Vec<Move>) {
        if ctx.kind.is_quiet() {
            self.append_targets(moves, sq, bishop_mobility(GenKind::QUIET, sq, ctx.us, ctx.them), ctx.jail);
        }
        if !ctx.kind.is_violent() {
            return;
        }

        // the sentry leaves its square before the pushed piece moves
        let us = ctx.us & !bit(sq);
        let push = GenCtx {
            kind: GenKind::ALL,
            color: ctx.color,
            us,
            them: ctx.them,
            jail: None,
        };
        for push_sq in iter_bits(bishop_mobility(GenKind::VIOLENT, sq, us, ctx.them)) {
            let pushed = self.piece_at(push_sq);
            if let Family::Lancer(dir) = family(pushed.figure()) {
                for facing in (0..NUM_DIRECTIONS).filter(|&d| d != dir) {
                    if let Some(nudge) = offset_square(push_sq, facing, 1).filter(|&t| us & bit(t) == 0) {
                        let turned = Piece::lancer(pushed.color(), facing);
                        self.append_move(moves, Move::sentry_push(sq, push_sq, turned, nudge), ctx.jail);
                    }
                }
            }
            for target in iter_bits(self.push_destinations(push, push_sq, pushed)) {
                self.append_move(moves, Move::sentry_push(sq, push_sq, pushed, target), ctx.jail);
            }
        }
    }

    /// Squares `pushed` can reach from `push_sq` when it moves for
    /// `push.color`. Pushed pawns take a single step.
    fn push_destinations(&self, push: GenCtx, push_sq: Square, pushed: Piece) -> Bitboard {
        let GenCtx { kind, us, them, .. } = push;
        let reach = match family(pushed.figure()) {
            Family::Empty => 0,
            Family::Pawn => {
                let info = pawn_info(push.color, push_sq);
                let one = info.push_one.map_or(0, |t| bit(t) & !(us | them));
                one | (info.captures & them)
            }
            Family::Knight => knight_mobility(kind, push_sq, us, them),
            Family::Bishop => bishop_mobility(kind, push_sq, us, them),
            Family::Rook => rook_mobility(kind, push_sq, us, them),
            Family::Queen => queen_mobility(kind, push_sq, us, them),
            Family::King => king_mobility(kind, push_sq, us, them),
            Family::Jailer => rook_mobility(GenKind::QUIET, push_sq, us, them),
            Family::Sentry => bishop_mobility(GenKind::QUIET, push_sq, us, them),
            Family::Lancer(dir) => {
                let mut reach = lancer_mobility(kind, dir, push_sq, us, them);
                if self.disabled_move.map(|(from, _)| from) == Some(push_sq) {
                    for other in (0..NUM_DIRECTIONS).filter(|&d| d != dir) {
                        reach |= lancer_mobility(kind, other, push_sq, us, them);
                    }
                }
                reach
            }
        };
        iter_bits(reach).filter(|&t| !self.is_disabled(push_sq, t)).fold(0, |acc, t| acc | bit(t))
    }

    fn gen_castling_moves(&self, color: Color, moves: &mut Vec<Move>) {
        let Some(king_sq) = self.king_square(color) else {
            return;
        };
        let occupied = self.occupied();
        let enemy = color.opposite();

        for side in CastlingSide::ALL {
            let right = self.castling_rights.get(color, side);
            if !right.can_castle || self.piece_at(right.partner_sq) != right.partner {
                continue;
            }
            if right.between & occupied != 0 {
                continue;
            }
            let (king_to, partner_to) = State::castling_targets(color, side);
            let movers = bit(king_sq) | bit(right.partner_sq);
            if (bit(king_to) | bit(partner_to)) & occupied & !movers != 0 {
                continue;
            }
            let (lo, hi) = if king_to < king_sq { (king_to, king_sq) } else { (king_sq, king_to) };
            // back rank squares, so the range stays on one rank
            if (lo..=hi).any(|s| self.attacked_by(s, enemy)) {
                continue;
            }
            self.append_move(moves, Move::castle(king_sq, king_to), Some(color));
        }
    }

    // ========================================================================
    // ATTACKS AND CHECK
    // ========================================================================

    /// True if any free piece of `by` could take on `sq` next move.
    pub fn attacked_by(&self, sq: Square, by: Color) -> bool {
        let attackers = self.by_color[by.index()] & !self.jailed_mask(by);
        if attackers == 0 {
            return false;
        }
        let us = self.by_color[by.index()];
        let them = self.by_color[by.opposite().index()];
        let occupied = us | them;
        let fig = |f: Figure| self.by_figure[f.index()] & attackers;

        if bishop_attacks(sq, occupied) & (fig(Figure::Bishop) | fig(Figure::Queen)) != 0
            || rook_attacks(sq, occupied) & (fig(Figure::Rook) | fig(Figure::Queen)) != 0
            || knight_attacks(sq) & fig(Figure::Knight) != 0
            || king_attacks(sq) & fig(Figure::King) != 0
            || pawn_info(by.opposite(), sq).captures & fig(Figure::Pawn) != 0
        {
            return true;
        }

        let target = bit(sq);
        for l in iter_bits(self.by_lancer & attackers) {
            let Some(dir) = self.piece_at(l).figure().lancer_direction() else {
                continue;
            };
            if lancer_mobility(GenKind::ALL, dir, l, us, them) & target != 0 {
                return true;
            }
            if self.disabled_move.map(|(from, _)| from) == Some(l) {
                let nudged = (0..NUM_DIRECTIONS)
                    .filter(|&d| d != dir)
                    .any(|d| lancer_mobility(GenKind::ALL, d, l, us, them) & target != 0);
                if nudged {
                    return true;
                }
            }
        }

        for s in iter_bits(fig(Figure::Sentry)) {
            let push = GenCtx {
                kind: GenKind::ALL,
                color: by,
                us: us & !bit(s),
                them,
                jail: None,
            };
            for push_sq in iter_bits(bishop_mobility(GenKind::VIOLENT, s, push.us, them)) {
                if self.is_disabled(s, push_sq) {
                    continue;
                }
                let pushed = self.piece_at(push_sq);
                let mut reach = self.push_destinations(push, push_sq, pushed);
                if let Family::Lancer(dir) = family(pushed.figure()) {
                    reach |= nudge_squares(push_sq, dir) & !push.us;
                }
                if reach & target != 0 {
                    return true;
                }
            }
        }

        false
    }

    /// King of `color` is attacked or already gone.
    pub fn is_checked(&self, color: Color) -> bool {
        let info = self.king_infos[color.index()];
        if info.captured {
            return true;
        }
        match info.square {
            Some(sq) => self.attacked_by(sq, color.opposite()),
            None => false,
        }
    }

    #[inline]
    pub fn is_checked_us(&self) -> bool {
        self.is_checked(self.turn)
    }

    #[inline]
    pub fn is_checked_them(&self) -> bool {
        self.is_checked(self.turn.opposite())
    }

    /// True if `mv` does not leave the mover's king attacked.
    pub fn is_legal(&self, mv: Move) -> bool {
        let mut next = *self;
        next.make_move(mv);
        !next.is_checked(self.turn)
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = self.pseudo_legal_moves();
        moves.retain(|&mv| self.is_legal(mv));
        moves
    }

    /// Stops at the first legal move found.
    pub fn has_legal_move(&self) -> bool {
        self.pseudo_legal_moves().into_iter().any(|mv| self.is_legal(mv))
    }

    /// True if `mv` takes material.
    pub fn is_capture(&self, mv: Move) -> bool {
        match mv.kind() {
            MoveType::SentryPush => true,
            MoveType::Castle | MoveType::Null => false,
            MoveType::Normal | MoveType::Promotion => {
                self.occup_them() & bit(mv.to_sq()) != 0
                    || (self.piece_at(mv.from_sq()).figure() == Figure::Pawn && self.ep_square == Some(mv.to_sq()))
            }
        }
    }

    /// Squares attacked by `piece` standing on `sq`.
    pub fn piece_attacks(&self, piece: Piece, sq: Square) -> Bitboard {
        let color = piece.color();
        let us = self.by_color[color.index()];
        let them = self.by_color[color.opposite().index()];
        let occupied = us | them;
        match family(piece.figure()) {
            Family::Empty => 0,
            Family::Pawn => pawn_info(color, sq).captures,
            Family::Knight => knight_attacks(sq),
            Family::King | Family::Jailer => king_attacks(sq),
            Family::Bishop | Family::Sentry => bishop_attacks(sq, occupied),
            Family::Rook => rook_attacks(sq, occupied),
            Family::Queen => bishop_attacks(sq, occupied) | rook_attacks(sq, occupied),
            Family::Lancer(dir) => lancer_mobility(GenKind::ALL, dir, sq, us, them),
        }
    }

    /// Number of enemy king-zone squares the piece landing with `mv` attacks.
    pub fn king_zone_threat(&self, mv: Move) -> u32 {
        let Some(king_sq) = self.king_square(self.turn.opposite()) else {
            return 0;
        };
        let zone = king_attacks(king_sq) | bit(king_sq);
        let (piece, sq) = match mv.kind() {
            MoveType::Null | MoveType::Castle => return 0,
            MoveType::Promotion => (mv.promo_piece(), mv.to_sq()),
            MoveType::SentryPush => (self.piece_at(mv.from_sq()), mv.to_sq()),
            MoveType::Normal => (self.piece_at(mv.from_sq()), mv.to_sq()),
        };
        (self.piece_attacks(piece, sq) & zone).count_ones()
    }
}
