//! Colors, figures and packed pieces.
//!
//! A [`Piece`] packs a [`Figure`] and a [`Color`] into one byte as
//! `figure * 2 + color`, so it fits the 6-bit promotion field of a move.
//! The lookup tables below are evaluated at compile time.

use crate::bitboard::{DIRECTION_NAMES, NUM_DIRECTIONS};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline]
    pub const fn from_index(i: usize) -> Color {
        if i & 1 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Figure {
    NoFigure = 0,
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
    /// Generic lancer, only used as a symbol family; real lancers carry a facing.
    Lancer,
    LancerN,
    LancerNE,
    LancerE,
    LancerSE,
    LancerS,
    LancerSW,
    LancerW,
    LancerNW,
    Sentry,
    Jailer,
}

pub const FIGURE_COUNT: usize = 18;
pub const PIECE_COUNT: usize = FIGURE_COUNT * 2;

const LANCER_FIRST: u8 = Figure::LancerN as u8;

impl Figure {
    pub const ALL: [Figure; FIGURE_COUNT] = [
        Figure::NoFigure,
        Figure::Pawn,
        Figure::Knight,
        Figure::Bishop,
        Figure::Rook,
        Figure::Queen,
        Figure::King,
        Figure::Lancer,
        Figure::LancerN,
        Figure::LancerNE,
        Figure::LancerE,
        Figure::LancerSE,
        Figure::LancerS,
        Figure::LancerSW,
        Figure::LancerW,
        Figure::LancerNW,
        Figure::Sentry,
        Figure::Jailer,
    ];

    pub const LANCERS: [Figure; NUM_DIRECTIONS] = [
        Figure::LancerN,
        Figure::LancerNE,
        Figure::LancerE,
        Figure::LancerSE,
        Figure::LancerS,
        Figure::LancerSW,
        Figure::LancerW,
        Figure::LancerNW,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn from_index(i: usize) -> Figure {
        Figure::ALL[i % FIGURE_COUNT]
    }

    #[inline]
    pub const fn is_lancer(self) -> bool {
        (self as u8) >= LANCER_FIRST && (self as u8) < LANCER_FIRST + NUM_DIRECTIONS as u8
    }

    /// Facing of a directed lancer, clockwise from north.
    #[inline]
    pub const fn lancer_direction(self) -> Option<usize> {
        if self.is_lancer() {
            Some((self as u8 & 7) as usize)
        } else {
            None
        }
    }

    #[inline]
    pub const fn lancer(dir: usize) -> Figure {
        Figure::LANCERS[dir % NUM_DIRECTIONS]
    }

    pub fn symbol(self) -> &'static str {
        FIGURE_SYMBOLS[self.index()]
    }

    /// Letter used in display move text ("L" for every lancer).
    pub fn san_letter(self) -> &'static str {
        match self {
            Figure::Pawn | Figure::NoFigure => "",
            Figure::Knight => "N",
            Figure::Bishop => "B",
            Figure::Rook => "R",
            Figure::Queen => "Q",
            Figure::King => "K",
            Figure::Sentry => "S",
            Figure::Jailer => "J",
            _ => "L",
        }
    }
}

const FIGURE_SYMBOLS: [&str; FIGURE_COUNT] = [
    ".", "p", "n", "b", "r", "q", "k", "l", "ln", "lne", "le", "lse", "ls", "lsw", "lw", "lnw",
    "s", "j",
];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Piece(u8);

pub const NO_PIECE: Piece = Piece(0);

const fn build_color_figure() -> [[Piece; FIGURE_COUNT]; 2] {
    let mut table = [[NO_PIECE; FIGURE_COUNT]; 2];
    let mut color = 0;
    while color < 2 {
        let mut fig = 0;
        while fig < FIGURE_COUNT {
            table[color][fig] = Piece((fig * 2 + color) as u8);
            fig += 1;
        }
        color += 1;
    }
    table
}

const fn build_figure_of() -> [Figure; PIECE_COUNT] {
    let mut table = [Figure::NoFigure; PIECE_COUNT];
    let mut p = 0;
    while p < PIECE_COUNT {
        table[p] = Figure::ALL[p >> 1];
        p += 1;
    }
    table
}

const fn build_color_of() -> [Color; PIECE_COUNT] {
    let mut table = [Color::White; PIECE_COUNT];
    let mut p = 0;
    while p < PIECE_COUNT {
        table[p] = Color::from_index(p & 1);
        p += 1;
    }
    table
}

pub static COLOR_FIGURE: [[Piece; FIGURE_COUNT]; 2] = build_color_figure();
pub static FIGURE_OF: [Figure; PIECE_COUNT] = build_figure_of();
pub static COLOR_OF: [Color; PIECE_COUNT] = build_color_of();

impl Piece {
    #[inline]
    pub fn new(color: Color, figure: Figure) -> Piece {
        COLOR_FIGURE[color.index()][figure.index()]
    }

    #[inline]
    pub fn lancer(color: Color, dir: usize) -> Piece {
        Piece::new(color, Figure::lancer(dir))
    }

    /// Rebuild from the 6-bit move field; out-of-range values map to no piece.
    #[inline]
    pub fn from_bits(bits: u32) -> Piece {
        if (bits as usize) < PIECE_COUNT {
            Piece(bits as u8)
        } else {
            NO_PIECE
        }
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0 as u32
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn figure(self) -> Figure {
        FIGURE_OF[self.index()]
    }

    #[inline]
    pub fn color(self) -> Color {
        COLOR_OF[self.index()]
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self.figure() == Figure::NoFigure
    }

    #[inline]
    pub fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Position-string symbol: white pieces capitalize the first letter.
    pub fn fen_symbol(self) -> String {
        let symbol = self.figure().symbol();
        if self.color() == Color::Black || self.is_none() {
            return symbol.to_string();
        }
        let mut chars = symbol.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }

    /// Three character cell for the pretty board.
    pub fn pretty_symbol(self) -> String {
        if self.is_none() {
            return " . ".to_string();
        }
        format!("{:^3}", self.fen_symbol())
    }

    /// Parse a position-string symbol such as `P`, `lse` or `Lnw`.
    pub fn from_fen_symbol(symbol: &str) -> Option<Piece> {
        let first = symbol.chars().next()?;
        let color = if first.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let lower = symbol.to_ascii_lowercase();
        // the bare family symbol has no facing
        if lower == "l" || lower == "." {
            return None;
        }
        FIGURE_SYMBOLS
            .iter()
            .position(|&s| s == lower)
            .map(|fig| Piece::new(color, Figure::from_index(fig)))
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Piece({})", self.fen_symbol())
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen_symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    Standard,
    #[default]
    EightPiece,
}

impl Variant {
    pub fn name(self) -> &'static str {
        match self {
            Variant::Standard => "Standard",
            Variant::EightPiece => "Eightpiece",
        }
    }

    pub fn from_name(name: &str) -> Option<Variant> {
        match name.to_ascii_lowercase().as_str() {
            "standard" | "chess" => Some(Variant::Standard),
            "eightpiece" | "8piece" => Some(Variant::EightPiece),
            _ => None,
        }
    }

    pub fn start_fen(self) -> &'static str {
        match self {
            Variant::Standard => crate::state::START_FEN,
            Variant::EightPiece => crate::state::EIGHTPIECE_START_FEN,
        }
    }

    /// Figures a pawn may promote to.
    pub fn promotion_figures(self) -> &'static [Figure] {
        const STANDARD: [Figure; 4] = [Figure::Queen, Figure::Rook, Figure::Bishop, Figure::Knight];
        const EIGHTPIECE: [Figure; 14] = [
            Figure::Queen,
            Figure::Rook,
            Figure::Bishop,
            Figure::Knight,
            Figure::LancerN,
            Figure::LancerNE,
            Figure::LancerE,
            Figure::LancerSE,
            Figure::LancerS,
            Figure::LancerSW,
            Figure::LancerW,
            Figure::LancerNW,
            Figure::Sentry,
            Figure::Jailer,
        ];
        match self {
            Variant::Standard => &STANDARD,
            Variant::EightPiece => &EIGHTPIECE,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Facing name of a lancer direction, e.g. `ne`.
pub fn direction_name(dir: usize) -> &'static str {
    DIRECTION_NAMES[dir % NUM_DIRECTIONS]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_mutual_inverses() {
        for color in Color::ALL {
            for fig in Figure::ALL {
                let p = Piece::new(color, fig);
                assert_eq!(p.figure(), fig);
                assert_eq!(p.color(), color);
                assert_eq!(Piece::from_bits(p.bits()), p);
            }
        }
    }

    #[test]
    fn lancer_facings() {
        assert_eq!(Figure::LancerN.lancer_direction(), Some(0));
        assert_eq!(Figure::LancerNW.lancer_direction(), Some(7));
        assert_eq!(Figure::Lancer.lancer_direction(), None);
        assert_eq!(Figure::Sentry.lancer_direction(), None);
        for dir in 0..NUM_DIRECTIONS {
            assert_eq!(Figure::lancer(dir).lancer_direction(), Some(dir));
        }
    }

    #[test]
    fn fen_symbols() {
        let p = Piece::lancer(Color::White, 1);
        assert_eq!(p.fen_symbol(), "Lne");
        assert_eq!(Piece::from_fen_symbol("Lne"), Some(p));
        assert_eq!(Piece::from_fen_symbol("lsw"), Some(Piece::lancer(Color::Black, 5)));
        assert_eq!(Piece::from_fen_symbol("J"), Some(Piece::new(Color::White, Figure::Jailer)));
        assert_eq!(Piece::from_fen_symbol("l"), None);
        assert_eq!(Piece::from_fen_symbol("x"), None);
        assert_eq!(NO_PIECE.pretty_symbol(), " . ");
    }

    #[test]
    fn promotion_sets() {
        assert_eq!(Variant::Standard.promotion_figures().len(), 4);
        assert_eq!(Variant::EightPiece.promotion_figures().len(), 14);
        assert_eq!(Variant::from_name("Eightpiece"), Some(Variant::EightPiece));
    }
}
