//! Error types shared by the engine modules.

use thiserror::Error;

/// Problems found while reading a position string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("placement fills only {filled} of 64 squares")]
    InsufficientPieces { filled: usize },

    #[error("unknown piece symbol '{0}'")]
    UnknownPiece(String),

    #[error("rank {rank} overflows the board")]
    RankOverflow { rank: usize },

    #[error("invalid square '{0}'")]
    InvalidSquare(String),
}

/// Problems with externally supplied moves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("malformed move text '{0}'")]
    Malformed(String),

    #[error("move '{0}' is not legal in this position")]
    Illegal(String),
}

/// Magic table construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MagicError {
    #[error("no collision-free magic for square {square} at {bits} index bits after {tries} tries")]
    NotFound { square: usize, bits: u32, tries: usize },

    #[error("magic {magic:#018x} for square {square} maps different attack sets to one slot")]
    Collision { square: usize, magic: u64 },
}

/// Rejected `setoption` input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("unknown option '{0}'")]
    Unknown(String),

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidValue { name: String, value: String },

    #[error("value {value} for option '{name}' outside {min}..={max}")]
    OutOfRange {
        name: String,
        value: i64,
        min: i64,
        max: i64,
    },
}

/// Start-up configuration file problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Option(#[from] OptionError),
}
