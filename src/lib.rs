pub mod bitboard;
pub mod config;
pub mod error;
pub mod eval;
pub mod logging;
pub mod magic;
mod magic_consts;
pub mod movegen;
pub mod moves;
pub mod notation;
pub mod piece;
pub mod position;
pub mod search;
pub mod state;
pub mod uci;
pub mod zobrist;

/// Build the immutable lookup tables up front so the first search does not
/// pay for them. Safe to call more than once.
pub fn init() {
    if let Err(e) = try_init() {
        log::error!("table initialization failed: {}", e);
    }
}

/// Like [`init`], but returns a bad shipped magic instead of logging it.
pub fn try_init() -> Result<(), error::MagicError> {
    bitboard::init_attack_tables();
    magic::try_init()?;
    zobrist::init_zobrist();
    eval::init_material_tables();
    movegen::init_pawn_infos();
    Ok(())
}
