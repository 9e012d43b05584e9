// src/videotex/mod.rs

//! The videotex (Minitel) byte protocol: the subset of commands needed to
//! paint semigraphic images and negotiate line speed.

mod commands;

pub use commands::{
    SextantMask, VideotexCommand, BACKGROUND_CODES, CLEAR_PAGE, CURSOR_POSITION, CURSOR_RIGHT,
    ESC, FOREGROUND_CODES, JUMP_BIAS, MAX_COORDINATE, SEMIGRAPHIC_MARKER, SEMIGRAPHIC_MODE,
    SPEED_CODE_1200, SPEED_CODE_300, SPEED_CODE_4800, SPEED_CODE_9600, SPEED_SELECT_PREFIX,
};

/// Bytes that put a freshly opened terminal in a known state: clear page,
/// then semigraphic mode. The cursor ends just before the first cell.
pub fn init_sequence() -> [VideotexCommand; 2] {
    [VideotexCommand::ClearPage, VideotexCommand::SemigraphicMode]
}
