// src/videotex/commands.rs

//! Defines the `VideotexCommand` enum, the bytes each command puts on the
//! wire, and the sextant mask of a semigraphic character.

use bitflags::bitflags;

use crate::raster::Shade;
use crate::serial::Baud;

// --- C0 Control Bytes ---

/// Clear page (FF).
pub const CLEAR_PAGE: u8 = 0x0C;
/// Shift out (SO): switch to the semigraphic character set.
pub const SEMIGRAPHIC_MODE: u8 = 0x0E;
/// Cursor right (HT).
pub const CURSOR_RIGHT: u8 = 0x09;
/// Unit separator (US): absolute cursor positioning prefix.
pub const CURSOR_POSITION: u8 = 0x1F;
/// Escape prefix for attribute and protocol sequences.
pub const ESC: u8 = 0x1B;

/// Added to 1-based row and column numbers in a positioning sequence.
pub const JUMP_BIAS: u8 = 0x40;
/// Always set in a semigraphic character; not a pixel.
pub const SEMIGRAPHIC_MARKER: u8 = 1 << 5;

// --- Colour Selection ---
// The terminal renders eight grey levels. Indexed by shade, darkest first.

/// Second byte of `ESC x` selecting the foreground colour.
pub const FOREGROUND_CODES: [u8; Shade::LEVELS] = [0x40, 0x44, 0x41, 0x45, 0x42, 0x46, 0x43, 0x47];
/// Second byte of `ESC x` selecting the background colour.
pub const BACKGROUND_CODES: [u8; Shade::LEVELS] = [0x50, 0x54, 0x51, 0x55, 0x52, 0x56, 0x53, 0x57];

// --- Speed Selection (PRO2 sequence) ---

/// `ESC 0x3A 0x6B` precedes the speed code.
pub const SPEED_SELECT_PREFIX: [u8; 3] = [ESC, 0x3A, 0x6B];
pub const SPEED_CODE_300: u8 = 0x52;
pub const SPEED_CODE_1200: u8 = 0x64;
pub const SPEED_CODE_4800: u8 = 0x76;
pub const SPEED_CODE_9600: u8 = 0x7F;

bitflags! {
    /// Lit sub-pixels of a 2x3 semigraphic character.
    ///
    /// Bit 5 is the semigraphic marker and never part of the mask, which is
    /// why the bottom-right pixel lives on bit 6.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SextantMask: u8 {
        const TOP_LEFT     = 1 << 0;
        const TOP_RIGHT    = 1 << 1;
        const MID_LEFT     = 1 << 2;
        const MID_RIGHT    = 1 << 3;
        const BOTTOM_LEFT  = 1 << 4;
        const BOTTOM_RIGHT = 1 << 6;
    }
}

impl SextantMask {
    /// Flags in block reading order (see `Block::shades`).
    pub const PIXEL_ORDER: [SextantMask; 6] = [
        SextantMask::TOP_LEFT,
        SextantMask::TOP_RIGHT,
        SextantMask::MID_LEFT,
        SextantMask::MID_RIGHT,
        SextantMask::BOTTOM_LEFT,
        SextantMask::BOTTOM_RIGHT,
    ];

    /// The character code drawing this mask.
    pub fn character(self) -> u8 {
        SEMIGRAPHIC_MARKER | self.bits()
    }
}

/// A single videotex command as sent to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideotexCommand {
    /// Erase the page and home the cursor.
    ClearPage,
    /// Enter the semigraphic character set.
    SemigraphicMode,
    /// Move the cursor to a 1-based cell, then re-enter semigraphic mode.
    /// The terminal resets its colours on a move. Coordinates above
    /// [`MAX_COORDINATE`] are clamped to it.
    MoveTo { column: u16, row: u16 },
    /// Advance the cursor one cell.
    CursorRight,
    /// Select the foreground colour.
    Foreground(Shade),
    /// Select the background colour.
    Background(Shade),
    /// Draw a semigraphic character, advancing the cursor.
    Mosaic(SextantMask),
    /// Ask the terminal to switch its line speed.
    SelectSpeed(Baud),
}

impl VideotexCommand {
    /// Number of bytes `encode` appends.
    pub fn encoded_len(&self) -> usize {
        match self {
            VideotexCommand::ClearPage
            | VideotexCommand::SemigraphicMode
            | VideotexCommand::CursorRight
            | VideotexCommand::Mosaic(_) => 1,
            VideotexCommand::Foreground(_) | VideotexCommand::Background(_) => 2,
            VideotexCommand::MoveTo { .. } => 4,
            VideotexCommand::SelectSpeed(_) => SPEED_SELECT_PREFIX.len() + 1,
        }
    }

    /// Appends the wire bytes of this command to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        match *self {
            VideotexCommand::ClearPage => out.push(CLEAR_PAGE),
            VideotexCommand::SemigraphicMode => out.push(SEMIGRAPHIC_MODE),
            VideotexCommand::MoveTo { column, row } => out.extend_from_slice(&[
                CURSOR_POSITION,
                biased(row),
                biased(column),
                SEMIGRAPHIC_MODE,
            ]),
            VideotexCommand::CursorRight => out.push(CURSOR_RIGHT),
            VideotexCommand::Foreground(shade) => {
                out.extend_from_slice(&[ESC, FOREGROUND_CODES[shade.index()]])
            }
            VideotexCommand::Background(shade) => {
                out.extend_from_slice(&[ESC, BACKGROUND_CODES[shade.index()]])
            }
            VideotexCommand::Mosaic(mask) => out.push(mask.character()),
            VideotexCommand::SelectSpeed(baud) => {
                out.extend_from_slice(&SPEED_SELECT_PREFIX);
                out.push(baud.selection_code());
            }
        }
    }

    /// Convenience for callers that want a fresh buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode(&mut out);
        out
    }
}

/// Largest coordinate whose biased byte still fits in 7 bits.
pub const MAX_COORDINATE: u16 = 0x7F - JUMP_BIAS as u16;

// Out-of-range coordinates clamp to the last addressable cell.
fn biased(coordinate: u16) -> u8 {
    coordinate.min(MAX_COORDINATE) as u8 + JUMP_BIAS
}
