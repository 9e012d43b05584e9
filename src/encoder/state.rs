// src/encoder/state.rs

//! Tracks what the terminal believes its cursor and colours are, and decides
//! the cheapest way to get from there to the next cell to draw.

use log::debug;

use crate::encoder::block::Palette;
use crate::raster::{Screen, Shade};
use crate::videotex::{SextantMask, VideotexCommand};

/// Gaps above this many cells are covered with a jump. A jump costs four
/// bytes plus, because it resets colours, up to four more to reselect them.
pub const JUMP_THRESHOLD: i64 = 8;

/// A 1-based (column, row) screen cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPosition {
    pub column: u16,
    pub row: u16,
}

impl CellPosition {
    pub fn new(column: u16, row: u16) -> Self {
        CellPosition { column, row }
    }

    /// Cursor advances needed to reach this cell from the screen origin.
    /// Column 0 (just before the first cell) maps to -1.
    pub fn linear_index(&self, screen: &Screen) -> i64 {
        (self.row as i64 - 1) * screen.columns() as i64 + (self.column as i64 - 1)
    }
}

/// Cursor movement preceding a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// The cursor is already where the character must go.
    Stay,
    /// Step right this many cells.
    Crawl(u16),
    /// Reposition absolutely.
    Jump(CellPosition),
}

/// Everything sent for one drawn cell, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawPlan {
    pub movement: Movement,
    pub foreground: Option<Shade>,
    pub background: Option<Shade>,
    pub mask: SextantMask,
}

impl DrawPlan {
    /// The commands carrying out this plan.
    pub fn commands(&self) -> impl Iterator<Item = VideotexCommand> + '_ {
        let movement: Box<dyn Iterator<Item = VideotexCommand>> = match self.movement {
            Movement::Stay => Box::new(std::iter::empty()),
            Movement::Crawl(steps) => {
                Box::new(std::iter::repeat(VideotexCommand::CursorRight).take(steps as usize))
            }
            Movement::Jump(CellPosition { column, row }) => {
                Box::new(std::iter::once(VideotexCommand::MoveTo { column, row }))
            }
        };
        movement
            .chain(self.foreground.map(VideotexCommand::Foreground))
            .chain(self.background.map(VideotexCommand::Background))
            .chain(std::iter::once(VideotexCommand::Mosaic(self.mask)))
    }
}

/// The terminal's implicit state as far as the encoder knows it.
///
/// `None` colours are unknown and never match a real shade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolState {
    pub cursor: CellPosition,
    pub foreground: Option<Shade>,
    pub background: Option<Shade>,
}

impl Default for ProtocolState {
    /// Right after clear page and semigraphic mode: just before the first
    /// cell, colours unknown.
    fn default() -> Self {
        ProtocolState {
            cursor: CellPosition::new(0, 1),
            foreground: None,
            background: None,
        }
    }
}

impl ProtocolState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides how to draw `mask` in `palette` at `target`, and records the
    /// terminal state that results.
    pub fn plan_draw(
        &mut self,
        screen: &Screen,
        target: CellPosition,
        palette: Palette,
        mask: SextantMask,
    ) -> DrawPlan {
        let gap = target.linear_index(screen) - self.cursor.linear_index(screen);

        let movement = if gap > JUMP_THRESHOLD {
            debug!("jump from {:?} to {:?}", self.cursor, target);
            self.foreground = None;
            self.background = None;
            Movement::Jump(target)
        } else if gap > 1 {
            // Drawing advances the cursor by one, so one step less is enough.
            Movement::Crawl((gap - 1) as u16)
        } else {
            Movement::Stay
        };

        let foreground = reselect(&mut self.foreground, palette.foreground);
        let background = reselect(&mut self.background, palette.background);

        self.cursor = target;

        DrawPlan {
            movement,
            foreground,
            background,
            mask,
        }
    }
}

/// Returns the shade to select, or `None` when it is already active.
fn reselect(active: &mut Option<Shade>, wanted: Shade) -> Option<Shade> {
    if *active == Some(wanted) {
        return None;
    }
    *active = Some(wanted);
    Some(wanted)
}
