// src/encoder/mod.rs

//! Turns a quantized raster into the videotex command stream that paints it.
//!
//! Cells are visited in row-major order. Each one goes through block
//! analysis, then (unless it is all black) the cursor/colour state machine,
//! then the emitter. The [`ProtocolState`] is threaded through every cell in
//! order: movement costs and colour reuse depend on all earlier cells, so
//! the walk is strictly sequential.

pub mod block;
pub mod buffer;
pub mod state;

use log::{debug, log_enabled, trace, Level};

use crate::error::EncodeError;
use crate::raster::{Raster, Screen, ShadeRaster};

pub use block::{analyze, BlockAnalysis, Palette};
pub use buffer::{CommandBuffer, MAX_BYTES_PER_CELL};
pub use state::{CellPosition, DrawPlan, Movement, ProtocolState, JUMP_THRESHOLD};

/// One encoding run over one raster.
#[derive(Debug, Clone)]
pub struct Encoder {
    screen: Screen,
    state: ProtocolState,
    buffer: CommandBuffer,
}

impl Encoder {
    /// Starts from the state left by the device init sequence.
    pub fn new(screen: Screen) -> Self {
        Self::with_state(screen, ProtocolState::default())
    }

    pub fn with_state(screen: Screen, state: ProtocolState) -> Self {
        Encoder {
            screen,
            state,
            buffer: CommandBuffer::for_screen(&screen),
        }
    }

    pub fn state(&self) -> &ProtocolState {
        &self.state
    }

    pub fn bytes(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    /// Analyzes the cell at `position` and appends whatever it needs.
    /// All-black cells append nothing and leave the state untouched.
    pub fn encode_cell(
        &mut self,
        raster: &ShadeRaster,
        position: CellPosition,
    ) -> Result<(), EncodeError> {
        check_dimensions(raster, &self.screen)?;
        self.draw_cell(raster, position)
    }

    /// Encodes every cell of `raster` and returns the command bytes.
    pub fn run(mut self, raster: &ShadeRaster) -> Result<Vec<u8>, EncodeError> {
        check_dimensions(raster, &self.screen)?;

        for row in 1..=self.screen.rows() {
            debug!("row={} len={}", row, self.buffer.len());
            for column in 1..=self.screen.columns() {
                self.draw_cell(raster, CellPosition::new(column, row))?;
            }
        }

        debug!(
            "len={} ({} cells, capacity {})",
            self.buffer.len(),
            self.screen.cell_count(),
            self.buffer.capacity()
        );
        Ok(self.buffer.into_bytes())
    }

    // Expects `raster` to already match the screen.
    fn draw_cell(
        &mut self,
        raster: &ShadeRaster,
        position: CellPosition,
    ) -> Result<(), EncodeError> {
        let out_of_range = EncodeError::CellOutOfRange {
            column: position.column,
            row: position.row,
            columns: self.screen.columns(),
            rows: self.screen.rows(),
        };
        if !(1..=self.screen.columns()).contains(&position.column)
            || !(1..=self.screen.rows()).contains(&position.row)
        {
            return Err(out_of_range);
        }
        let block = raster.block(position.column, position.row).ok_or(out_of_range)?;
        let BlockAnalysis::Draw { palette, mask } = analyze(&block) else {
            return Ok(());
        };
        let plan = self.state.plan_draw(&self.screen, position, palette, mask);
        emit(&plan, &mut self.buffer)
    }
}

/// Serializes a plan: movement, colour selects, then the character.
pub fn emit(plan: &DrawPlan, buffer: &mut CommandBuffer) -> Result<(), EncodeError> {
    for command in plan.commands() {
        buffer.push(command)?;
    }
    Ok(())
}

/// Encodes an already-quantized raster from the post-init state.
pub fn encode(raster: &ShadeRaster, screen: &Screen) -> Result<Vec<u8>, EncodeError> {
    Encoder::new(*screen).run(raster)
}

/// Quantizes `raster` and encodes it.
pub fn encode_luma(raster: Raster, screen: &Screen) -> Result<Vec<u8>, EncodeError> {
    let shades = raster.quantize();
    if log_enabled!(Level::Trace) {
        trace!("shades:\n{}", shades.dump());
    }
    encode(&shades, screen)
}

fn check_dimensions(raster: &ShadeRaster, screen: &Screen) -> Result<(), EncodeError> {
    if raster.width() != screen.pixel_width() || raster.height() != screen.pixel_height() {
        return Err(EncodeError::DimensionMismatch {
            expected_width: screen.pixel_width(),
            expected_height: screen.pixel_height(),
            width: raster.width(),
            height: raster.height(),
        });
    }
    Ok(())
}
