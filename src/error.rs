// src/error.rs

//! Typed errors for the image-to-videotex core.
//!
//! The serial and CLI layers wrap these in `anyhow::Error` with context;
//! nothing in the core logs or swallows them.

use thiserror::Error;

/// Screen geometry that cannot be addressed by the jump command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScreenError {
    #[error("screen of {columns}x{rows} cells is not addressable (each side must be 1..={max})")]
    Unaddressable { columns: u16, rows: u16, max: u16 },
}

/// Failures while producing a luma raster from an image.
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("width x height must be {expected_width}x{expected_height}, not {width}x{height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },

    #[error("raster of {width}x{height} needs {expected} samples, got {actual}")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Failures of a single encode run. No partial buffer is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("raster is {width}x{height} pixels but the screen needs {expected_width}x{expected_height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },

    #[error("cell ({column}, {row}) is outside the {columns}x{rows} screen")]
    CellOutOfRange {
        column: u16,
        row: u16,
        columns: u16,
        rows: u16,
    },

    #[error("command buffer capacity of {capacity} bytes exceeded ({requested} requested)")]
    CapacityExceeded { capacity: usize, requested: usize },
}

/// A line speed the terminal cannot be asked to switch to.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unsupported speed {0} (expected 300, 1200, 4800 or 9600)")]
pub struct UnsupportedBaud(pub u32);
