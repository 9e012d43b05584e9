// src/raster.rs

//! Screen geometry, luma rasters and the shade quantization pass.
//!
//! A raster always covers the whole screen: two pixels per cell across and
//! three pixels per cell down, so blocks tile it without overlap or
//! remainder. Quantization consumes a [`Raster`] and yields a
//! [`ShadeRaster`], the only type blocks can be read from.

use std::fmt::Write as _;
use std::path::Path;

use image::DynamicImage;
use log::debug;

use crate::error::{RasterError, ScreenError};
use crate::videotex::MAX_COORDINATE;

/// Pixels per cell, horizontally.
pub const BLOCK_WIDTH: u32 = 2;
/// Pixels per cell, vertically.
pub const BLOCK_HEIGHT: u32 = 3;
/// Pixels per block.
pub const BLOCK_PIXELS: usize = (BLOCK_WIDTH * BLOCK_HEIGHT) as usize;
/// Right shift mapping a luma byte onto one of [`Shade::LEVELS`] levels.
pub const SHADE_SHIFT: u8 = 5;

/// Terminal size in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Screen {
    columns: u16,
    rows: u16,
}

impl Screen {
    /// Largest coordinate a jump can still encode as a 7-bit byte.
    pub const MAX_ADDRESSABLE: u16 = MAX_COORDINATE;

    /// The standard 40x24 Minitel screen.
    pub const MINITEL: Screen = Screen {
        columns: 40,
        rows: 24,
    };

    pub fn new(columns: u16, rows: u16) -> Result<Self, ScreenError> {
        let valid = 1..=Self::MAX_ADDRESSABLE;
        if !valid.contains(&columns) || !valid.contains(&rows) {
            return Err(ScreenError::Unaddressable {
                columns,
                rows,
                max: Self::MAX_ADDRESSABLE,
            });
        }
        Ok(Screen { columns, rows })
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Raster width this screen expects, in pixels.
    pub fn pixel_width(&self) -> u32 {
        self.columns as u32 * BLOCK_WIDTH
    }

    /// Raster height this screen expects, in pixels.
    pub fn pixel_height(&self) -> u32 {
        self.rows as u32 * BLOCK_HEIGHT
    }
}

impl Default for Screen {
    fn default() -> Self {
        Screen::MINITEL
    }
}

/// One of eight brightness levels. Ordering follows brightness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Shade(u8);

impl Shade {
    pub const LEVELS: usize = 8;
    pub const BLACK: Shade = Shade(0);
    pub const WHITE: Shade = Shade(7);

    /// Returns `None` for levels outside `0..8`.
    pub fn new(level: u8) -> Option<Self> {
        (level < Self::LEVELS as u8).then_some(Shade(level))
    }

    /// Histogram slot back to its shade. `index` must be below `LEVELS`.
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index < Self::LEVELS);
        Shade(index as u8)
    }

    pub fn from_luma(luma: u8) -> Self {
        Shade(luma >> SHADE_SHIFT)
    }

    pub fn level(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Row-major 8-bit luma samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    samples: Vec<u8>,
}

impl Raster {
    pub fn new(width: u32, height: u32, samples: Vec<u8>) -> Result<Self, RasterError> {
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(RasterError::LengthMismatch {
                width,
                height,
                expected,
                actual: samples.len(),
            });
        }
        Ok(Raster {
            width,
            height,
            samples,
        })
    }

    /// Decodes the image file at `path` and checks it covers `screen` exactly.
    pub fn open(path: &Path, screen: &Screen) -> Result<Self, RasterError> {
        let image = image::open(path)?;
        debug!(
            "Decoded {} as {}x{} {:?}",
            path.display(),
            image.width(),
            image.height(),
            image.color()
        );
        Self::from_image(&image, screen)
    }

    /// Converts a decoded image to luma. No resizing is done.
    pub fn from_image(image: &DynamicImage, screen: &Screen) -> Result<Self, RasterError> {
        let (width, height) = (image.width(), image.height());
        if width != screen.pixel_width() || height != screen.pixel_height() {
            return Err(RasterError::DimensionMismatch {
                expected_width: screen.pixel_width(),
                expected_height: screen.pixel_height(),
                width,
                height,
            });
        }
        let luma = image.to_luma8();
        Self::new(width, height, luma.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Maps every sample onto its shade.
    pub fn quantize(self) -> ShadeRaster {
        ShadeRaster {
            width: self.width,
            height: self.height,
            shades: self.samples.into_iter().map(Shade::from_luma).collect(),
        }
    }
}

/// A raster after quantization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadeRaster {
    width: u32,
    height: u32,
    shades: Vec<Shade>,
}

impl ShadeRaster {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `None` outside the raster.
    pub fn get(&self, x: u32, y: u32) -> Option<Shade> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.shade_at(x, y))
    }

    /// The block backing the 1-based cell (`column`, `row`), or `None` when
    /// the block does not lie entirely inside the raster.
    pub fn block(&self, column: u16, row: u16) -> Option<Block<'_>> {
        if column == 0 || row == 0 {
            return None;
        }
        let x = (column as u32 - 1) * BLOCK_WIDTH;
        let y = (row as u32 - 1) * BLOCK_HEIGHT;
        if x + BLOCK_WIDTH > self.width || y + BLOCK_HEIGHT > self.height {
            return None;
        }
        Some(Block {
            raster: self,
            x,
            y,
        })
    }

    fn shade_at(&self, x: u32, y: u32) -> Shade {
        self.shades[y as usize * self.width as usize + x as usize]
    }

    /// One line of digits per pixel row.
    pub fn dump(&self) -> String {
        let mut out = String::with_capacity(self.shades.len() + self.height as usize);
        for row in self.shades.chunks(self.width as usize) {
            for shade in row {
                let _ = write!(out, "{}", shade.level());
            }
            out.push('\n');
        }
        out
    }
}

/// Borrowed 2x3 window onto a [`ShadeRaster`].
#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    raster: &'a ShadeRaster,
    x: u32,
    y: u32,
}

impl Block<'_> {
    /// Pixels in reading order: top-left, top-right, mid-left, mid-right,
    /// bottom-left, bottom-right.
    pub fn shades(&self) -> [Shade; BLOCK_PIXELS] {
        // In bounds: `ShadeRaster::block` only hands out whole blocks.
        let px = |dx, dy| self.raster.shade_at(self.x + dx, self.y + dy);
        [px(0, 0), px(1, 0), px(0, 1), px(1, 1), px(0, 2), px(1, 2)]
    }
}
