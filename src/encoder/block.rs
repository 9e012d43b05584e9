// src/encoder/block.rs

//! Block analysis: reduce six shades to two colours and a sextant mask.

use crate::raster::{Block, Shade, BLOCK_PIXELS};
use crate::videotex::SextantMask;

/// Foreground and background of one character cell.
///
/// `foreground >= background` always holds for palettes produced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub foreground: Shade,
    pub background: Shade,
}

/// What a block needs on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockAnalysis {
    /// Every pixel is black; the cell is left as cleared.
    NoDraw,
    Draw { palette: Palette, mask: SextantMask },
}

/// Per-shade pixel counts.
pub type Histogram = [u8; Shade::LEVELS];

pub fn histogram(shades: &[Shade]) -> Histogram {
    let mut counts = [0u8; Shade::LEVELS];
    for shade in shades {
        counts[shade.index()] += 1;
    }
    counts
}

/// The most frequent shade, skipping `exclude`. Ties go to the lowest index.
fn most_frequent(counts: &Histogram, exclude: Option<usize>) -> usize {
    let mut best = 0;
    let mut best_count = None;
    for (index, &count) in counts.iter().enumerate() {
        if Some(index) == exclude {
            continue;
        }
        if best_count.map_or(true, |max| count > max) {
            best = index;
            best_count = Some(count);
        }
    }
    best
}

/// The two most frequent shades, in selection order and before the swap
/// that puts the lighter one in front.
pub fn dominant_pair(counts: &Histogram) -> (Shade, Shade) {
    let first = most_frequent(counts, None);
    let second = most_frequent(counts, Some(first));
    (Shade::from_index(first), Shade::from_index(second))
}

pub fn select_palette(counts: &Histogram) -> Palette {
    let (first, second) = dominant_pair(counts);
    Palette {
        foreground: first.max(second),
        background: first.min(second),
    }
}

/// Pixels at least as light as the foreground are lit.
pub fn sextant_mask(shades: &[Shade; BLOCK_PIXELS], foreground: Shade) -> SextantMask {
    shades
        .iter()
        .zip(SextantMask::PIXEL_ORDER)
        .filter(|(shade, _)| **shade >= foreground)
        .fold(SextantMask::empty(), |mask, (_, bit)| mask | bit)
}

pub fn analyze_shades(shades: &[Shade; BLOCK_PIXELS]) -> BlockAnalysis {
    let counts = histogram(shades);
    if counts[Shade::BLACK.index()] as usize == BLOCK_PIXELS {
        return BlockAnalysis::NoDraw;
    }
    let palette = select_palette(&counts);
    BlockAnalysis::Draw {
        palette,
        mask: sextant_mask(shades, palette.foreground),
    }
}

pub fn analyze(block: &Block<'_>) -> BlockAnalysis {
    analyze_shades(&block.shades())
}
