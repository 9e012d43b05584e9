//! minitel-photo library crate.
//!
//! Converts an 80x72 grayscale image into the semigraphic videotex stream
//! that paints it on a 40x24 Minitel, and sends that stream over a serial
//! line.

pub mod config;
pub mod encoder;
pub mod error;
pub mod raster;
pub mod serial;
pub mod videotex;
