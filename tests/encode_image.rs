// tests/encode_image.rs

//! Decodes real image files and checks the resulting stream.

use image::{GrayImage, Luma, Rgb, RgbImage};
use minitel_photo::encoder::{self, MAX_BYTES_PER_CELL};
use minitel_photo::error::RasterError;
use minitel_photo::raster::{Raster, Screen};

fn save_png(image: &GrayImage) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.png");
    image.save(&path).unwrap();
    (dir, path)
}

#[test_log::test]
fn test_top_left_cell_from_png() {
    let screen = Screen::MINITEL;
    let mut image = GrayImage::new(80, 72);
    for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        image.put_pixel(x, y, Luma([0xA0]));
    }
    let (_dir, path) = save_png(&image);

    let raster = Raster::open(&path, &screen).unwrap();
    let bytes = encoder::encode_luma(raster, &screen).unwrap();
    assert_eq!(bytes, vec![0x1B, 0x46, 0x1B, 0x50, 0x2F]);
}

#[test_log::test]
fn test_gradient_png_stays_within_bound() {
    let screen = Screen::MINITEL;
    let image = GrayImage::from_fn(80, 72, |x, y| Luma([((x * 3 + y * 7) % 256) as u8]));
    let (_dir, path) = save_png(&image);

    let bytes = encoder::encode_luma(Raster::open(&path, &screen).unwrap(), &screen).unwrap();
    assert!(!bytes.is_empty());
    assert!(bytes.len() <= screen.cell_count() * MAX_BYTES_PER_CELL);
}

#[test_log::test]
fn test_colour_png_is_accepted() {
    let screen = Screen::MINITEL;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("colour.png");
    RgbImage::from_pixel(80, 72, Rgb([255, 255, 255]))
        .save(&path)
        .unwrap();

    let bytes = encoder::encode_luma(Raster::open(&path, &screen).unwrap(), &screen).unwrap();
    assert_eq!(bytes.len(), 4 + screen.cell_count());
}

#[test_log::test]
fn test_wrong_size_png_is_rejected() {
    let (_dir, path) = save_png(&GrayImage::new(160, 144));
    let err = Raster::open(&path, &Screen::MINITEL).unwrap_err();
    assert!(matches!(err, RasterError::DimensionMismatch { .. }));
    assert_eq!(err.to_string(), "width x height must be 80x72, not 160x144");
}

#[test_log::test]
fn test_undecodable_file_is_a_typed_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"not a png").unwrap();
    let err = Raster::open(&path, &Screen::MINITEL).unwrap_err();
    assert!(matches!(err, RasterError::Decode(_)));
}
