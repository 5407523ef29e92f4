use std::path::PathBuf;

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;
use tempfile::TempDir;

/// Dark purple, well below the grayscale cutoff of 150.
pub const CELL_COLOR: Rgb<u8> = Rgb([60, 40, 90]);

/// Uniform white frame of the given size.
pub fn blank_slide(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 255, 255])))
}

/// White frame with filled dark disks at the given (x, y, radius) spots.
pub fn slide_with_cells(width: u32, height: u32, cells: &[(i32, i32, i32)]) -> DynamicImage {
    let mut img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    for &(cx, cy, radius) in cells {
        draw_filled_circle_mut(&mut img, (cx, cy), radius, CELL_COLOR);
    }
    DynamicImage::ImageRgb8(img)
}

/// Temp directory plus an output path inside it. The directory must be
/// kept alive for as long as the path is used.
pub fn output_path() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("test_result.png");
    (dir, path)
}
