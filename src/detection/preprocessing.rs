use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma, RgbImage};

/// Reverse the channel order of every pixel. The same operation maps
/// red-green-blue to blue-green-red and back.
pub fn swap_channels(img: &RgbImage) -> RgbImage {
    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        pixel.0.swap(0, 2);
    }
    out
}

/// Convert to the blue-green-red working order and resize to a square
/// `target` x `target` frame with bilinear interpolation.
pub fn normalize(img: &DynamicImage, target: u32) -> RgbImage {
    let frame = swap_channels(&img.to_rgb8());
    imageops::resize(&frame, target, target, FilterType::Triangle)
}

/// Luminance of a blue-green-red frame.
pub fn to_grayscale(frame: &RgbImage) -> GrayImage {
    GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
        let [b, g, r] = frame.get_pixel(x, y).0;
        // ITU-R BT.601 weights, channels read in blue-green-red order
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        Luma([luma.round() as u8])
    })
}

/// Inverted binary threshold: pixels strictly below `cutoff` become
/// foreground (255), everything else background (0).
pub fn threshold_inverted(gray: &GrayImage, cutoff: u8) -> GrayImage {
    let mut mask = gray.clone();
    for pixel in mask.pixels_mut() {
        *pixel = if pixel.0[0] < cutoff {
            Luma([255])
        } else {
            Luma([0])
        };
    }
    mask
}
