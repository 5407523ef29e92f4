use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;

fn main() {
    let mut img = RgbImage::from_pixel(640, 480, Rgb([235, 225, 230]));

    // a few dark cell-like blobs on a pale background
    for &(cx, cy, radius) in &[(120, 140, 38), (300, 90, 25), (430, 300, 50), (520, 120, 9)] {
        draw_filled_circle_mut(&mut img, (cx, cy), radius, Rgb([88, 52, 110]));
    }

    img.save("test_slide.png").unwrap();
    println!("Created test_slide.png (640x480 synthetic slide)");
}
