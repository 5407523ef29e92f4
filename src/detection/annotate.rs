use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_text_mut};

// Colors follow the blue-green-red order of the working frame.
const MARK_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const LABEL_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Draws cell marks and the summary line onto the working frame.
pub struct Annotator {
    font: FontArc,
    scale: PxScale,
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new()
    }
}

impl Annotator {
    pub fn new() -> Self {
        let font_data = include_bytes!("../../assets/DejaVuSans.ttf");
        let font = FontArc::try_from_slice(font_data).expect("Failed to load embedded font");
        Self {
            font,
            scale: PxScale::from(14.0),
        }
    }

    /// Circle a detected cell and write its ordinal next to the center.
    pub fn mark_cell(&self, frame: &mut RgbImage, center: (i32, i32), radius: i32, ordinal: usize) {
        draw_hollow_circle_mut(frame, center, radius, MARK_COLOR);
        // second stroke for a 2 px line
        if radius > 1 {
            draw_hollow_circle_mut(frame, center, radius - 1, MARK_COLOR);
        }
        let x = (center.0 - 10).max(0);
        let y = (center.1 - 10).max(0);
        draw_text_mut(
            frame,
            LABEL_COLOR,
            x,
            y,
            self.scale,
            &self.font,
            &ordinal.to_string(),
        );
    }

    /// Write the fixed summary line in the top-left corner.
    pub fn summary(&self, frame: &mut RgbImage, count: usize) {
        let line = format!("Infected Cells: {}", count);
        draw_text_mut(frame, MARK_COLOR, 5, 15, self.scale, &self.font, &line);
    }
}
