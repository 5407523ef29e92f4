pub mod annotate;
pub mod contours;
pub mod geometry;
pub mod preprocessing;
pub mod stages;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use image::{DynamicImage, GrayImage, ImageFormat};

use crate::models::{Blob, DetectionReport, Verdict};
use crate::pipeline::FramePipeline;
use annotate::Annotator;

/// Detector for dark, roughly circular blobs in a microscope image.
#[derive(Debug, Clone)]
pub struct CellDetector {
    /// Side length of the normalized square working frame.
    pub target_size: u32,
    /// Grayscale cutoff; pixels strictly below it count as foreground.
    pub cutoff: u8,
    /// Blobs with an enclosing-circle radius at or below this are ignored.
    pub min_radius: i32,
    pub verbose: bool,
}

impl CellDetector {
    pub fn new() -> Self {
        Self {
            target_size: 224,
            cutoff: 150,
            min_radius: 5,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Run the full detection pass and write the annotated PNG.
    ///
    /// The parent directory of `output_path` must already exist; creating
    /// it is the caller's responsibility. Any existing file at the path is
    /// overwritten.
    pub fn detect(&self, img: &DynamicImage, output_path: &Path) -> Result<DetectionReport> {
        let mut frame = preprocessing::normalize(img, self.target_size);
        if self.verbose {
            println!("Normalized frame: {}x{}", frame.width(), frame.height());
        }

        let gray = preprocessing::to_grayscale(&frame);
        let mask = preprocessing::threshold_inverted(&gray, self.cutoff);

        let mut blobs = contours::external_blobs(&mask);
        if self.verbose {
            println!("Found {} blobs", blobs.len());
        }
        blobs.sort_by(|a, b| b.area.total_cmp(&a.area));

        let annotator = Annotator::new();
        let mut kept = Vec::new();
        for blob in blobs {
            if blob.radius > self.min_radius {
                annotator.mark_cell(&mut frame, blob.center, blob.radius, kept.len() + 1);
                if self.verbose {
                    println!(
                        "  Cell {}: center=({}, {}) radius={} area={:.1}",
                        kept.len() + 1,
                        blob.center.0,
                        blob.center.1,
                        blob.radius,
                        blob.area
                    );
                }
                kept.push(blob);
            }
        }

        let count = kept.len();
        annotator.summary(&mut frame, count);
        let verdict = Verdict::from_count(count);

        // back to display order before encoding
        let annotated = preprocessing::swap_channels(&frame);
        annotated
            .save_with_format(output_path, ImageFormat::Png)
            .with_context(|| format!("Failed to write annotated image to {}", output_path.display()))?;

        if self.verbose {
            println!("Detection complete: {} - {} infected cell(s)", verdict, count);
        }

        Ok(DetectionReport {
            annotated,
            verdict,
            count,
            blobs: kept,
            output_path: output_path.to_path_buf(),
        })
    }

    /// Binary mask the blob extraction runs on (for debugging).
    pub fn mask(&self, img: &DynamicImage) -> GrayImage {
        let frame = preprocessing::normalize(img, self.target_size);
        preprocessing::threshold_inverted(&preprocessing::to_grayscale(&frame), self.cutoff)
    }

    /// All blobs before the radius filter, largest first (for debugging).
    pub fn blobs(&self, img: &DynamicImage) -> Vec<Blob> {
        let mut blobs = contours::external_blobs(&self.mask(img));
        blobs.sort_by(|a, b| b.area.total_cmp(&a.area));
        blobs
    }
}

impl Default for CellDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the standard detection pipeline from the composable stage system.
pub fn build_standard_pipeline(verbose: bool) -> FramePipeline {
    use crate::detection::stages::*;

    FramePipeline::new()
        .with_verbose(verbose)
        .add_stage(Arc::new(NormalizeStage { target_size: 224 }))
        .add_stage(Arc::new(GrayscaleStage))
        .add_stage(Arc::new(ThresholdStage { cutoff: 150 }))
        .add_stage(Arc::new(BlobExtractStage { padding: 2 }))
        .add_stage(Arc::new(RadiusFilterStage { min_radius: 5 }))
        .add_stage(Arc::new(AnnotateStage))
}
