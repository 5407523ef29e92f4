use std::sync::Arc;

use anyhow::Result;
use image::DynamicImage;

use crate::detection::{annotate::Annotator, contours, preprocessing};
use crate::models::Verdict;
use crate::pipeline::{MetaValue, Region, Stage, StageContext, StageItem};

/// Swap to blue-green-red order and resize to a square working frame.
pub struct NormalizeStage {
    pub target_size: u32,
}

impl Stage for NormalizeStage {
    fn process(&self, items: Vec<StageItem>, _context: &StageContext) -> Result<Vec<StageItem>> {
        let mut result = Vec::new();
        for item in items {
            let frame = preprocessing::normalize(&item.image, self.target_size);
            result.push(StageItem {
                frame: Arc::new(frame.clone()),
                image: DynamicImage::ImageRgb8(frame),
                region: None,
                metadata: item.metadata,
            });
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Normalize"
    }
}

/// Luminance conversion of the working frame.
pub struct GrayscaleStage;

impl Stage for GrayscaleStage {
    fn process(&self, items: Vec<StageItem>, _context: &StageContext) -> Result<Vec<StageItem>> {
        let mut result = Vec::new();
        for item in items {
            let gray = preprocessing::to_grayscale(&item.image.to_rgb8());
            result.push(StageItem {
                image: DynamicImage::ImageLuma8(gray),
                frame: item.frame.clone(),
                region: item.region.clone(),
                metadata: item.metadata,
            });
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Grayscale"
    }
}

/// Inverted binary threshold of the grayscale frame.
pub struct ThresholdStage {
    pub cutoff: u8,
}

impl Stage for ThresholdStage {
    fn process(&self, items: Vec<StageItem>, _context: &StageContext) -> Result<Vec<StageItem>> {
        let mut result = Vec::new();
        for item in items {
            let mask = preprocessing::threshold_inverted(&item.image.to_luma8(), self.cutoff);
            result.push(StageItem {
                image: DynamicImage::ImageLuma8(mask),
                frame: item.frame.clone(),
                region: item.region.clone(),
                metadata: item.metadata,
            });
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Threshold"
    }
}

/// Extract blobs from the binary mask. Splits one mask into one item per
/// blob, cropped out of the working frame, with the blob attributes stored
/// in metadata.
pub struct BlobExtractStage {
    pub padding: u32,
}

impl Stage for BlobExtractStage {
    fn process(&self, items: Vec<StageItem>, context: &StageContext) -> Result<Vec<StageItem>> {
        let mut result = Vec::new();

        for item in items {
            let mask = item.image.to_luma8();
            let blobs = contours::external_blobs(&mask);
            if context.verbose {
                println!("  Extracted {} blobs", blobs.len());
            }

            let (frame_width, frame_height) = item.frame.dimensions();
            for blob in blobs {
                let (min_x, min_y, max_x, max_y) = blob.bounding_box();

                // padded crop, clamped to the frame
                let x = (min_x as u32).saturating_sub(self.padding);
                let y = (min_y as u32).saturating_sub(self.padding);
                let max_x = (max_x as u32 + self.padding).min(frame_width - 1);
                let max_y = (max_y as u32 + self.padding).min(frame_height - 1);
                let region = Region {
                    x,
                    y,
                    width: max_x - x + 1,
                    height: max_y - y + 1,
                };

                let cropped = image::imageops::crop_imm(
                    item.frame.as_ref(),
                    region.x,
                    region.y,
                    region.width,
                    region.height,
                )
                .to_image();

                let mut blob_item = StageItem::from_region(
                    DynamicImage::ImageRgb8(cropped),
                    item.frame.clone(),
                    region,
                );
                blob_item
                    .metadata
                    .insert("area".to_string(), MetaValue::Float(blob.area));
                blob_item
                    .metadata
                    .insert("radius".to_string(), MetaValue::Int(blob.radius as i64));
                blob_item
                    .metadata
                    .insert("center_x".to_string(), MetaValue::Int(blob.center.0 as i64));
                blob_item
                    .metadata
                    .insert("center_y".to_string(), MetaValue::Int(blob.center.1 as i64));

                result.push(blob_item);
            }
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Blob Extraction"
    }
}

/// Keep only blobs whose enclosing-circle radius exceeds the minimum.
pub struct RadiusFilterStage {
    pub min_radius: i64,
}

impl Stage for RadiusFilterStage {
    fn process(&self, items: Vec<StageItem>, _context: &StageContext) -> Result<Vec<StageItem>> {
        let mut result = Vec::new();
        for item in items {
            let radius = item.get_int("radius").unwrap_or(0);
            if radius > self.min_radius {
                let mut kept = item.clone();
                kept.metadata
                    .insert("kept".to_string(), MetaValue::Bool(true));
                result.push(kept);
            }
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Radius Filter"
    }
}

/// Merge the surviving blob items into one annotated frame.
///
/// Needs every item at once, so it only behaves correctly under the
/// sequential `FramePipeline::run`. With no surviving blobs the stage
/// produces no output.
pub struct AnnotateStage;

impl Stage for AnnotateStage {
    fn process(&self, items: Vec<StageItem>, _context: &StageContext) -> Result<Vec<StageItem>> {
        let Some(first) = items.first() else {
            return Ok(Vec::new());
        };

        let frame_arc = first.frame.clone();
        let mut frame = frame_arc.as_ref().clone();

        let mut marks = Vec::new();
        for item in &items {
            let area = item
                .get_float("area")
                .ok_or_else(|| anyhow::anyhow!("Missing area"))?;
            let radius = item
                .get_int("radius")
                .ok_or_else(|| anyhow::anyhow!("Missing radius"))?;
            let center_x = item
                .get_int("center_x")
                .ok_or_else(|| anyhow::anyhow!("Missing center_x"))?;
            let center_y = item
                .get_int("center_y")
                .ok_or_else(|| anyhow::anyhow!("Missing center_y"))?;
            marks.push((area, (center_x as i32, center_y as i32), radius as i32));
        }
        marks.sort_by(|a, b| b.0.total_cmp(&a.0));

        let annotator = Annotator::new();
        for (ordinal, (_, center, radius)) in marks.iter().enumerate() {
            annotator.mark_cell(&mut frame, *center, *radius, ordinal + 1);
        }
        let count = marks.len();
        annotator.summary(&mut frame, count);
        let verdict = Verdict::from_count(count);

        // display order for the final product
        let display = preprocessing::swap_channels(&frame);
        let mut out = StageItem {
            image: DynamicImage::ImageRgb8(display),
            frame: frame_arc,
            region: None,
            metadata: std::collections::HashMap::new(),
        };
        out.metadata
            .insert("count".to_string(), MetaValue::Int(count as i64));
        out.metadata
            .insert("verdict".to_string(), MetaValue::Text(verdict.to_string()));

        Ok(vec![out])
    }

    fn name(&self) -> &str {
        "Annotate"
    }
}
