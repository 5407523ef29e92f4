//! Integration tests for the preprocessing helpers and the composable
//! stage pipeline.

mod common;

use cellspot::build_standard_pipeline;
use cellspot::detection::{contours, preprocessing};
use common::*;
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;

#[test]
fn test_threshold_boundary() {
    let gray = GrayImage::from_fn(4, 1, |x, _| match x {
        0 => Luma([0]),
        1 => Luma([149]),
        2 => Luma([150]),
        _ => Luma([255]),
    });

    let mask = preprocessing::threshold_inverted(&gray, 150);
    assert_eq!(mask.get_pixel(0, 0).0[0], 255);
    assert_eq!(mask.get_pixel(1, 0).0[0], 255);
    assert_eq!(mask.get_pixel(2, 0).0[0], 0);
    assert_eq!(mask.get_pixel(3, 0).0[0], 0);
}

#[test]
fn test_normalize_resizes_to_square() {
    let frame = preprocessing::normalize(&blank_slide(640, 480), 224);
    assert_eq!(frame.dimensions(), (224, 224));
}

#[test]
fn test_swap_channels_is_an_involution() {
    let img = RgbImage::from_pixel(2, 2, Rgb([10, 20, 30]));
    let swapped = preprocessing::swap_channels(&img);
    assert_eq!(swapped.get_pixel(0, 0).0, [30, 20, 10]);
    assert_eq!(preprocessing::swap_channels(&swapped), img);
}

#[test]
fn test_grayscale_uses_luminance_weights() {
    // pure red in display order becomes (0, 0, 255) in the working frame
    let frame = preprocessing::swap_channels(&RgbImage::from_pixel(1, 1, Rgb([255, 0, 0])));
    let gray = preprocessing::to_grayscale(&frame);
    // 0.299 * 255 rounds to 76
    assert_eq!(gray.get_pixel(0, 0).0[0], 76);
}

#[test]
fn test_external_blobs_ignores_nested_contours() {
    // a filled ring: dark disk with a bright hole, and a dark dot inside
    // the hole
    let mut mask = GrayImage::from_pixel(100, 100, Luma([0]));
    draw_filled_circle_mut(&mut mask, (50, 50), 30, Luma([255]));
    draw_filled_circle_mut(&mut mask, (50, 50), 15, Luma([0]));
    draw_filled_circle_mut(&mut mask, (50, 50), 5, Luma([255]));

    let blobs = contours::external_blobs(&mask);
    assert_eq!(blobs.len(), 1, "only the top-level outer border counts");
    assert!((28..=32).contains(&blobs[0].radius));
}

#[test]
fn test_blob_attributes_for_a_square() {
    let mut mask = GrayImage::from_pixel(60, 60, Luma([0]));
    for y in 20..40u32 {
        for x in 20..40u32 {
            mask.put_pixel(x, y, Luma([255]));
        }
    }

    let blobs = contours::external_blobs(&mask);
    assert_eq!(blobs.len(), 1);

    let blob = &blobs[0];
    // the boundary polygon of a 20x20 block encloses 19x19 pixel cells
    assert!((blob.area - 361.0).abs() < 1.0);
    // enclosing circle of the corners: radius is half the diagonal
    assert!((12..=14).contains(&blob.radius));
    assert_eq!(blob.width(), 20);
    assert_eq!(blob.height(), 20);
    // compression keeps only the four corners of the chain
    assert_eq!(blob.boundary.len(), 4);
}

#[test]
fn test_standard_pipeline_annotates_and_counts() -> anyhow::Result<()> {
    let slide = slide_with_cells(224, 224, &[(60, 60, 20), (160, 160, 12)]);

    let results = build_standard_pipeline(false).run(slide)?;
    assert_eq!(results.len(), 1);

    let item = &results[0];
    assert_eq!(item.get_int("count"), Some(2));
    assert_eq!(item.get_text("verdict"), Some("Parasitized"));
    assert_eq!(item.image.width(), 224);
    assert_eq!(item.image.height(), 224);

    Ok(())
}

#[test]
fn test_standard_pipeline_with_no_surviving_blobs() -> anyhow::Result<()> {
    // one tiny blob, filtered out before annotation
    let slide = slide_with_cells(224, 224, &[(112, 112, 3)]);

    let results = build_standard_pipeline(false).run(slide)?;
    assert!(results.is_empty(), "the merge stage emits nothing without blobs");

    Ok(())
}

#[test]
fn test_executor_agrees_with_sequential_run_for_item_stages() -> anyhow::Result<()> {
    use cellspot::FramePipeline;
    use cellspot::detection::stages::*;
    use std::sync::Arc;

    // per-item stages only; the merging annotate stage needs the
    // sequential runner
    let build = || {
        FramePipeline::new()
            .add_stage(Arc::new(NormalizeStage { target_size: 224 }))
            .add_stage(Arc::new(GrayscaleStage))
            .add_stage(Arc::new(ThresholdStage { cutoff: 150 }))
            .add_stage(Arc::new(BlobExtractStage { padding: 2 }))
            .add_stage(Arc::new(RadiusFilterStage { min_radius: 5 }))
    };

    let slide = slide_with_cells(224, 224, &[(60, 60, 20), (160, 160, 12), (110, 40, 3)]);

    let sequential = build().run(slide.clone())?;
    let executed = build().run_with_executor(slide)?;

    assert_eq!(sequential.len(), 2);
    assert_eq!(sequential.len(), executed.len());

    Ok(())
}

#[test]
fn test_debug_mode_dumps_every_stage() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let dump = dir.path().join("stages");

    let slide = slide_with_cells(224, 224, &[(60, 60, 20)]);
    build_standard_pipeline(false)
        .with_debug(dump.clone())?
        .run(slide)?;

    let entries: Vec<_> = std::fs::read_dir(&dump)?.collect::<Result<_, _>>()?;
    // input plus six stages
    assert_eq!(entries.len(), 7);
    for entry in entries {
        assert!(std::fs::read_dir(entry.path())?.count() > 0);
    }

    Ok(())
}

#[test]
fn test_debug_mode_refuses_non_empty_directory() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    std::fs::write(dir.path().join("leftover.txt"), "x")?;

    let result = build_standard_pipeline(false).with_debug(dir.path().to_path_buf());
    assert!(result.is_err());

    Ok(())
}
