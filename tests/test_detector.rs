//! Integration tests for the detection contract.
//!
//! Tests cover:
//! - Output frame dimensions regardless of input size
//! - Count/verdict invariants and the radius filter boundary
//! - Determinism and the written-PNG round trip
//! - I/O failure when the output directory is missing

mod common;

use cellspot::{CellDetector, Verdict};
use common::*;
use image::ImageReader;

#[test]
fn test_annotated_frame_is_always_224() -> anyhow::Result<()> {
    let (_dir, path) = output_path();
    let detector = CellDetector::new();

    let report = detector.detect(&blank_slide(640, 480), &path)?;
    assert_eq!(report.annotated.width(), 224);
    assert_eq!(report.annotated.height(), 224);

    let report = detector.detect(&slide_with_cells(1000, 300, &[(500, 150, 60)]), &path)?;
    assert_eq!(report.annotated.width(), 224);
    assert_eq!(report.annotated.height(), 224);

    Ok(())
}

#[test]
fn test_blank_slide_is_uninfected() -> anyhow::Result<()> {
    let (_dir, path) = output_path();
    let detector = CellDetector::new();

    let report = detector.detect(&blank_slide(224, 224), &path)?;
    assert_eq!(report.count, 0);
    assert_eq!(report.verdict, Verdict::Uninfected);
    assert!(report.blobs.is_empty());

    Ok(())
}

#[test]
fn test_single_cell_is_parasitized() -> anyhow::Result<()> {
    let (_dir, path) = output_path();
    let detector = CellDetector::new();

    let report = detector.detect(&slide_with_cells(224, 224, &[(112, 112, 20)]), &path)?;
    assert_eq!(report.count, 1);
    assert_eq!(report.verdict, Verdict::Parasitized);

    let blob = &report.blobs[0];
    assert!(
        (18..=23).contains(&blob.radius),
        "enclosing radius should be close to the drawn disk, got {}",
        blob.radius
    );
    assert!((blob.center.0 - 112).abs() <= 2);
    assert!((blob.center.1 - 112).abs() <= 2);

    Ok(())
}

#[test]
fn test_small_blob_is_detected_but_filtered() -> anyhow::Result<()> {
    let (_dir, path) = output_path();
    let detector = CellDetector::new();
    let slide = slide_with_cells(224, 224, &[(112, 112, 3)]);

    // the contour exists before the radius filter
    assert_eq!(detector.blobs(&slide).len(), 1);

    let report = detector.detect(&slide, &path)?;
    assert_eq!(report.count, 0);
    assert_eq!(report.verdict, Verdict::Uninfected);

    Ok(())
}

#[test]
fn test_count_matches_kept_blobs() -> anyhow::Result<()> {
    let (_dir, path) = output_path();
    let detector = CellDetector::new();

    let slide = slide_with_cells(224, 224, &[(50, 50, 20), (150, 150, 15), (60, 170, 8)]);
    let report = detector.detect(&slide, &path)?;

    assert_eq!(report.count, 3);
    assert_eq!(report.blobs.len(), report.count);
    assert_eq!(report.verdict, Verdict::Parasitized);
    assert_eq!(report.summary().cells.len(), report.count);

    // annotation order is largest area first
    for pair in report.blobs.windows(2) {
        assert!(pair[0].area >= pair[1].area);
    }

    Ok(())
}

#[test]
fn test_detection_is_deterministic() -> anyhow::Result<()> {
    let (_dir, path) = output_path();
    let detector = CellDetector::new();
    let slide = slide_with_cells(224, 224, &[(80, 90, 18), (170, 60, 10)]);

    let first = detector.detect(&slide, &path)?;
    let second = detector.detect(&slide, &path)?;

    assert_eq!(first.count, second.count);
    assert_eq!(first.verdict, second.verdict);
    assert_eq!(first.annotated.as_raw(), second.annotated.as_raw());

    Ok(())
}

#[test]
fn test_written_png_matches_returned_frame() -> anyhow::Result<()> {
    let (_dir, path) = output_path();
    let detector = CellDetector::new();

    let report = detector.detect(&slide_with_cells(224, 224, &[(100, 100, 25)]), &path)?;

    let written = ImageReader::open(&path)?.decode()?.to_rgb8();
    assert_eq!(written.dimensions(), (224, 224));
    assert_eq!(written.as_raw(), report.annotated.as_raw());

    Ok(())
}

#[test]
fn test_output_is_overwritten() -> anyhow::Result<()> {
    let (_dir, path) = output_path();
    let detector = CellDetector::new();

    detector.detect(&slide_with_cells(224, 224, &[(100, 100, 25)]), &path)?;
    let report = detector.detect(&blank_slide(224, 224), &path)?;

    let written = ImageReader::open(&path)?.decode()?.to_rgb8();
    assert_eq!(written.as_raw(), report.annotated.as_raw());

    Ok(())
}

#[test]
fn test_missing_output_directory_fails() {
    let (dir, _) = output_path();
    let path = dir.path().join("missing").join("test_result.png");

    let detector = CellDetector::new();
    let result = detector.detect(&blank_slide(224, 224), &path);
    assert!(result.is_err(), "writing into a missing directory should fail");
}
