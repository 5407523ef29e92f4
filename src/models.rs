use std::path::PathBuf;

use image::RgbImage;
use imageproc::point::Point;
use serde::Serialize;

/// A connected dark region of the binary mask, described by its outer
/// boundary and the attributes derived from it.
#[derive(Debug, Clone)]
pub struct Blob {
    /// Outer boundary chain, collinear midpoints removed.
    pub boundary: Vec<Point<i32>>,
    /// Absolute planar area enclosed by the boundary polygon.
    pub area: f64,
    /// Center of the minimum enclosing circle, truncated to pixels.
    pub center: (i32, i32),
    /// Radius of the minimum enclosing circle, truncated to pixels.
    pub radius: i32,
}

impl Blob {
    /// Axis-aligned bounds of the boundary as (min_x, min_y, max_x, max_y).
    pub fn bounding_box(&self) -> (i32, i32, i32, i32) {
        if self.boundary.is_empty() {
            return (0, 0, 0, 0);
        }
        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;
        for point in &self.boundary {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }
        (min_x, min_y, max_x, max_y)
    }

    pub fn width(&self) -> u32 {
        let (min_x, _, max_x, _) = self.bounding_box();
        (max_x - min_x + 1) as u32
    }

    pub fn height(&self) -> u32 {
        let (_, min_y, _, max_y) = self.bounding_box();
        (max_y - min_y + 1) as u32
    }
}

/// Outcome label of a detection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Parasitized,
    Uninfected,
}

impl Verdict {
    pub fn from_count(count: usize) -> Self {
        if count > 0 {
            Verdict::Parasitized
        } else {
            Verdict::Uninfected
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Parasitized => write!(f, "Parasitized"),
            Verdict::Uninfected => write!(f, "Uninfected"),
        }
    }
}

/// Everything a detection pass produces.
#[derive(Debug, Clone)]
pub struct DetectionReport {
    /// Annotated 224x224 frame in display channel order, identical to the
    /// pixels written to `output_path`.
    pub annotated: RgbImage,
    pub verdict: Verdict,
    /// Number of blobs that survived the radius filter.
    pub count: usize,
    /// Surviving blobs in annotation order (largest area first).
    pub blobs: Vec<Blob>,
    pub output_path: PathBuf,
}

impl DetectionReport {
    /// Serializable view of the report, without the pixel data.
    pub fn summary(&self) -> DetectionSummary {
        DetectionSummary {
            verdict: self.verdict,
            count: self.count,
            cells: self
                .blobs
                .iter()
                .map(|blob| CellMark {
                    x: blob.center.0,
                    y: blob.center.1,
                    radius: blob.radius,
                    area: blob.area,
                })
                .collect(),
            output_path: self.output_path.display().to_string(),
        }
    }
}

/// One annotated cell in the summary.
#[derive(Debug, Clone, Serialize)]
pub struct CellMark {
    pub x: i32,
    pub y: i32,
    pub radius: i32,
    pub area: f64,
}

/// Machine-readable detection result.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionSummary {
    pub verdict: Verdict,
    pub count: usize,
    pub cells: Vec<CellMark>,
    pub output_path: String,
}
