use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;

use super::geometry;
use crate::models::Blob;

/// Trace the outer boundaries of connected foreground regions and derive a
/// `Blob` for each.
///
/// Only top-level outer borders are kept: hole borders and contours nested
/// inside holes are ignored.
pub fn external_blobs(mask: &GrayImage) -> Vec<Blob> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|contour| contour.border_type == BorderType::Outer && contour.parent.is_none())
        .map(|contour| blob_from_boundary(compress_chain(contour.points)))
        .collect()
}

/// Drop midpoints of straight 8-connected runs, keeping only the corners
/// of the boundary chain.
pub fn compress_chain(points: Vec<Point<i32>>) -> Vec<Point<i32>> {
    if points.len() < 3 {
        return points;
    }
    let n = points.len();
    let mut corners = Vec::with_capacity(n);
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let curr = points[i];
        let next = points[(i + 1) % n];
        let incoming = (curr.x - prev.x, curr.y - prev.y);
        let outgoing = (next.x - curr.x, next.y - curr.y);
        if incoming != outgoing {
            corners.push(curr);
        }
    }
    if corners.is_empty() {
        // degenerate closed run, e.g. a two-pixel oscillation
        corners.push(points[0]);
    }
    corners
}

fn blob_from_boundary(boundary: Vec<Point<i32>>) -> Blob {
    let area = geometry::polygon_area(&boundary).abs();
    let circle = geometry::min_enclosing_circle(&boundary);
    Blob {
        area,
        center: (circle.cx as i32, circle.cy as i32),
        radius: circle.radius as i32,
        boundary,
    }
}
