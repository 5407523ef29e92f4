//! Tests for the planar geometry helpers.

use cellspot::detection::geometry::{min_enclosing_circle, polygon_area};
use imageproc::point::Point;

fn points(coords: &[(i32, i32)]) -> Vec<Point<i32>> {
    coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

#[test]
fn test_polygon_area_of_a_square() {
    let square = points(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
    assert_eq!(polygon_area(&square).abs(), 100.0);
}

#[test]
fn test_polygon_area_sign_follows_orientation() {
    let ccw = points(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
    let cw = points(&[(0, 0), (0, 10), (10, 10), (10, 0)]);
    assert_eq!(polygon_area(&ccw), -polygon_area(&cw));
}

#[test]
fn test_degenerate_polygons_have_no_area() {
    assert_eq!(polygon_area(&points(&[(3, 4)])), 0.0);
    assert_eq!(polygon_area(&points(&[(0, 0), (5, 5)])), 0.0);
    assert_eq!(polygon_area(&points(&[(0, 0), (5, 0), (10, 0)])), 0.0);
}

#[test]
fn test_enclosing_circle_of_trivial_sets() {
    let circle = min_enclosing_circle(&points(&[(7, 9)]));
    assert_eq!((circle.cx, circle.cy, circle.radius), (7.0, 9.0, 0.0));

    let circle = min_enclosing_circle(&points(&[(0, 0), (10, 0)]));
    assert!((circle.cx - 5.0).abs() < 1e-6);
    assert!((circle.cy - 0.0).abs() < 1e-6);
    assert!((circle.radius - 5.0).abs() < 1e-6);
}

#[test]
fn test_enclosing_circle_of_square_corners() {
    let circle = min_enclosing_circle(&points(&[(0, 0), (10, 0), (10, 10), (0, 10)]));
    assert!((circle.cx - 5.0).abs() < 1e-6);
    assert!((circle.cy - 5.0).abs() < 1e-6);
    // half the diagonal
    assert!((circle.radius - 50f64.sqrt()).abs() < 1e-6);
}

#[test]
fn test_enclosing_circle_of_collinear_points() {
    let circle = min_enclosing_circle(&points(&[(0, 0), (3, 0), (5, 0), (10, 0), (7, 0)]));
    assert!((circle.cx - 5.0).abs() < 1e-6);
    assert!((circle.radius - 5.0).abs() < 1e-6);
}

#[test]
fn test_enclosing_circle_contains_every_point() {
    let set = points(&[(2, 3), (14, 7), (9, 20), (0, 11), (6, 6), (13, 15)]);
    let circle = min_enclosing_circle(&set);
    for p in &set {
        let dx = p.x as f64 - circle.cx;
        let dy = p.y as f64 - circle.cy;
        assert!(
            (dx * dx + dy * dy).sqrt() <= circle.radius + 1e-6,
            "point ({}, {}) escapes the circle",
            p.x,
            p.y
        );
    }
}
