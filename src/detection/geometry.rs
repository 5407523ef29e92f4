use imageproc::point::Point;

/// Tolerance for the enclosing-circle containment checks.
const EPS: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
}

impl Circle {
    fn contains(&self, p: Point<i32>, eps: f64) -> bool {
        let dx = p.x as f64 - self.cx;
        let dy = p.y as f64 - self.cy;
        let reach = self.radius + eps;
        dx * dx + dy * dy <= reach * reach
    }
}

/// Signed shoelace area of a closed polygon.
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0i64;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        twice_area += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
    }
    twice_area as f64 / 2.0
}

/// Smallest circle containing every point of the set.
///
/// Incremental rebuild: whenever a point falls outside the current circle
/// it must lie on the boundary of the result, so the circle is recomputed
/// over the prefix with that point fixed. Deterministic, no shuffling.
pub fn min_enclosing_circle(points: &[Point<i32>]) -> Circle {
    match points {
        [] => Circle {
            cx: 0.0,
            cy: 0.0,
            radius: 0.0,
        },
        [p] => Circle {
            cx: p.x as f64,
            cy: p.y as f64,
            radius: 0.0,
        },
        _ => {
            let mut circle = circle_from_two(points[0], points[1]);
            for i in 2..points.len() {
                if !circle.contains(points[i], EPS) {
                    circle = circle_with_one_fixed(&points[..i], points[i]);
                }
            }
            circle
        }
    }
}

/// Smallest circle over `points` with `q` on its boundary.
fn circle_with_one_fixed(points: &[Point<i32>], q: Point<i32>) -> Circle {
    let mut circle = circle_from_two(points[0], q);
    for j in 1..points.len() {
        if !circle.contains(points[j], EPS) {
            circle = circle_with_two_fixed(&points[..j], points[j], q);
        }
    }
    circle
}

/// Smallest circle over `points` with `p` and `q` on its boundary.
fn circle_with_two_fixed(points: &[Point<i32>], p: Point<i32>, q: Point<i32>) -> Circle {
    let mut circle = circle_from_two(p, q);
    for &r in points {
        if !circle.contains(r, EPS) {
            circle = circumcircle(p, q, r).unwrap_or_else(|| widest_pair_circle(p, q, r));
        }
    }
    circle
}

fn circle_from_two(a: Point<i32>, b: Point<i32>) -> Circle {
    let cx = (a.x as f64 + b.x as f64) / 2.0;
    let cy = (a.y as f64 + b.y as f64) / 2.0;
    let dx = a.x as f64 - b.x as f64;
    let dy = a.y as f64 - b.y as f64;
    Circle {
        cx,
        cy,
        radius: (dx * dx + dy * dy).sqrt() / 2.0,
    }
}

/// Circle through three points, or None if they are collinear.
fn circumcircle(a: Point<i32>, b: Point<i32>, c: Point<i32>) -> Option<Circle> {
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (bx, by) = (b.x as f64, b.y as f64);
    let (cx, cy) = (c.x as f64, c.y as f64);

    let d = 2.0 * (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by));
    if d.abs() < 1e-9 {
        return None;
    }

    let a2 = ax * ax + ay * ay;
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let ux = (a2 * (by - cy) + b2 * (cy - ay) + c2 * (ay - by)) / d;
    let uy = (a2 * (cx - bx) + b2 * (ax - cx) + c2 * (bx - ax)) / d;

    let dx = ux - ax;
    let dy = uy - ay;
    Some(Circle {
        cx: ux,
        cy: uy,
        radius: (dx * dx + dy * dy).sqrt(),
    })
}

/// Fallback for a collinear triple: the two-point circle of the farthest pair.
fn widest_pair_circle(a: Point<i32>, b: Point<i32>, c: Point<i32>) -> Circle {
    let candidates = [
        circle_from_two(a, b),
        circle_from_two(a, c),
        circle_from_two(b, c),
    ];
    candidates
        .into_iter()
        .max_by(|x, y| x.radius.total_cmp(&y.radius))
        .unwrap_or(candidates[0])
}
