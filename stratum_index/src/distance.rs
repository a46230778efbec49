// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pure distance estimators over axis-aligned rectangles.
//!
//! These supply the bound certificates for the branch-and-bound pair search:
//! [`rect_distance`] is the lower bound used to rank candidate pairs, and
//! [`maximum_distance`] / [`min_max_distance`] are upper bounds used to
//! confirm within-distance queries early. None of them look at items; they
//! only need the rectangles.

use kurbo::{Point, Rect, Vec2};

/// Separation distance between two rectangles: zero when they overlap,
/// otherwise the length of the shortest segment joining them.
///
/// This is a valid lower bound on the distance between any point of `a` and
/// any point of `b`.
pub fn rect_distance(a: &Rect, b: &Rect) -> f64 {
    if a.overlaps(*b) {
        return 0.0;
    }
    let dx = (a.x0 - b.x1).max(b.x0 - a.x1).max(0.0);
    let dy = (a.y0 - b.y1).max(b.y0 - a.y1).max(0.0);
    Vec2::new(dx, dy).hypot()
}

/// Upper bound on the distance between any point of `a` and any point of
/// `b`: the diagonal of the smallest rectangle enclosing both.
pub fn maximum_distance(a: &Rect, b: &Rect) -> f64 {
    let lo = Point::new(a.x0.min(b.x0), a.y0.min(b.y0));
    let hi = Point::new(a.x1.max(b.x1), a.y1.max(b.y1));
    lo.distance(hi)
}

/// Tighter upper bound than [`maximum_distance`]: the minimum, over all
/// pairings of one side of `a` with one side of `b`, of the maximum distance
/// between the sides' endpoints.
///
/// Costs sixteen side pairings and is rarely worth it over
/// [`maximum_distance`] in practice.
pub fn min_max_distance(a: &Rect, b: &Rect) -> f64 {
    let mut dist = f64::INFINITY;
    for (p1, p2) in sides(a) {
        for (q1, q2) in sides(b) {
            dist = dist.min(max_corner_distance(p1, p2, q1, q2));
        }
    }
    dist
}

/// The four sides of a rectangle as corner pairs.
fn sides(r: &Rect) -> [(Point, Point); 4] {
    let c00 = Point::new(r.x0, r.y0);
    let c01 = Point::new(r.x0, r.y1);
    let c10 = Point::new(r.x1, r.y0);
    let c11 = Point::new(r.x1, r.y1);
    [(c00, c01), (c00, c10), (c11, c01), (c11, c10)]
}

/// Maximum distance between the endpoints of two segments.
fn max_corner_distance(p1: Point, p2: Point, q1: Point, q2: Point) -> f64 {
    p1.distance(q1)
        .max(p1.distance(q2))
        .max(p2.distance(q1))
        .max(p2.distance(q2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_rects_have_zero_distance() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 15.0, 15.0);
        assert_eq!(rect_distance(&a, &b), 0.0);
        // Edge contact also counts as overlap.
        let c = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert_eq!(rect_distance(&a, &c), 0.0);
    }

    #[test]
    fn separated_rects_measure_the_gap() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        // Offset 3 right, 4 up from the corner of `a`: a 3-4-5 triangle.
        let b = Rect::new(4.0, 5.0, 6.0, 7.0);
        assert_eq!(rect_distance(&a, &b), 5.0);

        // Pure horizontal gap.
        let c = Rect::new(3.5, 0.0, 4.0, 1.0);
        assert_eq!(rect_distance(&a, &c), 2.5);
    }

    #[test]
    fn maximum_distance_is_the_combined_diagonal() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(2.0, 3.0, 3.0, 4.0);
        // Combined rectangle is [0,0]x[3,4], diagonal 5.
        assert_eq!(maximum_distance(&a, &b), 5.0);
    }

    #[test]
    fn min_max_never_exceeds_maximum() {
        let pairs = [
            (
                Rect::new(0.0, 0.0, 1.0, 1.0),
                Rect::new(0.0, 0.0, 1.0, 1.0),
            ),
            (
                Rect::new(0.0, 0.0, 2.0, 2.0),
                Rect::new(5.0, 0.0, 6.0, 2.0),
            ),
            (
                Rect::new(-3.0, -3.0, -1.0, -1.0),
                Rect::new(1.0, 1.0, 4.0, 2.0),
            ),
        ];
        for (a, b) in pairs {
            assert!(
                min_max_distance(&a, &b) <= maximum_distance(&a, &b),
                "min-max must tighten the plain maximum for {a:?} / {b:?}"
            );
        }
    }

    #[test]
    fn estimators_bracket_the_true_distance() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(4.0, 0.0, 5.0, 1.0);
        let lower = rect_distance(&a, &b);
        let upper = min_max_distance(&a, &b);
        assert_eq!(lower, 3.0);
        // Closest side pairing: right side of `a` against left side of `b`,
        // whose farthest endpoint pairing spans the unit height.
        assert!(upper >= lower);
        assert!(upper <= maximum_distance(&a, &b));
    }
}
