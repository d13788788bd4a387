// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon footprint validation.

use nalgebra::Vector2;

use crate::model::{Point2D, LENGTH_EPSILON};

/// Calculate polygon area using shoelace formula
pub fn polygon_area(points: &[Point2D]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }

    (area / 2.0).abs()
}

/// Drop a trailing vertex that repeats the first one.
pub fn normalize_ring(points: &[Point2D]) -> Vec<Point2D> {
    let mut ring = points.to_vec();
    if ring.len() > 1 {
        let first = ring[0];
        if ring.last().is_some_and(|last| last.distance_to(&first) < LENGTH_EPSILON) {
            ring.pop();
        }
    }
    ring
}

/// Check that a ring is a usable room footprint.
///
/// Returns the reason when it is not: fewer than three distinct vertices,
/// two non-adjacent edges crossing, or zero area.
pub fn validate_ring(ring: &[Point2D]) -> Result<(), String> {
    if ring.len() < 3 {
        return Err(format!("needs at least 3 vertices, got {}", ring.len()));
    }

    for i in 0..ring.len() {
        let j = (i + 1) % ring.len();
        if ring[i].distance_to(&ring[j]) < LENGTH_EPSILON {
            return Err(format!("vertices {} and {} coincide", i, j));
        }
    }

    let n = ring.len();
    for i in 0..n {
        let a1 = ring[i];
        let a2 = ring[(i + 1) % n];
        for j in (i + 1)..n {
            // Edges sharing a vertex are allowed to touch there.
            if (j + 1) % n == i || (i + 1) % n == j {
                continue;
            }
            let b1 = ring[j];
            let b2 = ring[(j + 1) % n];
            if segments_intersect(a1, a2, b1, b2) {
                return Err(format!("edges {} and {} cross", i, j));
            }
        }
    }

    if polygon_area(ring) < LENGTH_EPSILON {
        return Err("polygon has zero area".to_string());
    }

    Ok(())
}

fn cross(o: Point2D, a: Point2D, b: Point2D) -> f64 {
    let oa = Vector2::new(a.x - o.x, a.y - o.y);
    let ob = Vector2::new(b.x - o.x, b.y - o.y);
    oa.perp(&ob)
}

fn on_segment(p: Point2D, q: Point2D, r: Point2D) -> bool {
    q.x <= p.x.max(r.x) + LENGTH_EPSILON
        && q.x >= p.x.min(r.x) - LENGTH_EPSILON
        && q.y <= p.y.max(r.y) + LENGTH_EPSILON
        && q.y >= p.y.min(r.y) - LENGTH_EPSILON
}

/// Closed-segment intersection test, collinear overlap included.
fn segments_intersect(p1: Point2D, p2: Point2D, q1: Point2D, q2: Point2D) -> bool {
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);

    let straddles = |a: f64, b: f64| {
        (a > LENGTH_EPSILON && b < -LENGTH_EPSILON) || (a < -LENGTH_EPSILON && b > LENGTH_EPSILON)
    };
    if straddles(d1, d2) && straddles(d3, d4) {
        return true;
    }

    (d1.abs() <= LENGTH_EPSILON && on_segment(q1, p1, q2))
        || (d2.abs() <= LENGTH_EPSILON && on_segment(q1, p2, q2))
        || (d3.abs() <= LENGTH_EPSILON && on_segment(p1, q1, p2))
        || (d4.abs() <= LENGTH_EPSILON && on_segment(p1, q2, p2))
}
