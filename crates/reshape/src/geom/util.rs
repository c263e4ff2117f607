use super::types::Vec2;
use crate::cfg::{CROSS_PARAM_MARGIN, PARALLEL_EPS};

/// z-component of `(b - a) × (c - a)`.
#[inline]
pub(crate) fn cross(a: Vec2, b: Vec2, c: Vec2) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}

#[inline]
pub(crate) fn perp_dot(u: Vec2, v: Vec2) -> f64 {
    u.x * v.y - u.y * v.x
}

#[inline]
pub(crate) fn same_point(a: Vec2, b: Vec2, tol: f64) -> bool {
    (a - b).norm() <= tol
}

/// Shoelace signed area of a vertex loop. Works with or without the repeated
/// closing vertex (the closing term is then zero). Positive for CCW.
pub fn signed_ring_area(pts: &[Vec2]) -> f64 {
    if pts.len() < 3 {
        return 0.0;
    }
    let n = pts.len();
    let mut a = 0.0;
    for i in 0..n {
        let p = pts[i];
        let q = pts[(i + 1) % n];
        a += p.x * q.y - q.x * p.y;
    }
    a * 0.5
}

/// Planar distance from `p` to the closed segment `[a, b]`.
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    (p - (a + d * t)).norm()
}

/// Proper crossing test used for drawn-line self-intersection.
///
/// Parallel pairs never cross; touching within the parameter margin at either
/// end does not count, so vertices shared by consecutive segments are ignored.
pub(crate) fn segments_cross(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> bool {
    let d1 = p2 - p1;
    let d2 = p4 - p3;
    let d3 = p3 - p1;
    let denom = perp_dot(d1, d2);
    if denom.abs() < PARALLEL_EPS {
        return false;
    }
    let t = perp_dot(d3, d2) / denom;
    let u = perp_dot(d3, d1) / denom;
    let lo = CROSS_PARAM_MARGIN;
    let hi = 1.0 - CROSS_PARAM_MARGIN;
    t > lo && t < hi && u > lo && u < hi
}

/// Drop consecutive points closer than `tol`.
pub(crate) fn dedup_consecutive(pts: &mut Vec<Vec2>, tol: f64) {
    pts.dedup_by(|b, a| same_point(*a, *b, tol));
}
