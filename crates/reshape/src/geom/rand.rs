//! Random work units and correction gestures (radial jitter + replay tokens).
//!
//! Purpose
//! - Deterministic fixtures for property tests and benches: a convex work-unit
//!   ring, plus gestures that bulge out of (or notch into) one of its edges.
//!
//! Model
//! - Start from `n` equally spaced angles on [0, 2π), add bounded angular and
//!   radial jitter, take the convex hull, scale to `base_radius`.
//! - A gesture picks an edge, two anchor parameters on it, and a rectangular
//!   detour of the requested depth; its pocket area is known in closed form.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{Polygon, Polyline, Ring, Vec2};
use super::util::cross;

/// Vertex count distribution.
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}
impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.max(3),
            VertexCount::Uniform { min, max } => {
                let lo = min.max(3);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Radial-jitter sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct RadialCfg {
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radii = `base_radius * (1 + u)`, with `u∈[-radial_jitter, radial_jitter]`.
    pub radial_jitter: f64,
    /// Work units are meter scale; default radius keeps areas well above 1 m².
    pub base_radius: f64,
    pub center: Vec2,
}
impl Default for RadialCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Uniform { min: 5, max: 10 },
            angle_jitter_frac: 0.3,
            radial_jitter: 0.2,
            base_radius: 100.0,
            center: Vec2::zeros(),
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}
impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a random convex work unit (single CCW exterior ring).
pub fn draw_work_unit(cfg: RadialCfg, tok: ReplayToken) -> Option<Polygon> {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertex_count.sample(&mut rng);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.9);
    let r0 = cfg.base_radius.max(1e-6);
    let delta = std::f64::consts::TAU / (n as f64);
    let phase = rng.gen::<f64>() * std::f64::consts::TAU;
    let pts: Vec<Vec2> = (0..n)
        .map(|k| {
            let th = phase + (k as f64) * delta + (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let r = (1.0 + (rng.gen::<f64>() * 2.0 - 1.0) * rj) * r0;
            cfg.center + Vec2::new(th.cos() * r, th.sin() * r)
        })
        .collect();
    let hull = convex_hull(&pts)?;
    if hull.len() < 3 {
        return None;
    }
    Some(Polygon::from_exterior(hull))
}

/// Which way a gesture leaves the edge it is anchored on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureKind {
    /// Detour outside the polygon: adds area.
    Bulge,
    /// Detour inside the polygon: removes area.
    Notch,
}

/// A drawn correction line with its expected pocket area.
#[derive(Clone, Debug)]
pub struct Gesture {
    pub line: Polyline,
    pub pocket_area: f64,
    pub kind: GestureKind,
}

/// Rectangular detour anchored on one edge of the first ring of `poly`.
///
/// Depth is `depth_frac` of the edge length (clamped to 0.05 for notches so the
/// detour stays clear of neighbouring edges of a convex ring).
pub fn draw_gesture(
    poly: &Polygon,
    kind: GestureKind,
    depth_frac: f64,
    tok: ReplayToken,
) -> Option<Gesture> {
    let ring = poly.rings.first()?.to_ccw();
    let n = ring.vertex_count();
    if n < 3 {
        return None;
    }
    let mut rng = tok.to_std_rng();
    let k = rng.gen_range(0..n);
    let (a, b) = (ring.pts[k], ring.pts[k + 1]);
    let edge = b - a;
    let len = edge.norm();
    if len <= 0.0 {
        return None;
    }
    let t0 = rng.gen_range(0.25..0.4);
    let t1 = rng.gen_range(0.6..0.75);
    let depth = match kind {
        GestureKind::Bulge => depth_frac.abs() * len,
        GestureKind::Notch => depth_frac.abs().min(0.05) * len,
    };
    // CCW ring: outward normal is 90° CW of the edge direction.
    let outward = Vec2::new(edge.y, -edge.x) / len;
    let offset = match kind {
        GestureKind::Bulge => outward * depth,
        GestureKind::Notch => -outward * depth,
    };
    let p0 = a + edge * t0;
    let p1 = a + edge * t1;
    let line = Polyline::new(vec![p0, p0 + offset, p1 + offset, p1]);
    Some(Gesture {
        line,
        pocket_area: (t1 - t0) * len * depth,
        kind,
    })
}

/// Andrew’s monotone chain convex hull (returns hull in CCW order).
fn convex_hull(points: &[Vec2]) -> Option<Vec<Vec2>> {
    if points.len() < 3 {
        return None;
    }
    let mut pts: Vec<_> = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup_by(|a, b| (*a - *b).norm() < 1e-12);
    if pts.len() < 3 {
        return None;
    }
    let mut lower: Vec<Vec2> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], *p) <= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }
    let mut upper: Vec<Vec2> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], *p) <= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }
    lower.pop();
    upper.pop();
    let mut hull = lower;
    hull.extend(upper);
    Some(hull)
}

/// Ring of a regular `n`-gon, handy for stand fixtures.
pub fn regular_ring(center: Vec2, radius: f64, n: usize) -> Ring {
    let n = n.max(3);
    let pts = (0..n)
        .map(|k| {
            let th = std::f64::consts::TAU * (k as f64) / (n as f64);
            center + Vec2::new(th.cos(), th.sin()) * radius
        })
        .collect();
    Ring::new(pts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reproducible_draw() {
        let tok = ReplayToken { seed: 42, index: 7 };
        let p1 = draw_work_unit(RadialCfg::default(), tok).expect("poly");
        let p2 = draw_work_unit(RadialCfg::default(), tok).expect("poly");
        assert_eq!(p1, p2);
        assert!(p1.area() > 0.0);
    }

    #[test]
    fn gestures_start_and_end_on_edge() {
        let tok = ReplayToken { seed: 3, index: 1 };
        let wu = draw_work_unit(RadialCfg::default(), tok).unwrap();
        let g = draw_gesture(&wu, GestureKind::Bulge, 0.2, tok).unwrap();
        let start = g.line.start().unwrap();
        let end = g.line.end().unwrap();
        let on_edge = |p: Vec2| {
            wu.rings[0]
                .edges()
                .any(|(a, b)| crate::geom::point_segment_distance(p, a, b) < 1e-9)
        };
        assert!(on_edge(start) && on_edge(end));
        assert!(g.pocket_area > 0.0);
    }
}
