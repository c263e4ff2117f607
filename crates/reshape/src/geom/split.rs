//! Reassemble clipped line fragments into drawn-order paths.
//!
//! `GeoEngine` clips the drawn line against the polygon with `geo`
//! (`BooleanOps::clip`, once kept inside and once inverted). The clipper
//! returns fragments in no particular order or direction, so each fragment is
//! located on the drawn line by its parameter `segment index + t`, flipped to
//! the drawing direction, sorted, and chained while consecutive fragments
//! touch. Fragments lying along a ring edge belong to neither side and end the
//! current run. Cut points are snapped onto the ring edge they cross.

use serde::{Deserialize, Serialize};

use super::types::{Polygon, Polyline, Vec2};
use super::util::{perp_dot, point_segment_distance};
use crate::cfg::CLIP_EPS;

/// Result of splitting a line: `inside ≈ line ∩ polygon`, `outside ≈ line − polygon`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LineSplit {
    pub inside: Vec<Polyline>,
    pub outside: Vec<Polyline>,
}

impl LineSplit {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inside.is_empty() && self.outside.is_empty()
    }
}

/// Fragment position on the drawn line, as `segment index + t` parameters.
#[derive(Clone, Copy, Debug)]
struct Span {
    s: f64,
    e: f64,
}

/// Chain clipped `fragments` of `line` into paths in drawing order.
pub(crate) fn assemble_runs<I>(line: &Polyline, polygon: &Polygon, fragments: I) -> Vec<Polyline>
where
    I: IntoIterator<Item = (Vec2, Vec2)>,
{
    let mut spans: Vec<Span> = fragments
        .into_iter()
        .filter_map(|(p, q)| locate(&line.pts, p, q))
        .filter(|sp| {
            let mid = point_at(&line.pts, 0.5 * (sp.s + sp.e));
            !on_boundary(mid, polygon)
        })
        .collect();
    spans.sort_by(|a, b| a.s.total_cmp(&b.s));

    let mut runs: Vec<Span> = Vec::new();
    for sp in spans {
        match runs.last_mut() {
            Some(run) if sp.s - run.e <= CLIP_EPS => run.e = run.e.max(sp.e),
            _ => runs.push(sp),
        }
    }
    runs.into_iter()
        .map(|run| path_of(line, polygon, run))
        .filter(|p| p.pts.len() >= 2)
        .collect()
}

/// Parameter span of the fragment `p → q`; `None` when it has no length.
fn locate(pts: &[Vec2], p: Vec2, q: Vec2) -> Option<Span> {
    let mid = 0.5 * (p + q);
    let (i, _) = pts
        .windows(2)
        .enumerate()
        .filter(|(_, w)| w[0] != w[1])
        .map(|(i, w)| (i, point_segment_distance(mid, w[0], w[1])))
        .min_by(|a, b| a.1.total_cmp(&b.1))?;
    let (a, b) = (pts[i], pts[i + 1]);
    let d = b - a;
    let param = |x: Vec2| i as f64 + ((x - a).dot(&d) / d.norm_squared()).clamp(0.0, 1.0);
    let (tp, tq) = (param(p), param(q));
    if (tq - tp).abs() <= CLIP_EPS {
        return None;
    }
    Some(Span {
        s: tp.min(tq),
        e: tp.max(tq),
    })
}

/// Point of the drawn line at parameter `u`; whole parameters are the drawn
/// vertices themselves.
fn point_at(pts: &[Vec2], u: f64) -> Vec2 {
    let last = pts.len().saturating_sub(1);
    let i = (u.floor().max(0.0) as usize).min(last);
    let t = u - i as f64;
    if t <= CLIP_EPS || i == last {
        return pts[i];
    }
    if t >= 1.0 - CLIP_EPS {
        return pts[i + 1];
    }
    pts[i] + (pts[i + 1] - pts[i]) * t
}

fn path_of(line: &Polyline, polygon: &Polygon, run: Span) -> Polyline {
    let pts = &line.pts;
    let mut out = vec![snap(pts, polygon, run.s)];
    let first = run.s.floor() as usize + 1;
    for k in first..pts.len() {
        let u = k as f64;
        if u >= run.e - CLIP_EPS {
            break;
        }
        if u > run.s + CLIP_EPS {
            out.push(pts[k]);
        }
    }
    out.push(snap(pts, polygon, run.e));
    Polyline::new(out)
}

/// Cut point at `u`, moved onto the exact crossing with the nearest ring edge.
fn snap(pts: &[Vec2], polygon: &Polygon, u: f64) -> Vec2 {
    let p = point_at(pts, u);
    let i = u.floor() as usize;
    let t = u - i as f64;
    if t <= CLIP_EPS || t >= 1.0 - CLIP_EPS || i + 1 >= pts.len() {
        return p;
    }
    let (a, b) = (pts[i], pts[i + 1]);
    let nearest = polygon
        .rings
        .iter()
        .flat_map(|r| r.edges())
        .map(|(c, d)| (c, d, point_segment_distance(p, c, d)))
        .min_by(|x, y| x.2.total_cmp(&y.2));
    let Some((c, d, _)) = nearest else {
        return p;
    };
    let (r, s) = (b - a, d - c);
    let denom = perp_dot(r, s);
    if denom.abs() <= CLIP_EPS * r.norm() * s.norm() {
        return p;
    }
    a + r * (perp_dot(c - a, s) / denom)
}

fn on_boundary(p: Vec2, polygon: &Polygon) -> bool {
    let tol = CLIP_EPS * (1.0 + p.norm());
    polygon
        .rings
        .iter()
        .any(|r| r.edges().any(|(c, d)| point_segment_distance(p, c, d) <= tol))
}
