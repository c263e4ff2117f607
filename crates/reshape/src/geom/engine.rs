//! Geometry primitives seam.
//!
//! `GeometryEngine` is the contract the correction core needs from a planar
//! geometry library: booleans, containment, intersection tests, areas, and
//! splitting a line against a polygon. `GeoEngine` implements it over the
//! `geo` crate.
//!
//! Conversion to `geo::MultiPolygon` groups the flat signed rings: every
//! positive ring becomes a shell and every negative ring is attached to the
//! smallest shell containing one of its vertices. Results come back with
//! exteriors CCW and holes CW.

use geo::orient::Direction;
use geo::{
    Area, BooleanOps, Contains, Coord, Intersects, LineString, MultiLineString, MultiPolygon,
    Orient, Relate,
};

use super::split::{assemble_runs, LineSplit};
use super::types::{Polygon, Polyline, Ring, Vec2};

/// Planar geometry operations used by the correction core.
///
/// All areas are in working-reference units². Boolean results are whole new
/// values; inputs are never modified.
pub trait GeometryEngine {
    fn union(&self, a: &Polygon, b: &Polygon) -> Polygon;
    fn difference(&self, a: &Polygon, b: &Polygon) -> Polygon;
    fn intersection(&self, a: &Polygon, b: &Polygon) -> Polygon;
    /// `inner` lies in the closure of `outer` and their interiors meet.
    fn contains(&self, outer: &Polygon, inner: &Polygon) -> bool;
    /// `p` lies in the solid area (not in a hole, not outside).
    fn contains_point(&self, polygon: &Polygon, p: Vec2) -> bool;
    /// Any shared point, boundaries included.
    fn intersects(&self, a: &Polygon, b: &Polygon) -> bool;
    /// Shared interior points (touching along a boundary does not count).
    fn interiors_intersect(&self, a: &Polygon, b: &Polygon) -> bool {
        self.area(&self.intersection(a, b)) > 0.0
    }
    /// Absolute area.
    fn area(&self, polygon: &Polygon) -> f64;
    /// Split `line` into runs inside and outside `polygon`.
    fn split_line(&self, line: &Polyline, polygon: &Polygon) -> LineSplit;

    /// `line ∩ polygon` as paths.
    fn line_intersection(&self, line: &Polyline, polygon: &Polygon) -> Vec<Polyline> {
        self.split_line(line, polygon).inside
    }

    /// `line − polygon` as paths.
    fn line_difference(&self, line: &Polyline, polygon: &Polygon) -> Vec<Polyline> {
        self.split_line(line, polygon).outside
    }

    /// Union of several polygons, left to right. `None` for an empty slice.
    fn union_all(&self, parts: &[Polygon]) -> Option<Polygon> {
        let (first, rest) = parts.split_first()?;
        Some(rest.iter().fold(first.clone(), |acc, p| self.union(&acc, p)))
    }
}

/// `GeometryEngine` backed by the `geo` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeoEngine;

impl GeometryEngine for GeoEngine {
    fn union(&self, a: &Polygon, b: &Polygon) -> Polygon {
        from_geo(&to_geo(a).union(&to_geo(b)))
    }

    fn difference(&self, a: &Polygon, b: &Polygon) -> Polygon {
        from_geo(&to_geo(a).difference(&to_geo(b)))
    }

    fn intersection(&self, a: &Polygon, b: &Polygon) -> Polygon {
        from_geo(&to_geo(a).intersection(&to_geo(b)))
    }

    fn contains(&self, outer: &Polygon, inner: &Polygon) -> bool {
        let (ga, gb) = (to_geo(outer), to_geo(inner));
        if ga.0.is_empty() || gb.0.is_empty() {
            return false;
        }
        ga.relate(&gb).is_contains()
    }

    fn contains_point(&self, polygon: &Polygon, p: Vec2) -> bool {
        to_geo(polygon).contains(&Coord { x: p.x, y: p.y })
    }

    fn intersects(&self, a: &Polygon, b: &Polygon) -> bool {
        let (ga, gb) = (to_geo(a), to_geo(b));
        if ga.0.is_empty() || gb.0.is_empty() {
            return false;
        }
        ga.intersects(&gb)
    }

    fn interiors_intersect(&self, a: &Polygon, b: &Polygon) -> bool {
        let (ga, gb) = (to_geo(a), to_geo(b));
        if ga.0.is_empty() || gb.0.is_empty() {
            return false;
        }
        ga.relate(&gb).matches("T********").unwrap_or(false)
    }

    fn area(&self, polygon: &Polygon) -> f64 {
        to_geo(polygon).unsigned_area()
    }

    fn split_line(&self, line: &Polyline, polygon: &Polygon) -> LineSplit {
        if line.pts.len() < 2 {
            return LineSplit::default();
        }
        let solid = to_geo(polygon);
        if solid.0.is_empty() {
            return LineSplit {
                inside: Vec::new(),
                outside: vec![line.clone()],
            };
        }
        let drawn = MultiLineString::new(vec![LineString::new(
            line.pts.iter().map(|p| Coord { x: p.x, y: p.y }).collect(),
        )]);
        let runs = |clipped: MultiLineString<f64>| {
            let fragments = clipped.0.iter().flat_map(|ls| {
                ls.lines()
                    .map(|l| (Vec2::new(l.start.x, l.start.y), Vec2::new(l.end.x, l.end.y)))
            });
            assemble_runs(line, polygon, fragments.collect::<Vec<_>>())
        };
        LineSplit {
            inside: runs(solid.clip(&drawn, false)),
            outside: runs(solid.clip(&drawn, true)),
        }
    }
}

fn line_string(ring: &Ring) -> LineString<f64> {
    LineString::new(ring.pts.iter().map(|p| Coord { x: p.x, y: p.y }).collect())
}

fn ring_from(ls: &LineString<f64>) -> Ring {
    Ring::new(ls.0.iter().map(|c| Vec2::new(c.x, c.y)).collect())
}

/// Signed-ring polygon → `geo::MultiPolygon`.
pub fn to_geo(polygon: &Polygon) -> MultiPolygon<f64> {
    let mut shells: Vec<(geo::Polygon<f64>, f64)> = Vec::new();
    let mut holes: Vec<LineString<f64>> = Vec::new();
    for ring in &polygon.rings {
        if ring.vertex_count() < 3 {
            continue;
        }
        if ring.is_hole() {
            holes.push(line_string(ring));
        } else {
            shells.push((geo::Polygon::new(line_string(ring), vec![]), ring.area()));
        }
    }
    for hole in holes {
        let owner = shells
            .iter()
            .enumerate()
            .filter(|(_, (shell, _))| hole.0.iter().any(|c| shell.contains(c)))
            .min_by(|(_, (_, a1)), (_, (_, a2))| a1.total_cmp(a2))
            .map(|(k, _)| k);
        match owner {
            Some(k) => shells[k].0.interiors_push(hole),
            None => {
                tracing::warn!(vertices = hole.0.len(), "hole ring outside every exterior; dropped")
            }
        }
    }
    MultiPolygon::new(shells.into_iter().map(|(p, _)| p).collect())
}

/// `geo::MultiPolygon` → signed-ring polygon (exteriors CCW, holes CW).
pub fn from_geo(mp: &MultiPolygon<f64>) -> Polygon {
    let oriented = mp.orient(Direction::Default);
    let mut rings = Vec::new();
    for poly in &oriented.0 {
        let ext = ring_from(poly.exterior());
        if ext.vertex_count() < 3 {
            continue;
        }
        rings.push(ext);
        for interior in poly.interiors() {
            let hole = ring_from(interior);
            if hole.vertex_count() >= 3 {
                rings.push(hole);
            }
        }
    }
    Polygon::new(rings)
}
