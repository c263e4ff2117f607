//! Planar data model: rings, multipart polygons with holes, open polylines.
//!
//! - `Ring`: closed vertex sequence (first point repeated as last). The sign of
//!   its shoelace area encodes the role: positive = exterior, negative = hole.
//! - `Polygon`: flat list of rings; several exteriors make a multipart polygon.
//! - `Polyline`: one open path of at least two points.
//!
//! All values are plain data and cheap to clone; nothing here keeps references
//! to caller-owned objects.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::util::{same_point, signed_ring_area};

/// Planar point in the working reference.
pub type Vec2 = Vector2<f64>;

/// Closed ring. Invariant: `pts.first() == pts.last()` whenever non-empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Vec2>", into = "Vec<Vec2>")]
pub struct Ring {
    pub pts: Vec<Vec2>,
}

impl Ring {
    /// Build a ring, appending the first point if the sequence is not closed yet.
    pub fn new(mut pts: Vec<Vec2>) -> Self {
        if let (Some(first), Some(last)) = (pts.first().copied(), pts.last().copied()) {
            if first != last {
                pts.push(first);
            }
        }
        Self { pts }
    }

    /// Shoelace area; positive for counter-clockwise winding.
    #[inline]
    pub fn signed_area(&self) -> f64 {
        signed_ring_area(&self.pts)
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    #[inline]
    pub fn is_hole(&self) -> bool {
        self.signed_area() < 0.0
    }

    /// Number of distinct vertices (closing point excluded).
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pts.len().saturating_sub(1)
    }

    /// Edges `(pts[i], pts[i+1])` in ring order.
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.pts.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn reversed(&self) -> Ring {
        let mut pts = self.pts.clone();
        pts.reverse();
        Ring { pts }
    }

    /// Same ring with counter-clockwise (exterior) winding.
    pub fn to_ccw(&self) -> Ring {
        if self.signed_area() < 0.0 {
            self.reversed()
        } else {
            self.clone()
        }
    }
}

impl From<Vec<Vec2>> for Ring {
    fn from(pts: Vec<Vec2>) -> Self {
        Ring::new(pts)
    }
}

impl From<Ring> for Vec<Vec2> {
    fn from(r: Ring) -> Self {
        r.pts
    }
}

/// Polygon as a flat list of signed rings (multipart, with holes).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    pub rings: Vec<Ring>,
}

impl Polygon {
    #[inline]
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    /// Single exterior ring from vertices; winding is normalized to CCW.
    pub fn from_exterior(pts: Vec<Vec2>) -> Self {
        Self {
            rings: vec![Ring::new(pts).to_ccw()],
        }
    }

    /// Axis-aligned rectangle `[x0,x1] × [y0,y1]`.
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::from_exterior(vec![
            Vec2::new(x0, y0),
            Vec2::new(x1, y0),
            Vec2::new(x1, y1),
            Vec2::new(x0, y1),
        ])
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rings.iter().all(|r| r.vertex_count() < 3)
    }

    /// Net area from ring signs (exteriors minus holes).
    pub fn area(&self) -> f64 {
        self.rings.iter().map(Ring::signed_area).sum()
    }

    pub fn exteriors(&self) -> impl Iterator<Item = &Ring> {
        self.rings.iter().filter(|r| !r.is_hole())
    }

    pub fn holes(&self) -> impl Iterator<Item = &Ring> {
        self.rings.iter().filter(|r| r.is_hole())
    }

    /// A drawn single-ring polygon may come in either winding; make it an exterior.
    pub fn normalized_drawn(&self) -> Polygon {
        if self.rings.len() == 1 {
            Polygon {
                rings: vec![self.rings[0].to_ccw()],
            }
        } else {
            self.clone()
        }
    }
}

impl From<Ring> for Polygon {
    fn from(r: Ring) -> Self {
        Polygon { rings: vec![r] }
    }
}

/// Open polyline (one path).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline {
    pub pts: Vec<Vec2>,
}

impl Polyline {
    #[inline]
    pub fn new(pts: Vec<Vec2>) -> Self {
        Self { pts }
    }

    #[inline]
    pub fn start(&self) -> Option<Vec2> {
        self.pts.first().copied()
    }

    #[inline]
    pub fn end(&self) -> Option<Vec2> {
        self.pts.last().copied()
    }

    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.pts.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn length(&self) -> f64 {
        self.segments().map(|(a, b)| (b - a).norm()).sum()
    }

    /// Count of vertices after dropping consecutive duplicates.
    pub fn distinct_points(&self) -> usize {
        let mut n = 0usize;
        let mut last: Option<Vec2> = None;
        for p in &self.pts {
            if last.map_or(true, |q| !same_point(*p, q, 0.0)) {
                n += 1;
            }
            last = Some(*p);
        }
        n
    }
}

/// Side of a directed path on which a region lies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// A ring that starts with a path and returns along another encloses the
    /// region on the path's left when its shoelace area is positive.
    #[inline]
    pub fn from_signed_area(a: f64) -> Side {
        if a > 0.0 {
            Side::Left
        } else {
            Side::Right
        }
    }

    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}
