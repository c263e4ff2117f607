//! Pocket candidates: a drawn segment closed by one of the two boundary walks.
//!
//! For a segment from `s` to `e`, each walk runs from `e` back to `s`, so the
//! candidate ring is `segment ++ walk[1..]`. Its winding records on which side
//! of the drawn direction the enclosed area lies (positive = left).
//!
//! Of two valid candidates one always equals the other joined with the
//! original polygon; the true pocket is the smaller one.

use crate::cfg::DEDUP_EPS;
use crate::geom::{dedup_consecutive, same_point, Polygon, Polyline, Ring};

use super::boundary::find_boundary_paths_both;
use super::types::Segment;

/// Which of the two walks produced a pocket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Candidate {
    Forward,
    Backward,
}

/// Closed ring `line_path ++ boundary_path[1..]`, or `None` when it has fewer
/// than four points once consecutive duplicates are merged.
pub fn create_pocket(line_path: &Polyline, boundary_path: &Polyline) -> Option<Ring> {
    if line_path.pts.len() < 2 || boundary_path.pts.len() < 2 {
        return None;
    }
    let mut pts = Vec::with_capacity(line_path.pts.len() + boundary_path.pts.len());
    pts.extend_from_slice(&line_path.pts);
    pts.extend_from_slice(&boundary_path.pts[1..]);
    dedup_consecutive(&mut pts, DEDUP_EPS);

    let first = pts[0];
    match pts.last().copied() {
        Some(last) if same_point(first, last, DEDUP_EPS) => {
            if let Some(l) = pts.last_mut() {
                *l = first;
            }
        }
        _ => pts.push(first),
    }

    if pts.len() < 4 {
        tracing::debug!(points = pts.len(), "pocket has too few points");
        return None;
    }
    Some(Ring { pts })
}

/// Both pocket candidates of one segment; either may be missing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PocketCandidates {
    pub pocket1: Option<Ring>,
    pub pocket2: Option<Ring>,
}

impl PocketCandidates {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pocket1.is_none() && self.pocket2.is_none()
    }

    #[inline]
    pub fn both(&self) -> Option<(&Ring, &Ring)> {
        Some((self.pocket1.as_ref()?, self.pocket2.as_ref()?))
    }

    /// The smaller valid candidate; ties favour the forward walk.
    pub fn smaller(&self) -> Option<(&Ring, Candidate)> {
        match (&self.pocket1, &self.pocket2) {
            (Some(a), Some(b)) => Some(smaller_of(a, b)),
            (Some(a), None) => Some((a, Candidate::Forward)),
            (None, Some(b)) => Some((b, Candidate::Backward)),
            (None, None) => None,
        }
    }
}

pub(crate) fn smaller_of<'r>(a: &'r Ring, b: &'r Ring) -> (&'r Ring, Candidate) {
    let (area1, area2) = (a.area(), b.area());
    tracing::debug!(area1, area2, "pocket candidates");
    if area1 <= area2 {
        (a, Candidate::Forward)
    } else {
        (b, Candidate::Backward)
    }
}

/// Candidates for `segment` against `polygon`; `None` when the segment ends
/// cannot be placed on one ring.
pub fn build_pockets(polygon: &Polygon, segment: &Segment, tol: f64) -> Option<PocketCandidates> {
    let (start, end) = (segment.start()?, segment.end()?);
    let paths = find_boundary_paths_both(polygon, start, end, tol)?;
    Some(PocketCandidates {
        pocket1: create_pocket(&segment.path, &paths.path1),
        pocket2: create_pocket(&segment.path, &paths.path2),
    })
}

/// Pocket ring as a solid polygon (exterior winding).
#[inline]
pub(crate) fn pocket_polygon(ring: &Ring) -> Polygon {
    Polygon::from(ring.to_ccw())
}
