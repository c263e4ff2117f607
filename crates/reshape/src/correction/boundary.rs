//! Boundary topology: which ring a boundary point lies on, and the two walks
//! along that ring between two boundary points.
//!
//! Both walks start exactly at the end point and finish exactly at the start
//! point (the literal input coordinates, not ring vertices), so a drawn
//! segment `start → … → end` followed by either walk closes onto itself.

use serde::{Deserialize, Serialize};

use crate::geom::{point_segment_distance, Polygon, Polyline, Ring, Vec2};

/// First ring with an edge within `tol` of `p`, scanning rings in order.
pub fn find_ring_containing_point(p: Vec2, polygon: &Polygon, tol: f64) -> Option<&Ring> {
    polygon
        .rings
        .iter()
        .find(|ring| find_edge_index(p, ring, tol).is_some())
}

/// Index of the first vertex of the first edge within `tol` of `p`.
pub fn find_edge_index(p: Vec2, ring: &Ring, tol: f64) -> Option<usize> {
    ring.edges()
        .position(|(a, b)| point_segment_distance(p, a, b) <= tol)
}

/// `p` lies on any ring of `polygon` (exterior or hole) within `tol`.
#[inline]
pub fn is_point_on_boundary(p: Vec2, polygon: &Polygon, tol: f64) -> bool {
    find_ring_containing_point(p, polygon, tol).is_some()
}

/// The two candidate walks from `end` back to `start` along one ring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPaths {
    /// Forward walk; the direct edge piece when both points share an edge.
    pub path1: Polyline,
    /// Backward walk; the way around the ring when both points share an edge.
    pub path2: Polyline,
}

/// Both walks along the ring holding `start`, or `None` when either point is
/// off that ring (e.g. the segment spans two polygon parts).
pub fn find_boundary_paths_both(
    polygon: &Polygon,
    start: Vec2,
    end: Vec2,
    tol: f64,
) -> Option<BoundaryPaths> {
    let Some(ring) = find_ring_containing_point(start, polygon, tol) else {
        tracing::debug!(?start, "start point not on any ring");
        return None;
    };
    let start_edge = find_edge_index(start, ring, tol)?;
    let Some(end_edge) = find_edge_index(end, ring, tol) else {
        tracing::debug!(?end, "end point not on the start point's ring");
        return None;
    };

    let pts = &ring.pts;
    let n = ring.vertex_count();
    if n == 0 {
        return None;
    }

    if start_edge == end_edge {
        let path1 = vec![end, start];
        let mut path2 = vec![end];
        let stop = (start_edge + 1) % n;
        let mut i = (end_edge + 1) % n;
        for _ in 0..n {
            path2.push(pts[i]);
            i = (i + 1) % n;
            if i == stop {
                break;
            }
        }
        path2.push(start);
        tracing::debug!(
            edge = start_edge,
            len1 = path1.len(),
            len2 = path2.len(),
            "boundary walks on a shared edge"
        );
        return Some(BoundaryPaths {
            path1: Polyline::new(path1),
            path2: Polyline::new(path2),
        });
    }

    // Forward: vertices after the end edge up to the start edge's first vertex.
    let mut path1 = vec![end];
    let mut i = (end_edge + 1) % n;
    for _ in 0..=n {
        path1.push(pts[i]);
        if i == start_edge {
            path1.push(start);
            break;
        }
        i = (i + 1) % n;
    }

    // Backward: end edge's first vertex down to the start edge's last vertex.
    let mut path2 = vec![end];
    let stop = (start_edge + 1) % n;
    let mut i = end_edge;
    for _ in 0..=n {
        path2.push(pts[i]);
        if i == stop {
            path2.push(start);
            break;
        }
        i = (i + n - 1) % n;
    }

    tracing::debug!(
        start_edge,
        end_edge,
        len1 = path1.len(),
        len2 = path2.len(),
        "boundary walks"
    );
    Some(BoundaryPaths {
        path1: Polyline::new(path1),
        path2: Polyline::new(path2),
    })
}
