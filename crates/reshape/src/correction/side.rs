//! Side resolution for a whole drawn line.
//!
//! The first outside segment with two valid pockets decides: its smaller
//! pocket is the true outside pocket (strictly smaller; ties go to the
//! backward walk), and the pocket ring's winding gives the side of the drawn
//! direction that pocket lies on. The result is taken as the orientation of
//! the whole gesture. A line that switches sides partway (e.g. across a narrow
//! isthmus) is not detected.

use crate::geom::{Polygon, Ring, Side};

use super::pocket::build_pockets;
use super::types::Segment;

/// Side established from one outside segment.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedSide {
    pub side: Side,
    /// The outside pocket the side was read from.
    pub pocket: Ring,
    /// Index of the deciding segment.
    pub segment: usize,
}

/// Smaller of two candidates by absolute area (strict comparison) and the
/// side it lies on.
pub fn find_outside_pocket_and_side<'r>(
    pocket1: &'r Ring,
    pocket2: &'r Ring,
) -> (&'r Ring, Side) {
    let pocket = if pocket1.area() < pocket2.area() {
        pocket1
    } else {
        pocket2
    };
    (pocket, Side::from_signed_area(pocket.signed_area()))
}

/// Scan outside segments against the original polygon; `None` for a line with
/// no usable outside segment.
pub fn resolve_outside_side(
    segments: &[Segment],
    polygon: &Polygon,
    tol: f64,
) -> Option<ResolvedSide> {
    for (k, segment) in segments.iter().enumerate().filter(|(_, s)| s.is_outside) {
        let Some(cands) = build_pockets(polygon, segment, tol) else {
            tracing::debug!(segment = k, "no boundary walks for outside segment");
            continue;
        };
        let Some((p1, p2)) = cands.both() else {
            tracing::debug!(segment = k, "outside segment lacks two pockets");
            continue;
        };
        let (pocket, side) = find_outside_pocket_and_side(p1, p2);
        tracing::debug!(
            segment = k,
            ?side,
            signed_area = pocket.signed_area(),
            "outside side resolved"
        );
        return Some(ResolvedSide {
            side,
            pocket: pocket.clone(),
            segment: k,
        });
    }
    None
}
