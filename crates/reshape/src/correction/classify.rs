//! Drawn-line validation and segment classification.
//!
//! A drawn correction line must be open, simple and long enough; it is then
//! split against the current polygon and every piece whose two ends sit on the
//! boundary becomes a `Segment`, tagged by whether it runs outside or inside.
//! Pieces with a loose end (the drawn line starts or stops mid-area) are
//! dropped.

use crate::error::CorrectionError;
use crate::geom::{segments_cross, GeometryEngine, Polygon, Polyline};

use super::boundary::is_point_on_boundary;
use super::types::{CorrectionCfg, Segment};

/// First and last vertex within `tol` of each other. Lines of fewer than three
/// points are never closed.
pub fn is_closed_line(line: &Polyline, tol: f64) -> bool {
    if line.pts.len() < 3 {
        return false;
    }
    match (line.start(), line.end()) {
        (Some(a), Some(b)) => (a - b).norm() <= tol,
        _ => false,
    }
}

/// Any two non-adjacent segments cross properly. Lines of fewer than four
/// points cannot cross themselves.
pub fn is_self_intersecting(line: &Polyline) -> bool {
    let p = &line.pts;
    if p.len() < 4 {
        return false;
    }
    for i in 0..p.len() - 1 {
        for j in (i + 2)..p.len() - 1 {
            if segments_cross(p[i], p[i + 1], p[j], p[j + 1]) {
                tracing::debug!(i, j, "drawn line crosses itself");
                return true;
            }
        }
    }
    false
}

/// Reject lines that are degenerate, closed or self-crossing.
pub fn validate_line(line: &Polyline, cfg: &CorrectionCfg) -> Result<(), CorrectionError> {
    let min = cfg.min_line_points.max(2);
    if line.distinct_points() < min {
        return Err(CorrectionError::DegenerateLine { min });
    }
    if is_closed_line(line, cfg.closed_line_tol) || is_self_intersecting(line) {
        return Err(CorrectionError::LineNotOpen);
    }
    Ok(())
}

/// Split `line` against `polygon` and keep the boundary-to-boundary pieces,
/// outside pieces first, each group in drawing order.
pub fn classify_segments<E: GeometryEngine + ?Sized>(
    engine: &E,
    line: &Polyline,
    polygon: &Polygon,
    cfg: &CorrectionCfg,
) -> Result<Vec<Segment>, CorrectionError> {
    let split = engine.split_line(line, polygon);
    let on_boundary = |path: &Polyline| -> bool {
        match (path.start(), path.end()) {
            (Some(a), Some(b)) => {
                is_point_on_boundary(a, polygon, cfg.boundary_tol)
                    && is_point_on_boundary(b, polygon, cfg.boundary_tol)
            }
            _ => false,
        }
    };

    let touches = !split.inside.is_empty()
        || split.outside.iter().any(|path| {
            [path.start(), path.end()]
                .into_iter()
                .flatten()
                .any(|p| is_point_on_boundary(p, polygon, cfg.boundary_tol))
        });
    if split.is_empty() || !touches {
        return Err(CorrectionError::NoIntersection);
    }
    tracing::debug!(
        inside = split.inside.len(),
        outside = split.outside.len(),
        "line split against polygon"
    );

    let tagged = split
        .outside
        .into_iter()
        .map(|path| (path, true))
        .chain(split.inside.into_iter().map(|path| (path, false)));
    let mut segments = Vec::new();
    for (path, is_outside) in tagged {
        if path.pts.len() < 2 {
            continue;
        }
        if !on_boundary(&path) {
            tracing::debug!(is_outside, "piece has a loose end; skipped");
            continue;
        }
        segments.push(Segment { path, is_outside });
    }

    if segments.is_empty() {
        return Err(CorrectionError::NoValidSegments);
    }
    Ok(segments)
}
