//! Correction Line Applier.
//!
//! Validate → classify → resolve side → fold the segments over the polygon.
//! Each fold step re-derives the boundary walks against the polygon produced
//! by the previous step, then unions (outside segment) or subtracts (inside
//! segment) the chosen pocket. Segments whose walks or pockets cannot be built
//! are skipped; only successful steps count as modifications.

use crate::error::CorrectionError;
use crate::geom::{GeometryEngine, Polygon, Polyline, Ring, Side};

use super::classify::{classify_segments, validate_line};
use super::pocket::{build_pockets, pocket_polygon, smaller_of, PocketCandidates};
use super::side::resolve_outside_side;
use super::types::{CorrectionCfg, GeometryOutcome, OperationType, PocketRule, Segment};

pub(crate) const LINE_APPLIED: &str = "work unit boundary updated";

/// Accumulator of the segment fold. Every step returns a new state.
#[derive(Clone, Debug)]
struct FoldState {
    polygon: Polygon,
    applied: usize,
    added_pockets: Vec<Polygon>,
    removed_pockets: Vec<Polygon>,
    added_paths: Vec<Polyline>,
    removed_paths: Vec<Polyline>,
}

impl FoldState {
    fn new(polygon: Polygon) -> Self {
        Self {
            polygon,
            applied: 0,
            added_pockets: Vec::new(),
            removed_pockets: Vec::new(),
            added_paths: Vec::new(),
            removed_paths: Vec::new(),
        }
    }

    fn step<E: GeometryEngine + ?Sized>(
        mut self,
        engine: &E,
        segment: &Segment,
        side: Option<Side>,
        cfg: &CorrectionCfg,
    ) -> Self {
        let Some(cands) = build_pockets(&self.polygon, segment, cfg.boundary_tol) else {
            tracing::warn!(
                is_outside = segment.is_outside,
                "segment ends not on one ring of the current polygon; skipped"
            );
            return self;
        };
        let Some(ring) = choose_pocket(&cands, segment.is_outside, side, cfg.pocket_rule) else {
            tracing::warn!(is_outside = segment.is_outside, "no pocket for segment; skipped");
            return self;
        };
        let pocket = pocket_polygon(ring);
        let next = if segment.is_outside {
            engine.union(&self.polygon, &pocket)
        } else {
            engine.difference(&self.polygon, &pocket)
        };
        if next.is_empty() {
            tracing::warn!(
                is_outside = segment.is_outside,
                pocket_area = ring.area(),
                "boolean operation returned an empty polygon; segment skipped"
            );
            return self;
        }

        tracing::debug!(
            is_outside = segment.is_outside,
            pocket_area = ring.area(),
            area = engine.area(&next),
            "pocket applied"
        );
        self.polygon = next;
        self.applied += 1;
        if segment.is_outside {
            self.added_pockets.push(pocket);
            self.added_paths.push(segment.path.clone());
        } else {
            self.removed_pockets.push(pocket);
            self.removed_paths.push(segment.path.clone());
        }
        self
    }
}

/// Pick the pocket to apply for one segment.
///
/// Under `ResolvedSide`, an outside segment takes the candidate lying on the
/// resolved side and an inside segment the candidate on the opposite side;
/// everything else uses the smaller-area rule.
pub(crate) fn choose_pocket(
    cands: &PocketCandidates,
    is_outside: bool,
    side: Option<Side>,
    rule: PocketRule,
) -> Option<&Ring> {
    let (a, b) = match cands.both() {
        Some(pair) => pair,
        None => return cands.smaller().map(|(r, _)| r),
    };
    if let (PocketRule::ResolvedSide, Some(side)) = (rule, side) {
        let want = if is_outside { side } else { side.opposite() };
        let side_a = Side::from_signed_area(a.signed_area());
        let side_b = Side::from_signed_area(b.signed_area());
        if side_a != side_b {
            return Some(if side_a == want { a } else { b });
        }
    }
    Some(smaller_of(a, b).0)
}

/// Apply a drawn open polyline to `polygon`.
pub(crate) fn apply_line<E: GeometryEngine + ?Sized>(
    engine: &E,
    line: &Polyline,
    polygon: &Polygon,
    cfg: &CorrectionCfg,
) -> Result<GeometryOutcome, CorrectionError> {
    validate_line(line, cfg)?;
    let segments = classify_segments(engine, line, polygon, cfg)?;
    let resolved = resolve_outside_side(&segments, polygon, cfg.boundary_tol);
    let side = resolved.as_ref().map(|r| r.side);
    tracing::debug!(segments = segments.len(), ?side, "segments classified");

    let state = segments
        .iter()
        .fold(FoldState::new(polygon.clone()), |state, segment| {
            state.step(engine, segment, side, cfg)
        });

    if state.applied == 0 {
        return Err(CorrectionError::NoChanges);
    }
    if state.polygon.is_empty() {
        return Err(CorrectionError::UpdateFailed);
    }
    let operation = if state.removed_pockets.is_empty() {
        OperationType::Add
    } else {
        OperationType::Remove
    };
    Ok(GeometryOutcome {
        new_polygon: state.polygon,
        added_segment_paths: state.added_paths,
        removed_segment_paths: state.removed_paths,
        added_pockets: state.added_pockets,
        removed_pockets: state.removed_pockets,
        affected_area: None,
        operation,
        outside_side: side,
        message: LINE_APPLIED,
    })
}
