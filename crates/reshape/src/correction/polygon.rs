//! Correction Polygon Classifier.
//!
//! A drawn closed polygon D is placed relative to the work unit W:
//! - solid overlap below `negligible_area` → `EmptyArea` (auto union),
//! - contained in W and enclosing no hole seed → `WhollyInside` (auto difference),
//! - anything else → `Ambiguous` (the user picks add or remove).

use crate::error::CorrectionError;
use crate::geom::{GeometryEngine, Polygon};

use super::types::{CorrectionCfg, CorrectionChoice, GeometryOutcome, OperationType, PolygonClass};

pub(crate) const POLYGON_ADDED: &str = "polygon added to work unit";
pub(crate) const HOLE_CUT: &str = "hole cut in work unit";
pub(crate) const AREA_ADDED: &str = "area added to work unit";
pub(crate) const AREA_REMOVED: &str = "area removed from work unit";
pub(crate) const CHOOSE_ACTION: &str =
    "drawn polygon crosses the work unit boundary: choose whether to add or remove the area";

/// D contains the first vertex of any hole ring of W.
pub fn user_polygon_contains_hole<E: GeometryEngine + ?Sized>(
    engine: &E,
    drawn: &Polygon,
    work_unit: &Polygon,
) -> bool {
    work_unit
        .holes()
        .filter_map(|ring| ring.pts.first().copied())
        .any(|seed| engine.contains_point(drawn, seed))
}

pub fn analyze_drawn_polygon<E: GeometryEngine + ?Sized>(
    engine: &E,
    drawn: &Polygon,
    work_unit: &Polygon,
    cfg: &CorrectionCfg,
) -> PolygonClass {
    let overlap = engine.area(&engine.intersection(drawn, work_unit));
    tracing::debug!(drawn_area = engine.area(drawn), overlap, "drawn polygon analysis");
    if overlap < cfg.negligible_area {
        return PolygonClass::EmptyArea;
    }
    if engine.contains(work_unit, drawn) {
        if user_polygon_contains_hole(engine, drawn, work_unit) {
            return PolygonClass::Ambiguous;
        }
        return PolygonClass::WhollyInside;
    }
    PolygonClass::Ambiguous
}

/// Drawn polygon in exterior winding; rejects rings that enclose nothing.
pub(crate) fn checked_drawn(drawn: &Polygon) -> Result<Polygon, CorrectionError> {
    let d = drawn.normalized_drawn();
    if d.is_empty() || d.exteriors().next().is_none() {
        return Err(CorrectionError::InvalidDrawnPolygon);
    }
    Ok(d)
}

/// Outcome of the automatic polygon path.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum AutoOutcome {
    Applied(GeometryOutcome),
    Ambiguous,
}

fn outcome(
    new_polygon: Polygon,
    operation: OperationType,
    area: Option<Polygon>,
    message: &'static str,
) -> GeometryOutcome {
    let (added_pockets, removed_pockets) = match (&area, operation) {
        (Some(a), OperationType::Add) => (vec![a.clone()], Vec::new()),
        (Some(a), OperationType::Remove) => (Vec::new(), vec![a.clone()]),
        (None, _) => (Vec::new(), Vec::new()),
    };
    GeometryOutcome {
        new_polygon,
        added_segment_paths: Vec::new(),
        removed_segment_paths: Vec::new(),
        added_pockets,
        removed_pockets,
        affected_area: area,
        operation,
        outside_side: None,
        message,
    }
}

fn ensure_not_consumed<E: GeometryEngine + ?Sized>(
    engine: &E,
    p: &Polygon,
    cfg: &CorrectionCfg,
) -> Result<(), CorrectionError> {
    if p.is_empty() || engine.area(p) < cfg.negligible_area {
        return Err(CorrectionError::WouldRemoveEverything);
    }
    Ok(())
}

/// Classify D and apply the deterministic action, if there is one.
pub(crate) fn apply_polygon_auto<E: GeometryEngine + ?Sized>(
    engine: &E,
    drawn: &Polygon,
    work_unit: &Polygon,
    cfg: &CorrectionCfg,
) -> Result<AutoOutcome, CorrectionError> {
    let d = checked_drawn(drawn)?;
    match analyze_drawn_polygon(engine, &d, work_unit, cfg) {
        PolygonClass::EmptyArea => {
            let next = engine.union(work_unit, &d);
            if next.is_empty() {
                return Err(CorrectionError::UpdateFailed);
            }
            Ok(AutoOutcome::Applied(outcome(next, OperationType::Add, Some(d), POLYGON_ADDED)))
        }
        PolygonClass::WhollyInside => {
            let next = engine.difference(work_unit, &d);
            ensure_not_consumed(engine, &next, cfg)?;
            Ok(AutoOutcome::Applied(outcome(next, OperationType::Remove, Some(d), HOLE_CUT)))
        }
        PolygonClass::Ambiguous => Ok(AutoOutcome::Ambiguous),
    }
}

/// Apply D with an explicit add/remove decision.
///
/// The affected area is `D − W` for add and `D ∩ W` for remove.
pub(crate) fn apply_polygon_choice<E: GeometryEngine + ?Sized>(
    engine: &E,
    drawn: &Polygon,
    work_unit: &Polygon,
    choice: CorrectionChoice,
    cfg: &CorrectionCfg,
) -> Result<GeometryOutcome, CorrectionError> {
    let d = checked_drawn(drawn)?;
    let (next, affected, message) = match choice {
        CorrectionChoice::Add => (
            engine.union(work_unit, &d),
            engine.difference(&d, work_unit),
            AREA_ADDED,
        ),
        CorrectionChoice::Remove => (
            engine.difference(work_unit, &d),
            engine.intersection(&d, work_unit),
            AREA_REMOVED,
        ),
    };
    ensure_not_consumed(engine, &next, cfg)?;
    let affected = (!affected.is_empty()).then_some(affected);
    tracing::debug!(
        ?choice,
        affected_area = affected.as_ref().map(|a| engine.area(a)),
        area = engine.area(&next),
        "polygon correction applied"
    );
    Ok(outcome(next, choice.into(), affected, message))
}
