//! Correction Orchestration Facade.
//!
//! Entry points return a `CorrectionResult` and never an error or a panic:
//! every `CorrectionError` becomes `Failure { message }`, and a panic raised
//! inside the geometry engine is caught here and reported as
//! "error updating polygon". Nothing is mutated; staging the result on the
//! work unit is the caller's move.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::CorrectionError;
use crate::geom::{GeometryEngine, Polygon, Polyline};
use crate::stands::{find_partial_stands, StandInventory, WorkUnit};

use super::line::apply_line;
use super::polygon::{
    analyze_drawn_polygon, apply_polygon_auto, apply_polygon_choice, checked_drawn, AutoOutcome,
    CHOOSE_ACTION,
};
use super::types::{
    CorrectionCfg, CorrectionChoice, CorrectionResult, CorrectionSuccess, GeometryOutcome,
    PolygonClass,
};

/// Correction context: geometry engine, stand inventory and the work unit whose
/// stands are reconciled.
pub struct Corrector<'a, E, I> {
    engine: E,
    inventory: I,
    work_unit: &'a WorkUnit,
    cfg: CorrectionCfg,
}

impl<'a, E: GeometryEngine, I: StandInventory> Corrector<'a, E, I> {
    pub fn new(engine: E, inventory: I, work_unit: &'a WorkUnit) -> Self {
        Self {
            engine,
            inventory,
            work_unit,
            cfg: CorrectionCfg::default(),
        }
    }

    pub fn with_cfg(mut self, cfg: CorrectionCfg) -> Self {
        self.cfg = cfg;
        self
    }

    #[inline]
    pub fn cfg(&self) -> &CorrectionCfg {
        &self.cfg
    }

    /// Correct `polygon` with a drawn open polyline.
    pub fn apply_correction_line(&self, line: &Polyline, polygon: &Polygon) -> CorrectionResult {
        self.guarded("line", || {
            let outcome = apply_line(&self.engine, line, polygon, &self.cfg)?;
            Ok(self.finish(outcome, polygon))
        })
    }

    /// Classify a drawn closed polygon. A degenerate drawn polygon has no
    /// solid overlap and classifies as `EmptyArea`.
    pub fn analyze_drawn_polygon(&self, drawn: &Polygon, polygon: &Polygon) -> PolygonClass {
        let d = drawn.normalized_drawn();
        analyze_drawn_polygon(&self.engine, &d, polygon, &self.cfg)
    }

    /// Automatic path for a drawn closed polygon: union for empty area,
    /// difference for wholly inside, `NeedsConfirmation` otherwise.
    pub fn apply_correction_polygon(
        &self,
        drawn: &Polygon,
        polygon: &Polygon,
    ) -> CorrectionResult {
        self.guarded("polygon", || {
            match apply_polygon_auto(&self.engine, drawn, polygon, &self.cfg)? {
                AutoOutcome::Applied(outcome) => Ok(self.finish(outcome, polygon)),
                AutoOutcome::Ambiguous => Ok(CorrectionResult::NeedsConfirmation {
                    drawn_polygon: checked_drawn(drawn)?,
                    message: CHOOSE_ACTION.to_string(),
                }),
            }
        })
    }

    /// Apply a drawn closed polygon with the user's add/remove decision.
    pub fn apply_correction_polygon_with_choice(
        &self,
        drawn: &Polygon,
        polygon: &Polygon,
        choice: CorrectionChoice,
    ) -> CorrectionResult {
        self.guarded("polygon_choice", || {
            let outcome = apply_polygon_choice(&self.engine, drawn, polygon, choice, &self.cfg)?;
            Ok(self.finish(outcome, polygon))
        })
    }

    fn finish(&self, outcome: GeometryOutcome, old_polygon: &Polygon) -> CorrectionResult {
        let rec = find_partial_stands(
            &self.engine,
            &self.inventory,
            self.work_unit,
            old_polygon,
            &outcome.new_polygon,
            &outcome.added_pockets,
            &outcome.removed_pockets,
        );
        CorrectionResult::Success(CorrectionSuccess {
            new_polygon: outcome.new_polygon,
            message: outcome.message.to_string(),
            partial_stand_ids: rec.partial_stand_ids,
            stands_affected: rec.stands_affected,
            added_segment_paths: outcome.added_segment_paths,
            removed_segment_paths: outcome.removed_segment_paths,
            added_pockets: outcome.added_pockets,
            removed_pockets: outcome.removed_pockets,
            affected_area: outcome.affected_area,
            operation: outcome.operation,
            outside_side: outcome.outside_side,
        })
    }

    fn guarded<F>(&self, kind: &'static str, f: F) -> CorrectionResult
    where
        F: FnOnce() -> Result<CorrectionResult, CorrectionError>,
    {
        let result = match catch_unwind(AssertUnwindSafe(f)) {
            Ok(Ok(r)) => r,
            Ok(Err(e)) => CorrectionResult::failure(e.to_string()),
            Err(_) => {
                tracing::error!(kind, "geometry engine panicked");
                CorrectionResult::failure(CorrectionError::UpdateFailed.to_string())
            }
        };
        match &result {
            CorrectionResult::Success(s) => tracing::info!(
                kind,
                operation = ?s.operation,
                added = s.added_pockets.len(),
                removed = s.removed_pockets.len(),
                partial = s.partial_stand_ids.len(),
                affected = s.stands_affected.len(),
                "correction computed"
            ),
            CorrectionResult::Failure { message } => {
                tracing::info!(kind, %message, "correction rejected")
            }
            CorrectionResult::NeedsConfirmation { .. } => {
                tracing::info!(kind, "correction needs an add/remove decision")
            }
        }
        result
    }
}
