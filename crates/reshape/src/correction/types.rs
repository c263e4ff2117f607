//! Configuration and result records of a correction computation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::cfg::{BOUNDARY_TOL, CLOSED_LINE_TOL, MIN_LINE_POINTS, NEGLIGIBLE_AREA};
use crate::geom::{Polygon, Polyline, Side};
use crate::stands::{Stand, StandKey};

/// How the line applier picks between two valid pocket candidates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PocketRule {
    /// Smaller absolute area wins; ties go to the forward-walk candidate.
    #[default]
    SmallerArea,
    /// Candidate on the side resolved from the first outside segment; falls
    /// back to `SmallerArea` when no side is known or the candidates agree.
    ResolvedSide,
}

/// Tolerances and thresholds of one correction computation.
///
/// Defaults assume a metre-based working reference; `negligible_area` is an
/// absolute value and has to be re-derived for other units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionCfg {
    /// Distance under which a point counts as lying on a polygon edge.
    pub boundary_tol: f64,
    /// A drawn line whose ends are this close is treated as closed.
    pub closed_line_tol: f64,
    /// Areas below this value count as zero.
    pub negligible_area: f64,
    /// Minimum number of distinct vertices in a drawn line.
    pub min_line_points: usize,
    pub pocket_rule: PocketRule,
}

impl Default for CorrectionCfg {
    fn default() -> Self {
        Self {
            boundary_tol: BOUNDARY_TOL,
            closed_line_tol: CLOSED_LINE_TOL,
            negligible_area: NEGLIGIBLE_AREA,
            min_line_points: MIN_LINE_POINTS,
            pocket_rule: PocketRule::SmallerArea,
        }
    }
}

/// Sub-path of the drawn line with both ends on the polygon boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub path: Polyline,
    /// Runs outside the polygon (adds area) rather than inside (removes area).
    pub is_outside: bool,
}

impl Segment {
    #[inline]
    pub fn start(&self) -> Option<crate::geom::Vec2> {
        self.path.start()
    }

    #[inline]
    pub fn end(&self) -> Option<crate::geom::Vec2> {
        self.path.end()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Add,
    Remove,
}

/// Explicit user decision for an ambiguous drawn polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionChoice {
    Add,
    Remove,
}

impl From<CorrectionChoice> for OperationType {
    fn from(c: CorrectionChoice) -> Self {
        match c {
            CorrectionChoice::Add => OperationType::Add,
            CorrectionChoice::Remove => OperationType::Remove,
        }
    }
}

/// Position of a drawn closed polygon relative to the work unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolygonClass {
    /// No solid overlap: outside every part or inside a hole. Auto union.
    EmptyArea,
    /// Inside the solid area and enclosing no hole. Auto difference.
    WhollyInside,
    /// Needs an explicit add/remove decision.
    Ambiguous,
}

/// Payload of a successful correction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrectionSuccess {
    pub new_polygon: Polygon,
    pub message: String,
    pub partial_stand_ids: BTreeSet<StandKey>,
    /// Stands with deltas, known on the wire as the stands list affected by
    /// the reshape line.
    #[serde(rename = "stands_list_affected_by_reshape_line")]
    pub stands_affected: Vec<Stand>,
    #[serde(default)]
    pub added_segment_paths: Vec<Polyline>,
    #[serde(default)]
    pub removed_segment_paths: Vec<Polyline>,
    #[serde(default)]
    pub added_pockets: Vec<Polygon>,
    #[serde(default)]
    pub removed_pockets: Vec<Polygon>,
    /// Drawn-polygon corrections: the area actually added or removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_area: Option<Polygon>,
    pub operation: OperationType,
    /// Line corrections: side of the drawn direction the outside pocket lies on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outside_side: Option<Side>,
}

/// Outcome of a correction entry point; consumers match on the variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CorrectionResult {
    Success(CorrectionSuccess),
    Failure { message: String },
    NeedsConfirmation { drawn_polygon: Polygon, message: String },
}

impl CorrectionResult {
    pub fn failure(message: impl Into<String>) -> Self {
        CorrectionResult::Failure {
            message: message.into(),
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, CorrectionResult::Success(_))
    }

    pub fn success(&self) -> Option<&CorrectionSuccess> {
        match self {
            CorrectionResult::Success(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_success(self) -> Option<CorrectionSuccess> {
        match self {
            CorrectionResult::Success(s) => Some(s),
            _ => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CorrectionResult::Success(s) => &s.message,
            CorrectionResult::Failure { message } => message,
            CorrectionResult::NeedsConfirmation { message, .. } => message,
        }
    }
}

/// Geometry produced by the line applier or polygon classifier, before the
/// stand reconciliation step.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct GeometryOutcome {
    pub new_polygon: Polygon,
    pub added_segment_paths: Vec<Polyline>,
    pub removed_segment_paths: Vec<Polyline>,
    pub added_pockets: Vec<Polygon>,
    pub removed_pockets: Vec<Polygon>,
    pub affected_area: Option<Polygon>,
    pub operation: OperationType,
    pub outside_side: Option<Side>,
    pub message: &'static str,
}
