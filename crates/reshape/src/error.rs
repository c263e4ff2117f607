//! Error taxonomy of the correction core.
//!
//! Every variant is a terminal outcome for one computation; its `Display` text
//! is the message handed back to the user through `CorrectionResult::Failure`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrectionError {
    #[error("line must be open: it may not cross itself or close on itself")]
    LineNotOpen,
    #[error("line is degenerate: at least {min} distinct points are required")]
    DegenerateLine { min: usize },
    #[error("line does not intersect polygon")]
    NoIntersection,
    #[error("no valid segments found: make sure the line crosses the polygon boundary")]
    NoValidSegments,
    #[error("no changes made: make sure the line crosses the polygon boundary")]
    NoChanges,
    #[error("cannot remove entire work unit area")]
    WouldRemoveEverything,
    #[error("drawn polygon is degenerate: a closed ring with at least 3 vertices is required")]
    InvalidDrawnPolygon,
    #[error("error updating polygon")]
    UpdateFailed,
}

/// Failure of the stand inventory collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("stand inventory query failed: {0}")]
pub struct InventoryError(pub String);
