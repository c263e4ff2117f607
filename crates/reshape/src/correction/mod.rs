//! Boundary correction of a work-unit polygon from a drawn line or polygon.
//!
//! Purpose
//! - Open polyline: split it against the polygon, close every boundary-to-
//!   boundary piece with a walk along the ring into a pocket, and union
//!   (outside pieces) or subtract (inside pieces) the pockets in order.
//! - Closed polygon: classify it against the polygon and either apply the
//!   deterministic action or ask for an add/remove decision.
//! - `Corrector` ties both to the stand reconciler and returns one
//!   `CorrectionResult`.
//!
//! Stages
//! - `boundary`: ring lookup and the two boundary walks.
//! - `classify`: line validation and segment tagging.
//! - `pocket`: pocket candidates. `side`: orientation of the gesture.
//! - `line`: the segment fold. `polygon`: drawn-polygon classification.
//! - `facade`: entry points.

mod boundary;
mod classify;
mod facade;
mod line;
mod pocket;
mod polygon;
mod side;
mod types;

pub use boundary::{
    find_boundary_paths_both, find_edge_index, find_ring_containing_point, is_point_on_boundary,
    BoundaryPaths,
};
pub use classify::{classify_segments, is_closed_line, is_self_intersecting, validate_line};
pub use facade::Corrector;
pub use pocket::{build_pockets, create_pocket, Candidate, PocketCandidates};
pub use polygon::{analyze_drawn_polygon, user_polygon_contains_hole};
pub use side::{find_outside_pocket_and_side, resolve_outside_side, ResolvedSide};
pub use types::{
    CorrectionCfg, CorrectionChoice, CorrectionResult, CorrectionSuccess, OperationType,
    PocketRule, PolygonClass, Segment,
};
