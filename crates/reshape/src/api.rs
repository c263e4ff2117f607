//! Curated surface for the CLI and other in-workspace callers (UNSTABLE).
//!
//! Important
//! - Not a stable public API; re-exports move when the modules move.
//! - Prefer these names over reaching into submodules.

// Data model and geometry seam
pub use crate::geom::{
    from_geo, point_segment_distance, signed_ring_area, to_geo, GeoEngine, GeometryEngine,
    LineSplit, Polygon, Polyline, Ring, Side, Vec2,
};
// Fixtures
pub use crate::geom::rand::{
    draw_gesture, draw_work_unit, regular_ring, Gesture, GestureKind, RadialCfg, ReplayToken,
    VertexCount,
};
// Correction stages and entry points
pub use crate::correction::{
    analyze_drawn_polygon, build_pockets, classify_segments, create_pocket,
    find_boundary_paths_both, find_edge_index, find_outside_pocket_and_side,
    find_ring_containing_point, is_closed_line, is_point_on_boundary, is_self_intersecting,
    resolve_outside_side, user_polygon_contains_hole, validate_line, BoundaryPaths,
    CorrectionCfg, CorrectionChoice, CorrectionResult, CorrectionSuccess, Corrector,
    OperationType, PocketCandidates, PocketRule, PolygonClass, ResolvedSide, Segment,
};
// Stands
pub use crate::stands::{
    find_partial_stands, is_stand_partial, ConfirmSummary, ForestId, MemoryInventory,
    PendingCorrection, Reconciliation, Stand, StandInventory, StandKey, WorkUnit,
};
pub use crate::error::{CorrectionError, InventoryError};
