//! Tolerance defaults (working reference units, meters in practice).
//!
//! Policy
//! - Defaults are fixed constants; `CorrectionCfg` copies them and callers may
//!   override per computation.
//! - `NEGLIGIBLE_AREA` is absolute, not relative to the polygon size. It must be
//!   re-derived if the working reference is not meter based.

/// Distance within which a point counts as lying on a ring edge.
pub const BOUNDARY_TOL: f64 = 0.01;
/// A drawn line whose ends are this close is treated as a closed loop.
pub const CLOSED_LINE_TOL: f64 = 5.0;
/// Areas below this (unit²) count as zero.
pub const NEGLIGIBLE_AREA: f64 = 1.0;
/// Minimum distinct vertices of a drawn correction line.
pub const MIN_LINE_POINTS: usize = 4;

/// Parameter margin excluding near-endpoint touches in the self-crossing test.
pub(crate) const CROSS_PARAM_MARGIN: f64 = 0.001;
/// Determinant threshold for treating two segments as parallel.
pub(crate) const PARALLEL_EPS: f64 = 1e-10;
/// Tolerance for chaining clipped line fragments back onto the drawn line.
pub(crate) const CLIP_EPS: f64 = 1e-6;
/// Consecutive pocket vertices closer than this are merged.
pub(crate) const DEDUP_EPS: f64 = 1e-9;
