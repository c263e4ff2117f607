//! Boundary corrections for forest work units.
//!
//! A work unit is a polygon (possibly multipart, with holes) covering a set of
//! forest stands. This crate redraws that boundary from a freehand line or a
//! drawn polygon and works out which stands the new boundary adds, removes or
//! covers only in part.
//!
//! Layout
//! - `geom`: planar data model, local helpers, the `GeometryEngine` seam.
//! - `correction`: line and polygon corrections, `Corrector` entry points.
//! - `stands`: stand identity, inventory seam, reconciliation, pending drafts.
//! - `cfg`: fixed tolerances. `error`: error taxonomy.
//!
//! API Policy
//! - Everything operates in one planar working reference; reprojection is the
//!   caller's job.
//! - Results are whole new values. Nothing here mutates caller geometry.

pub mod api;
pub mod cfg;
pub mod correction;
pub mod error;
pub mod geom;
pub mod stands;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use correction::{CorrectionCfg, CorrectionResult, Corrector};
pub use error::{CorrectionError, InventoryError};
pub use geom::{Polygon, Polyline, Vec2};

/// Common imports for callers driving a correction.
pub mod prelude {
    pub use crate::correction::{
        CorrectionCfg, CorrectionChoice, CorrectionResult, CorrectionSuccess, Corrector,
        OperationType, PocketRule, PolygonClass,
    };
    pub use crate::geom::{GeoEngine, GeometryEngine, Polygon, Polyline, Ring, Side, Vec2};
    pub use crate::stands::{
        ForestId, MemoryInventory, PendingCorrection, Stand, StandInventory, StandKey, WorkUnit,
    };
}
