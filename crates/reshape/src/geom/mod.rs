//! Planar geometry for boundary corrections.
//!
//! Purpose
//! - Hold the value types every correction stage passes around (`Ring`,
//!   `Polygon`, `Polyline`, `Side`) and the local planar helpers that do not
//!   need a geometry library (shoelace area, point/segment distance,
//!   segment crossing).
//! - Put the library-backed operations behind one trait, `GeometryEngine`, so
//!   the correction stages only say which call to make and in which order.
//!
//! Conventions
//! - One fixed planar reference; no reprojection happens here.
//! - Rings are closed; positive shoelace area = exterior, negative = hole.

mod engine;
pub mod rand;
mod split;
mod types;
mod util;

pub use engine::{from_geo, to_geo, GeoEngine, GeometryEngine};
pub use split::LineSplit;
pub use types::{Polygon, Polyline, Ring, Side, Vec2};
pub use util::{point_segment_distance, signed_ring_area};
pub(crate) use util::{dedup_consecutive, same_point, segments_cross};
