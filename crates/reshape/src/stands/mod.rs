//! Stands (forest parcels) and their reconciliation with a corrected boundary.
//!
//! Purpose
//! - Stand identity as a value (`StandKey`), the inventory seam
//!   (`StandInventory`) and an in-memory implementation.
//! - The Partial-Stand Reconciler: which stands a correction adds, removes or
//!   leaves partly covered.
//! - The work unit's pending-correction lifecycle (stage, cancel, confirm).

mod inventory;
mod pending;
mod reconcile;
mod types;

pub use inventory::{MemoryInventory, StandInventory};
pub use pending::{ConfirmSummary, PendingCorrection, WorkUnit};
pub use reconcile::{find_partial_stands, is_stand_partial, Reconciliation};
pub use types::{ForestId, ParseStandKeyError, Stand, StandKey};

#[cfg(test)]
mod tests;
