//! Partial-Stand Reconciler.
//!
//! Turns a geometric correction into stand-level deltas:
//! - added area: stands found there that are new to the work unit or only
//!   partly covered; previously partial stands that became whole or whose
//!   coverage changed;
//! - removed area: existing stands that are now partly covered, or no longer
//!   covered at all (marked `is_removed` for display);
//! - a final pass over every held stand collects the partial keys, so a stand
//!   touched by both an added and a removed pocket is classified once more
//!   against the final polygon.
//!
//! A stand is partial when it meets the polygon without being contained in it.
//! Touching along the boundary counts as meeting.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::geom::{GeometryEngine, Polygon};

use super::inventory::StandInventory;
use super::pending::WorkUnit;
use super::types::{Stand, StandKey};

/// Stand-level deltas of one correction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub partial_stand_ids: BTreeSet<StandKey>,
    /// One entry per stand key; a later decision replaces an earlier one.
    pub stands_affected: Vec<Stand>,
}

impl Reconciliation {
    fn record(&mut self, stand: Stand) {
        match self.stands_affected.iter_mut().find(|s| s.key == stand.key) {
            Some(slot) => *slot = stand,
            None => self.stands_affected.push(stand),
        }
    }

    fn has(&self, key: StandKey) -> bool {
        self.stands_affected.iter().any(|s| s.key == key)
    }
}

/// Stand meets `polygon` (boundary contact included) but is not contained in
/// it. A stand without geometry never is.
pub fn is_stand_partial<E: GeometryEngine + ?Sized>(
    engine: &E,
    stand: &Stand,
    polygon: &Polygon,
) -> bool {
    let Some(g) = &stand.geometry else {
        return false;
    };
    engine.intersects(polygon, g) && !engine.contains(polygon, g)
}

/// Reconcile the work unit's stands with a correction from `old_polygon` to
/// `new_polygon`. Inventory failures are logged; the stands of that pocket
/// group are then skipped.
pub fn find_partial_stands<E, I>(
    engine: &E,
    inventory: &I,
    work_unit: &WorkUnit,
    old_polygon: &Polygon,
    new_polygon: &Polygon,
    added_pockets: &[Polygon],
    removed_pockets: &[Polygon],
) -> Reconciliation
where
    E: GeometryEngine + ?Sized,
    I: StandInventory + ?Sized,
{
    let mut rec = Reconciliation::default();
    tracing::debug!(
        old_area = engine.area(old_polygon),
        new_area = engine.area(new_polygon),
        added = added_pockets.len(),
        removed = removed_pockets.len(),
        "reconciling stands"
    );

    if let Some(forest) = work_unit.forest {
        let existing = work_unit.existing_keys();

        if let Some(added) = engine.union_all(added_pockets) {
            match inventory.find_stands_intersecting(&added, forest) {
                Ok(found) => {
                    for stand in found {
                        let partial = is_stand_partial(engine, &stand, new_polygon);
                        if partial {
                            rec.partial_stand_ids.insert(stand.key);
                        }
                        let is_new = !existing.contains(&stand.key);
                        tracing::debug!(stand = %stand.key, is_new, partial, "stand in added area");
                        if is_new || partial {
                            rec.record(stand.with_partial(partial));
                        }
                    }
                }
                Err(e) => tracing::warn!(error = %e, "stands in added area skipped"),
            }

            for stand in work_unit.stands.iter().filter(|s| s.is_partial) {
                let Some(g) = &stand.geometry else { continue };
                if rec.has(stand.key) {
                    continue;
                }
                if !is_stand_partial(engine, stand, new_polygon) {
                    tracing::debug!(stand = %stand.key, "partial stand becomes whole");
                    rec.record(stand.with_partial(false));
                } else if engine.interiors_intersect(g, &added) {
                    tracing::debug!(stand = %stand.key, "partial stand coverage changed");
                    rec.partial_stand_ids.insert(stand.key);
                    rec.record(stand.with_partial(true));
                }
            }
        }

        if let Some(removed) = engine.union_all(removed_pockets) {
            match inventory.find_stands_intersecting(&removed, forest) {
                Ok(found) => {
                    for stand in found.iter().filter(|s| existing.contains(&s.key)) {
                        if is_stand_partial(engine, stand, new_polygon) {
                            rec.partial_stand_ids.insert(stand.key);
                            rec.record(stand.with_partial(true));
                        } else if !covered(engine, stand, new_polygon) {
                            tracing::debug!(stand = %stand.key, "stand removed from work unit");
                            rec.record(stand.marked_removed());
                        }
                    }
                }
                Err(e) => tracing::warn!(error = %e, "stands in removed area skipped"),
            }
        }
    } else {
        tracing::debug!("work unit has no forest; inventory not consulted");
    }

    for stand in work_unit.current_stands() {
        if is_stand_partial(engine, stand, new_polygon) {
            rec.partial_stand_ids.insert(stand.key);
        }
    }
    rec
}

fn covered<E: GeometryEngine + ?Sized>(engine: &E, stand: &Stand, polygon: &Polygon) -> bool {
    stand
        .geometry
        .as_ref()
        .is_some_and(|g| engine.interiors_intersect(polygon, g))
}
