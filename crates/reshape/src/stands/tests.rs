use super::*;
use crate::correction::{CorrectionChoice, Corrector, OperationType};
use crate::error::InventoryError;
use crate::geom::{GeoEngine, GeometryEngine, Polygon, Polyline, Vec2};
use proptest::prelude::*;

const FOREST: ForestId = ForestId(7);

fn key(c: u32, s: u32) -> StandKey {
    StandKey::new(c, s)
}

fn stand(c: u32, s: u32, geometry: Polygon) -> Stand {
    Stand::new(FOREST, key(c, s), Some(geometry))
}

fn square() -> Polygon {
    Polygon::rect(0.0, 0.0, 100.0, 100.0)
}

fn strip_line() -> Polyline {
    Polyline::new(vec![
        Vec2::new(100.0, 0.0),
        Vec2::new(110.0, 0.0),
        Vec2::new(110.0, 100.0),
        Vec2::new(100.0, 100.0),
    ])
}

/// Work unit over the 100×100 square with two held stands.
fn unit() -> WorkUnit {
    WorkUnit::new(Some(FOREST), Some(square())).with_stands(vec![
        stand(1, 1, Polygon::rect(0.0, 0.0, 50.0, 100.0)),
        stand(1, 2, Polygon::rect(50.0, 0.0, 100.0, 100.0)),
    ])
}

fn inventory() -> MemoryInventory {
    MemoryInventory::new(vec![
        stand(1, 1, Polygon::rect(0.0, 0.0, 50.0, 100.0)),
        stand(1, 2, Polygon::rect(50.0, 0.0, 100.0, 100.0)),
        // east neighbours
        stand(2, 1, Polygon::rect(100.0, 0.0, 110.0, 50.0)),
        stand(2, 2, Polygon::rect(100.0, 50.0, 130.0, 100.0)),
        // inside the unit's area but not held by it
        stand(4, 1, Polygon::rect(80.0, 0.0, 100.0, 20.0)),
        // same geometry, other forest
        Stand::new(ForestId(8), key(9, 9), Some(Polygon::rect(100.0, 0.0, 110.0, 100.0))),
    ])
}

#[test]
fn stand_key_text_form() {
    let k = key(12, 3);
    assert_eq!(k.to_string(), "12-3");
    assert_eq!("12-3".parse::<StandKey>(), Ok(k));
    assert_eq!(" 4 - 5 ".parse::<StandKey>(), Ok(key(4, 5)));
    assert!("12".parse::<StandKey>().is_err());
    assert!("a-b".parse::<StandKey>().is_err());
    // identity ignores server ids
    let mut a = stand(1, 1, square());
    a.object_id = Some(10);
    let mut b = a.clone();
    b.object_id = Some(99);
    assert_eq!(a.key, b.key);
}

#[test]
fn memory_inventory_filters_forest_and_overlap() {
    let inv = inventory();
    let found = inv
        .find_stands_intersecting(&Polygon::rect(100.0, 0.0, 110.0, 100.0), FOREST)
        .unwrap();
    let keys: Vec<_> = found.iter().map(|s| s.key).collect();
    // 1-2 only touches the strip along x = 100
    assert_eq!(keys, vec![key(2, 1), key(2, 2)]);
    assert!(found.iter().all(|s| !s.is_partial && !s.is_removed));
}

#[test]
fn partial_means_overlap_without_containment() {
    let e = GeoEngine;
    let w = square();
    assert!(!is_stand_partial(&e, &stand(1, 1, Polygon::rect(0.0, 0.0, 50.0, 50.0)), &w));
    assert!(is_stand_partial(&e, &stand(1, 1, Polygon::rect(90.0, 0.0, 120.0, 50.0)), &w));
    // edge contact alone
    assert!(is_stand_partial(&e, &stand(1, 1, Polygon::rect(100.0, 0.0, 120.0, 50.0)), &w));
    assert!(!is_stand_partial(&e, &stand(1, 1, Polygon::rect(101.0, 0.0, 120.0, 50.0)), &w));
    assert!(!is_stand_partial(&e, &Stand::new(FOREST, key(1, 1), None), &w));
}

#[test]
fn stand_touching_the_new_edge_is_partial() {
    let mut wu = unit();
    // held, east of the strip; meets the new boundary along x = 110
    wu.stands.push(stand(3, 1, Polygon::rect(110.0, 0.0, 130.0, 20.0)));
    let c = Corrector::new(GeoEngine, MemoryInventory::new(Vec::new()), &wu);
    let s = c.apply_correction_line(&strip_line(), &square()).into_success().unwrap();
    assert!(s.partial_stand_ids.contains(&key(3, 1)));
    assert!(!s.partial_stand_ids.contains(&key(1, 2)));
}

#[test]
fn added_strip_reports_new_and_partial_stands() {
    let wu = unit();
    let c = Corrector::new(GeoEngine, inventory(), &wu);
    let s = c.apply_correction_line(&strip_line(), &square()).into_success().unwrap();

    // 2-1 lies wholly in the strip; 2-2 reaches past it
    let ids: Vec<_> = s.partial_stand_ids.iter().copied().collect();
    assert_eq!(ids, vec![key(2, 2)]);
    assert_eq!(s.stands_affected.len(), 2);
    let find = |k| s.stands_affected.iter().find(|st| st.key == k).unwrap();
    assert!(!find(key(2, 1)).is_partial);
    assert!(find(key(2, 2)).is_partial);
    assert!(s.stands_affected.iter().all(|st| !st.is_removed));
}

#[test]
fn previously_partial_stand_becomes_whole() {
    let mut wu = unit();
    let mut edge = stand(3, 1, Polygon::rect(90.0, 20.0, 110.0, 30.0));
    edge.is_partial = true;
    wu.stands.push(edge);
    let c = Corrector::new(GeoEngine, MemoryInventory::new(Vec::new()), &wu);
    let s = c.apply_correction_line(&strip_line(), &square()).into_success().unwrap();
    let restored = s.stands_affected.iter().find(|st| st.key == key(3, 1)).unwrap();
    assert!(!restored.is_partial);
    assert!(!s.partial_stand_ids.contains(&key(3, 1)));
}

#[test]
fn removal_marks_partial_and_removed_stands() {
    let wu = unit();
    let c = Corrector::new(GeoEngine, inventory(), &wu);
    // removes the whole of 1-1 and a corner of 1-2
    let cut = Polygon::rect(-10.0, -10.0, 60.0, 110.0);
    let s = c
        .apply_correction_polygon_with_choice(&cut, &square(), CorrectionChoice::Remove)
        .into_success()
        .unwrap();
    assert_eq!(s.operation, OperationType::Remove);
    let gone = s.stands_affected.iter().find(|st| st.key == key(1, 1)).unwrap();
    assert!(gone.is_removed);
    let cut_stand = s.stands_affected.iter().find(|st| st.key == key(1, 2)).unwrap();
    assert!(cut_stand.is_partial && !cut_stand.is_removed);
    assert!(s.partial_stand_ids.contains(&key(1, 2)));
    assert!(!s.partial_stand_ids.contains(&key(1, 1)));
}

#[test]
fn removal_ignores_stands_outside_the_unit() {
    let wu = unit();
    let c = Corrector::new(GeoEngine, inventory(), &wu);
    let cut = Polygon::rect(90.0, 0.0, 120.0, 40.0);
    let s = c
        .apply_correction_polygon_with_choice(&cut, &square(), CorrectionChoice::Remove)
        .into_success()
        .unwrap();
    // 4-1 lies in the removed area but never belonged to the unit
    assert!(s.stands_affected.iter().all(|st| st.key != key(4, 1)));
    assert!(!s.partial_stand_ids.contains(&key(4, 1)));
    assert!(s.partial_stand_ids.contains(&key(1, 2)));
}

struct DownInventory;

impl StandInventory for DownInventory {
    fn find_stands_intersecting(
        &self,
        _: &Polygon,
        _: ForestId,
    ) -> Result<Vec<Stand>, InventoryError> {
        Err(InventoryError("service unavailable".into()))
    }
}

#[test]
fn inventory_failure_keeps_the_correction() {
    let wu = unit();
    let c = Corrector::new(GeoEngine, DownInventory, &wu);
    let s = c.apply_correction_line(&strip_line(), &square()).into_success().unwrap();
    assert!(s.stands_affected.is_empty());
    assert!((GeoEngine.area(&s.new_polygon) - 11000.0).abs() < 1e-6);
}

#[test]
fn no_forest_skips_the_inventory() {
    let mut wu = unit();
    wu.forest = None;
    let c = Corrector::new(GeoEngine, inventory(), &wu);
    let s = c.apply_correction_line(&strip_line(), &square()).into_success().unwrap();
    assert!(s.stands_affected.is_empty());
    assert!(s.partial_stand_ids.is_empty());
}

#[test]
fn confirm_applies_the_draft() {
    let mut wu = unit();
    let cut = Polygon::rect(-10.0, -10.0, 60.0, 110.0);
    let result = {
        let c = Corrector::new(GeoEngine, inventory(), &wu);
        c.apply_correction_polygon_with_choice(&cut, &square(), CorrectionChoice::Remove)
    };
    assert!(wu.stage_result(&result));
    assert!(wu.pending().is_some());

    let summary = wu.confirm_pending().unwrap();
    assert_eq!(summary.removed, 1);
    assert_eq!(summary.added, 0);
    assert_eq!(summary.partial, 1);
    let keys: Vec<_> = wu.stands.iter().map(|s| s.key).collect();
    assert_eq!(keys, vec![key(1, 2)]);
    assert!(wu.stands[0].is_partial);
    assert!((GeoEngine.area(wu.polygon.as_ref().unwrap()) - 4000.0).abs() < 1e-6);
    assert!(wu.pending().is_none());
    assert!(wu.confirm_pending().is_none());
}

#[test]
fn confirm_appends_new_stands_once() {
    let mut wu = unit();
    wu.stands_to_add.push(stand(2, 2, Polygon::rect(100.0, 50.0, 130.0, 100.0)));
    let result = {
        let c = Corrector::new(GeoEngine, inventory(), &wu);
        c.apply_correction_line(&strip_line(), &square())
    };
    wu.stage_result(&result);
    let summary = wu.confirm_pending().unwrap();
    // 2-1 and 2-2 are not held yet; both are appended
    assert_eq!(summary.added, 2);
    assert!(wu.stands_to_add[0].is_partial);
    let held: Vec<_> = wu.stands.iter().map(|s| s.key).collect();
    assert_eq!(held, vec![key(1, 1), key(1, 2), key(2, 1), key(2, 2)]);
}

#[test]
fn staging_replaces_and_cancel_discards() {
    let mut wu = unit();
    let first = PendingCorrection {
        new_polygon: square(),
        partial_stand_ids: Default::default(),
        stands_affected: Vec::new(),
        operation: OperationType::Add,
    };
    let second = PendingCorrection {
        operation: OperationType::Remove,
        ..first.clone()
    };
    assert!(wu.stage(first.clone()).is_none());
    assert_eq!(wu.stage(second.clone()), Some(first));
    assert_eq!(wu.cancel_pending(), Some(second));
    assert!(wu.cancel_pending().is_none());
    assert!(!wu.stage_result(&crate::correction::CorrectionResult::failure("nope")));
    assert_eq!(wu.polygon, Some(square()));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn partial_ids_exclude_contained_and_include_overlapping(
        x0 in -50.0f64..140.0,
        y0 in -50.0f64..140.0,
        w in 5.0f64..60.0,
        h in 5.0f64..60.0,
    ) {
        let e = GeoEngine;
        let extra = stand(5, 5, Polygon::rect(x0, y0, x0 + w, y0 + h));
        let mut wu = unit();
        wu.stands.push(extra.clone());
        let c = Corrector::new(GeoEngine, inventory(), &wu);
        let s = c.apply_correction_line(&strip_line(), &square()).into_success().unwrap();
        let g = extra.geometry.as_ref().unwrap();
        if e.contains(&s.new_polygon, g) {
            prop_assert!(!s.partial_stand_ids.contains(&extra.key));
        } else if e.interiors_intersect(&s.new_polygon, g) {
            prop_assert!(s.partial_stand_ids.contains(&extra.key));
        }
    }
}
