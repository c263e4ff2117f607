//! Stand inventory collaborator.

use crate::error::InventoryError;
use crate::geom::{GeoEngine, GeometryEngine, Polygon};

use super::types::{ForestId, Stand};

/// Source of stand records (a feature service in production).
pub trait StandInventory {
    /// Stands of `forest` whose area overlaps `area`.
    fn find_stands_intersecting(
        &self,
        area: &Polygon,
        forest: ForestId,
    ) -> Result<Vec<Stand>, InventoryError>;
}

impl<T: StandInventory + ?Sized> StandInventory for &T {
    fn find_stands_intersecting(
        &self,
        area: &Polygon,
        forest: ForestId,
    ) -> Result<Vec<Stand>, InventoryError> {
        (**self).find_stands_intersecting(area, forest)
    }
}

/// In-memory inventory; filters by forest and area overlap.
#[derive(Clone, Debug, Default)]
pub struct MemoryInventory<E = GeoEngine> {
    engine: E,
    stands: Vec<Stand>,
}

impl MemoryInventory<GeoEngine> {
    pub fn new(stands: Vec<Stand>) -> Self {
        Self {
            engine: GeoEngine,
            stands,
        }
    }
}

impl<E> MemoryInventory<E> {
    pub fn with_engine(engine: E, stands: Vec<Stand>) -> Self {
        Self { engine, stands }
    }

    pub fn stands(&self) -> &[Stand] {
        &self.stands
    }
}

impl<E: GeometryEngine> StandInventory for MemoryInventory<E> {
    fn find_stands_intersecting(
        &self,
        area: &Polygon,
        forest: ForestId,
    ) -> Result<Vec<Stand>, InventoryError> {
        Ok(self
            .stands
            .iter()
            .filter(|s| s.forest == forest)
            .filter(|s| {
                s.geometry
                    .as_ref()
                    .is_some_and(|g| self.engine.interiors_intersect(area, g))
            })
            .map(|s| s.with_partial(false))
            .collect())
    }
}
