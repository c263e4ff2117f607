//! Stand (parcel) identity and record.
//!
//! Identity is the composite `(compartment, stand)` value. Server object ids are
//! carried for display only; they change across cache refreshes and are never
//! compared.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geom::Polygon;

/// Forest the work unit belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForestId(pub u32);

/// Composite stand key, rendered as `"<compartment>-<stand>"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StandKey {
    pub compartment: u32,
    pub stand: u32,
}

impl StandKey {
    #[inline]
    pub fn new(compartment: u32, stand: u32) -> Self {
        Self { compartment, stand }
    }
}

impl fmt::Display for StandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.compartment, self.stand)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stand key {0:?}: expected \"<compartment>-<stand>\"")]
pub struct ParseStandKeyError(String);

impl FromStr for StandKey {
    type Err = ParseStandKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseStandKeyError(s.to_string());
        let (c, st) = s.split_once('-').ok_or_else(err)?;
        Ok(StandKey {
            compartment: c.trim().parse().map_err(|_| err())?,
            stand: st.trim().parse().map_err(|_| err())?,
        })
    }
}

/// Stand record as returned by the inventory and held by a work unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stand {
    #[serde(flatten)]
    pub key: StandKey,
    pub forest: ForestId,
    #[serde(default)]
    pub forest_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Polygon>,
    /// Only part of the stand lies inside the work-unit polygon.
    #[serde(default)]
    pub is_partial: bool,
    /// Display marker: the stand leaves the work unit when the draft is confirmed.
    #[serde(default)]
    pub is_removed: bool,
}

impl Stand {
    pub fn new(forest: ForestId, key: StandKey, geometry: Option<Polygon>) -> Self {
        Self {
            key,
            forest,
            forest_name: String::new(),
            object_id: None,
            geometry,
            is_partial: false,
            is_removed: false,
        }
    }

    /// Copy with the partial flag set and the removal marker cleared.
    pub fn with_partial(&self, is_partial: bool) -> Stand {
        Stand {
            is_partial,
            is_removed: false,
            ..self.clone()
        }
    }

    /// Copy marked as wholly removed.
    pub fn marked_removed(&self) -> Stand {
        Stand {
            is_partial: false,
            is_removed: true,
            ..self.clone()
        }
    }
}
