//! Work unit state and the single pending (drawn but unconfirmed) correction.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::correction::{CorrectionResult, CorrectionSuccess, OperationType};
use crate::geom::Polygon;

use super::types::{ForestId, Stand, StandKey};

/// A computed correction awaiting confirmation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingCorrection {
    pub new_polygon: Polygon,
    pub partial_stand_ids: BTreeSet<StandKey>,
    #[serde(rename = "stands_list_affected_by_reshape_line")]
    pub stands_affected: Vec<Stand>,
    pub operation: OperationType,
}

impl From<&CorrectionSuccess> for PendingCorrection {
    fn from(s: &CorrectionSuccess) -> Self {
        Self {
            new_polygon: s.new_polygon.clone(),
            partial_stand_ids: s.partial_stand_ids.clone(),
            stands_affected: s.stands_affected.clone(),
            operation: s.operation,
        }
    }
}

/// Counts reported by `WorkUnit::confirm_pending`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmSummary {
    pub added: usize,
    pub removed: usize,
    pub partial: usize,
}

/// The merged parcel set being edited.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkUnit {
    #[serde(default)]
    pub forest: Option<ForestId>,
    #[serde(default)]
    pub polygon: Option<Polygon>,
    #[serde(default)]
    pub stands: Vec<Stand>,
    /// Stands selected for addition but not yet merged into `stands`.
    #[serde(default)]
    pub stands_to_add: Vec<Stand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pending: Option<PendingCorrection>,
}

impl WorkUnit {
    pub fn new(forest: Option<ForestId>, polygon: Option<Polygon>) -> Self {
        Self {
            forest,
            polygon,
            ..Self::default()
        }
    }

    pub fn with_stands(mut self, stands: Vec<Stand>) -> Self {
        self.stands = stands;
        self
    }

    /// Keys of held and staged-to-add stands.
    pub fn existing_keys(&self) -> BTreeSet<StandKey> {
        self.current_stands().map(|s| s.key).collect()
    }

    pub fn current_stands(&self) -> impl Iterator<Item = &Stand> {
        self.stands.iter().chain(self.stands_to_add.iter())
    }

    #[inline]
    pub fn pending(&self) -> Option<&PendingCorrection> {
        self.pending.as_ref()
    }

    /// Stage a draft, discarding any previous one (returned).
    pub fn stage(&mut self, pending: PendingCorrection) -> Option<PendingCorrection> {
        tracing::debug!(
            operation = ?pending.operation,
            affected = pending.stands_affected.len(),
            "correction staged"
        );
        self.pending.replace(pending)
    }

    /// Stage the result if it is a success; returns whether it was staged.
    pub fn stage_result(&mut self, result: &CorrectionResult) -> bool {
        match result.success() {
            Some(s) => {
                self.stage(PendingCorrection::from(s));
                true
            }
            None => false,
        }
    }

    pub fn cancel_pending(&mut self) -> Option<PendingCorrection> {
        let dropped = self.pending.take();
        if dropped.is_some() {
            tracing::debug!("pending correction cancelled");
        }
        dropped
    }

    /// Apply the draft to the stand lists and the polygon. `None` when nothing
    /// is pending.
    pub fn confirm_pending(&mut self) -> Option<ConfirmSummary> {
        let pending = self.pending.take()?;
        let (removed, kept): (Vec<&Stand>, Vec<&Stand>) =
            pending.stands_affected.iter().partition(|s| s.is_removed);
        let removed_keys: BTreeSet<StandKey> = removed.iter().map(|s| s.key).collect();
        let held_keys: BTreeSet<StandKey> = self.stands.iter().map(|s| s.key).collect();

        let before = self.stands.len();
        self.stands.retain(|s| !removed_keys.contains(&s.key));
        let dropped = before - self.stands.len();
        for s in &mut self.stands {
            s.is_partial = pending.partial_stand_ids.contains(&s.key);
        }
        for s in &mut self.stands_to_add {
            if pending.partial_stand_ids.contains(&s.key) {
                s.is_partial = true;
            }
        }
        let fresh: Vec<Stand> = kept
            .into_iter()
            .filter(|s| !held_keys.contains(&s.key))
            .cloned()
            .collect();
        let added = fresh.len();
        self.stands.extend(fresh);
        self.polygon = Some(pending.new_polygon);

        let summary = ConfirmSummary {
            added,
            removed: dropped,
            partial: self.stands.iter().filter(|s| s.is_partial).count(),
        };
        tracing::info!(?summary, "correction confirmed");
        Some(summary)
    }
}
