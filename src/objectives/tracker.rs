//! Objectives domain: progress tracking for tutorial tasks.

use bevy::prelude::*;
use serde::Serialize;

use crate::blood::BloodBand;
use crate::content::{ObjectiveCatalog, ObjectiveKind};

/// Something that happened in the arena that objectives may count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveSignal {
    EnemyDefeated,
    PickupCollected,
    BloodBandReached(BloodBand),
    CheckpointReached,
}

#[derive(Debug, Clone, Serialize)]
pub struct Objective {
    pub id: String,
    pub label: String,
    pub kind: ObjectiveKind,
    pub progress: u32,
    pub completed: bool,
}

impl Objective {
    /// Progress needed to complete
    pub fn target(&self) -> u32 {
        match self.kind {
            ObjectiveKind::DefeatEnemies { count } | ObjectiveKind::CollectPickups { count } => {
                count.max(1)
            }
            ObjectiveKind::ReachBloodBand { .. } | ObjectiveKind::ReachCheckpoint => 1,
        }
    }

    fn counts(&self, signal: ObjectiveSignal) -> bool {
        match (self.kind, signal) {
            (ObjectiveKind::DefeatEnemies { .. }, ObjectiveSignal::EnemyDefeated) => true,
            (ObjectiveKind::CollectPickups { .. }, ObjectiveSignal::PickupCollected) => true,
            (ObjectiveKind::ReachBloodBand { band }, ObjectiveSignal::BloodBandReached(reached)) => {
                reached >= band
            }
            (ObjectiveKind::ReachCheckpoint, ObjectiveSignal::CheckpointReached) => true,
            _ => false,
        }
    }

    /// Count a signal. Returns true only on the call that completes it.
    pub fn observe(&mut self, signal: ObjectiveSignal) -> bool {
        if self.completed || !self.counts(signal) {
            return false;
        }
        self.progress = (self.progress + 1).min(self.target());
        if self.progress >= self.target() {
            self.completed = true;
            return true;
        }
        false
    }

    pub fn hud_line(&self) -> String {
        let mark = if self.completed { "[x]" } else { "[ ]" };
        if self.target() > 1 {
            format!("{} {} ({}/{})", mark, self.label, self.progress, self.target())
        } else {
            format!("{} {}", mark, self.label)
        }
    }
}

/// Live objective state for the current attempt.
#[derive(Resource, Debug, Default, Serialize)]
pub struct ObjectiveTracker {
    objectives: Vec<Objective>,
}

impl ObjectiveTracker {
    pub fn from_catalog(catalog: &ObjectiveCatalog) -> Self {
        Self {
            objectives: catalog
                .0
                .iter()
                .map(|def| Objective {
                    id: def.id.clone(),
                    label: def.label.clone(),
                    kind: def.kind,
                    progress: 0,
                    completed: false,
                })
                .collect(),
        }
    }

    /// Feed a signal to every objective; returns the ones it completed.
    pub fn observe(&mut self, signal: ObjectiveSignal) -> Vec<Objective> {
        self.objectives
            .iter_mut()
            .filter_map(|objective| objective.observe(signal).then(|| objective.clone()))
            .collect()
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    pub fn completed_count(&self) -> usize {
        self.objectives.iter().filter(|o| o.completed).count()
    }

    pub fn all_complete(&self) -> bool {
        self.objectives.iter().all(|o| o.completed)
    }
}
