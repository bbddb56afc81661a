//! Objectives domain: tutorial task tracking plugin wiring and exports.

mod events;
mod systems;
mod tracker;

pub use events::TaskCompleted;
pub use tracker::{Objective, ObjectiveSignal, ObjectiveTracker};

use bevy::prelude::*;

use crate::combat::CombatSet;
use crate::core::GameState;
use crate::objectives::systems::{reset_objectives, track_objectives};

pub struct ObjectivesPlugin;

impl Plugin for ObjectivesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ObjectiveTracker>()
            .add_message::<TaskCompleted>()
            .add_systems(OnEnter(GameState::Playing), reset_objectives)
            .add_systems(Update, track_objectives.in_set(CombatSet::Aftermath));
    }
}
