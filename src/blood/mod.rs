//! Blood domain: withdrawal meter plugin wiring and public exports.

mod events;
mod meter;
mod systems;


pub use events::{BloodBandChanged, CheckpointReachedEvent, PickupCollectedEvent};
pub use meter::{
    BloodBand, BloodMeter, BloodPickup, Checkpoint, spawn_blood_pickup, spawn_checkpoint,
};

use bevy::prelude::*;

use crate::blood::systems::{collect_pickups, detect_band_changes, drain_blood, reach_checkpoints};
use crate::combat::CombatSet;

pub struct BloodPlugin;

impl Plugin for BloodPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<BloodBandChanged>()
            .add_message::<PickupCollectedEvent>()
            .add_message::<CheckpointReachedEvent>()
            .add_systems(
                Update,
                (collect_pickups, reach_checkpoints).in_set(CombatSet::Detect),
            )
            .add_systems(Update, drain_blood.in_set(CombatSet::Apply))
            .add_systems(Update, detect_band_changes.in_set(CombatSet::Aftermath));
    }
}
