//! Blood domain: blood economy events.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::blood::meter::BloodBand;

/// A meter crossed a band threshold
#[derive(Debug, Clone, Copy)]
pub struct BloodBandChanged {
    pub entity: Entity,
    pub from: BloodBand,
    pub to: BloodBand,
}

impl Message for BloodBandChanged {}

#[derive(Debug, Clone, Copy)]
pub struct PickupCollectedEvent {
    pub collector: Entity,
    pub gained: f32,
}

impl Message for PickupCollectedEvent {}

#[derive(Debug, Clone, Copy)]
pub struct CheckpointReachedEvent {
    pub entity: Entity,
    pub checkpoint: Entity,
}

impl Message for CheckpointReachedEvent {}
