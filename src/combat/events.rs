//! Combat domain: combat-related events.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::combat::components::AttackStrength;

/// An open hitbox accepted a new target
#[derive(Debug, Clone, Copy)]
pub struct HitEvent {
    pub attacker: Entity,
    pub target: Entity,
    pub hitbox: Entity,
    pub strength: AttackStrength,
}

impl Message for HitEvent {}

#[derive(Debug, Clone, Copy)]
pub struct DamageEvent {
    pub source: Entity,
    pub target: Entity,
    pub amount: f32,
    pub strength: AttackStrength,
}

impl Message for DamageEvent {}

#[derive(Debug, Clone, Copy)]
pub struct DeathEvent {
    pub entity: Entity,
    pub killer: Entity,
}

impl Message for DeathEvent {}

/// A hitstun was accepted by the target's combo machine
#[derive(Debug, Clone, Copy)]
pub struct StunAppliedEvent {
    pub entity: Entity,
    pub duration: f32,
}

impl Message for StunAppliedEvent {}

/// The animation driver should play a damage reaction
#[derive(Debug, Clone, Copy)]
pub struct ReactionTriggeredEvent {
    pub entity: Entity,
    pub strength: AttackStrength,
}

impl Message for ReactionTriggeredEvent {}
