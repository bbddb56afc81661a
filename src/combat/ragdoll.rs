//! Combat domain: dead bodies go limp.
//!
//! Components that drive a living body implement [`RagdollDisable`] and get
//! a `disable_on_death::<T>` system registered, so nothing needs to know
//! which behaviours an entity happens to carry.

use avian2d::prelude::*;
use bevy::ecs::component::Mutable;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::combat::combo::ComboMachine;
use crate::combat::components::{HitboxLink, NavAgent};
use crate::combat::events::DeathEvent;
use crate::combat::hit_detection::{AttackHitbox, close_hitbox};

/// Behaviour that must stop once its entity becomes a ragdoll
pub trait RagdollDisable {
    fn disable_for_ragdoll(&mut self);
}

impl RagdollDisable for ComboMachine {
    fn disable_for_ragdoll(&mut self) {
        self.disable();
    }
}

impl RagdollDisable for NavAgent {
    fn disable_for_ragdoll(&mut self) {
        self.enabled = false;
        self.stop();
    }
}

/// Marks a body that has switched to ragdoll physics
#[derive(Component, Debug)]
pub struct Ragdoll;

const RAGDOLL_SPIN: f32 = 6.0;
const RAGDOLL_DAMPING: f32 = 4.0;

pub(crate) fn disable_on_death<T>(
    mut death_events: MessageReader<DeathEvent>,
    mut query: Query<&mut T>,
) where
    T: Component<Mutability = Mutable> + RagdollDisable,
{
    for event in death_events.read() {
        if let Ok(mut behaviour) = query.get_mut(event.entity) {
            behaviour.disable_for_ragdoll();
        }
    }
}

pub(crate) fn enter_ragdoll(
    mut commands: Commands,
    mut death_events: MessageReader<DeathEvent>,
    mut bodies: Query<(&RigidBody, Option<&HitboxLink>, Option<&LinearVelocity>), Without<Ragdoll>>,
    mut hitboxes: Query<&mut AttackHitbox>,
) {
    for event in death_events.read() {
        let Ok((_body, link, velocity)) = bodies.get_mut(event.entity) else {
            continue;
        };

        if let Some(HitboxLink(hitbox_entity)) = link {
            if let Ok(mut hitbox) = hitboxes.get_mut(*hitbox_entity) {
                close_hitbox(&mut commands, *hitbox_entity, &mut hitbox);
            }
        }

        commands.entity(event.entity).insert(RigidBody::Dynamic);
        let spin = velocity
            .map(|v| v.x.signum() * -RAGDOLL_SPIN)
            .unwrap_or(RAGDOLL_SPIN);
        commands.entity(event.entity).insert((
            Ragdoll,
            LockedAxes::new(),
            AngularVelocity(spin),
            LinearDamping(RAGDOLL_DAMPING),
            AngularDamping(RAGDOLL_DAMPING),
        ));
        debug!("{:?} switched to ragdoll", event.entity);
    }
}
