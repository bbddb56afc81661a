//! Blood domain: withdrawal drain, band tracking, pickups and checkpoints.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::blood::events::{BloodBandChanged, CheckpointReachedEvent, PickupCollectedEvent};
use crate::blood::meter::{BloodMeter, BloodPickup, Checkpoint, SPENT_CHECKPOINT_COLOR};
use crate::combat::Health;
use crate::content::CombatDefaults;

/// Pair every collision with both orderings so sensors can sit on either side.
fn sensor_pairs(event: &CollisionStart) -> [(Entity, Entity); 2] {
    [
        (event.collider1, event.body2.unwrap_or(event.collider2)),
        (event.collider2, event.body1.unwrap_or(event.collider1)),
    ]
}

pub(crate) fn drain_blood(
    time: Res<Time>,
    defaults: Res<CombatDefaults>,
    mut query: Query<(&mut BloodMeter, Option<&Health>)>,
) {
    let amount = defaults.blood.drain_per_second * time.delta_secs();
    for (mut meter, health) in &mut query {
        if health.is_some_and(Health::is_dead) {
            continue;
        }
        meter.drain(amount);
    }
}

pub(crate) fn detect_band_changes(
    defaults: Res<CombatDefaults>,
    mut band_events: MessageWriter<BloodBandChanged>,
    mut query: Query<(Entity, &mut BloodMeter)>,
) {
    for (entity, mut meter) in &mut query {
        if let Some((from, to)) = meter.refresh_band(&defaults.blood) {
            info!(
                "{:?} blood band {:?} -> {:?} ({:.0}/{:.0})",
                entity,
                from,
                to,
                meter.current(),
                meter.max()
            );
            band_events.write(BloodBandChanged { entity, from, to });
        }
    }
}

pub(crate) fn collect_pickups(
    mut commands: Commands,
    mut collision_events: MessageReader<CollisionStart>,
    mut pickup_events: MessageWriter<PickupCollectedEvent>,
    pickups: Query<&BloodPickup>,
    mut collectors: Query<(&mut BloodMeter, Option<&Health>)>,
) {
    let mut taken: Vec<Entity> = Vec::new();

    for event in collision_events.read() {
        for (pickup_entity, other) in sensor_pairs(event) {
            let Ok(pickup) = pickups.get(pickup_entity) else {
                continue;
            };
            if taken.contains(&pickup_entity) {
                continue;
            }
            let Ok((mut meter, health)) = collectors.get_mut(other) else {
                continue;
            };
            if health.is_some_and(Health::is_dead) {
                continue;
            }

            let gained = meter.gain(pickup.value);
            taken.push(pickup_entity);
            commands.entity(pickup_entity).despawn();
            pickup_events.write(PickupCollectedEvent {
                collector: other,
                gained,
            });
            debug!("{:?} collected blood (+{:.1})", other, gained);
        }
    }
}

pub(crate) fn reach_checkpoints(
    mut collision_events: MessageReader<CollisionStart>,
    mut checkpoint_events: MessageWriter<CheckpointReachedEvent>,
    defaults: Res<CombatDefaults>,
    mut checkpoints: Query<(&mut Checkpoint, &mut Sprite)>,
    mut visitors: Query<(&mut BloodMeter, &mut Health)>,
) {
    let tuning = &defaults.blood;

    for event in collision_events.read() {
        for (checkpoint_entity, other) in sensor_pairs(event) {
            let Ok((mut checkpoint, mut sprite)) = checkpoints.get_mut(checkpoint_entity) else {
                continue;
            };
            if checkpoint.spent {
                continue;
            }
            let Ok((mut meter, mut health)) = visitors.get_mut(other) else {
                continue;
            };
            if health.is_dead() {
                continue;
            }

            checkpoint.spent = true;
            sprite.color = SPENT_CHECKPOINT_COLOR;
            let blood = meter.gain(tuning.checkpoint_blood_restore);
            let healed = health.heal(tuning.checkpoint_health_restore);
            checkpoint_events.write(CheckpointReachedEvent {
                entity: other,
                checkpoint: checkpoint_entity,
            });
            info!(
                "Checkpoint reached: +{:.0} blood, +{:.0} health",
                blood, healed
            );
        }
    }
}
