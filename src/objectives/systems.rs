//! Objectives domain: feeding arena events into the tracker.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::blood::{BloodBandChanged, CheckpointReachedEvent, PickupCollectedEvent};
use crate::combat::{DeathEvent, Enemy};
use crate::content::ObjectiveCatalog;
use crate::movement::Player;
use crate::objectives::events::TaskCompleted;
use crate::objectives::tracker::{ObjectiveSignal, ObjectiveTracker};

pub(crate) fn reset_objectives(mut commands: Commands, catalog: Res<ObjectiveCatalog>) {
    commands.insert_resource(ObjectiveTracker::from_catalog(&catalog));
}

pub(crate) fn track_objectives(
    mut deaths: MessageReader<DeathEvent>,
    mut pickups: MessageReader<PickupCollectedEvent>,
    mut bands: MessageReader<BloodBandChanged>,
    mut checkpoints: MessageReader<CheckpointReachedEvent>,
    mut completed_events: MessageWriter<TaskCompleted>,
    mut tracker: ResMut<ObjectiveTracker>,
    enemies: Query<(), With<Enemy>>,
    players: Query<(), With<Player>>,
) {
    let mut signals = Vec::new();

    signals.extend(
        deaths
            .read()
            .filter(|event| enemies.contains(event.entity))
            .map(|_| ObjectiveSignal::EnemyDefeated),
    );
    signals.extend(
        pickups
            .read()
            .filter(|event| players.contains(event.collector))
            .map(|_| ObjectiveSignal::PickupCollected),
    );
    signals.extend(
        bands
            .read()
            .filter(|event| players.contains(event.entity))
            .map(|event| ObjectiveSignal::BloodBandReached(event.to)),
    );
    signals.extend(
        checkpoints
            .read()
            .filter(|event| players.contains(event.entity))
            .map(|_| ObjectiveSignal::CheckpointReached),
    );

    for signal in signals {
        let completed = tracker.observe(signal);
        for objective in completed {
            info!("Objective complete: {} ({})", objective.label, objective.id);
            completed_events.write(TaskCompleted {
                id: objective.id,
                label: objective.label,
            });
            if tracker.all_complete() {
                info!("All {} objectives complete", tracker.objectives().len());
            }
        }
    }
}
