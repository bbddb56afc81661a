//! Debug domain: hotkeys and the info overlay.

use bevy::prelude::*;

use crate::blood::BloodMeter;
use crate::combat::{ComboMachine, Enemy, Health, KillCounter, TimerWheel, spawn_enemy};
use crate::content::CombatDefaults;
use crate::core::RunConfig;
use crate::debug::snapshot::{CombatSnapshot, PlayerSnapshot};
use crate::debug::state::DebugState;
use crate::debug::ui::{DebugInfoOverlay, DebugStatusMessage, spawn_debug_info_overlay};
use crate::movement::Player;
use crate::objectives::ObjectiveTracker;

/// Distance from the player at which F1 drops an enemy
const SPAWN_OFFSET: Vec2 = Vec2::new(140.0, 0.0);

/// F1 spawn enemy, F2 full restore, F4 toggle info overlay
pub(crate) fn handle_debug_hotkeys(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_state: ResMut<DebugState>,
    defaults: Res<CombatDefaults>,
    mut player_query: Query<(&GlobalTransform, &mut Health, &mut BloodMeter), With<Player>>,
    overlay_query: Query<Entity, With<DebugInfoOverlay>>,
) {
    if keyboard.just_pressed(KeyCode::F1) {
        if let Ok((transform, _, _)) = player_query.single() {
            let pos = transform.translation().truncate() + SPAWN_OFFSET;
            let enemy = spawn_enemy(&mut commands, pos, &defaults);
            debug_state.set_message("Spawned enemy", 2.0);
            info!("[DEBUG] Spawned enemy {:?} at {:?}", enemy, pos);
        }
    }

    if keyboard.just_pressed(KeyCode::F2) {
        if let Ok((_, mut health, mut meter)) = player_query.single_mut() {
            let max = health.max();
            health.heal(max);
            meter.refill();
            debug_state.set_message("Health and blood restored", 2.0);
            info!("[DEBUG] Full restore");
        }
    }

    if keyboard.just_pressed(KeyCode::F4) {
        debug_state.show_info = !debug_state.show_info;
        let msg = if debug_state.show_info {
            "Debug Info ON"
        } else {
            "Debug Info OFF"
        };
        debug_state.set_message(msg, 2.0);
        info!("[DEBUG] {}", msg);

        if debug_state.show_info {
            spawn_debug_info_overlay(&mut commands);
        } else {
            for entity in &overlay_query {
                commands.entity(entity).despawn();
            }
        }
    }
}

/// F3 logs the combat state as JSON
pub(crate) fn dump_snapshot(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_state: ResMut<DebugState>,
    run_config: Res<RunConfig>,
    wheel: Res<TimerWheel>,
    kills: Res<KillCounter>,
    tracker: Res<ObjectiveTracker>,
    player_query: Query<(&Health, &BloodMeter, &ComboMachine), With<Player>>,
    enemy_query: Query<&Health, With<Enemy>>,
) {
    if !keyboard.just_pressed(KeyCode::F3) {
        return;
    }
    let snapshot = CombatSnapshot {
        attempt_seed: run_config.attempt_seed(),
        pending_timers: wheel.len(),
        enemies_alive: enemy_query.iter().filter(|h| !h.is_dead()).count(),
        player: player_query
            .single()
            .ok()
            .map(|(health, meter, combo)| PlayerSnapshot::capture(health, meter, combo)),
        kills: &kills,
        objectives: &tracker,
    };

    match snapshot.to_json() {
        Ok(json) => {
            info!("[DEBUG] Combat snapshot:\n{}", json);
            debug_state.set_message("Snapshot logged", 2.0);
        }
        Err(err) => error!("[DEBUG] Failed to serialize snapshot: {}", err),
    }
}

pub(crate) fn update_status_message(
    time: Res<Time>,
    mut debug_state: ResMut<DebugState>,
    mut text_query: Query<&mut Text, With<DebugStatusMessage>>,
) {
    debug_state.tick(time.delta_secs());
    let message = debug_state
        .status_message
        .as_ref()
        .map(|(msg, _)| msg.clone())
        .unwrap_or_default();
    for mut text in &mut text_query {
        if text.0 != message {
            text.0 = message.clone();
        }
    }
}

pub(crate) fn update_debug_info_overlay(
    wheel: Res<TimerWheel>,
    player_query: Query<(&Transform, &Health, &BloodMeter, &ComboMachine), With<Player>>,
    mut overlay_query: Query<&mut Text, With<DebugInfoOverlay>>,
) {
    let Ok(mut text) = overlay_query.single_mut() else {
        return;
    };
    let Ok((transform, health, meter, combo)) = player_query.single() else {
        text.0 = "No player".to_string();
        return;
    };

    text.0 = format!(
        "Pos: ({:.0}, {:.0})\nHP: {:.0}/{:.0}\nBlood: {:.0}/{:.0} ({})\nCombo: {:?} step {}/{}\nTimers: {}",
        transform.translation.x,
        transform.translation.y,
        health.current(),
        health.max(),
        meter.current(),
        meter.max(),
        meter.reported_band().label(),
        combo.phase(),
        combo.current_step(),
        combo.target_length(),
        wheel.len(),
    );
}
