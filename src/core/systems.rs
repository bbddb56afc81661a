//! Core domain: attempt flow, seeding and the follow camera.

use bevy::prelude::*;

use crate::combat::GameRng;
use crate::core::resources::{ArenaScoped, CameraShake, RunConfig};
use crate::core::state::GameState;
use crate::movement::Player;

/// Camera follow smoothing, per second
const FOLLOW_RATE: f32 = 8.0;

/// Marks the gameplay camera; `focus` is its position before shake.
#[derive(Component, Debug, Default)]
pub struct MainCamera {
    pub focus: Vec2,
}

pub(crate) fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera2d, MainCamera::default()));
}

pub(crate) fn cleanup_arena(
    mut commands: Commands,
    scoped: Query<Entity, With<ArenaScoped>>,
    mut shake: ResMut<CameraShake>,
) {
    let mut count = 0;
    for entity in &scoped {
        commands.entity(entity).despawn();
        count += 1;
    }
    shake.trauma = 0.0;
    if count > 0 {
        debug!("Cleared {} arena entities", count);
    }
}

pub(crate) fn finish_loading(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::Playing);
}

/// Start a new attempt with its own deterministic random stream
pub(crate) fn begin_attempt(mut run_config: ResMut<RunConfig>, mut rng: ResMut<GameRng>) {
    run_config.attempt += 1;
    *rng = GameRng::from_seed(run_config.attempt_seed());

    info!(
        "Starting attempt {} with seed: {}",
        run_config.attempt,
        run_config.attempt_seed()
    );
}

pub(crate) fn follow_camera(
    time: Res<Time>,
    mut shake: ResMut<CameraShake>,
    player_query: Query<&GlobalTransform, With<Player>>,
    mut camera_query: Query<(&mut MainCamera, &mut Transform)>,
) {
    let Ok((mut camera, mut transform)) = camera_query.single_mut() else {
        return;
    };

    if let Ok(player) = player_query.single() {
        let target = player.translation().truncate();
        let t = (FOLLOW_RATE * time.delta_secs()).min(1.0);
        camera.focus = camera.focus.lerp(target, t);
    }

    shake.decay(time.delta_secs());
    let position = camera.focus + shake.offset(time.elapsed_secs());
    transform.translation.x = position.x;
    transform.translation.y = position.y;
}
