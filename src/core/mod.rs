//! Core domain: attempt lifecycle, camera and shared services.

mod resources;
mod state;
mod systems;

pub use resources::{ArenaScoped, CameraShake, RunConfig};
pub use state::GameState;
pub use systems::MainCamera;

use bevy::prelude::*;

use crate::combat::CombatSet;
use crate::core::systems::{begin_attempt, cleanup_arena, finish_loading, follow_camera, setup_camera};

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<RunConfig>()
            .init_resource::<CameraShake>()
            .add_systems(Startup, setup_camera)
            .add_systems(OnEnter(GameState::Loading), cleanup_arena)
            .add_systems(Update, finish_loading.run_if(in_state(GameState::Loading)))
            .add_systems(OnEnter(GameState::Playing), begin_attempt)
            .add_systems(Update, follow_camera.after(CombatSet::Aftermath));
    }
}
