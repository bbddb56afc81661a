//! Movement domain: player locomotion plugin wiring and public exports.

mod bootstrap;
mod components;
mod resources;
mod systems;

pub use components::{Control, GameLayer, Player};
pub use resources::{MovementInput, MovementTuning};

use bevy::prelude::*;

use crate::combat::CombatSet;
use crate::core::GameState;
use crate::movement::bootstrap::spawn_player;
use crate::movement::systems::{apply_movement, player_attacks, read_input, update_facing};

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementTuning>()
            .init_resource::<MovementInput>()
            .add_systems(OnEnter(GameState::Playing), spawn_player)
            .add_systems(
                Update,
                (read_input, update_facing, player_attacks, apply_movement)
                    .chain()
                    .in_set(CombatSet::Input),
            );
    }
}
