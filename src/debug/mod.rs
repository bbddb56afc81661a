//! Dev-tools hotkeys for fast iteration.
//!
//! - F1: spawn an enemy next to the player
//! - F2: restore the player's health and blood
//! - F3: log a JSON snapshot of the combat state
//! - F4: toggle the info overlay

mod snapshot;
mod state;
mod systems;
mod ui;

#[cfg(test)]
mod tests;

pub use snapshot::{CombatSnapshot, PlayerSnapshot};
pub use state::DebugState;

use bevy::prelude::*;

use crate::core::GameState;
use crate::debug::systems::{
    dump_snapshot, handle_debug_hotkeys, update_debug_info_overlay, update_status_message,
};
use crate::debug::ui::spawn_debug_status;

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugState>()
            .add_systems(Startup, spawn_debug_status)
            .add_systems(
                Update,
                (handle_debug_hotkeys, dump_snapshot).run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                (
                    update_status_message,
                    update_debug_info_overlay.run_if(|state: Res<DebugState>| state.show_info),
                ),
            );
    }
}
