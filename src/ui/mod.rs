//! UI domain: in-run HUD elements, withdrawal vignette and death flow.

mod death;
mod hud_objectives;
mod hud_player;
mod vignette;

#[cfg(test)]
mod tests;

pub use death::{AttemptSummary, AttemptSummaryPanel};
pub use vignette::BloodVignette;

use bevy::prelude::*;

use crate::combat::CombatSet;
use crate::core::GameState;
use crate::ui::death::{retry_attempt, show_attempt_summary};
use crate::ui::hud_objectives::{spawn_objectives_ui, update_objectives_ui};
use crate::ui::hud_player::{spawn_player_hud, update_blood_bar, update_player_healthbar};
use crate::ui::vignette::{fade_vignette, reset_vignette, retarget_vignette, spawn_vignette};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            (spawn_vignette, spawn_player_hud, spawn_objectives_ui).chain(),
        )
        .add_systems(OnEnter(GameState::Playing), reset_vignette)
        .add_systems(
            Update,
            (
                update_player_healthbar,
                update_blood_bar,
                update_objectives_ui,
                (retarget_vignette, fade_vignette).chain(),
                show_attempt_summary,
                retry_attempt,
            )
                .after(CombatSet::Aftermath),
        );
    }
}
