//! Combat domain: combat plugin wiring and public exports.

mod ai;
mod combo;
mod components;
mod damage;
mod events;
mod health;
mod hit_detection;
mod ragdoll;
mod resources;
mod schedule;
mod spawn;
mod systems;

#[cfg(test)]
mod tests;

pub use ai::{AiState, EnemyAi, confine_to_arena};
pub use combo::{ComboMachine, ComboPhase, ComboTransition, StunVerdict};
pub use components::{
    AttackProfile, AttackStrength, Combatant, DamageFlash, DespawnOnDeath, Enemy, Facing,
    HitboxLink, HitboxReach, NavAgent,
};
pub use damage::{HitResolution, knockback_direction, resolve_hit};
pub use events::{DamageEvent, DeathEvent, HitEvent, ReactionTriggeredEvent, StunAppliedEvent};
pub use health::{DamageOutcome, DamageReaction, DropTable, Health};
pub use hit_detection::{AttackHitbox, HitSet, HitVerdict};
pub use ragdoll::{Ragdoll, RagdollDisable};
pub use resources::{DropRange, FeedbackTuning, GameRng, KillCounter};
pub use schedule::{TimerKey, TimerPurpose, TimerWheel};
pub use spawn::{spawn_enemy, spawn_hitbox};

use bevy::prelude::*;

use crate::combat::ai::{apply_nav_agents, update_enemy_ai};
use crate::combat::damage::resolve_hits;
use crate::combat::health::apply_damage;
use crate::combat::hit_detection::detect_hits;
use crate::combat::ragdoll::{disable_on_death, enter_ragdoll};
use crate::combat::spawn::spawn_arena;
use crate::combat::systems::{
    aim_hitboxes, count_kills, dispatch_timers, flash_on_reaction, reset_combat_state,
    shake_on_impact, tick_damage_flash, watch_stalled_attacks,
};
use crate::core::GameState;

/// Per-frame combat ordering. Each stage only sees messages written by the
/// stages before it.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatSet {
    Input,
    Timers,
    Detect,
    Resolve,
    Apply,
    Aftermath,
}

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TimerWheel>()
            .init_resource::<GameRng>()
            .init_resource::<FeedbackTuning>()
            .init_resource::<KillCounter>()
            .add_message::<HitEvent>()
            .add_message::<DamageEvent>()
            .add_message::<DeathEvent>()
            .add_message::<StunAppliedEvent>()
            .add_message::<ReactionTriggeredEvent>()
            .configure_sets(
                Update,
                (
                    CombatSet::Input,
                    CombatSet::Timers,
                    CombatSet::Detect,
                    CombatSet::Resolve,
                    CombatSet::Apply,
                    CombatSet::Aftermath,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                OnEnter(GameState::Playing),
                (reset_combat_state, spawn_arena).chain(),
            )
            .add_systems(Update, update_enemy_ai.in_set(CombatSet::Input))
            .add_systems(
                Update,
                (dispatch_timers, watch_stalled_attacks)
                    .chain()
                    .in_set(CombatSet::Timers),
            )
            .add_systems(Update, detect_hits.in_set(CombatSet::Detect))
            .add_systems(Update, resolve_hits.in_set(CombatSet::Resolve))
            .add_systems(
                Update,
                (apply_damage, apply_nav_agents).in_set(CombatSet::Apply),
            )
            .add_systems(
                Update,
                (
                    disable_on_death::<ComboMachine>,
                    disable_on_death::<NavAgent>,
                    disable_on_death::<EnemyAi>,
                    enter_ragdoll,
                    count_kills,
                    shake_on_impact,
                    (flash_on_reaction, tick_damage_flash).chain(),
                    aim_hitboxes,
                )
                    .in_set(CombatSet::Aftermath),
            );
    }
}
