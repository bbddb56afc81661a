//! Debug domain: serializable dump of the live combat state.

use serde::Serialize;

use crate::blood::{BloodBand, BloodMeter};
use crate::combat::{ComboMachine, ComboPhase, Health, KillCounter};
use crate::objectives::ObjectiveTracker;

#[derive(Debug, Serialize)]
pub struct PlayerSnapshot {
    pub health: f32,
    pub max_health: f32,
    pub blood: f32,
    pub max_blood: f32,
    pub band: BloodBand,
    pub phase: ComboPhase,
    pub combo_step: u32,
    pub combo_enabled: bool,
    pub next_attack_time: f32,
}

impl PlayerSnapshot {
    pub fn capture(health: &Health, meter: &BloodMeter, combo: &ComboMachine) -> Self {
        Self {
            health: health.current(),
            max_health: health.max(),
            blood: meter.current(),
            max_blood: meter.max(),
            band: meter.reported_band(),
            phase: combo.phase(),
            combo_step: combo.current_step(),
            combo_enabled: combo.is_enabled(),
            next_attack_time: combo.next_attack_time(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CombatSnapshot<'a> {
    pub attempt_seed: u64,
    pub pending_timers: usize,
    pub enemies_alive: usize,
    pub player: Option<PlayerSnapshot>,
    pub kills: &'a KillCounter,
    pub objectives: &'a ObjectiveTracker,
}

impl CombatSnapshot<'_> {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
