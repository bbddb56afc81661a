//! Data definitions for the RON content files.
//!
//! These structs mirror the structure in assets/data/*.ron and are used
//! for deserialization. Every field has a default so a missing or broken
//! file never leaves the game without tuning.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::blood::BloodBand;
use crate::combat::DropRange;

// ============================================================================
// Common wrapper for RON files with schema_version and items
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataFile<T> {
    pub schema_version: u32,
    pub items: Vec<T>,
}

// ============================================================================
// Combat defaults (combat.ron)
// ============================================================================

/// All designer-tunable combat numbers, loaded once at startup.
#[derive(Resource, Debug, Clone, Deserialize, Serialize)]
pub struct CombatDefaults {
    pub schema_version: u32,
    pub player_attack: AttackDef,
    pub enemy_attack: AttackDef,
    pub player_combo: ComboDef,
    pub enemy_combo: ComboDef,
    pub health: HealthDef,
    pub blood: BloodDef,
    pub arena: ArenaDef,
}

impl Default for CombatDefaults {
    fn default() -> Self {
        Self {
            schema_version: 1,
            player_attack: AttackDef {
                base_damage: 10.0,
                base_force: 420.0,
                heavy_damage_multiplier: 2.0,
                heavy_force_multiplier: 1.6,
                light_stun: 0.3,
                heavy_stun: 0.6,
            },
            enemy_attack: AttackDef {
                base_damage: 8.0,
                base_force: 360.0,
                heavy_damage_multiplier: 1.75,
                heavy_force_multiplier: 1.5,
                light_stun: 0.2,
                heavy_stun: 0.45,
            },
            player_combo: ComboDef {
                min_combo_attacks: 1,
                max_combo_attacks: 1,
                windup: 0.08,
                attack_duration: 0.15,
                inter_attack_delay: 0.0,
                combo_cooldown: 0.22,
                stall_grace: 0.5,
                stun_cooldown: 0.8,
                allow_stun_during_attack: true,
            },
            enemy_combo: ComboDef {
                min_combo_attacks: 2,
                max_combo_attacks: 3,
                windup: 0.35,
                attack_duration: 0.2,
                inter_attack_delay: 0.25,
                combo_cooldown: 1.4,
                stall_grace: 1.0,
                stun_cooldown: 1.0,
                allow_stun_during_attack: false,
            },
            health: HealthDef::default(),
            blood: BloodDef::default(),
            arena: ArenaDef::default(),
        }
    }
}

/// Base numbers for one attacker's strikes.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct AttackDef {
    pub base_damage: f32,
    pub base_force: f32,
    pub heavy_damage_multiplier: f32,
    pub heavy_force_multiplier: f32,
    /// Hitstun applied to the target by a light hit (seconds)
    pub light_stun: f32,
    /// Hitstun applied to the target by a heavy hit (seconds)
    pub heavy_stun: f32,
}

/// Timing for the combo state machine. All durations are seconds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ComboDef {
    pub min_combo_attacks: u32,
    pub max_combo_attacks: u32,
    pub windup: f32,
    pub attack_duration: f32,
    pub inter_attack_delay: f32,
    pub combo_cooldown: f32,
    /// Extra time an attack may stay active before the watchdog resets it
    pub stall_grace: f32,
    /// Minimum time between two accepted stuns, measured from acceptance
    pub stun_cooldown: f32,
    pub allow_stun_during_attack: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthDef {
    pub player_max: f32,
    pub enemy_max: f32,
    pub light_drops: DropRange,
    pub heavy_drops: DropRange,
    /// Offset from the victim where pickups appear
    pub drop_offset: [f32; 2],
    /// Max random displacement applied to each pickup on both axes
    pub drop_jitter: f32,
    pub light_reaction_chance: f32,
    pub reaction_cooldown: f32,
    /// Seconds before a dead enemy is removed. None keeps the corpse.
    pub despawn_delay: Option<f32>,
}

impl Default for HealthDef {
    fn default() -> Self {
        Self {
            player_max: 100.0,
            enemy_max: 40.0,
            light_drops: DropRange::new(0, 1),
            heavy_drops: DropRange::new(1, 3),
            drop_offset: [0.0, 14.0],
            drop_jitter: 10.0,
            light_reaction_chance: 0.35,
            reaction_cooldown: 0.4,
            despawn_delay: Some(2.5),
        }
    }
}

/// A value per blood band.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct BandValues {
    pub optimal: f32,
    pub mild: f32,
    pub moderate: f32,
    pub severe: f32,
}

impl BandValues {
    pub fn get(&self, band: BloodBand) -> f32 {
        match band {
            BloodBand::Optimal => self.optimal,
            BloodBand::Mild => self.mild,
            BloodBand::Moderate => self.moderate,
            BloodBand::Severe => self.severe,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BloodDef {
    pub max: f32,
    /// Passive withdrawal per second
    pub drain_per_second: f32,
    /// Blood gained per pickup collected
    pub pickup_value: f32,
    /// Fraction of max below which the meter is in the Mild band
    pub mild_below: f32,
    pub moderate_below: f32,
    pub severe_below: f32,
    pub damage_modifiers: BandValues,
    pub vignette: BandValues,
    pub checkpoint_blood_restore: f32,
    pub checkpoint_health_restore: f32,
}

impl Default for BloodDef {
    fn default() -> Self {
        Self {
            max: 100.0,
            drain_per_second: 1.5,
            pickup_value: 6.0,
            mild_below: 0.6,
            moderate_below: 0.35,
            severe_below: 0.15,
            damage_modifiers: BandValues {
                optimal: 1.0,
                mild: 1.15,
                moderate: 1.35,
                severe: 1.6,
            },
            vignette: BandValues {
                optimal: 0.0,
                mild: 0.15,
                moderate: 0.3,
                severe: 0.5,
            },
            checkpoint_blood_restore: 100.0,
            checkpoint_health_restore: 50.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArenaDef {
    pub half_extents: [f32; 2],
    pub player_speed: f32,
    pub enemy_speed: f32,
    pub aggro_range: f32,
    pub attack_range: f32,
    /// Chance an enemy opens a combo with heavy strikes
    pub enemy_heavy_chance: f32,
    pub enemy_spawns: Vec<[f32; 2]>,
    pub checkpoints: Vec<[f32; 2]>,
}

impl Default for ArenaDef {
    fn default() -> Self {
        Self {
            half_extents: [560.0, 320.0],
            player_speed: 260.0,
            enemy_speed: 140.0,
            aggro_range: 340.0,
            attack_range: 52.0,
            enemy_heavy_chance: 0.25,
            enemy_spawns: vec![[320.0, 120.0], [-300.0, 160.0], [200.0, -200.0]],
            checkpoints: vec![[-420.0, -220.0]],
        }
    }
}

// ============================================================================
// Objectives (objectives.ron)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObjectiveDef {
    pub id: String,
    pub label: String,
    pub kind: ObjectiveKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ObjectiveKind {
    DefeatEnemies { count: u32 },
    ReachBloodBand { band: BloodBand },
    CollectPickups { count: u32 },
    ReachCheckpoint,
}

/// Objectives loaded from content, in display order.
#[derive(Resource, Debug, Clone, Default)]
pub struct ObjectiveCatalog(pub Vec<ObjectiveDef>);

impl ObjectiveCatalog {
    pub fn tutorial() -> Self {
        Self(vec![
            ObjectiveDef {
                id: "first_blood".to_string(),
                label: "Defeat an enemy".to_string(),
                kind: ObjectiveKind::DefeatEnemies { count: 1 },
            },
            ObjectiveDef {
                id: "scavenger".to_string(),
                label: "Collect 5 blood drops".to_string(),
                kind: ObjectiveKind::CollectPickups { count: 5 },
            },
            ObjectiveDef {
                id: "withdrawal".to_string(),
                label: "Fight through moderate withdrawal".to_string(),
                kind: ObjectiveKind::ReachBloodBand {
                    band: BloodBand::Moderate,
                },
            },
            ObjectiveDef {
                id: "rest".to_string(),
                label: "Reach the checkpoint".to_string(),
                kind: ObjectiveKind::ReachCheckpoint,
            },
        ])
    }
}
