//! Combat domain: components and combat-related state types.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::content::AttackDef;

/// Marks an entity as a combat participant
#[derive(Component, Debug)]
pub struct Combatant;

#[derive(Component, Debug)]
pub struct Enemy;

/// Strength tier of a strike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum AttackStrength {
    #[default]
    Light,
    Heavy,
}

impl AttackStrength {
    pub fn is_heavy(self) -> bool {
        self == AttackStrength::Heavy
    }
}

/// Base damage/force numbers of an attacker
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AttackProfile {
    pub base_damage: f32,
    pub base_force: f32,
    pub heavy_damage_multiplier: f32,
    pub heavy_force_multiplier: f32,
    pub light_stun: f32,
    pub heavy_stun: f32,
}

impl From<&AttackDef> for AttackProfile {
    fn from(def: &AttackDef) -> Self {
        Self {
            base_damage: def.base_damage,
            base_force: def.base_force,
            heavy_damage_multiplier: def.heavy_damage_multiplier,
            heavy_force_multiplier: def.heavy_force_multiplier,
            light_stun: def.light_stun,
            heavy_stun: def.heavy_stun,
        }
    }
}

/// Points from an attacker to its hitbox child
#[derive(Component, Debug, Clone, Copy)]
pub struct HitboxLink(pub Entity);

/// Distance from the owner's center to the hitbox center
#[derive(Component, Debug, Clone, Copy)]
pub struct HitboxReach(pub f32);

/// Direction an entity is facing, used to place its hitbox
#[derive(Component, Debug, Clone, Copy)]
pub struct Facing(pub Vec2);

impl Default for Facing {
    fn default() -> Self {
        Self(Vec2::X)
    }
}

impl Facing {
    /// Turn toward `direction`, keeping the old facing for near-zero input.
    pub fn turn_toward(&mut self, direction: Vec2) {
        if let Some(dir) = direction.try_normalize() {
            self.0 = dir;
        }
    }
}

/// Pathfinding agent capability. While enabled it owns the body's velocity,
/// so physics impulses are never applied to an entity carrying one.
#[derive(Component, Debug, Clone)]
pub struct NavAgent {
    pub enabled: bool,
    pub speed: f32,
    pub velocity: Vec2,
    /// Distance kept between the body's center and the arena edge
    pub clearance: f32,
}

impl NavAgent {
    pub fn new(speed: f32) -> Self {
        Self {
            enabled: true,
            speed,
            velocity: Vec2::ZERO,
            clearance: 0.0,
        }
    }

    pub fn with_clearance(mut self, clearance: f32) -> Self {
        self.clearance = clearance;
        self
    }

    pub fn steer_toward(&mut self, direction: Vec2) {
        self.velocity = direction.normalize_or_zero() * self.speed;
    }

    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
    }
}

/// Enemies carrying this are removed some time after dying
#[derive(Component, Debug)]
pub struct DespawnOnDeath;

/// Brief tint applied to a sprite after being hit
#[derive(Component, Debug)]
pub struct DamageFlash {
    pub timer: f32,
    pub base_color: Color,
}

impl DamageFlash {
    pub fn new(base_color: Color) -> Self {
        Self {
            timer: 0.0,
            base_color,
        }
    }
}
