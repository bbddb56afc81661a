//! Combat domain: tuning, randomness and counters shared across systems.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Inclusive range of pickups dropped by one hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct DropRange {
    pub min: u32,
    pub max: u32,
}

impl DropRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Fixed value (no variance)
    pub fn fixed(value: u32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Roll a value within range (inclusive)
    pub fn roll(&self, rng: &mut impl Rng) -> u32 {
        if self.min >= self.max {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }
}

/// The single source of randomness for gameplay rolls.
/// Seeded from the run seed so a run can be replayed.
#[derive(Resource, Debug)]
pub struct GameRng(pub ChaCha8Rng);

impl GameRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_seed(0)
    }
}

#[derive(Resource, Debug, Clone)]
pub struct FeedbackTuning {
    pub damage_flash_duration: f32,
    pub stun_tint_duration: f32,
    pub heavy_hit_trauma: f32,
    pub death_trauma: f32,
    pub player_hurt_trauma: f32,
}

impl Default for FeedbackTuning {
    fn default() -> Self {
        Self {
            damage_flash_duration: 0.1,
            stun_tint_duration: 0.3,
            heavy_hit_trauma: 0.35,
            death_trauma: 0.5,
            player_hurt_trauma: 0.25,
        }
    }
}

/// Counts deaths for objectives and the HUD.
#[derive(Resource, Debug, Default, Serialize)]
pub struct KillCounter {
    pub enemies: u32,
    pub player_deaths: u32,
}

impl KillCounter {
    pub fn reset(&mut self) {
        self.enemies = 0;
        self.player_deaths = 0;
    }
}
