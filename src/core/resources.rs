//! Core domain: run configuration, arena scoping and the camera shake service.

use bevy::prelude::*;
use rand::Rng;

#[derive(Resource, Debug)]
pub struct RunConfig {
    pub seed: u64,
    /// Attempts started this session, including the current one
    pub attempt: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: rand::rng().random(),
            attempt: 0,
        }
    }
}

impl RunConfig {
    /// Seed for the current attempt; each retry gets its own stream.
    pub fn attempt_seed(&self) -> u64 {
        self.seed.wrapping_add(self.attempt as u64)
    }
}

/// Everything carrying this is despawned when an attempt ends
#[derive(Component, Debug, Default)]
pub struct ArenaScoped;

/// Trauma-based screen shake. Systems add trauma; the camera spends it.
#[derive(Resource, Debug, Default)]
pub struct CameraShake {
    pub trauma: f32,
}

impl CameraShake {
    pub const DECAY: f32 = 2.5;
    pub const MAX_OFFSET: f32 = 14.0;
    pub const NOISE_SPEED: f32 = 25.0;
    pub const EXPONENT: f32 = 2.0;

    pub fn add_trauma(&mut self, amount: f32) {
        self.trauma = (self.trauma + amount.max(0.0)).min(1.0);
    }

    pub fn decay(&mut self, dt: f32) {
        self.trauma = (self.trauma - Self::DECAY * dt).max(0.0);
    }

    /// Camera offset for this frame at elapsed time `t`.
    pub fn offset(&self, t: f32) -> Vec2 {
        if self.trauma <= 0.0 {
            return Vec2::ZERO;
        }
        let amount = self.trauma.powf(Self::EXPONENT) * Self::MAX_OFFSET;
        let t = t * Self::NOISE_SPEED;
        let x = (t * 1.0).sin() * 0.5 + (t * 2.3).cos() * 0.3 + (t * 4.1).sin() * 0.2;
        let y = (t * 1.7).cos() * 0.5 + (t * 3.1).sin() * 0.3 + (t * 5.3).cos() * 0.2;
        Vec2::new(x, y) * amount
    }
}
