//! Movement domain: tuning and input resources.

use bevy::prelude::*;

use crate::movement::Control;

#[derive(Resource, Debug, Clone)]
pub struct MovementTuning {
    pub max_speed: f32,
    pub accel: f32,
    pub decel: f32,
    /// Fraction of max speed kept while swinging
    pub attack_speed_factor: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            max_speed: 260.0,
            accel: 2400.0,
            decel: 1800.0,
            attack_speed_factor: 0.35,
        }
    }
}

impl MovementTuning {
    pub fn top_speed(&self, control: Control) -> f32 {
        match control {
            Control::Free => self.max_speed,
            Control::Attacking => self.max_speed * self.attack_speed_factor,
            Control::Locked => 0.0,
        }
    }
}

#[derive(Resource, Debug, Default)]
pub struct MovementInput {
    pub axis: Vec2,
    pub light_attack: bool,
    pub heavy_attack: bool,
}
