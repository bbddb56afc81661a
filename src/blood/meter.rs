//! Blood domain: the blood meter, its bands, pickups and checkpoints.

use avian2d::prelude::*;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::content::BloodDef;
use crate::core::ArenaScoped;
use crate::movement::GameLayer;

const PICKUP_RADIUS: f32 = 6.0;
const PICKUP_COLOR: Color = Color::srgb(0.7, 0.05, 0.08);
const CHECKPOINT_SIZE: f32 = 44.0;
pub(crate) const CHECKPOINT_COLOR: Color = Color::srgba(0.35, 0.75, 0.95, 0.6);
pub(crate) const SPENT_CHECKPOINT_COLOR: Color = Color::srgba(0.35, 0.4, 0.45, 0.4);

/// Withdrawal severity, ordered from healthy to worst.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize, Serialize,
)]
pub enum BloodBand {
    #[default]
    Optimal,
    Mild,
    Moderate,
    Severe,
}

impl BloodBand {
    pub fn label(self) -> &'static str {
        match self {
            BloodBand::Optimal => "Optimal",
            BloodBand::Mild => "Mild withdrawal",
            BloodBand::Moderate => "Moderate withdrawal",
            BloodBand::Severe => "Severe withdrawal",
        }
    }

    /// Band for a fill fraction, given the configured cuts.
    pub fn from_fraction(fraction: f32, tuning: &BloodDef) -> Self {
        if fraction < tuning.severe_below {
            BloodBand::Severe
        } else if fraction < tuning.moderate_below {
            BloodBand::Moderate
        } else if fraction < tuning.mild_below {
            BloodBand::Mild
        } else {
            BloodBand::Optimal
        }
    }
}

/// The player's blood supply. Lower blood hits harder.
#[derive(Component, Debug, Clone, Serialize)]
pub struct BloodMeter {
    current: f32,
    max: f32,
    /// Last band reported through `BloodBandChanged`
    band: BloodBand,
}

impl BloodMeter {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            band: BloodBand::Optimal,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.current / self.max
    }

    /// Returns the amount actually removed.
    pub fn drain(&mut self, amount: f32) -> f32 {
        let removed = amount.max(0.0).min(self.current);
        self.current -= removed;
        removed
    }

    /// Returns the amount actually added.
    pub fn gain(&mut self, amount: f32) -> f32 {
        let added = amount.max(0.0).min(self.max - self.current);
        self.current += added;
        added
    }

    pub fn refill(&mut self) {
        self.current = self.max;
    }

    pub fn band(&self, tuning: &BloodDef) -> BloodBand {
        BloodBand::from_fraction(self.fraction(), tuning)
    }

    pub fn damage_modifier(&self, tuning: &BloodDef) -> f32 {
        tuning.damage_modifiers.get(self.band(tuning))
    }

    pub fn vignette(&self, tuning: &BloodDef) -> f32 {
        tuning.vignette.get(self.band(tuning))
    }

    /// Last reported band
    pub fn reported_band(&self) -> BloodBand {
        self.band
    }

    /// Recompute the band; returns `(from, to)` when a threshold was crossed.
    pub fn refresh_band(&mut self, tuning: &BloodDef) -> Option<(BloodBand, BloodBand)> {
        let band = self.band(tuning);
        if band == self.band {
            return None;
        }
        let from = self.band;
        self.band = band;
        Some((from, band))
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct BloodPickup {
    pub value: f32,
}

/// Restores blood and health once, the first time the player touches it.
#[derive(Component, Debug, Default)]
pub struct Checkpoint {
    pub spent: bool,
}

pub fn spawn_blood_pickup(commands: &mut Commands, position: Vec2, value: f32) -> Entity {
    commands
        .spawn((
            BloodPickup { value },
            ArenaScoped,
            Sprite {
                color: PICKUP_COLOR,
                custom_size: Some(Vec2::splat(PICKUP_RADIUS * 2.0)),
                ..default()
            },
            Transform::from_xyz(position.x, position.y, 0.2),
            Collider::circle(PICKUP_RADIUS),
            Sensor,
            CollisionEventsEnabled,
            CollisionLayers::new(GameLayer::Pickup, [GameLayer::Player]),
        ))
        .id()
}

pub fn spawn_checkpoint(commands: &mut Commands, position: Vec2) -> Entity {
    commands
        .spawn((
            Checkpoint::default(),
            ArenaScoped,
            Sprite {
                color: CHECKPOINT_COLOR,
                custom_size: Some(Vec2::splat(CHECKPOINT_SIZE)),
                ..default()
            },
            Transform::from_xyz(position.x, position.y, 0.1),
            Collider::rectangle(CHECKPOINT_SIZE, CHECKPOINT_SIZE),
            Sensor,
            CollisionEventsEnabled,
            CollisionLayers::new(GameLayer::Trigger, [GameLayer::Player]),
        ))
        .id()
}
