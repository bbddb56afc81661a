//! Combat domain: the health sink, drops and damage reactions.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;
use rand::Rng;

use crate::blood::spawn_blood_pickup;
use crate::combat::components::{AttackStrength, DespawnOnDeath, NavAgent};
use crate::combat::events::{DamageEvent, DeathEvent, ReactionTriggeredEvent};
use crate::combat::resources::{DropRange, GameRng};
use crate::combat::schedule::{TimerPurpose, TimerWheel};
use crate::content::CombatDefaults;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Target was already dead; nothing changed
    Ignored,
    Wounded { applied: f32 },
    /// This hit killed the target. Reported exactly once per entity.
    Killed { applied: f32 },
}

/// Health component for damageable entities
#[derive(Component, Debug, Clone)]
pub struct Health {
    current: f32,
    max: f32,
    dead: bool,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            dead: false,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.dead {
            return DamageOutcome::Ignored;
        }
        let applied = amount.max(0.0).min(self.current);
        self.current -= applied;

        if self.current <= 0.0 {
            self.current = 0.0;
            self.dead = true;
            DamageOutcome::Killed { applied }
        } else {
            DamageOutcome::Wounded { applied }
        }
    }

    /// Returns the amount actually restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if self.dead {
            return 0.0;
        }
        let actual = amount.max(0.0).min(self.max - self.current);
        self.current += actual;
        actual
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn percent(&self) -> f32 {
        self.current / self.max
    }
}

/// Number of pickups shed per hit, by strength
#[derive(Component, Debug, Clone, Copy)]
pub struct DropTable {
    pub light: DropRange,
    pub heavy: DropRange,
}

impl DropTable {
    pub fn roll(&self, strength: AttackStrength, rng: &mut impl Rng) -> u32 {
        match strength {
            AttackStrength::Light => self.light.roll(rng),
            AttackStrength::Heavy => self.heavy.roll(rng),
        }
    }
}

/// Gate for the hurt animation so rapid hits don't spam it
#[derive(Component, Debug, Clone)]
pub struct DamageReaction {
    pub cooldown: f32,
    pub light_chance: f32,
    last_triggered: Option<f32>,
}

impl DamageReaction {
    pub fn new(cooldown: f32, light_chance: f32) -> Self {
        Self {
            cooldown,
            light_chance,
            last_triggered: None,
        }
    }

    /// Heavy hits always react and light hits only when `light_roll`
    /// passed. Both respect the cooldown.
    pub fn try_trigger(&mut self, now: f32, strength: AttackStrength, light_roll: bool) -> bool {
        if let Some(last) = self.last_triggered {
            if now - last < self.cooldown {
                return false;
            }
        }
        if !strength.is_heavy() && !light_roll {
            return false;
        }
        self.last_triggered = Some(now);
        true
    }
}

pub(crate) fn apply_damage(
    mut commands: Commands,
    mut damage_events: MessageReader<DamageEvent>,
    mut death_events: MessageWriter<DeathEvent>,
    mut reaction_events: MessageWriter<ReactionTriggeredEvent>,
    time: Res<Time>,
    defaults: Res<CombatDefaults>,
    mut rng: ResMut<GameRng>,
    mut wheel: ResMut<TimerWheel>,
    mut query: Query<(
        &mut Health,
        &GlobalTransform,
        Option<&DropTable>,
        Option<&mut DamageReaction>,
        Option<&mut NavAgent>,
        Has<DespawnOnDeath>,
    )>,
) {
    let now = time.elapsed_secs();
    let tuning = &defaults.health;

    for event in damage_events.read() {
        let Ok((mut health, transform, drops, reaction, nav, despawns)) =
            query.get_mut(event.target)
        else {
            continue;
        };

        let outcome = health.take_damage(event.amount);
        let applied = match outcome {
            DamageOutcome::Ignored => continue,
            DamageOutcome::Wounded { applied } | DamageOutcome::Killed { applied } => applied,
        };

        if let Some(drops) = drops {
            let count = drops.roll(event.strength, &mut rng.0);
            let origin = transform.translation().truncate() + Vec2::from(tuning.drop_offset);
            for _ in 0..count {
                let jitter = Vec2::new(
                    rng.0.random_range(-1.0..=1.0),
                    rng.0.random_range(-1.0..=1.0),
                ) * tuning.drop_jitter;
                spawn_blood_pickup(&mut commands, origin + jitter, defaults.blood.pickup_value);
            }
        }

        if let Some(mut reaction) = reaction {
            let light_roll = rng
                .0
                .random_bool(reaction.light_chance.clamp(0.0, 1.0) as f64);
            if reaction.try_trigger(now, event.strength, light_roll) {
                reaction_events.write(ReactionTriggeredEvent {
                    entity: event.target,
                    strength: event.strength,
                });
            }
        }

        debug!(
            "{:?} took {:.1} damage from {:?} ({:.1}/{:.1})",
            event.target,
            applied,
            event.source,
            health.current(),
            health.max()
        );

        if let DamageOutcome::Killed { .. } = outcome {
            if let Some(mut nav) = nav {
                nav.enabled = false;
                nav.stop();
            }
            death_events.write(DeathEvent {
                entity: event.target,
                killer: event.source,
            });
            if despawns {
                if let Some(delay) = tuning.despawn_delay {
                    wheel.schedule(event.target, TimerPurpose::Despawn, now + delay);
                }
            }
            info!("{:?} was killed by {:?}", event.target, event.source);
        }
    }
}
