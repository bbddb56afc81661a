//! Combat domain: the combo state machine.
//!
//! ```text
//! Idle -> WindingUp -> Active -> Recovering -> (WindingUp | Idle)
//!   any --apply_hitstun--> Stunned --StunRecovered--> Idle
//! ```
//!
//! The machine never sleeps on its own; every delayed transition is a
//! [`TimerWheel`] entry keyed by the owner, and [`ComboMachine::on_timer`]
//! advances it when that entry fires.

use bevy::prelude::*;
use rand::Rng;
use serde::Serialize;

use crate::combat::components::AttackStrength;
use crate::combat::schedule::{TimerPurpose, TimerWheel};
use crate::content::ComboDef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ComboPhase {
    #[default]
    Idle,
    WindingUp,
    /// Hit window open
    Active,
    Recovering,
    Stunned,
}

/// What a fired timer did to the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboTransition {
    StepStarted { step: u32 },
    HitboxOpened { step: u32, strength: AttackStrength },
    HitboxClosed { combo_finished: bool },
    StunRecovered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StunVerdict {
    Accepted { hitbox_was_open: bool },
    AlreadyStunned,
    CoolingDown,
    Attacking,
    Disabled,
}

impl StunVerdict {
    pub fn is_accepted(self) -> bool {
        matches!(self, StunVerdict::Accepted { .. })
    }
}

#[derive(Component, Debug, Clone)]
pub struct ComboMachine {
    tuning: ComboDef,
    phase: ComboPhase,
    current_step: u32,
    target_length: u32,
    strength: AttackStrength,
    next_attack_time: f32,
    active_since: Option<f32>,
    last_stun_at: Option<f32>,
    enabled: bool,
}

impl ComboMachine {
    pub fn new(tuning: ComboDef) -> Self {
        Self {
            tuning,
            phase: ComboPhase::Idle,
            current_step: 0,
            target_length: 0,
            strength: AttackStrength::Light,
            next_attack_time: 0.0,
            active_since: None,
            last_stun_at: None,
            enabled: true,
        }
    }

    pub fn tuning(&self) -> &ComboDef {
        &self.tuning
    }

    pub fn phase(&self) -> ComboPhase {
        self.phase
    }

    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    pub fn target_length(&self) -> u32 {
        self.target_length
    }

    pub fn strength(&self) -> AttackStrength {
        self.strength
    }

    pub fn next_attack_time(&self) -> f32 {
        self.next_attack_time
    }

    pub fn last_stun_at(&self) -> Option<f32> {
        self.last_stun_at
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_attacking(&self) -> bool {
        matches!(
            self.phase,
            ComboPhase::WindingUp | ComboPhase::Active | ComboPhase::Recovering
        )
    }

    pub fn is_stunned(&self) -> bool {
        self.phase == ComboPhase::Stunned
    }

    pub fn is_hitbox_open(&self) -> bool {
        self.phase == ComboPhase::Active
    }

    pub fn can_attack(&self, now: f32) -> bool {
        self.enabled && !self.is_attacking() && !self.is_stunned() && now >= self.next_attack_time
    }

    /// Start a combo whose length is drawn uniformly from the tuning range.
    pub fn start_combo(
        &mut self,
        owner: Entity,
        now: f32,
        rng: &mut impl Rng,
        wheel: &mut TimerWheel,
        strength: AttackStrength,
    ) -> bool {
        if !self.can_attack(now) {
            return false;
        }
        let low = self.tuning.min_combo_attacks.max(1);
        let high = self.tuning.max_combo_attacks.max(low);
        let length = rng.random_range(low..=high);
        self.begin(owner, now, wheel, strength, length);
        true
    }

    /// Start a single strike (a combo of length one).
    pub fn start_strike(
        &mut self,
        owner: Entity,
        now: f32,
        wheel: &mut TimerWheel,
        strength: AttackStrength,
    ) -> bool {
        if !self.can_attack(now) {
            return false;
        }
        self.begin(owner, now, wheel, strength, 1);
        true
    }

    fn begin(
        &mut self,
        owner: Entity,
        now: f32,
        wheel: &mut TimerWheel,
        strength: AttackStrength,
        length: u32,
    ) {
        self.strength = strength;
        self.target_length = length;
        self.current_step = 0;
        self.begin_step(owner, now, wheel);
    }

    fn begin_step(&mut self, owner: Entity, now: f32, wheel: &mut TimerWheel) {
        self.current_step += 1;
        self.phase = ComboPhase::WindingUp;
        wheel.schedule(owner, TimerPurpose::WindupElapsed, now + self.tuning.windup);
    }

    fn finish(&mut self, now: f32) {
        self.phase = ComboPhase::Idle;
        self.active_since = None;
        self.next_attack_time = now + self.tuning.combo_cooldown;
    }

    /// Advance on a fired timer. Timers that do not match the current phase
    /// are stale and ignored.
    pub fn on_timer(
        &mut self,
        owner: Entity,
        purpose: TimerPurpose,
        now: f32,
        wheel: &mut TimerWheel,
    ) -> Option<ComboTransition> {
        if !self.enabled {
            return None;
        }

        match (purpose, self.phase) {
            (TimerPurpose::WindupElapsed, ComboPhase::WindingUp) => {
                self.phase = ComboPhase::Active;
                self.active_since = Some(now);
                wheel.schedule(
                    owner,
                    TimerPurpose::ActiveElapsed,
                    now + self.tuning.attack_duration,
                );
                Some(ComboTransition::HitboxOpened {
                    step: self.current_step,
                    strength: self.strength,
                })
            }
            (TimerPurpose::ActiveElapsed, ComboPhase::Active) => {
                self.active_since = None;
                if self.current_step < self.target_length {
                    self.phase = ComboPhase::Recovering;
                    wheel.schedule(
                        owner,
                        TimerPurpose::NextStep,
                        now + self.tuning.inter_attack_delay,
                    );
                    Some(ComboTransition::HitboxClosed {
                        combo_finished: false,
                    })
                } else {
                    self.finish(now);
                    Some(ComboTransition::HitboxClosed {
                        combo_finished: true,
                    })
                }
            }
            (TimerPurpose::NextStep, ComboPhase::Recovering) => {
                self.begin_step(owner, now, wheel);
                Some(ComboTransition::StepStarted {
                    step: self.current_step,
                })
            }
            (TimerPurpose::StunRecovered, ComboPhase::Stunned) => {
                self.phase = ComboPhase::Idle;
                Some(ComboTransition::StunRecovered)
            }
            _ => None,
        }
    }

    /// Try to put the machine into hitstun for `duration` seconds.
    pub fn apply_hitstun(
        &mut self,
        owner: Entity,
        now: f32,
        duration: f32,
        wheel: &mut TimerWheel,
    ) -> StunVerdict {
        if !self.enabled {
            return StunVerdict::Disabled;
        }
        if self.is_stunned() {
            return StunVerdict::AlreadyStunned;
        }
        if let Some(last) = self.last_stun_at {
            if now - last < self.tuning.stun_cooldown {
                return StunVerdict::CoolingDown;
            }
        }
        if self.is_attacking() && !self.tuning.allow_stun_during_attack {
            return StunVerdict::Attacking;
        }

        wheel.cancel_many(owner, &TimerPurpose::ATTACK);
        let hitbox_was_open = self.is_hitbox_open();

        // The interrupted combo counts as ended at the step it reached
        self.target_length = self.current_step;
        self.active_since = None;
        self.phase = ComboPhase::Stunned;
        self.last_stun_at = Some(now);
        wheel.schedule(owner, TimerPurpose::StunRecovered, now + duration);

        StunVerdict::Accepted { hitbox_was_open }
    }

    /// Watchdog for a hit window that never closed. Returns true if the
    /// machine was forced back to Idle.
    pub fn check_stall(&mut self, owner: Entity, now: f32, wheel: &mut TimerWheel) -> bool {
        let Some(since) = self.active_since else {
            return false;
        };
        if self.phase != ComboPhase::Active
            || now - since <= self.tuning.attack_duration + self.tuning.stall_grace
        {
            return false;
        }

        wheel.cancel_many(owner, &TimerPurpose::ATTACK);
        self.target_length = self.current_step;
        self.finish(now);
        true
    }

    /// Switch the machine off for good; pending timers become stale.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.active_since = None;
        self.phase = ComboPhase::Idle;
    }
}
