//! Combat domain: cancelable delayed actions.
//!
//! Every delayed transition in combat (windup end, hit window end, next
//! combo step, stun recovery, corpse removal) is an entry in one
//! [`TimerWheel`] keyed by owner and purpose. Scheduling a key that is
//! already pending replaces it, so a key never fires twice.

use bevy::prelude::*;
use std::collections::{BTreeMap, HashMap};

/// Resolution of the wheel. Due times round up to the next tick and the
/// clock rounds down, so a timer never fires before its due time.
pub const TICKS_PER_SECOND: f32 = 120.0;

/// Fraction of a tick absorbed as float noise when quantizing
const TICK_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerPurpose {
    WindupElapsed,
    ActiveElapsed,
    NextStep,
    StunRecovered,
    Despawn,
}

impl TimerPurpose {
    /// Timers owned by the combo state machine
    pub const COMBO: [TimerPurpose; 4] = [
        TimerPurpose::WindupElapsed,
        TimerPurpose::ActiveElapsed,
        TimerPurpose::NextStep,
        TimerPurpose::StunRecovered,
    ];

    /// Timers that belong to an attack in progress
    pub const ATTACK: [TimerPurpose; 3] = [
        TimerPurpose::WindupElapsed,
        TimerPurpose::ActiveElapsed,
        TimerPurpose::NextStep,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerKey {
    pub owner: Entity,
    pub purpose: TimerPurpose,
}

/// Slot identity: due tick first, then insertion order for ties.
type Slot = (u64, u64);

#[derive(Resource, Debug, Default)]
pub struct TimerWheel {
    slots: BTreeMap<Slot, TimerKey>,
    index: HashMap<TimerKey, Slot>,
    next_seq: u64,
}

fn due_tick(secs: f32) -> u64 {
    (secs.max(0.0) * TICKS_PER_SECOND - TICK_EPSILON).ceil().max(0.0) as u64
}

fn clock_tick(secs: f32) -> u64 {
    (secs.max(0.0) * TICKS_PER_SECOND + TICK_EPSILON).floor() as u64
}

impl TimerWheel {
    /// Schedule `purpose` for `owner` at absolute time `due` (seconds).
    pub fn schedule(&mut self, owner: Entity, purpose: TimerPurpose, due: f32) {
        let key = TimerKey { owner, purpose };
        self.cancel(owner, purpose);

        let slot = (due_tick(due), self.next_seq);
        self.next_seq += 1;
        self.slots.insert(slot, key);
        self.index.insert(key, slot);
    }

    /// Cancel one pending timer. Returns true if something was pending.
    pub fn cancel(&mut self, owner: Entity, purpose: TimerPurpose) -> bool {
        let key = TimerKey { owner, purpose };
        match self.index.remove(&key) {
            Some(slot) => {
                self.slots.remove(&slot);
                true
            }
            None => false,
        }
    }

    pub fn cancel_many(&mut self, owner: Entity, purposes: &[TimerPurpose]) {
        for purpose in purposes {
            self.cancel(owner, *purpose);
        }
    }

    /// Cancel everything scheduled for `owner`. Returns how many were dropped.
    pub fn cancel_owner(&mut self, owner: Entity) -> usize {
        let keys: Vec<TimerKey> = self
            .index
            .keys()
            .filter(|key| key.owner == owner)
            .copied()
            .collect();
        for key in &keys {
            self.cancel(key.owner, key.purpose);
        }
        keys.len()
    }

    pub fn is_pending(&self, owner: Entity, purpose: TimerPurpose) -> bool {
        self.index.contains_key(&TimerKey { owner, purpose })
    }

    /// Due time of a pending timer, quantized to the wheel resolution.
    pub fn due_at(&self, owner: Entity, purpose: TimerPurpose) -> Option<f32> {
        self.index
            .get(&TimerKey { owner, purpose })
            .map(|(tick, _)| *tick as f32 / TICKS_PER_SECOND)
    }

    /// Remove and return every timer due at or before `now`, earliest first.
    /// Timers scheduled while handling the result fire on a later drain.
    pub fn drain_due(&mut self, now: f32) -> Vec<TimerKey> {
        let now_tick = clock_tick(now);
        let mut due = Vec::new();

        while let Some(entry) = self.slots.first_entry() {
            if entry.key().0 > now_tick {
                break;
            }
            let key = entry.remove();
            self.index.remove(&key);
            due.push(key);
        }

        due
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
    }
}
