//! Debug domain: tests for the combat snapshot.

use super::*;
use crate::blood::BloodMeter;
use crate::combat::{ComboMachine, Health, KillCounter};
use crate::content::{CombatDefaults, ObjectiveCatalog};
use crate::objectives::ObjectiveTracker;

#[test]
fn test_snapshot_serializes_player_and_counters() {
    let defaults = CombatDefaults::default();
    let mut health = Health::new(100.0);
    health.take_damage(25.0);
    let mut meter = BloodMeter::new(100.0);
    meter.drain(10.0);
    let combo = ComboMachine::new(defaults.player_combo);

    let kills = KillCounter {
        enemies: 4,
        player_deaths: 1,
    };
    let tracker = ObjectiveTracker::from_catalog(&ObjectiveCatalog::default());

    let snapshot = CombatSnapshot {
        attempt_seed: 42,
        pending_timers: 3,
        enemies_alive: 2,
        player: Some(PlayerSnapshot::capture(&health, &meter, &combo)),
        kills: &kills,
        objectives: &tracker,
    };
    let json = snapshot.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["attempt_seed"], 42);
    assert_eq!(value["pending_timers"], 3);
    assert_eq!(value["kills"]["enemies"], 4);
    assert_eq!(value["player"]["health"], 75.0);
    assert_eq!(value["player"]["blood"], 90.0);
    assert_eq!(value["player"]["phase"], "Idle");
    assert_eq!(value["player"]["combo_enabled"], true);
    assert_eq!(value["player"]["next_attack_time"], 0.0);
}

#[test]
fn test_snapshot_without_player() {
    let kills = KillCounter::default();
    let tracker = ObjectiveTracker::default();
    let snapshot = CombatSnapshot {
        attempt_seed: 7,
        pending_timers: 0,
        enemies_alive: 0,
        player: None,
        kills: &kills,
        objectives: &tracker,
    };
    let value: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
    assert!(value["player"].is_null());
}

#[test]
fn test_status_message_expires() {
    let mut state = DebugState::default();
    state.set_message("hello", 1.0);
    state.tick(0.5);
    assert!(state.status_message.is_some());
    state.tick(0.6);
    assert!(state.status_message.is_none());
}
