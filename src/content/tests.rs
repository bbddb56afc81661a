//! Content domain: unit tests for RON parsing and validation.

use super::loader::{ContentLoadError, parse_combat_defaults, parse_objectives};
use super::validation::{validate_defaults, validate_objectives};
use super::*;
use crate::blood::BloodBand;

const COMBAT_RON: &str = include_str!("../../assets/data/combat.ron");
const OBJECTIVES_RON: &str = include_str!("../../assets/data/objectives.ron");

#[test]
fn test_shipped_combat_ron_matches_builtin_defaults() {
    let parsed = parse_combat_defaults("combat.ron", COMBAT_RON).expect("combat.ron parses");
    let builtin = CombatDefaults::default();

    assert_eq!(parsed.player_attack, builtin.player_attack);
    assert_eq!(parsed.enemy_attack, builtin.enemy_attack);
    assert_eq!(parsed.player_combo, builtin.player_combo);
    assert_eq!(parsed.enemy_combo, builtin.enemy_combo);
    assert_eq!(parsed.health.despawn_delay, Some(2.5));
    assert_eq!(parsed.health.heavy_drops, builtin.health.heavy_drops);
    assert_eq!(parsed.blood.damage_modifiers, builtin.blood.damage_modifiers);
    assert_eq!(parsed.arena.enemy_spawns.len(), 3);
}

#[test]
fn test_builtin_defaults_are_valid() {
    assert!(validate_defaults(&CombatDefaults::default()).is_empty());
    assert!(validate_objectives(&ObjectiveCatalog::tutorial().0).is_empty());
}

#[test]
fn test_shipped_objectives_parse() {
    let objectives = parse_objectives("objectives.ron", OBJECTIVES_RON).expect("objectives parse");
    assert_eq!(objectives.len(), 4);
    assert_eq!(objectives[0].id, "first_blood");
    assert_eq!(
        objectives[2].kind,
        ObjectiveKind::ReachBloodBand {
            band: BloodBand::Moderate
        }
    );
    assert_eq!(objectives[3].kind, ObjectiveKind::ReachCheckpoint);
}

#[test]
fn test_parse_error_reports_file() {
    let errors = parse_combat_defaults("broken.ron", "(schema_version: ").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(matches!(&errors[0], ContentLoadError::Parse { file, .. } if file == "broken.ron"));
    assert!(errors[0].to_string().contains("broken.ron"));
}

#[test]
fn test_inverted_combo_range_is_rejected() {
    let mut defaults = CombatDefaults::default();
    defaults.enemy_combo.min_combo_attacks = 4;
    defaults.enemy_combo.max_combo_attacks = 2;

    let errors = validate_defaults(&defaults);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "enemy_combo.max_combo_attacks");
}

#[test]
fn test_unordered_band_cuts_are_rejected() {
    let mut defaults = CombatDefaults::default();
    defaults.blood.moderate_below = 0.7;

    let errors = validate_defaults(&defaults);
    assert!(errors.iter().any(|e| e.field == "blood"));
}

#[test]
fn test_negative_durations_are_rejected() {
    let mut defaults = CombatDefaults::default();
    defaults.player_combo.windup = -0.1;
    defaults.health.despawn_delay = Some(-1.0);

    let fields: Vec<_> = validate_defaults(&defaults)
        .into_iter()
        .map(|e| e.field)
        .collect();
    assert!(fields.contains(&"player_combo.windup".to_string()));
    assert!(fields.contains(&"health.despawn_delay".to_string()));
}

#[test]
fn test_duplicate_objective_ids_are_rejected() {
    let objectives = vec![
        ObjectiveDef {
            id: "a".to_string(),
            label: "A".to_string(),
            kind: ObjectiveKind::ReachCheckpoint,
        },
        ObjectiveDef {
            id: "a".to_string(),
            label: "A again".to_string(),
            kind: ObjectiveKind::DefeatEnemies { count: 0 },
        },
    ];

    let errors = validate_objectives(&objectives);
    assert_eq!(errors.len(), 2);
}
