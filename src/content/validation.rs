//! Validation for combat tuning and objective definitions.

use std::collections::HashSet;

use thiserror::Error;

use super::data::*;

/// A validation error with context about what failed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Helper macro for checking a duration or amount is not negative
macro_rules! check_non_negative {
    ($errors:expr, $field:expr, $value:expr) => {
        if !($value >= 0.0) {
            $errors.push(ValidationError::new(
                $field,
                format!("must be >= 0, got {}", $value),
            ));
        }
    };
}

/// Helper macro for checking a value lies in [0, 1]
macro_rules! check_fraction {
    ($errors:expr, $field:expr, $value:expr) => {
        if !(0.0..=1.0).contains(&$value) {
            $errors.push(ValidationError::new(
                $field,
                format!("must be within [0, 1], got {}", $value),
            ));
        }
    };
}

fn validate_attack(errors: &mut Vec<ValidationError>, prefix: &str, attack: &AttackDef) {
    check_non_negative!(errors, format!("{prefix}.base_damage"), attack.base_damage);
    check_non_negative!(errors, format!("{prefix}.base_force"), attack.base_force);
    check_non_negative!(
        errors,
        format!("{prefix}.heavy_damage_multiplier"),
        attack.heavy_damage_multiplier
    );
    check_non_negative!(
        errors,
        format!("{prefix}.heavy_force_multiplier"),
        attack.heavy_force_multiplier
    );
    check_non_negative!(errors, format!("{prefix}.light_stun"), attack.light_stun);
    check_non_negative!(errors, format!("{prefix}.heavy_stun"), attack.heavy_stun);
}

fn validate_combo(errors: &mut Vec<ValidationError>, prefix: &str, combo: &ComboDef) {
    if combo.min_combo_attacks == 0 {
        errors.push(ValidationError::new(
            format!("{prefix}.min_combo_attacks"),
            "a combo needs at least one attack",
        ));
    }
    if combo.min_combo_attacks > combo.max_combo_attacks {
        errors.push(ValidationError::new(
            format!("{prefix}.max_combo_attacks"),
            format!(
                "max ({}) is below min ({})",
                combo.max_combo_attacks, combo.min_combo_attacks
            ),
        ));
    }
    check_non_negative!(errors, format!("{prefix}.windup"), combo.windup);
    check_non_negative!(errors, format!("{prefix}.attack_duration"), combo.attack_duration);
    check_non_negative!(
        errors,
        format!("{prefix}.inter_attack_delay"),
        combo.inter_attack_delay
    );
    check_non_negative!(errors, format!("{prefix}.combo_cooldown"), combo.combo_cooldown);
    check_non_negative!(errors, format!("{prefix}.stall_grace"), combo.stall_grace);
    check_non_negative!(errors, format!("{prefix}.stun_cooldown"), combo.stun_cooldown);
}

/// Validate all combat defaults.
/// Returns a list of validation errors, empty if everything is usable.
pub fn validate_defaults(defaults: &CombatDefaults) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_attack(&mut errors, "player_attack", &defaults.player_attack);
    validate_attack(&mut errors, "enemy_attack", &defaults.enemy_attack);
    validate_combo(&mut errors, "player_combo", &defaults.player_combo);
    validate_combo(&mut errors, "enemy_combo", &defaults.enemy_combo);

    let health = &defaults.health;
    if health.player_max <= 0.0 {
        errors.push(ValidationError::new("health.player_max", "must be > 0"));
    }
    if health.enemy_max <= 0.0 {
        errors.push(ValidationError::new("health.enemy_max", "must be > 0"));
    }
    for (field, range) in [
        ("health.light_drops", health.light_drops),
        ("health.heavy_drops", health.heavy_drops),
    ] {
        if range.min > range.max {
            errors.push(ValidationError::new(
                field,
                format!("min ({}) exceeds max ({})", range.min, range.max),
            ));
        }
    }
    check_non_negative!(errors, "health.drop_jitter", health.drop_jitter);
    check_fraction!(
        errors,
        "health.light_reaction_chance",
        health.light_reaction_chance
    );
    check_non_negative!(errors, "health.reaction_cooldown", health.reaction_cooldown);
    if let Some(delay) = health.despawn_delay {
        check_non_negative!(errors, "health.despawn_delay", delay);
    }

    let blood = &defaults.blood;
    if blood.max <= 0.0 {
        errors.push(ValidationError::new("blood.max", "must be > 0"));
    }
    check_non_negative!(errors, "blood.drain_per_second", blood.drain_per_second);
    check_non_negative!(errors, "blood.pickup_value", blood.pickup_value);
    check_fraction!(errors, "blood.mild_below", blood.mild_below);
    check_fraction!(errors, "blood.moderate_below", blood.moderate_below);
    check_fraction!(errors, "blood.severe_below", blood.severe_below);
    if !(blood.mild_below >= blood.moderate_below && blood.moderate_below >= blood.severe_below) {
        errors.push(ValidationError::new(
            "blood",
            "band cuts must satisfy mild_below >= moderate_below >= severe_below",
        ));
    }
    for (band, value) in [
        ("optimal", blood.vignette.optimal),
        ("mild", blood.vignette.mild),
        ("moderate", blood.vignette.moderate),
        ("severe", blood.vignette.severe),
    ] {
        check_fraction!(errors, format!("blood.vignette.{band}"), value);
    }
    check_non_negative!(
        errors,
        "blood.checkpoint_blood_restore",
        blood.checkpoint_blood_restore
    );
    check_non_negative!(
        errors,
        "blood.checkpoint_health_restore",
        blood.checkpoint_health_restore
    );

    let arena = &defaults.arena;
    if arena.half_extents[0] <= 0.0 || arena.half_extents[1] <= 0.0 {
        errors.push(ValidationError::new("arena.half_extents", "must be > 0"));
    }
    check_non_negative!(errors, "arena.player_speed", arena.player_speed);
    check_non_negative!(errors, "arena.enemy_speed", arena.enemy_speed);
    if arena.attack_range > arena.aggro_range {
        errors.push(ValidationError::new(
            "arena.attack_range",
            "must not exceed aggro_range",
        ));
    }
    check_fraction!(errors, "arena.enemy_heavy_chance", arena.enemy_heavy_chance);

    errors
}

/// Validate objective definitions: ids must be unique and counts positive.
pub fn validate_objectives(objectives: &[ObjectiveDef]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for objective in objectives {
        if !seen.insert(objective.id.as_str()) {
            errors.push(ValidationError::new(
                format!("objectives.{}", objective.id),
                "duplicate objective id",
            ));
        }
        match objective.kind {
            ObjectiveKind::DefeatEnemies { count } | ObjectiveKind::CollectPickups { count }
                if count == 0 =>
            {
                errors.push(ValidationError::new(
                    format!("objectives.{}", objective.id),
                    "count must be > 0",
                ));
            }
            _ => {}
        }
    }

    errors
}
