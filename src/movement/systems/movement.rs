//! Movement domain: top-down locomotion, facing and player strikes.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::combat::{AttackStrength, ComboMachine, Facing, Health, TimerWheel};
use crate::movement::{Control, MovementInput, MovementTuning, Player};

pub(crate) fn control_for(combo: &ComboMachine, health: &Health) -> Control {
    if health.is_dead() || combo.is_stunned() {
        Control::Locked
    } else if combo.is_attacking() {
        Control::Attacking
    } else {
        Control::Free
    }
}

pub(crate) fn apply_movement(
    time: Res<Time>,
    input: Res<MovementInput>,
    tuning: Res<MovementTuning>,
    mut query: Query<(&ComboMachine, &Health, &mut LinearVelocity), With<Player>>,
) {
    let dt = time.delta_secs();

    for (combo, health, mut velocity) in &mut query {
        let control = control_for(combo, health);
        let target = input.axis * tuning.top_speed(control);

        // Knockback above top speed bleeds off at the deceleration rate
        let rate = if input.axis != Vec2::ZERO && control != Control::Locked {
            tuning.accel
        } else {
            tuning.decel
        };
        velocity.0 = velocity.0.move_towards(target, rate * dt);
    }
}

pub(crate) fn update_facing(
    input: Res<MovementInput>,
    mut query: Query<(&ComboMachine, &Health, &mut Facing), With<Player>>,
) {
    for (combo, health, mut facing) in &mut query {
        if control_for(combo, health) == Control::Free {
            facing.turn_toward(input.axis);
        }
    }
}

pub(crate) fn player_attacks(
    time: Res<Time>,
    input: Res<MovementInput>,
    mut wheel: ResMut<TimerWheel>,
    mut query: Query<(Entity, &mut ComboMachine, &Health), With<Player>>,
) {
    let strength = if input.heavy_attack {
        AttackStrength::Heavy
    } else if input.light_attack {
        AttackStrength::Light
    } else {
        return;
    };
    let now = time.elapsed_secs();

    for (entity, mut combo, health) in &mut query {
        if health.is_dead() {
            continue;
        }
        if combo.start_strike(entity, now, &mut wheel, strength) {
            debug!("Player {:?} strike", strength);
        }
    }
}
