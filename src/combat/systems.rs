//! Combat domain: timer dispatch, hitbox upkeep and hit feedback.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::combat::combo::{ComboMachine, ComboTransition};
use crate::combat::components::{DamageFlash, Enemy, Facing, HitboxLink, HitboxReach};
use crate::combat::events::{DamageEvent, DeathEvent, ReactionTriggeredEvent, StunAppliedEvent};
use crate::combat::hit_detection::{AttackHitbox, close_hitbox, open_hitbox};
use crate::combat::resources::{FeedbackTuning, KillCounter};
use crate::combat::schedule::{TimerPurpose, TimerWheel};
use crate::core::CameraShake;
use crate::movement::Player;

const HURT_COLOR: Color = Color::srgb(1.0, 0.55, 0.5);
const STUN_COLOR: Color = Color::srgb(1.0, 0.9, 0.45);

/// Fire every timer that is due and route it to its owner.
pub(crate) fn dispatch_timers(
    mut commands: Commands,
    time: Res<Time>,
    mut wheel: ResMut<TimerWheel>,
    mut owners: Query<(&mut ComboMachine, Option<&HitboxLink>)>,
    mut hitboxes: Query<&mut AttackHitbox>,
) {
    let now = time.elapsed_secs();

    for key in wheel.drain_due(now) {
        if key.purpose == TimerPurpose::Despawn {
            wheel.cancel_owner(key.owner);
            if let Ok(mut entity_commands) = commands.get_entity(key.owner) {
                entity_commands.despawn();
                debug!("Despawned {:?}", key.owner);
            }
            continue;
        }

        let Ok((mut combo, link)) = owners.get_mut(key.owner) else {
            continue;
        };
        let Some(transition) = combo.on_timer(key.owner, key.purpose, now, &mut wheel) else {
            continue;
        };

        let hitbox = link.and_then(|HitboxLink(entity)| {
            hitboxes.get_mut(*entity).ok().map(|hitbox| (*entity, hitbox))
        });

        match transition {
            ComboTransition::HitboxOpened { step, strength } => {
                if let Some((entity, mut hitbox)) = hitbox {
                    open_hitbox(&mut commands, entity, &mut hitbox, strength);
                }
                debug!("{:?} swing {} ({:?}) active", key.owner, step, strength);
            }
            ComboTransition::HitboxClosed { combo_finished } => {
                if let Some((entity, mut hitbox)) = hitbox {
                    close_hitbox(&mut commands, entity, &mut hitbox);
                }
                if combo_finished {
                    debug!(
                        "{:?} finished a combo of {}",
                        key.owner,
                        combo.current_step()
                    );
                }
            }
            ComboTransition::StepStarted { step } => {
                debug!("{:?} winds up step {}", key.owner, step);
            }
            ComboTransition::StunRecovered => {
                debug!("{:?} recovered from hitstun", key.owner);
            }
        }
    }
}

/// Force-close hit windows whose closing timer never arrived.
pub(crate) fn watch_stalled_attacks(
    mut commands: Commands,
    time: Res<Time>,
    mut wheel: ResMut<TimerWheel>,
    mut owners: Query<(Entity, &mut ComboMachine, Option<&HitboxLink>)>,
    mut hitboxes: Query<&mut AttackHitbox>,
) {
    let now = time.elapsed_secs();

    for (entity, mut combo, link) in &mut owners {
        if !combo.check_stall(entity, now, &mut wheel) {
            continue;
        }
        if let Some(HitboxLink(hitbox_entity)) = link {
            if let Ok(mut hitbox) = hitboxes.get_mut(*hitbox_entity) {
                close_hitbox(&mut commands, *hitbox_entity, &mut hitbox);
            }
        }
        warn!("{:?} hit window stalled; forced back to idle", entity);
    }
}

/// Keep each hitbox in front of its owner and show it while open.
pub(crate) fn aim_hitboxes(
    owners: Query<(&Facing, &HitboxReach, &HitboxLink)>,
    mut hitboxes: Query<(&AttackHitbox, &mut Transform, &mut Visibility)>,
) {
    for (facing, reach, link) in &owners {
        let Ok((hitbox, mut transform, mut visibility)) = hitboxes.get_mut(link.0) else {
            continue;
        };
        let offset = facing.0 * reach.0;
        transform.translation.x = offset.x;
        transform.translation.y = offset.y;
        let wanted = if hitbox.is_open() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        visibility.set_if_neq(wanted);
    }
}

pub(crate) fn flash_on_reaction(
    mut reactions: MessageReader<ReactionTriggeredEvent>,
    mut stuns: MessageReader<StunAppliedEvent>,
    tuning: Res<FeedbackTuning>,
    mut query: Query<(&mut DamageFlash, &mut Sprite)>,
) {
    for event in reactions.read() {
        if let Ok((mut flash, mut sprite)) = query.get_mut(event.entity) {
            flash.timer = flash.timer.max(tuning.damage_flash_duration);
            sprite.color = HURT_COLOR;
        }
    }
    for event in stuns.read() {
        if let Ok((mut flash, mut sprite)) = query.get_mut(event.entity) {
            flash.timer = tuning.stun_tint_duration.min(event.duration);
            sprite.color = STUN_COLOR;
        }
    }
}

pub(crate) fn tick_damage_flash(time: Res<Time>, mut query: Query<(&mut DamageFlash, &mut Sprite)>) {
    let dt = time.delta_secs();
    for (mut flash, mut sprite) in &mut query {
        if flash.timer <= 0.0 {
            continue;
        }
        flash.timer -= dt;
        if flash.timer <= 0.0 {
            flash.timer = 0.0;
            sprite.color = flash.base_color;
        }
    }
}

pub(crate) fn shake_on_impact(
    mut damage_events: MessageReader<DamageEvent>,
    mut death_events: MessageReader<DeathEvent>,
    tuning: Res<FeedbackTuning>,
    mut shake: ResMut<CameraShake>,
    players: Query<(), With<Player>>,
) {
    for event in damage_events.read() {
        if players.contains(event.target) {
            shake.add_trauma(tuning.player_hurt_trauma);
        } else if event.strength.is_heavy() {
            shake.add_trauma(tuning.heavy_hit_trauma);
        }
    }
    for _ in death_events.read() {
        shake.add_trauma(tuning.death_trauma);
    }
}

pub(crate) fn count_kills(
    mut death_events: MessageReader<DeathEvent>,
    mut kills: ResMut<KillCounter>,
    enemies: Query<(), With<Enemy>>,
    players: Query<(), With<Player>>,
) {
    for event in death_events.read() {
        if enemies.contains(event.entity) {
            kills.enemies += 1;
            info!("Enemies defeated: {}", kills.enemies);
        } else if players.contains(event.entity) {
            kills.player_deaths += 1;
        }
    }
}

pub(crate) fn reset_combat_state(mut wheel: ResMut<TimerWheel>, mut kills: ResMut<KillCounter>) {
    wheel.clear();
    kills.reset();
}
