//! Combat domain: turning accepted hits into damage, knockback and hitstun.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::blood::BloodMeter;
use crate::combat::combo::{ComboMachine, StunVerdict};
use crate::combat::components::{AttackProfile, AttackStrength, HitboxLink, NavAgent};
use crate::combat::events::{DamageEvent, HitEvent, StunAppliedEvent};
use crate::combat::hit_detection::{AttackHitbox, close_hitbox};
use crate::combat::health::Health;
use crate::combat::schedule::TimerWheel;
use crate::content::CombatDefaults;

/// Effects of one hit before they are applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResolution {
    pub damage: f32,
    pub force: f32,
    pub stun: f32,
}

/// Compute damage, knockback magnitude and hitstun for a strike.
/// `modifier` is the attacker's blood modifier (1.0 without a meter).
pub fn resolve_hit(
    profile: &AttackProfile,
    strength: AttackStrength,
    modifier: f32,
) -> HitResolution {
    let (damage_mult, force_mult, stun) = match strength {
        AttackStrength::Light => (1.0, 1.0, profile.light_stun),
        AttackStrength::Heavy => (
            profile.heavy_damage_multiplier,
            profile.heavy_force_multiplier,
            profile.heavy_stun,
        ),
    };

    HitResolution {
        damage: profile.base_damage * damage_mult * modifier,
        force: profile.base_force * force_mult,
        stun,
    }
}

/// Knockback direction from the force origin to the target.
pub fn knockback_direction(origin: Vec2, target: Vec2) -> Vec2 {
    (target - origin).normalize_or_zero()
}

pub(crate) fn resolve_hits(
    mut commands: Commands,
    mut hit_events: MessageReader<HitEvent>,
    mut damage_events: MessageWriter<DamageEvent>,
    mut stun_events: MessageWriter<StunAppliedEvent>,
    time: Res<Time>,
    defaults: Res<CombatDefaults>,
    mut wheel: ResMut<TimerWheel>,
    attackers: Query<(&AttackProfile, Option<&BloodMeter>)>,
    transforms: Query<&GlobalTransform>,
    mut targets: Query<(
        Option<&mut ComboMachine>,
        Option<&mut LinearVelocity>,
        Option<&RigidBody>,
        Option<&HitboxLink>,
        Option<&NavAgent>,
        Option<&Health>,
    )>,
    mut hitboxes: Query<&mut AttackHitbox>,
) {
    let now = time.elapsed_secs();

    for hit in hit_events.read() {
        let Ok((profile, blood)) = attackers.get(hit.attacker) else {
            warn!("Attacker {:?} has no AttackProfile; hit ignored", hit.attacker);
            continue;
        };
        let modifier = blood
            .map(|meter| meter.damage_modifier(&defaults.blood))
            .unwrap_or(1.0);
        let resolution = resolve_hit(profile, hit.strength, modifier);

        let Ok((combo, velocity, body, link, nav, health)) = targets.get_mut(hit.target) else {
            continue;
        };

        // Corpses belong to the ragdoll solver
        if health.is_some_and(Health::is_dead) {
            debug!("Hit on dead {:?} ignored", hit.target);
            continue;
        }

        if health.is_some() {
            damage_events.write(DamageEvent {
                source: hit.attacker,
                target: hit.target,
                amount: resolution.damage,
                strength: hit.strength,
            });
        } else {
            warn!("Hit target {:?} has no Health; damage skipped", hit.target);
        }

        if let Some(mut combo) = combo {
            match combo.apply_hitstun(hit.target, now, resolution.stun, &mut wheel) {
                StunVerdict::Accepted { hitbox_was_open } => {
                    if let Some(HitboxLink(hitbox_entity)) = link {
                        if let Ok(mut hitbox) = hitboxes.get_mut(*hitbox_entity) {
                            close_hitbox(&mut commands, *hitbox_entity, &mut hitbox);
                        }
                    }
                    stun_events.write(StunAppliedEvent {
                        entity: hit.target,
                        duration: resolution.stun,
                    });
                    debug!(
                        "{:?} stunned for {:.2}s (hit window interrupted: {})",
                        hit.target, resolution.stun, hitbox_was_open
                    );
                }
                verdict => {
                    debug!("Stun on {:?} rejected: {:?}", hit.target, verdict);
                }
            }
        }

        if nav.is_some_and(|nav| nav.enabled) {
            // The agent owns this body's motion; take it out of the solver instead
            if let Some(body) = body {
                if *body != RigidBody::Kinematic {
                    commands.entity(hit.target).insert(RigidBody::Kinematic);
                }
            }
            continue;
        }

        let Some(mut velocity) = velocity else {
            warn!("Hit target {:?} has no physics body; knockback skipped", hit.target);
            continue;
        };
        let (Ok(origin), Ok(target)) = (transforms.get(hit.attacker), transforms.get(hit.target))
        else {
            continue;
        };
        let direction = knockback_direction(
            origin.translation().truncate(),
            target.translation().truncate(),
        );
        velocity.0 += direction * resolution.force;

        debug!(
            "Knockback on {:?}: force={:.1}, velocity=({:.1}, {:.1})",
            hit.target, resolution.force, velocity.x, velocity.y
        );
    }
}
