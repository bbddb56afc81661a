//! Combat domain: hitbox overlap filtering.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::combat::components::{AttackStrength, Combatant};
use crate::combat::events::HitEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitVerdict {
    Accept,
    RejectDuplicate,
    RejectSelf,
}

/// Targets already struck by the current swing
#[derive(Debug, Default, Clone)]
pub struct HitSet {
    hit_entities: Vec<Entity>,
}

impl HitSet {
    /// Register `target` against a swing owned by `owner`. Only `Accept`
    /// changes the set.
    pub fn register(&mut self, target: Entity, owner: Entity) -> HitVerdict {
        if target == owner {
            return HitVerdict::RejectSelf;
        }
        if self.hit_entities.contains(&target) {
            return HitVerdict::RejectDuplicate;
        }
        self.hit_entities.push(target);
        HitVerdict::Accept
    }

    pub fn contains(&self, target: Entity) -> bool {
        self.hit_entities.contains(&target)
    }

    pub fn len(&self) -> usize {
        self.hit_entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hit_entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.hit_entities.clear();
    }
}

/// Sensor child of an attacker. Only reports hits while open.
#[derive(Component, Debug)]
pub struct AttackHitbox {
    pub owner: Entity,
    strength: AttackStrength,
    open: bool,
    hit_set: HitSet,
}

impl AttackHitbox {
    pub fn new(owner: Entity) -> Self {
        Self {
            owner,
            strength: AttackStrength::Light,
            open: false,
            hit_set: HitSet::default(),
        }
    }

    pub fn open(&mut self, strength: AttackStrength) {
        self.strength = strength;
        self.open = true;
        self.hit_set.clear();
    }

    pub fn close(&mut self) {
        self.open = false;
        self.hit_set.clear();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn strength(&self) -> AttackStrength {
        self.strength
    }

    pub fn hit_set(&self) -> &HitSet {
        &self.hit_set
    }

    /// Returns `None` while closed; overlaps outside the hit window are ignored.
    pub fn register(&mut self, target: Entity) -> Option<HitVerdict> {
        if !self.open {
            return None;
        }
        Some(self.hit_set.register(target, self.owner))
    }
}

/// Open a hitbox and let its collider report overlaps again.
pub(crate) fn open_hitbox(
    commands: &mut Commands,
    entity: Entity,
    hitbox: &mut AttackHitbox,
    strength: AttackStrength,
) {
    hitbox.open(strength);
    if let Ok(mut entity_commands) = commands.get_entity(entity) {
        entity_commands.remove::<ColliderDisabled>();
    }
}

/// Close a hitbox and disable its collider.
pub(crate) fn close_hitbox(commands: &mut Commands, entity: Entity, hitbox: &mut AttackHitbox) {
    hitbox.close();
    if let Ok(mut entity_commands) = commands.get_entity(entity) {
        entity_commands.insert(ColliderDisabled);
    }
}

/// Walk up the hierarchy to the top-level entity.
pub(crate) fn hierarchy_root(entity: Entity, parents: &Query<&ChildOf>) -> Entity {
    let mut current = entity;
    while let Ok(child_of) = parents.get(current) {
        current = child_of.parent();
    }
    current
}

pub(crate) fn detect_hits(
    mut collision_events: MessageReader<CollisionStart>,
    mut hit_events: MessageWriter<HitEvent>,
    mut hitbox_query: Query<&mut AttackHitbox>,
    parents: Query<&ChildOf>,
    combatants: Query<(), With<Combatant>>,
) {
    for event in collision_events.read() {
        let pairs = [
            (event.collider1, event.collider2, event.body2),
            (event.collider2, event.collider1, event.body1),
        ];

        for (hitbox_entity, other_collider, other_body) in pairs {
            let Ok(mut hitbox) = hitbox_query.get_mut(hitbox_entity) else {
                continue;
            };

            let target = hierarchy_root(other_body.unwrap_or(other_collider), &parents);
            if target != hitbox.owner && !combatants.contains(target) {
                continue;
            }

            match hitbox.register(target) {
                Some(HitVerdict::Accept) => {
                    hit_events.write(HitEvent {
                        attacker: hitbox.owner,
                        target,
                        hitbox: hitbox_entity,
                        strength: hitbox.strength(),
                    });
                }
                Some(verdict) => {
                    debug!(
                        "Hitbox {:?} ignored {:?}: {:?}",
                        hitbox_entity, target, verdict
                    );
                }
                None => {}
            }
        }
    }
}
