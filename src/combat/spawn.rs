//! Combat domain: enemy and arena spawning helpers.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::blood::spawn_checkpoint;
use crate::combat::ai::EnemyAi;
use crate::combat::combo::ComboMachine;
use crate::combat::components::{
    AttackProfile, Combatant, DamageFlash, DespawnOnDeath, Enemy, Facing, HitboxLink, HitboxReach,
    NavAgent,
};
use crate::combat::health::{DamageReaction, DropTable, Health};
use crate::combat::hit_detection::AttackHitbox;
use crate::content::CombatDefaults;
use crate::core::ArenaScoped;
use crate::movement::GameLayer;

const ENEMY_SIZE: f32 = 30.0;
const ENEMY_COLOR: Color = Color::srgb(0.75, 0.25, 0.22);
const ENEMY_REACH: f32 = 26.0;
const HITBOX_RADIUS: f32 = 18.0;
const WALL_THICKNESS: f32 = 24.0;

/// Marker for arena walls
#[derive(Component, Debug)]
pub struct Wall;

/// Bundle for spawning a melee enemy body. Its `NavAgent` drives a
/// kinematic body until death turns it into a ragdoll.
#[derive(Bundle)]
pub struct EnemyBundle {
    pub enemy: Enemy,
    pub combatant: Combatant,
    pub health: Health,
    pub combo: ComboMachine,
    pub profile: AttackProfile,
    pub drops: DropTable,
    pub reaction: DamageReaction,
    pub nav: NavAgent,
    pub ai: EnemyAi,
    pub facing: Facing,
    pub reach: HitboxReach,
    pub flash: DamageFlash,
    pub despawn: DespawnOnDeath,
    pub scoped: ArenaScoped,
    pub sprite: Sprite,
    pub transform: Transform,
    pub rigid_body: RigidBody,
    pub collider: Collider,
    pub collision_layers: CollisionLayers,
    pub velocity: LinearVelocity,
    pub locked_axes: LockedAxes,
}

impl EnemyBundle {
    pub fn new(position: Vec2, defaults: &CombatDefaults) -> Self {
        let health = &defaults.health;
        Self {
            enemy: Enemy,
            combatant: Combatant,
            health: Health::new(health.enemy_max),
            combo: ComboMachine::new(defaults.enemy_combo),
            profile: AttackProfile::from(&defaults.enemy_attack),
            drops: DropTable {
                light: health.light_drops,
                heavy: health.heavy_drops,
            },
            reaction: DamageReaction::new(health.reaction_cooldown, health.light_reaction_chance),
            nav: NavAgent::new(defaults.arena.enemy_speed).with_clearance(ENEMY_SIZE / 2.0),
            ai: EnemyAi::from_arena(&defaults.arena),
            facing: Facing(Vec2::NEG_X),
            reach: HitboxReach(ENEMY_REACH),
            flash: DamageFlash::new(ENEMY_COLOR),
            despawn: DespawnOnDeath,
            scoped: ArenaScoped,
            sprite: Sprite {
                color: ENEMY_COLOR,
                custom_size: Some(Vec2::splat(ENEMY_SIZE)),
                ..default()
            },
            transform: Transform::from_xyz(position.x, position.y, 1.0),
            rigid_body: RigidBody::Kinematic,
            collider: Collider::rectangle(ENEMY_SIZE, ENEMY_SIZE),
            collision_layers: CollisionLayers::new(
                GameLayer::Enemy,
                [
                    GameLayer::Wall,
                    GameLayer::Player,
                    GameLayer::Enemy,
                    GameLayer::PlayerHitbox,
                ],
            ),
            velocity: LinearVelocity::default(),
            locked_axes: LockedAxes::ROTATION_LOCKED,
        }
    }
}

/// Spawn the sensor that carries an attacker's strikes. It starts closed.
pub fn spawn_hitbox(
    commands: &mut Commands,
    owner: Entity,
    reach: f32,
    layer: GameLayer,
    targets: GameLayer,
    color: Color,
) -> Entity {
    let hitbox = commands
        .spawn((
            AttackHitbox::new(owner),
            Sprite {
                color,
                custom_size: Some(Vec2::splat(HITBOX_RADIUS * 2.0)),
                ..default()
            },
            Transform::from_xyz(reach, 0.0, 0.5),
            Visibility::Hidden,
            Collider::circle(HITBOX_RADIUS),
            ColliderDensity(0.0),
            Sensor,
            CollisionEventsEnabled,
            ColliderDisabled,
            CollisionLayers::new(layer, [targets]),
            ChildOf(owner),
        ))
        .id();
    commands.entity(owner).insert(HitboxLink(hitbox));
    hitbox
}

pub fn spawn_enemy(commands: &mut Commands, position: Vec2, defaults: &CombatDefaults) -> Entity {
    let enemy = commands.spawn(EnemyBundle::new(position, defaults)).id();
    spawn_hitbox(
        commands,
        enemy,
        ENEMY_REACH,
        GameLayer::EnemyHitbox,
        GameLayer::Player,
        Color::srgba(1.0, 0.3, 0.2, 0.45),
    );
    debug!("Spawned enemy {:?} at {:?}", enemy, position);
    enemy
}

fn spawn_wall(commands: &mut Commands, center: Vec2, size: Vec2) {
    commands.spawn((
        Wall,
        ArenaScoped,
        Sprite {
            color: Color::srgb(0.22, 0.2, 0.24),
            custom_size: Some(size),
            ..default()
        },
        Transform::from_xyz(center.x, center.y, 0.0),
        RigidBody::Static,
        Collider::rectangle(size.x, size.y),
        CollisionLayers::new(
            GameLayer::Wall,
            [GameLayer::Player, GameLayer::Enemy, GameLayer::Default],
        ),
    ));
}

/// Spawn the arena walls, checkpoints and the starting enemies.
pub(crate) fn spawn_arena(mut commands: Commands, defaults: Res<CombatDefaults>) {
    let arena = &defaults.arena;
    let half = Vec2::from(arena.half_extents);
    let span_x = half.x * 2.0 + WALL_THICKNESS * 2.0;
    let span_y = half.y * 2.0;

    spawn_wall(
        &mut commands,
        Vec2::new(0.0, half.y + WALL_THICKNESS / 2.0),
        Vec2::new(span_x, WALL_THICKNESS),
    );
    spawn_wall(
        &mut commands,
        Vec2::new(0.0, -half.y - WALL_THICKNESS / 2.0),
        Vec2::new(span_x, WALL_THICKNESS),
    );
    spawn_wall(
        &mut commands,
        Vec2::new(half.x + WALL_THICKNESS / 2.0, 0.0),
        Vec2::new(WALL_THICKNESS, span_y),
    );
    spawn_wall(
        &mut commands,
        Vec2::new(-half.x - WALL_THICKNESS / 2.0, 0.0),
        Vec2::new(WALL_THICKNESS, span_y),
    );

    for point in &arena.checkpoints {
        spawn_checkpoint(&mut commands, Vec2::from(*point));
    }

    for point in &arena.enemy_spawns {
        spawn_enemy(&mut commands, Vec2::from(*point), &defaults);
    }

    info!(
        "Arena ready: {} enemies, {} checkpoints",
        arena.enemy_spawns.len(),
        arena.checkpoints.len()
    );
}
