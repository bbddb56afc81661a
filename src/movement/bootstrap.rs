//! Movement domain: player bootstrap from combat content.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::blood::BloodMeter;
use crate::combat::{
    AttackProfile, Combatant, ComboMachine, DamageFlash, DamageReaction, Facing, Health,
    HitboxReach, spawn_hitbox,
};
use crate::content::CombatDefaults;
use crate::core::ArenaScoped;
use crate::movement::{GameLayer, MovementTuning, Player};

const PLAYER_SIZE: Vec2 = Vec2::new(24.0, 32.0);
const PLAYER_COLOR: Color = Color::srgb(0.9, 0.9, 0.92);
const PLAYER_REACH: f32 = 30.0;

/// Spawn the player with data-driven stats.
/// Runs on entering `GameState::Playing`.
pub(crate) fn spawn_player(
    mut commands: Commands,
    defaults: Res<CombatDefaults>,
    mut tuning: ResMut<MovementTuning>,
    existing_player: Query<Entity, With<Player>>,
) {
    if !existing_player.is_empty() {
        info!("Player already exists, skipping spawn");
        return;
    }

    tuning.max_speed = defaults.arena.player_speed;
    let health = &defaults.health;

    let player = commands
        .spawn((
            // Identity
            (Player, Combatant, Facing::default(), ArenaScoped),
            // Combat
            (
                Health::new(health.player_max),
                ComboMachine::new(defaults.player_combo),
                AttackProfile::from(&defaults.player_attack),
                DamageReaction::new(health.reaction_cooldown, health.light_reaction_chance),
                BloodMeter::new(defaults.blood.max),
                HitboxReach(PLAYER_REACH),
                DamageFlash::new(PLAYER_COLOR),
            ),
            // Rendering
            Sprite {
                color: PLAYER_COLOR,
                custom_size: Some(PLAYER_SIZE),
                ..default()
            },
            Transform::from_xyz(0.0, 0.0, 2.0),
            // Physics
            (
                RigidBody::Dynamic,
                Collider::rectangle(PLAYER_SIZE.x, PLAYER_SIZE.y),
                LockedAxes::ROTATION_LOCKED,
                LinearVelocity::default(),
                Friction::new(0.0),
                CollisionEventsEnabled,
                CollisionLayers::new(
                    GameLayer::Player,
                    [
                        GameLayer::Wall,
                        GameLayer::Enemy,
                        GameLayer::EnemyHitbox,
                        GameLayer::Pickup,
                        GameLayer::Trigger,
                    ],
                ),
            ),
        ))
        .id();

    spawn_hitbox(
        &mut commands,
        player,
        PLAYER_REACH,
        GameLayer::PlayerHitbox,
        GameLayer::Enemy,
        Color::srgba(0.95, 0.95, 1.0, 0.4),
    );

    info!(
        "Spawning player: health={}, blood={}, base damage={}",
        health.player_max, defaults.blood.max, defaults.player_attack.base_damage
    );
}
