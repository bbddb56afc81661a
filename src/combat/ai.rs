//! Combat domain: enemy AI updates and attacks.

use avian2d::prelude::*;
use bevy::prelude::*;
use rand::Rng;
use serde::Serialize;

use crate::combat::combo::ComboMachine;
use crate::combat::components::{AttackStrength, Enemy, Facing, NavAgent};
use crate::combat::health::Health;
use crate::combat::ragdoll::RagdollDisable;
use crate::combat::resources::GameRng;
use crate::combat::schedule::TimerWheel;
use crate::content::{ArenaDef, CombatDefaults};
use crate::movement::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AiState {
    #[default]
    Idle,
    Chase,
    Attack,
    Stunned,
}

#[derive(Component, Debug)]
pub struct EnemyAi {
    pub state: AiState,
    pub aggro_range: f32,
    pub attack_range: f32,
    pub heavy_chance: f32,
    pub enabled: bool,
}

impl EnemyAi {
    pub fn from_arena(arena: &ArenaDef) -> Self {
        Self {
            state: AiState::Idle,
            aggro_range: arena.aggro_range,
            attack_range: arena.attack_range,
            heavy_chance: arena.enemy_heavy_chance,
            enabled: true,
        }
    }

    /// Pick the state for this frame given the distance to the player.
    /// An attack in progress or a stun always wins over distance.
    pub fn decide(&self, distance: Option<f32>, combo: &ComboMachine) -> AiState {
        if combo.is_stunned() {
            return AiState::Stunned;
        }
        if combo.is_attacking() {
            return AiState::Attack;
        }
        match distance {
            Some(d) if d <= self.attack_range => AiState::Attack,
            Some(d) if d <= self.aggro_range => AiState::Chase,
            _ => AiState::Idle,
        }
    }
}

impl RagdollDisable for EnemyAi {
    fn disable_for_ragdoll(&mut self) {
        self.enabled = false;
        self.state = AiState::Idle;
    }
}

pub(crate) fn update_enemy_ai(
    time: Res<Time>,
    mut rng: ResMut<GameRng>,
    mut wheel: ResMut<TimerWheel>,
    player_query: Query<(&GlobalTransform, &Health), With<Player>>,
    mut enemy_query: Query<
        (
            Entity,
            &GlobalTransform,
            &mut EnemyAi,
            &mut ComboMachine,
            &mut NavAgent,
            &mut Facing,
        ),
        With<Enemy>,
    >,
) {
    let now = time.elapsed_secs();

    let player_pos = player_query
        .iter()
        .find(|(_, health)| !health.is_dead())
        .map(|(transform, _)| transform.translation().truncate());

    for (entity, transform, mut ai, mut combo, mut nav, mut facing) in &mut enemy_query {
        if !ai.enabled {
            continue;
        }

        let enemy_pos = transform.translation().truncate();
        let to_player = player_pos.map(|p| p - enemy_pos);
        let next = ai.decide(to_player.map(|v| v.length()), &combo);

        if next != ai.state {
            debug!("Enemy {:?} AI {:?} -> {:?}", entity, ai.state, next);
            ai.state = next;
        }

        match ai.state {
            AiState::Idle | AiState::Stunned => nav.stop(),
            AiState::Chase => {
                if let Some(dir) = to_player {
                    nav.steer_toward(dir);
                    facing.turn_toward(dir);
                }
            }
            AiState::Attack => {
                nav.stop();
                if let Some(dir) = to_player {
                    if !combo.is_attacking() {
                        facing.turn_toward(dir);
                    }
                }
                if player_pos.is_some() && combo.can_attack(now) {
                    let strength = if rng.0.random_bool(ai.heavy_chance.clamp(0.0, 1.0) as f64) {
                        AttackStrength::Heavy
                    } else {
                        AttackStrength::Light
                    };
                    if combo.start_combo(entity, now, &mut rng.0, &mut wheel, strength) {
                        debug!(
                            "Enemy {:?} starts a {:?} combo of {}",
                            entity,
                            strength,
                            combo.target_length()
                        );
                    }
                }
            }
        }
    }
}

/// Keep a nav-driven body inside `bounds` (half extents around the origin).
/// Returns the clamped position and the velocity with outward motion removed
/// on any axis that touches the edge.
pub fn confine_to_arena(position: Vec2, velocity: Vec2, bounds: Vec2) -> (Vec2, Vec2) {
    let bounds = bounds.max(Vec2::ZERO);
    let clamped = position.clamp(-bounds, bounds);
    let mut velocity = velocity;
    if (clamped.x >= bounds.x && velocity.x > 0.0) || (clamped.x <= -bounds.x && velocity.x < 0.0)
    {
        velocity.x = 0.0;
    }
    if (clamped.y >= bounds.y && velocity.y > 0.0) || (clamped.y <= -bounds.y && velocity.y < 0.0)
    {
        velocity.y = 0.0;
    }
    (clamped, velocity)
}

/// Agents drive their kinematic body while enabled. Kinematic bodies ignore
/// walls, so the arena bounds are enforced here.
pub(crate) fn apply_nav_agents(
    defaults: Res<CombatDefaults>,
    mut query: Query<(&NavAgent, &mut Transform, &mut LinearVelocity)>,
) {
    let half_extents = Vec2::from(defaults.arena.half_extents);

    for (nav, mut transform, mut velocity) in &mut query {
        if !nav.enabled {
            continue;
        }
        let position = transform.translation.truncate();
        let bounds = half_extents - Vec2::splat(nav.clearance);
        let (confined, steered) = confine_to_arena(position, nav.velocity, bounds);
        if confined != position {
            transform.translation.x = confined.x;
            transform.translation.y = confined.y;
        }
        velocity.0 = steered;
    }
}
