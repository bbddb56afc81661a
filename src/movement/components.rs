//! Movement domain: components and physics layers for locomotion.

use avian2d::prelude::*;
use bevy::prelude::*;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Arena walls
    Wall,
    /// Player character
    Player,
    /// Enemy characters
    Enemy,
    /// Player hitboxes (damage enemies)
    PlayerHitbox,
    /// Enemy hitboxes (damage player)
    EnemyHitbox,
    /// Blood drops
    Pickup,
    /// Checkpoints and other zones; never block movement
    Trigger,
}

#[derive(Component, Debug)]
pub struct Player;

/// How much control the player has this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Control {
    #[default]
    Free,
    /// Mid-swing; moves at a reduced speed
    Attacking,
    /// Stunned or dead; only decelerates
    Locked,
}
