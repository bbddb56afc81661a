use bevy::prelude::*;

#[derive(States, Debug, Hash, Eq, PartialEq, Clone, Copy, Default)]
pub enum GameState {
    /// Tearing down the previous attempt and building the next
    #[default]
    Loading,
    Playing,
}
