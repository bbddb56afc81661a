//! Objectives domain: objective notifications.

use bevy::ecs::message::Message;

/// A tutorial task was completed. Fired once per objective per attempt.
#[derive(Debug, Clone)]
pub struct TaskCompleted {
    pub id: String,
    pub label: String,
}

impl Message for TaskCompleted {}
