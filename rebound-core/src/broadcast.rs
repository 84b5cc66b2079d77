//! Outbound state replication contract.

use crate::color::PackedColor;
use crate::entity::EntityId;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Kind of ball message being broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionType {
    /// Full-state update of a ball.
    Move,
}

/// Complete snapshot of a ball, as sent to remote observers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallAction {
    pub id: EntityId,
    pub action: ActionType,
    pub radius: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub color: PackedColor,
}

/// Sink that pushes a ball's full state to remote peers.
///
/// Fire-and-forget: implementations own delivery, retries and error
/// reporting. Callers never learn whether a send succeeded.
pub trait StateBroadcaster {
    fn send_ball_action(
        &mut self,
        id: EntityId,
        action: ActionType,
        radius: f32,
        position: Vec2,
        velocity: Vec2,
        color: PackedColor,
    );
}

/// Broadcaster that drops every action.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBroadcaster;

impl StateBroadcaster for NullBroadcaster {
    fn send_ball_action(&mut self, _: EntityId, _: ActionType, _: f32, _: Vec2, _: Vec2, _: PackedColor) {}
}

/// Keeps every action in memory, in the order received.
#[derive(Debug, Default, Clone)]
pub struct RecordingBroadcaster {
    actions: Vec<BallAction>,
}

impl RecordingBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> &[BallAction] {
        &self.actions
    }

    pub fn last(&self) -> Option<&BallAction> {
        self.actions.last()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns and clears the recorded actions.
    pub fn drain(&mut self) -> Vec<BallAction> {
        std::mem::take(&mut self.actions)
    }
}

impl StateBroadcaster for RecordingBroadcaster {
    fn send_ball_action(
        &mut self,
        id: EntityId,
        action: ActionType,
        radius: f32,
        position: Vec2,
        velocity: Vec2,
        color: PackedColor,
    ) {
        self.actions.push(BallAction { id, action, radius, position, velocity, color });
    }
}
