use crate::{Sender, Serializer, TransportError};
use glam::Vec2;
use log::{debug, warn};
use rebound_core::{ActionType, BallAction, EntityId, PackedColor, StateBroadcaster};

/// Delivery counters of a [`NetworkBroadcaster`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastStats {
    pub sent: u64,
    pub failed: u64,
}

/// Serializes every ball action and hands it to a sender.
///
/// Failures are logged and counted, never surfaced to the entity.
pub struct NetworkBroadcaster {
    serializer: Box<dyn Serializer>,
    sender: Box<dyn Sender>,
    stats: BroadcastStats,
}

impl NetworkBroadcaster {
    pub fn new(serializer: Box<dyn Serializer>, sender: Box<dyn Sender>) -> Self {
        Self {
            serializer,
            sender,
            stats: BroadcastStats::default(),
        }
    }

    pub fn stats(&self) -> BroadcastStats {
        self.stats
    }

    pub fn serializer(&self) -> &dyn Serializer {
        self.serializer.as_ref()
    }

    pub fn flush(&mut self) -> Result<(), TransportError> {
        self.sender.flush()
    }

    fn publish(&mut self, action: &BallAction) -> Result<(), TransportError> {
        let frame = self.serializer.serialize(action)?;
        self.sender.send(&frame)
    }
}

impl StateBroadcaster for NetworkBroadcaster {
    fn send_ball_action(
        &mut self,
        id: EntityId,
        action: ActionType,
        radius: f32,
        position: Vec2,
        velocity: Vec2,
        color: PackedColor,
    ) {
        let action = BallAction { id, action, radius, position, velocity, color };
        match self.publish(&action) {
            Ok(()) => self.stats.sent += 1,
            Err(e) => {
                self.stats.failed += 1;
                if self.stats.failed == 1 {
                    warn!("Failed to broadcast ball {}: {}", id, e);
                } else {
                    debug!("Failed to broadcast ball {} ({} failures): {}", id, self.stats.failed, e);
                }
            }
        }
    }
}
