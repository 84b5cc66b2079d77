//! Applies remotely received ball snapshots to a local world.

use crate::ball::BallEntity;
use log::{debug, warn};
use rebound_core::{BallAction, World};

/// What [`replicate`] did with a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicaOutcome {
    /// An existing ball was overwritten.
    Moved,
    /// No entity had the id, so a ball was created from the snapshot.
    Spawned,
    /// The id belongs to an entity that is not a ball.
    Ignored,
    /// The snapshot carries a radius no ball can have.
    Rejected,
}

/// Mirrors an authoritative ball state into `world`.
pub fn replicate(world: &mut World, action: &BallAction) -> ReplicaOutcome {
    if !(action.radius.is_finite() && action.radius > 0.0) {
        warn!("Rejecting snapshot for ball {} with radius {}", action.id, action.radius);
        return ReplicaOutcome::Rejected;
    }

    if let Some(ball) = world.get_mut::<BallEntity>(action.id) {
        ball.apply_action(action);
        return ReplicaOutcome::Moved;
    }

    if world.contains(action.id) {
        warn!("Entity {} is not a ball, ignoring {:?} snapshot", action.id, action.action);
        return ReplicaOutcome::Ignored;
    }

    match world.spawn(Box::new(BallEntity::from_action(action))) {
        Ok(id) => {
            debug!("Replica spawned ball {}", id);
            ReplicaOutcome::Spawned
        }
        // contains() returned false above, so the id is free
        Err(_) => ReplicaOutcome::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use rebound_core::{
        impl_entity_any, ActionType, ArenaBounds, Canvas, Entity, EntityId, PackedColor, RecordingBroadcaster,
        TickContext,
    };

    fn action(id: EntityId, x: f32) -> BallAction {
        BallAction {
            id,
            action: ActionType::Move,
            radius: 6.0,
            position: Vec2::new(x, 1.0),
            velocity: Vec2::new(2.0, -2.0),
            color: PackedColor::from_rgb(40, 50, 60),
        }
    }

    #[test]
    fn spawns_then_moves() {
        let mut world = World::new();

        assert_eq!(replicate(&mut world, &action(12, 3.0)), ReplicaOutcome::Spawned);
        assert_eq!(replicate(&mut world, &action(12, 9.0)), ReplicaOutcome::Moved);

        let ball = world.get::<BallEntity>(12).unwrap();
        assert_eq!(ball.position(), Vec2::new(9.0, 1.0));
        assert_eq!(ball.lifetime(), 0);
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn replica_converges_on_authoritative_state() {
        let arena = ArenaBounds::new(100.0, 60.0);
        let mut authority = World::new();
        authority
            .spawn(Box::new(BallEntity::new(1, 5.0, Vec2::new(40.0, 20.0), Vec2::new(9.0, 4.0), PackedColor::WHITE)))
            .unwrap();
        let mut replica = World::new();
        let mut recorder = RecordingBroadcaster::new();

        for _ in 0..10 {
            authority.tick(33, &arena, &mut recorder);
            for snapshot in recorder.drain() {
                replicate(&mut replica, &snapshot);
            }
        }

        let source = authority.get::<BallEntity>(1).unwrap();
        let mirror = replica.get::<BallEntity>(1).unwrap();
        assert_eq!(source.position(), mirror.position());
        assert_eq!(source.velocity(), mirror.velocity());
        assert_eq!(source.color(), mirror.color());
    }

    #[derive(Debug)]
    struct Marker(EntityId);

    impl Entity for Marker {
        fn id(&self) -> EntityId {
            self.0
        }

        fn draw(&self, _canvas: &mut dyn Canvas) {}

        fn update(&mut self, _delta_ms: u32, _ctx: &mut TickContext<'_>) {}

        impl_entity_any!();
    }

    #[test]
    fn leaves_other_entity_kinds_alone() {
        let mut world = World::new();
        world.spawn(Box::new(Marker(5))).unwrap();

        assert_eq!(replicate(&mut world, &action(5, 0.0)), ReplicaOutcome::Ignored);
        assert!(world.get::<Marker>(5).is_some());
    }

    #[test]
    fn rejects_degenerate_radius() {
        let mut world = World::new();
        replicate(&mut world, &action(3, 1.0));

        for radius in [0.0, -4.0, f32::NAN, f32::INFINITY] {
            let bad = BallAction { radius, ..action(3, 50.0) };
            assert_eq!(replicate(&mut world, &bad), ReplicaOutcome::Rejected);
            let unknown = BallAction { radius, ..action(4, 50.0) };
            assert_eq!(replicate(&mut world, &unknown), ReplicaOutcome::Rejected);
        }

        assert_eq!(world.len(), 1);
        let ball = world.get::<BallEntity>(3).unwrap();
        assert_eq!(ball.radius(), 6.0);
        assert_eq!(ball.position(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn masks_wide_color_from_the_wire() {
        let mut world = World::new();
        let frame = r#"{"id":9,"action":"MOVE","radius":3.0,"position":[0.0,0.0],"velocity":[1.0,1.0],"color":4294967295}"#;
        let snapshot: BallAction = serde_json::from_str(frame).unwrap();

        assert_eq!(replicate(&mut world, &snapshot), ReplicaOutcome::Spawned);
        assert_eq!(world.get::<BallEntity>(9).unwrap().color().value(), 0x00FF_FFFF);
    }
}
