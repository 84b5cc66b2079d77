//! The ball entity: integration, wall reflection and per-tick broadcast.

use glam::Vec2;
use log::trace;
use rebound_core::{
    impl_entity_any, ActionType, ArenaPlanes, BallAction, Canvas, Entity, EntityId, PackedColor,
    TickContext,
};

/// Largest elapsed time a single update will integrate, in milliseconds.
pub const MAX_STEP_MS: u32 = 100;

/// Converts elapsed milliseconds into the ball's velocity unit.
pub const VELOCITY_TIME_SCALE: f32 = 10.0;

/// A circular body bouncing inside the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct BallEntity {
    id: EntityId,
    radius: f32,
    position: Vec2,
    velocity: Vec2,
    color: PackedColor,
    lifetime_ms: u64,
}

impl BallEntity {
    pub fn new(id: EntityId, radius: f32, position: Vec2, velocity: Vec2, color: PackedColor) -> Self {
        debug_assert!(radius > 0.0, "ball radius must be positive");
        Self {
            id,
            radius,
            position,
            velocity,
            color,
            lifetime_ms: 0,
        }
    }

    /// Builds a ball from a received snapshot.
    pub fn from_action(action: &BallAction) -> Self {
        Self::new(action.id, action.radius, action.position, action.velocity, action.color)
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn color(&self) -> PackedColor {
        self.color
    }

    /// Accumulated simulated time in milliseconds.
    pub fn lifetime(&self) -> u64 {
        self.lifetime_ms
    }

    pub fn set_color(&mut self, red: u8, green: u8, blue: u8) {
        self.color = PackedColor::from_rgb(red, green, blue);
    }

    /// Overwrites the full state with an externally supplied one.
    ///
    /// No bounds check, no lifetime change and no broadcast.
    pub fn move_to(&mut self, color: PackedColor, radius: f32, position: Vec2, velocity: Vec2) {
        self.color = color;
        self.radius = radius;
        self.position = position;
        self.velocity = velocity;
    }

    pub fn apply_action(&mut self, action: &BallAction) {
        self.move_to(action.color, action.radius, action.position, action.velocity);
    }

    pub fn snapshot(&self, action: ActionType) -> BallAction {
        BallAction {
            id: self.id,
            action,
            radius: self.radius,
            position: self.position,
            velocity: self.velocity,
            color: self.color,
        }
    }
}

impl Entity for BallEntity {
    fn id(&self) -> EntityId {
        self.id
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        let (red, green, blue) = self.color.rgb();
        canvas.draw_circle(self.radius, self.position, red, green, blue, false);
    }

    fn update(&mut self, delta_ms: u32, ctx: &mut TickContext<'_>) {
        let step_ms = delta_ms.min(MAX_STEP_MS);

        self.position += self.velocity * step_ms as f32 / VELOCITY_TIME_SCALE;

        let planes = ArenaPlanes::of(ctx.bounds);
        resolve_wall_collisions(&mut self.position, &mut self.velocity, self.radius, &planes);

        self.lifetime_ms += u64::from(step_ms);

        trace!(
            "Ball {} at ({:.2}, {:.2}) vel ({:.2}, {:.2})",
            self.id, self.position.x, self.position.y, self.velocity.x, self.velocity.y
        );
        ctx.broadcaster.send_ball_action(
            self.id,
            ActionType::Move,
            self.radius,
            self.position,
            self.velocity,
            self.color,
        );
    }

    impl_entity_any!();
}

/// Reflects the ball off any wall its edge has reached or crossed.
///
/// Each of the four planes is checked independently. On contact the velocity
/// component on that axis is negated and the ball is clamped so its edge sits
/// on the plane. Corners are not special-cased.
pub fn resolve_wall_collisions(position: &mut Vec2, velocity: &mut Vec2, radius: f32, planes: &ArenaPlanes) {
    if position.x - radius <= planes.left {
        velocity.x = -velocity.x;
        position.x = planes.left + radius;
    }
    if position.x + radius >= planes.right {
        velocity.x = -velocity.x;
        position.x = planes.right - radius;
    }
    if position.y - radius <= planes.bottom {
        velocity.y = -velocity.y;
        position.y = planes.bottom + radius;
    }
    if position.y + radius >= planes.top {
        velocity.y = -velocity.y;
        position.y = planes.top - radius;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rebound_core::{ArenaBounds, NullBroadcaster, RecordingBroadcaster, StateBroadcaster};

    const ARENA: ArenaBounds = ArenaBounds { width: 200.0, height: 200.0 };

    fn step(ball: &mut BallEntity, delta_ms: u32, recorder: &mut dyn StateBroadcaster) {
        let mut ctx = TickContext::new(&ARENA, recorder);
        ball.update(delta_ms, &mut ctx);
    }

    #[test]
    fn bounces_off_right_wall() {
        let mut ball = BallEntity::new(4, 10.0, Vec2::new(95.0, 0.0), Vec2::new(20.0, 0.0), PackedColor::WHITE);
        let mut recorder = RecordingBroadcaster::new();

        step(&mut ball, 50, &mut recorder);

        assert_eq!(ball.position(), Vec2::new(90.0, 0.0));
        assert_eq!(ball.velocity(), Vec2::new(-20.0, 0.0));
        assert_eq!(ball.lifetime(), 50);
        assert_eq!(recorder.len(), 1);
        assert_eq!(recorder.last(), Some(&ball.snapshot(ActionType::Move)));
    }

    #[test]
    fn free_flight_integrates_both_axes() {
        let mut ball = BallEntity::new(1, 5.0, Vec2::new(-10.0, 10.0), Vec2::new(3.0, -2.0), PackedColor::WHITE);
        let mut recorder = RecordingBroadcaster::new();

        step(&mut ball, 20, &mut recorder);

        assert_eq!(ball.position(), Vec2::new(-4.0, 6.0));
        assert_eq!(ball.velocity(), Vec2::new(3.0, -2.0));
    }

    #[test]
    fn delta_is_clamped_to_max_step() {
        let start = BallEntity::new(2, 4.0, Vec2::new(-30.0, 12.0), Vec2::new(1.5, -0.75), PackedColor::WHITE);
        let mut clamped = start.clone();
        let mut capped = start.clone();
        let mut recorder = RecordingBroadcaster::new();

        step(&mut clamped, 150, &mut recorder);
        step(&mut capped, MAX_STEP_MS, &mut recorder);

        assert_eq!(clamped, capped);
        assert_eq!(clamped.lifetime(), 100);
    }

    #[test]
    fn reflection_only_touches_the_crossing_axis() {
        let mut ball = BallEntity::new(3, 10.0, Vec2::new(0.0, -85.0), Vec2::new(7.0, -40.0), PackedColor::WHITE);
        let mut recorder = RecordingBroadcaster::new();

        step(&mut ball, 100, &mut recorder);

        assert_eq!(ball.velocity(), Vec2::new(7.0, 40.0));
        assert_eq!(ball.position().y, -90.0);
        assert_eq!(ball.position().x, 70.0);
    }

    #[test]
    fn corner_hit_flips_both_axes() {
        let mut ball = BallEntity::new(5, 10.0, Vec2::new(-85.0, 85.0), Vec2::new(-30.0, 30.0), PackedColor::WHITE);
        let mut recorder = RecordingBroadcaster::new();

        step(&mut ball, 100, &mut recorder);

        assert_eq!(ball.velocity(), Vec2::new(30.0, -30.0));
        assert_eq!(ball.position(), Vec2::new(-90.0, 90.0));
    }

    #[test]
    fn collision_planes_resolve_independently() {
        let planes = ArenaPlanes { left: -50.0, right: 50.0, bottom: -20.0, top: 20.0 };
        let mut position = Vec2::new(60.0, -25.0);
        let mut velocity = Vec2::new(5.0, -1.0);

        resolve_wall_collisions(&mut position, &mut velocity, 2.0, &planes);

        assert_eq!(position, Vec2::new(48.0, -18.0));
        assert_eq!(velocity, Vec2::new(-5.0, 1.0));
    }

    #[test]
    fn stays_inside_the_arena() {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        let mut sink = NullBroadcaster;

        for id in 0..20 {
            let radius = rng.gen_range(1.0..30.0);
            let limit = 100.0 - radius;
            let position = Vec2::new(rng.gen_range(-limit..limit), rng.gen_range(-limit..limit));
            let velocity = Vec2::new(rng.gen_range(-80.0..80.0), rng.gen_range(-80.0..80.0));
            let mut ball = BallEntity::new(id, radius, position, velocity, PackedColor::WHITE);

            for _ in 0..500 {
                step(&mut ball, rng.gen_range(0..250), &mut sink);
                assert!(
                    ARENA.contains_circle(ball.position(), ball.radius(), 1e-3),
                    "ball {} escaped: {:?}",
                    id,
                    ball
                );
            }
        }
    }

    #[test]
    fn lifetime_sums_clamped_deltas() {
        let mut ball = BallEntity::new(6, 3.0, Vec2::ZERO, Vec2::new(0.5, 0.25), PackedColor::WHITE);
        let mut recorder = RecordingBroadcaster::new();
        let deltas = [16u32, 0, 100, 101, 250, 33, 99];

        for delta in deltas {
            step(&mut ball, delta, &mut recorder);
        }

        let expected: u64 = deltas.iter().map(|d| u64::from((*d).min(MAX_STEP_MS))).sum();
        assert_eq!(ball.lifetime(), expected);
    }

    #[test]
    fn broadcasts_once_per_update_even_when_still() {
        let mut ball = BallEntity::new(8, 5.0, Vec2::ZERO, Vec2::ZERO, PackedColor::from_rgb(9, 8, 7));
        let mut recorder = RecordingBroadcaster::new();

        for _ in 0..3 {
            step(&mut ball, 16, &mut recorder);
        }

        assert_eq!(recorder.len(), 3);
        for action in recorder.actions() {
            assert_eq!(action.id, 8);
            assert_eq!(action.action, ActionType::Move);
            assert_eq!(action.color, PackedColor::from_rgb(9, 8, 7));
            assert_eq!(action.position, Vec2::ZERO);
        }
    }

    #[test]
    fn move_overwrites_state_without_side_effects() {
        let mut ball = BallEntity::new(9, 5.0, Vec2::ZERO, Vec2::X, PackedColor::WHITE);
        let mut recorder = RecordingBroadcaster::new();
        step(&mut ball, 40, &mut recorder);

        // outside the arena on purpose: move performs no bounds check
        ball.move_to(PackedColor::from_rgb(1, 2, 3), 12.0, Vec2::new(500.0, -500.0), Vec2::new(-1.0, 2.0));

        assert_eq!(ball.color().rgb(), (1, 2, 3));
        assert_eq!(ball.radius(), 12.0);
        assert_eq!(ball.position(), Vec2::new(500.0, -500.0));
        assert_eq!(ball.velocity(), Vec2::new(-1.0, 2.0));
        assert_eq!(ball.lifetime(), 40);
        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn set_color_packs_channels() {
        let mut ball = BallEntity::new(10, 1.0, Vec2::ZERO, Vec2::ZERO, PackedColor::default());
        ball.set_color(0xAB, 0xCD, 0xEF);
        assert_eq!(ball.color().value(), 0x00AB_CDEF);
        assert_eq!(ball.color().rgb(), (0xAB, 0xCD, 0xEF));
    }

    #[derive(Default)]
    struct CircleLog(Vec<(f32, Vec2, u8, u8, u8, bool)>);

    impl Canvas for CircleLog {
        fn draw_circle(&mut self, radius: f32, center: Vec2, red: u8, green: u8, blue: u8, filled: bool) {
            self.0.push((radius, center, red, green, blue, filled));
        }
    }

    #[test]
    fn draw_unpacks_color_into_outline_circle() {
        let ball = BallEntity::new(11, 7.5, Vec2::new(1.0, 2.0), Vec2::ZERO, PackedColor::from_rgb(10, 20, 30));
        let mut canvas = CircleLog::default();
        ball.draw(&mut canvas);
        assert_eq!(canvas.0, vec![(7.5, Vec2::new(1.0, 2.0), 10, 20, 30, false)]);
    }
}
