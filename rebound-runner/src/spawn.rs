//! Initial ball placement from the config.

use glam::Vec2;
use rand::Rng;
use rebound_config::{BallSpawnConfig, Config};
use rebound_core::{ArenaBounds, EntityId, PackedColor, World, WorldError};
use rebound_simulation::BallEntity;

/// Creates every configured ball, ids assigned from 0 in config order.
pub fn populate<R: Rng + ?Sized>(
    world: &mut World,
    config: &Config,
    arena: &ArenaBounds,
    rng: &mut R,
) -> Result<u32, WorldError> {
    let mut next_id: EntityId = 0;
    for group in &config.balls {
        for _ in 0..group.count {
            world.spawn(Box::new(spawn_ball(next_id, group, arena, rng)))?;
            next_id += 1;
        }
    }
    Ok(next_id)
}

/// Builds one ball, randomizing whatever the group leaves unspecified.
pub fn spawn_ball<R: Rng + ?Sized>(
    id: EntityId,
    group: &BallSpawnConfig,
    arena: &ArenaBounds,
    rng: &mut R,
) -> BallEntity {
    let position = match group.position {
        Some([x, y]) => Vec2::new(x, y),
        None => {
            let max_x = arena.width / 2.0 - group.radius;
            let max_y = arena.height / 2.0 - group.radius;
            Vec2::new(rng.gen_range(-max_x..=max_x), rng.gen_range(-max_y..=max_y))
        }
    };

    let velocity = match group.velocity {
        Some([vx, vy]) => Vec2::new(vx, vy),
        None => {
            let angle = rng.gen::<f32>() * std::f32::consts::TAU;
            Vec2::new(angle.cos(), angle.sin()) * group.speed
        }
    };

    let mut ball = BallEntity::new(id, group.radius, position, velocity, PackedColor::WHITE);
    match group.color {
        Some([red, green, blue]) => ball.set_color(red, green, blue),
        None => ball.set_color(rng.gen(), rng.gen(), rng.gen()),
    }
    ball
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rebound_config::{ArenaSettings, TransportConfig};

    fn group(count: u32) -> BallSpawnConfig {
        BallSpawnConfig {
            count,
            radius: 8.0,
            speed: 25.0,
            color: None,
            position: None,
            velocity: None,
        }
    }

    fn config(balls: Vec<BallSpawnConfig>) -> Config {
        Config {
            framerate: 60,
            seed: None,
            arena: ArenaSettings { width: 100.0, height: 50.0 },
            balls,
            transport: TransportConfig::default(),
        }
    }

    #[test]
    fn random_balls_fit_and_move_at_speed() {
        let arena = ArenaBounds::new(100.0, 50.0);
        let mut rng = StdRng::seed_from_u64(3);

        for id in 0..200 {
            let ball = spawn_ball(id, &group(1), &arena, &mut rng);
            assert!(arena.contains_circle(ball.position(), ball.radius(), 1e-4));
            assert!((ball.velocity().length() - 25.0).abs() < 1e-3);
        }
    }

    #[test]
    fn explicit_fields_are_kept() {
        let arena = ArenaBounds::new(100.0, 50.0);
        let mut rng = StdRng::seed_from_u64(3);
        let explicit = BallSpawnConfig {
            color: Some([1, 2, 3]),
            position: Some([10.0, -5.0]),
            velocity: Some([4.0, 0.5]),
            ..group(1)
        };

        let ball = spawn_ball(9, &explicit, &arena, &mut rng);

        assert_eq!(ball.position(), Vec2::new(10.0, -5.0));
        assert_eq!(ball.velocity(), Vec2::new(4.0, 0.5));
        assert_eq!(ball.color().rgb(), (1, 2, 3));
        assert_eq!(ball.lifetime(), 0);
    }

    #[test]
    fn populate_assigns_sequential_ids() {
        let arena = ArenaBounds::new(100.0, 50.0);
        let mut rng = StdRng::seed_from_u64(11);
        let mut world = World::new();

        let spawned = populate(&mut world, &config(vec![group(3), group(2)]), &arena, &mut rng).unwrap();

        assert_eq!(spawned, 5);
        assert_eq!(world.ids().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert!(world.get::<BallEntity>(4).is_some());
    }

    #[test]
    fn same_seed_same_layout() {
        let arena = ArenaBounds::new(100.0, 50.0);
        let a = spawn_ball(0, &group(1), &arena, &mut StdRng::seed_from_u64(42));
        let b = spawn_ball(0, &group(1), &arena, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
