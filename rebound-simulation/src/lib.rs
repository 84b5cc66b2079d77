//! Ball physics and replication on top of `rebound-core`.

pub mod ball;
pub mod replica;

pub use ball::{resolve_wall_collisions, BallEntity, MAX_STEP_MS, VELOCITY_TIME_SCALE};
pub use replica::{replicate, ReplicaOutcome};
