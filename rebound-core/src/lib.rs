//! Core contracts for the rebound simulation.
//!
//! The ball entity and every other simulation object plug into the types
//! defined here: the [`Entity`] contract, the injected collaborators
//! ([`BoundaryProvider`], [`StateBroadcaster`]), the packed color format and
//! the [`World`] driver that ticks everything once per frame.

pub mod bounds;
pub mod broadcast;
pub mod color;
pub mod entity;
pub mod timing;
pub mod world;

pub use bounds::{ArenaBounds, ArenaPlanes, BoundaryProvider};
pub use broadcast::{ActionType, BallAction, NullBroadcaster, RecordingBroadcaster, StateBroadcaster};
pub use color::PackedColor;
pub use entity::{Canvas, Entity, EntityId, TickContext};
pub use glam::Vec2;
pub use timing::{StopWatch, TimeRecorder};
pub use world::{World, WorldError};
