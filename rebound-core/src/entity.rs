use crate::bounds::BoundaryProvider;
use crate::broadcast::StateBroadcaster;
use glam::Vec2;
use std::any::Any;
use std::fmt::Debug;

/// Unique identifier of a simulation entity. Fixed at construction.
pub type EntityId = u32;

/// Rendering target for [`Entity::draw`].
pub trait Canvas {
    fn draw_circle(&mut self, radius: f32, center: Vec2, red: u8, green: u8, blue: u8, filled: bool);
}

/// Collaborators handed to every entity for one tick.
pub struct TickContext<'a> {
    pub bounds: &'a dyn BoundaryProvider,
    pub broadcaster: &'a mut dyn StateBroadcaster,
}

impl<'a> TickContext<'a> {
    pub fn new(bounds: &'a dyn BoundaryProvider, broadcaster: &'a mut dyn StateBroadcaster) -> Self {
        Self { bounds, broadcaster }
    }
}

/// Behaviour shared by every simulation object the [`World`](crate::World) drives.
pub trait Entity: Any + Debug {
    fn id(&self) -> EntityId;

    /// Renders the current state.
    fn draw(&self, canvas: &mut dyn Canvas);

    /// Advances the entity by one tick of `delta_ms` milliseconds.
    fn update(&mut self, delta_ms: u32, ctx: &mut TickContext<'_>);

    /// Get the entity as Any for dynamic downcasting
    fn as_any(&self) -> &dyn Any;

    /// Get the entity as mutable Any for dynamic downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Implements the `Any` accessors of [`Entity`] for a concrete type.
#[macro_export]
macro_rules! impl_entity_any {
    () => {
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    };
}
