use crate::bounds::BoundaryProvider;
use crate::broadcast::StateBroadcaster;
use crate::entity::{Canvas, Entity, EntityId, TickContext};
use log::{debug, trace};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WorldError {
    #[error("entity {0} already exists")]
    DuplicateEntity(EntityId),
}

/// Owns the simulation entities and drives them once per frame.
///
/// Entities are updated in insertion order on the calling thread.
#[derive(Debug, Default)]
pub struct World {
    entities: Vec<Box<dyn Entity>>,
    frame: u64,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity. Ids must be unique within the world.
    pub fn spawn(&mut self, entity: Box<dyn Entity>) -> Result<EntityId, WorldError> {
        let id = entity.id();
        if self.contains(id) {
            return Err(WorldError::DuplicateEntity(id));
        }
        debug!("Spawned entity {}", id);
        self.entities.push(entity);
        Ok(id)
    }

    /// Remove an entity, handing it back to the caller.
    pub fn despawn(&mut self, id: EntityId) -> Option<Box<dyn Entity>> {
        let idx = self.entities.iter().position(|e| e.id() == id)?;
        debug!("Despawned entity {}", id);
        Some(self.entities.remove(idx))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.iter().any(|e| e.id() == id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&dyn Entity> {
        self.entities.iter().find(|e| e.id() == id).map(|e| &**e)
    }

    /// Get an entity as its concrete kind
    pub fn get<T: Entity>(&self, id: EntityId) -> Option<&T> {
        self.entity(id).and_then(|e| e.as_any().downcast_ref::<T>())
    }

    /// Get an entity as its concrete kind, mutably
    pub fn get_mut<T: Entity>(&mut self, id: EntityId) -> Option<&mut T> {
        self.entities
            .iter_mut()
            .find(|e| e.id() == id)
            .and_then(|e| e.as_any_mut().downcast_mut::<T>())
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter().map(|e| e.id())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of ticks run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Runs one simulation step: every entity is updated exactly once.
    pub fn tick(
        &mut self,
        delta_ms: u32,
        bounds: &dyn BoundaryProvider,
        broadcaster: &mut dyn StateBroadcaster,
    ) {
        let mut ctx = TickContext::new(bounds, broadcaster);
        for entity in &mut self.entities {
            entity.update(delta_ms, &mut ctx);
        }
        self.frame += 1;
        trace!("Frame {} ticked {} entities ({} ms)", self.frame, self.entities.len(), delta_ms);
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        for entity in &self.entities {
            entity.draw(canvas);
        }
    }
}
