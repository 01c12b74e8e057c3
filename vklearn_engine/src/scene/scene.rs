/// Scene - entities grouped by model id, plus the active projection.
///
/// Entities live in a SlotMap so callers hold stable keys across removals.
/// Each model id keeps its entities in insertion order.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use crate::config::EngineConfig;
use crate::window::WindowSize;
use super::entity::Entity;
use super::projection::Projection;

new_key_type! {
    /// Stable key for an Entity within a Scene.
    pub struct EntityKey;
}

pub struct Scene {
    entities: SlotMap<EntityKey, Entity>,
    /// Ordered entity keys per model id
    entities_by_model: FxHashMap<String, Vec<EntityKey>>,
    projection: Projection,
}

impl Scene {
    pub fn new(window: &WindowSize, config: &EngineConfig) -> Self {
        Self {
            entities: SlotMap::with_key(),
            entities_by_model: FxHashMap::default(),
            projection: Projection::new(window.width(), window.height(), config),
        }
    }

    pub fn add_entity(&mut self, entity: Entity) -> EntityKey {
        let model_id = entity.model_id().to_string();
        let key = self.entities.insert(entity);
        self.entities_by_model.entry(model_id).or_default().push(key);
        key
    }

    pub fn entity(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    pub fn entity_mut(&mut self, key: EntityKey) -> Option<&mut Entity> {
        self.entities.get_mut(key)
    }

    /// Entities bound to `model_id`, in insertion order; empty for unknown ids
    pub fn entities_by_model_id<'a>(&'a self, model_id: &str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities_by_model
            .get(model_id)
            .map(|keys| keys.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(move |key| self.entities.get(*key))
    }

    pub fn entity_count_for_model(&self, model_id: &str) -> usize {
        self.entities_by_model.get(model_id).map_or(0, |keys| keys.len())
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Remove and return an entity; the other keys stay valid
    pub fn remove_entity(&mut self, key: EntityKey) -> Option<Entity> {
        let entity = self.entities.remove(key)?;
        if let Some(keys) = self.entities_by_model.get_mut(entity.model_id()) {
            keys.retain(|k| *k != key);
            if keys.is_empty() {
                self.entities_by_model.remove(entity.model_id());
            }
        }
        Some(entity)
    }

    /// Remove every entity
    pub fn clean_entities(&mut self) {
        self.entities.clear();
        self.entities_by_model.clear();
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn projection_mut(&mut self) -> &mut Projection {
        &mut self.projection
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
