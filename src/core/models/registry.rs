use super::model::Model;
use crate::core::errors::CompositionError;
use crate::core::types::{ModelId, SimTime};
use log::debug;
use std::collections::BTreeMap;

/// Owns the direct children of a coupled model, keyed by ID.
///
/// Other components refer to children by [`ModelId`] only.
pub struct ModelRegistry<T: SimTime> {
    models: BTreeMap<ModelId, Model<T>>,
}

impl<T: SimTime> ModelRegistry<T> {
    pub fn new() -> Self {
        Self {
            models: BTreeMap::new(),
        }
    }

    /// Register a model under its own ID
    pub fn register(&mut self, model: Model<T>) -> Result<(), CompositionError> {
        let id = model.id().clone();

        if self.models.contains_key(&id) {
            return Err(CompositionError::DuplicateModel(id));
        }

        debug!("Registered {} model '{}'", if model.is_atomic() { "atomic" } else { "coupled" }, id);
        self.models.insert(id, model);
        Ok(())
    }

    /// Get a model by ID
    pub fn get(&self, id: &ModelId) -> Option<&Model<T>> {
        self.models.get(id)
    }

    /// Get a mutable model by ID
    pub fn get_mut(&mut self, id: &ModelId) -> Option<&mut Model<T>> {
        self.models.get_mut(id)
    }

    /// Check if a model exists
    pub fn contains(&self, id: &ModelId) -> bool {
        self.models.contains_key(id)
    }

    /// All model IDs in order
    pub fn ids(&self) -> impl Iterator<Item = &ModelId> {
        self.models.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ModelId, &Model<T>)> {
        self.models.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&ModelId, &mut Model<T>)> {
        self.models.iter_mut()
    }

    pub fn remove(&mut self, id: &ModelId) -> Option<Model<T>> {
        self.models.remove(id)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Get model count by kind
    pub fn model_counts(&self) -> ModelCounts {
        let atomic = self.models.values().filter(|model| model.is_atomic()).count();

        ModelCounts {
            total: self.models.len(),
            atomic,
            coupled: self.models.len() - atomic,
        }
    }
}

/// Statistics about model counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCounts {
    pub total: usize,
    pub atomic: usize,
    pub coupled: usize,
}

impl<T: SimTime> Default for ModelRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{CoupledModel, Passive};

    #[test]
    fn test_register_and_lookup() {
        let mut registry: ModelRegistry<f64> = ModelRegistry::new();
        registry.register(Model::atomic("sink", Passive::<i32, f64>::new())).unwrap();
        registry.register(Model::coupled(CoupledModel::new("inner"))).unwrap();

        assert!(registry.contains(&ModelId::from("sink")));
        assert!(registry.get(&ModelId::from("inner")).unwrap().is_coupled());
        assert_eq!(
            registry.model_counts(),
            ModelCounts { total: 2, atomic: 1, coupled: 1 }
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut registry: ModelRegistry<f64> = ModelRegistry::new();
        registry.register(Model::atomic("sink", Passive::<i32, f64>::new())).unwrap();
        let err = registry
            .register(Model::atomic("sink", Passive::<i32, f64>::new()))
            .unwrap_err();
        assert_eq!(err, CompositionError::DuplicateModel(ModelId::from("sink")));
        assert_eq!(registry.len(), 1);
    }
}
