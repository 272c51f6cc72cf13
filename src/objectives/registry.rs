//! Objective registry.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::definition::{ObjectiveDefinition, ObjectiveId};
use crate::error::{Result, SimError};

/// Registry of objective definitions.
///
/// Definitions are stored behind `Arc` so each game can hold its active
/// objective without copying it.
#[derive(Clone, Debug, Default)]
pub struct ObjectiveRegistry {
    objectives: FxHashMap<ObjectiveId, Arc<ObjectiveDefinition>>,
}

impl ObjectiveRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of definitions.
    pub fn from_objectives(objectives: impl IntoIterator<Item = ObjectiveDefinition>) -> Result<Self> {
        let mut registry = Self::new();
        for objective in objectives {
            registry.register(objective)?;
        }
        Ok(registry)
    }

    /// Register an objective. Duplicate ids are a definition error.
    pub fn register(&mut self, objective: ObjectiveDefinition) -> Result<()> {
        if self.objectives.contains_key(&objective.id) {
            return Err(SimError::Definition(format!(
                "objective {} registered twice",
                objective.id
            )));
        }
        self.objectives.insert(objective.id, Arc::new(objective));
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: ObjectiveId) -> Option<&Arc<ObjectiveDefinition>> {
        self.objectives.get(&id)
    }

    /// Get an objective by id, or a definition error.
    pub fn require(&self, id: ObjectiveId) -> Result<&Arc<ObjectiveDefinition>> {
        self.objectives
            .get(&id)
            .ok_or_else(|| SimError::Definition(format!("unknown objective {id}")))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objectives.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objectives.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectiveDefinition> {
        self.objectives.values().map(|o| o.as_ref())
    }
}
