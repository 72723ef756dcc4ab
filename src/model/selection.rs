use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of entity that can be selected for duplication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Stage,
    Task,
    Parameter,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Stage => "stage",
            EntityKind::Task => "task",
            EntityKind::Parameter => "parameter",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indices locating an entity's parent container inside the configuration
///
/// `stage` is required for tasks and parameters, `task` for parameters.
/// `index` is the entity's own position in its container when known; it is
/// only a hint and is checked against the id before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntityPath {
    pub checklist: usize,
    pub stage: Option<usize>,
    pub task: Option<usize>,
    pub index: Option<usize>,
}

/// One selected entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub kind: EntityKind,
    pub id: String,
    pub path: EntityPath,
}

impl Selection {
    pub fn stage(id: impl Into<String>, checklist: usize, index: usize) -> Self {
        Self {
            kind: EntityKind::Stage,
            id: id.into(),
            path: EntityPath { checklist, stage: Some(index), task: None, index: Some(index) },
        }
    }

    pub fn task(id: impl Into<String>, checklist: usize, stage: usize, index: usize) -> Self {
        Self {
            kind: EntityKind::Task,
            id: id.into(),
            path: EntityPath { checklist, stage: Some(stage), task: Some(index), index: Some(index) },
        }
    }

    pub fn parameter(id: impl Into<String>, checklist: usize, stage: usize, task: usize, index: Option<usize>) -> Self {
        Self {
            kind: EntityKind::Parameter,
            id: id.into(),
            path: EntityPath { checklist, stage: Some(stage), task: Some(task), index },
        }
    }
}
