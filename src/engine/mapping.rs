//! Old id to new id tables, one column per copy generation

use super::ids::IdGenerator;
use crate::model::{Action, Parameter, Stage, Task};
use log::debug;
use std::collections::HashMap;

/// Kinds of entity that receive fresh ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappedKind {
    Stage,
    Task,
    Parameter,
    Automation,
    Action,
    Effect,
}

/// Lookup order for references found in opaque payloads
const PAYLOAD_PRECEDENCE: [MappedKind; 3] = [MappedKind::Parameter, MappedKind::Task, MappedKind::Stage];

#[derive(Debug, Clone, Default)]
pub struct IdMapping {
    copies: usize,
    tables: HashMap<MappedKind, HashMap<String, Vec<String>>>,
}

impl IdMapping {
    pub fn new(copies: usize) -> Self {
        Self { copies, tables: HashMap::new() }
    }

    pub fn copies(&self) -> usize {
        self.copies
    }

    /// Allocate one id per generation for `old_id`
    pub fn register(&mut self, kind: MappedKind, old_id: &str, ids: &mut dyn IdGenerator) {
        let fresh = ids.allocate(self.copies);
        self.tables.entry(kind).or_default().insert(old_id.to_string(), fresh);
    }

    pub fn register_stage(&mut self, stage: &Stage, ids: &mut dyn IdGenerator) {
        self.register(MappedKind::Stage, &stage.id, ids);
        for task in &stage.task_requests {
            self.register_task(task, ids);
        }
    }

    pub fn register_task(&mut self, task: &Task, ids: &mut dyn IdGenerator) {
        self.register(MappedKind::Task, &task.id, ids);
        for parameter in &task.parameter_requests {
            self.register_parameter(parameter, ids);
        }
        for automation in task.automation_requests.iter().flatten() {
            self.register(MappedKind::Automation, &automation.id, ids);
        }
    }

    pub fn register_parameter(&mut self, parameter: &Parameter, ids: &mut dyn IdGenerator) {
        self.register(MappedKind::Parameter, &parameter.id, ids);
    }

    /// Register every action fired by a task already in the mapping, with its effects
    pub fn register_triggered_actions(&mut self, actions: &[Action], ids: &mut dyn IdGenerator) {
        for action in actions {
            if !self.contains(MappedKind::Task, &action.trigger_entity_id) {
                continue;
            }
            debug!("Action {} is triggered by duplicated task {}", action.id, action.trigger_entity_id);
            self.register(MappedKind::Action, &action.id, ids);
            for effect in &action.effect_requests {
                self.register(MappedKind::Effect, &effect.id, ids);
            }
        }
    }

    pub fn contains(&self, kind: MappedKind, old_id: &str) -> bool {
        self.tables.get(&kind).is_some_and(|table| table.contains_key(old_id))
    }

    /// New id of `old_id` in `generation`, if it belongs to the duplicated subtree
    pub fn lookup(&self, kind: MappedKind, old_id: &str, generation: usize) -> Option<&str> {
        self.tables
            .get(&kind)?
            .get(old_id)?
            .get(generation)
            .map(String::as_str)
    }

    /// Lookup for references of unknown kind: parameters, then tasks, then stages
    pub fn lookup_any(&self, old_id: &str, generation: usize) -> Option<&str> {
        PAYLOAD_PRECEDENCE
            .iter()
            .find_map(|kind| self.lookup(*kind, old_id, generation))
    }

    /// Old ids of one kind, in no particular order
    pub fn originals(&self, kind: MappedKind) -> impl Iterator<Item = &str> {
        self.tables.get(&kind).into_iter().flat_map(|table| table.keys().map(String::as_str))
    }

    /// Every id minted for this mapping
    pub fn minted(&self) -> impl Iterator<Item = &str> {
        self.tables
            .values()
            .flat_map(|table| table.values())
            .flat_map(|ids| ids.iter().map(String::as_str))
    }

    /// Ids minted for one generation
    pub fn generation(&self, generation: usize) -> impl Iterator<Item = &str> {
        self.tables
            .values()
            .flat_map(|table| table.values())
            .filter_map(move |ids| ids.get(generation).map(String::as_str))
    }

    /// Number of original entities covered
    pub fn len(&self) -> usize {
        self.tables.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
