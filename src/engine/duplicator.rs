//! Copying one entity subtree for one generation
//!
//! Stages, tasks and parameters share a single copy routine. What differs per
//! kind is captured by [`Entity`]: where the entity lives, which ids its
//! subtree owns, and how the copy descends into its children.

use super::ids::IdGenerator;
use super::mapping::{IdMapping, MappedKind};
use super::remap::{Generation, Rewrite, remap_automation, remap_effect, remap_parameter_references};
use crate::model::{Action, Checklist, EntityKind, EntityPath, Parameter, Selection, Stage, Task};
use anyhow::{Context, Result};
use log::debug;

/// Capabilities shared by every selectable entity
pub trait Entity: Clone {
    const KIND: EntityKind;
    const MAPPED: MappedKind;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn order_position(&self) -> i64;
    fn set_order_position(&mut self, position: i64);
    /// Name used as the base for copy names
    fn name(&self) -> String;
    fn set_name(&mut self, name: String);

    /// Allocate ids for this entity and everything below it
    fn register(&self, mapping: &mut IdMapping, ids: &mut dyn IdGenerator);

    /// Rewrite descendants and reference surfaces for one generation
    fn descend(&mut self, generation: &Generation<'_>, suffix: Option<&str>) -> Result<()>;

    /// Sibling collection the entity lives in
    fn container<'c>(checklist: &'c Checklist, path: &EntityPath) -> Result<&'c Vec<Self>>;
    fn container_mut<'c>(checklist: &'c mut Checklist, path: &EntityPath) -> Result<&'c mut Vec<Self>>;
}

impl Entity for Stage {
    const KIND: EntityKind = EntityKind::Stage;
    const MAPPED: MappedKind = MappedKind::Stage;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn order_position(&self) -> i64 {
        self.order_tree
    }

    fn set_order_position(&mut self, position: i64) {
        self.order_tree = position;
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn register(&self, mapping: &mut IdMapping, ids: &mut dyn IdGenerator) {
        mapping.register_stage(self, ids);
    }

    fn descend(&mut self, generation: &Generation<'_>, suffix: Option<&str>) -> Result<()> {
        let rule = &generation.request.child_naming.tasks;
        for task in &mut self.task_requests {
            task.name = rule.apply(&task.name, suffix);
            regenerate(task, generation, suffix)?;
        }
        Ok(())
    }

    fn container<'c>(checklist: &'c Checklist, _path: &EntityPath) -> Result<&'c Vec<Self>> {
        Ok(&checklist.stage_requests)
    }

    fn container_mut<'c>(checklist: &'c mut Checklist, _path: &EntityPath) -> Result<&'c mut Vec<Self>> {
        Ok(&mut checklist.stage_requests)
    }
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Task;
    const MAPPED: MappedKind = MappedKind::Task;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn order_position(&self) -> i64 {
        self.order_tree
    }

    fn set_order_position(&mut self, position: i64) {
        self.order_tree = position;
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn register(&self, mapping: &mut IdMapping, ids: &mut dyn IdGenerator) {
        mapping.register_task(self, ids);
    }

    fn descend(&mut self, generation: &Generation<'_>, suffix: Option<&str>) -> Result<()> {
        let rule = &generation.request.child_naming.parameters;
        for parameter in &mut self.parameter_requests {
            if rule.apply_inherited_suffix && suffix.is_some() {
                parameter.label = Some(rule.apply(&parameter.display_label(), suffix));
            }
            regenerate(parameter, generation, suffix)?;
        }

        for automation in self.automation_requests.iter_mut().flatten() {
            automation.id = generation.new_id(MappedKind::Automation, &automation.id)?;
            if generation.request.components.automations {
                remap_automation(automation, generation)?;
            }
        }
        Ok(())
    }

    fn container<'c>(checklist: &'c Checklist, path: &EntityPath) -> Result<&'c Vec<Self>> {
        let stage = path.stage.context("Task selection is missing its stage index")?;
        checklist
            .stage_requests
            .get(stage)
            .map(|stage| &stage.task_requests)
            .with_context(|| format!("Stage index {} is out of range in checklist {}", stage, checklist.id))
    }

    fn container_mut<'c>(checklist: &'c mut Checklist, path: &EntityPath) -> Result<&'c mut Vec<Self>> {
        let stage = path.stage.context("Task selection is missing its stage index")?;
        let checklist_id = checklist.id.clone();
        checklist
            .stage_requests
            .get_mut(stage)
            .map(|stage| &mut stage.task_requests)
            .with_context(|| format!("Stage index {} is out of range in checklist {}", stage, checklist_id))
    }
}

impl Entity for Parameter {
    const KIND: EntityKind = EntityKind::Parameter;
    const MAPPED: MappedKind = MappedKind::Parameter;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn order_position(&self) -> i64 {
        self.order_tree
    }

    fn set_order_position(&mut self, position: i64) {
        self.order_tree = position;
    }

    fn name(&self) -> String {
        self.display_label()
    }

    fn set_name(&mut self, name: String) {
        self.label = Some(name);
    }

    fn register(&self, mapping: &mut IdMapping, ids: &mut dyn IdGenerator) {
        mapping.register_parameter(self, ids);
    }

    fn descend(&mut self, generation: &Generation<'_>, _suffix: Option<&str>) -> Result<()> {
        if generation.request.components.linked_parameters {
            remap_parameter_references(self, generation)?;
        }
        Ok(())
    }

    fn container<'c>(checklist: &'c Checklist, path: &EntityPath) -> Result<&'c Vec<Self>> {
        let (stage, task) = parameter_parent(path)?;
        checklist
            .stage_requests
            .get(stage)
            .and_then(|stage| stage.task_requests.get(task))
            .map(|task| &task.parameter_requests)
            .with_context(|| format!("Task {}/{} is out of range in checklist {}", stage, task, checklist.id))
    }

    fn container_mut<'c>(checklist: &'c mut Checklist, path: &EntityPath) -> Result<&'c mut Vec<Self>> {
        let (stage, task) = parameter_parent(path)?;
        let checklist_id = checklist.id.clone();
        checklist
            .stage_requests
            .get_mut(stage)
            .and_then(|stage| stage.task_requests.get_mut(task))
            .map(|task| &mut task.parameter_requests)
            .with_context(|| format!("Task {}/{} is out of range in checklist {}", stage, task, checklist_id))
    }
}

fn parameter_parent(path: &EntityPath) -> Result<(usize, usize)> {
    let stage = path.stage.context("Parameter selection is missing its stage index")?;
    let task = path.task.context("Parameter selection is missing its task index")?;
    Ok((stage, task))
}

/// Index of the selected entity in its container
///
/// The index stored in the selection is trusted only if the entity there has
/// the selected id; otherwise the container is searched.
pub fn position_in<E: Entity>(container: &[E], selection: &Selection) -> Result<usize> {
    if let Some(hint) = selection.path.index {
        if container.get(hint).is_some_and(|entity| entity.id() == selection.id) {
            return Ok(hint);
        }
    }
    container
        .iter()
        .position(|entity| entity.id() == selection.id)
        .with_context(|| format!("{} {} not found in its parent container", E::KIND, selection.id))
}

/// Give an entity its id for this generation, then descend
pub fn regenerate<E: Entity>(entity: &mut E, generation: &Generation<'_>, suffix: Option<&str>) -> Result<()> {
    let new_id = generation.new_id(E::MAPPED, entity.id())?;
    entity.set_id(new_id);
    entity.descend(generation, suffix)
}

/// Build copy `generation.index` of a selected entity
///
/// The copy is renamed from the template, and the numeric part of its new name
/// is handed down so descendants can inherit it. Order position is left as
/// the original's; placement decides it.
pub fn copy_entity<E: Entity>(original: &E, generation: &Generation<'_>) -> Result<E> {
    let pattern = &generation.request.naming_pattern;
    let original_name = original.name();
    let name = pattern.render_copy(&original_name, generation.index);
    let suffix = pattern.suffix_of(&name, &original_name);

    let mut copy = original.clone();
    copy.set_name(name);
    regenerate(&mut copy, generation, suffix.as_deref())?;
    Ok(copy)
}

/// Copies, for one generation, of every action whose trigger task was duplicated
pub fn copy_actions(actions: &[Action], generation: &Generation<'_>) -> Result<Vec<Action>> {
    let mut copies = Vec::new();

    for action in actions {
        if !generation.mapping.contains(MappedKind::Action, &action.id) {
            continue;
        }

        let mut copy = action.clone();
        copy.id = generation.new_id(MappedKind::Action, &action.id)?;

        match generation.resolve(MappedKind::Task, &action.trigger_entity_id) {
            Rewrite::Replace(task_id) => copy.trigger_entity_id = task_id,
            Rewrite::Keep => {}
            Rewrite::Drop => {
                debug!("Skipping action {}: trigger {} is outside the copy", action.id, action.trigger_entity_id);
                continue;
            }
        }

        for effect in &mut copy.effect_requests {
            effect.id = generation.new_id(MappedKind::Effect, &effect.id)?;
            remap_effect(effect, generation);
        }

        copies.push(copy);
    }

    Ok(copies)
}
