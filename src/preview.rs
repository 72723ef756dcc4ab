//! What a duplication will change, computed by running it on a clone
//!
//! The report compares the configuration before and after the run: entity
//! counts, renumbered siblings, proposed names and anything worth warning
//! about.

use crate::engine::duplicator::{Entity, position_in};
use crate::engine::ids::{IdGenerator, is_id_reference};
use crate::engine::placement;
use crate::engine::request::{DuplicationRequest, ReferenceStrategy};
use crate::engine::{DuplicationEngine, IdMapping, SequentialIdGenerator};
use crate::model::{Automation, Checklist, Configuration, EntityKind, EntityPath, Parameter, Selection, Stage, Task};
use crate::tree::EntityCounts;
use crate::validation::detect_name_conflicts;
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSummary {
    #[serde(flatten)]
    pub added: EntityCounts,
    pub total_entities: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPositionChange {
    pub kind: EntityKind,
    pub id: String,
    pub name: String,
    pub old_position: i64,
    pub new_position: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    ExternalReference,
    OrderShift,
    NameConflict,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    #[serde(rename = "type")]
    pub kind: WarningKind,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub affected_entities: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewData {
    pub summary: PreviewSummary,
    pub name_preview: Vec<String>,
    pub order_position_changes: Vec<OrderPositionChange>,
    pub warnings: Vec<Warning>,
}

/// Run the duplication and describe its effect
///
/// Returns the report together with the configuration it describes, so the
/// caller can write out exactly what was previewed.
pub fn generate_preview<G: IdGenerator>(
    engine: &mut DuplicationEngine<G>,
    config: &[Checklist],
    selections: &[Selection],
    request: &DuplicationRequest,
) -> Result<(PreviewData, Configuration)> {
    let modified = engine.duplicate_multiple_entities(config, selections, request)?;

    let added = EntityCounts::of_config(&modified).added_since(&EntityCounts::of_config(config));
    let summary = PreviewSummary { added, total_entities: added.total() };

    let kind = selections.first().map(|selection| selection.kind);
    let (name_preview, order_position_changes, existing_names, external) = match kind {
        Some(EntityKind::Stage) => analyze::<Stage>(config, &modified, selections, request)?,
        Some(EntityKind::Task) => analyze::<Task>(config, &modified, selections, request)?,
        Some(EntityKind::Parameter) => analyze::<Parameter>(config, &modified, selections, request)?,
        None => Default::default(),
    };

    let conflicts = detect_name_conflicts(&name_preview, &existing_names);
    let warnings = build_warnings(request, &order_position_changes, &conflicts, &external);

    Ok((PreviewData { summary, name_preview, order_position_changes, warnings }, modified))
}

/// Preview for a single selection
pub fn generate_single_preview<G: IdGenerator>(
    engine: &mut DuplicationEngine<G>,
    config: &[Checklist],
    selection: &Selection,
    request: &DuplicationRequest,
) -> Result<(PreviewData, Configuration)> {
    generate_preview(engine, config, std::slice::from_ref(selection), request)
}

type Analysis = (Vec<String>, Vec<OrderPositionChange>, Vec<String>, Vec<String>);

fn analyze<E: Entity>(
    config: &[Checklist],
    modified: &[Checklist],
    selections: &[Selection],
    request: &DuplicationRequest,
) -> Result<Analysis> {
    let mut originals = Vec::with_capacity(selections.len());
    for selection in selections {
        let checklist = checklist_at(config, selection)?;
        let container = E::container(checklist, &selection.path)?;
        originals.push(container[position_in(container, selection)?].clone());
    }
    originals.sort_by_key(|entity| entity.order_position());

    let name_preview = preview_names(&originals, request);

    // Each affected container once, identified by its path without the entity index
    let containers: BTreeSet<(usize, Option<usize>, Option<usize>)> = selections
        .iter()
        .map(|selection| container_key(E::KIND, &selection.path))
        .collect();

    let mut changes = Vec::new();
    let mut existing_names = Vec::new();
    for (c, stage, task) in containers {
        let path = EntityPath { checklist: c, stage, task, index: None };
        let Some(before) = config.get(c) else { continue };
        let Some(after) = modified.get(c) else { continue };
        let before = E::container(before, &path)?;
        let after = E::container(after, &path)?;

        existing_names.extend(before.iter().map(Entity::name));
        for old in before {
            if let Some(new) = after.iter().find(|entity| entity.id() == old.id()) {
                if new.order_position() != old.order_position() {
                    changes.push(OrderPositionChange {
                        kind: E::KIND,
                        id: old.id().to_string(),
                        name: old.name(),
                        old_position: old.order_position(),
                        new_position: new.order_position(),
                    });
                }
            }
        }
    }

    let external = external_references_of_all(config, selections)?;

    Ok((name_preview, changes, existing_names, external))
}

/// External referrers across every selection, each id once
fn external_references_of_all(config: &[Checklist], selections: &[Selection]) -> Result<Vec<String>> {
    let mut external = BTreeSet::new();
    for selection in selections {
        external.extend(external_references(config, selection)?);
    }
    Ok(external.into_iter().collect())
}

/// Names of all copies, in the order the strategy inserts them
fn preview_names<E: Entity>(originals: &[E], request: &DuplicationRequest) -> Vec<String> {
    let pattern = &request.naming_pattern;
    placement::emission_order(originals.len(), request.number_of_copies, request.ordering_strategy)
        .into_iter()
        .map(|(entity, generation)| pattern.render_copy(&originals[entity].name(), generation))
        .collect()
}

fn container_key(kind: EntityKind, path: &EntityPath) -> (usize, Option<usize>, Option<usize>) {
    match kind {
        EntityKind::Stage => (path.checklist, None, None),
        EntityKind::Task => (path.checklist, path.stage, None),
        EntityKind::Parameter => (path.checklist, path.stage, path.task),
    }
}

fn checklist_at<'c>(config: &'c [Checklist], selection: &Selection) -> Result<&'c Checklist> {
    config
        .get(selection.path.checklist)
        .ok_or_else(|| anyhow::anyhow!("Checklist index {} is out of range", selection.path.checklist))
}

/// Ids of entities in the selected subtree that reference something outside it
pub fn external_references(config: &[Checklist], selection: &Selection) -> Result<Vec<String>> {
    let checklist = checklist_at(config, selection)?;
    let (mapping, parameters, automations) = match selection.kind {
        EntityKind::Stage => subtree::<Stage>(checklist, selection, |stage| {
            stage.task_requests.iter().collect()
        })?,
        EntityKind::Task => subtree::<Task>(checklist, selection, |task| vec![task])?,
        EntityKind::Parameter => {
            let container = Parameter::container(checklist, &selection.path)?;
            let parameter = &container[position_in(container, selection)?];
            let mut mapping = IdMapping::new(1);
            parameter.register(&mut mapping, &mut SequentialIdGenerator::default());
            (mapping, vec![parameter.clone()], Vec::new())
        }
    };

    let mut referencing = Vec::new();
    for parameter in &parameters {
        if parameter_references(parameter).iter().any(|id| mapping.lookup_any(id, 0).is_none()) {
            referencing.push(parameter.id.clone());
        }
    }
    for automation in &automations {
        let payloads = [&automation.action_details, &automation.trigger_details];
        let ids: Vec<String> = payloads.into_iter().flatten().flat_map(payload_ids).collect();
        if ids.iter().any(|id| mapping.lookup_any(id, 0).is_none()) {
            referencing.push(automation.id.clone());
        }
    }
    Ok(referencing)
}

type Subtree = (IdMapping, Vec<Parameter>, Vec<Automation>);

fn subtree<E: Entity>(
    checklist: &Checklist,
    selection: &Selection,
    tasks_of: impl Fn(&E) -> Vec<&Task>,
) -> Result<Subtree> {
    let container = E::container(checklist, &selection.path)?;
    let entity = &container[position_in(container, selection)?];

    let mut mapping = IdMapping::new(1);
    entity.register(&mut mapping, &mut SequentialIdGenerator::default());

    let tasks = tasks_of(entity);
    let parameters = tasks.iter().flat_map(|task| task.parameter_requests.iter().cloned()).collect();
    let automations = tasks
        .iter()
        .flat_map(|task| task.automation_requests.iter().flatten().cloned())
        .collect();
    debug_assert!(mapping.contains(E::MAPPED, &selection.id));
    Ok((mapping, parameters, automations))
}

/// Every id a parameter points at through its reference surfaces
fn parameter_references(parameter: &Parameter) -> Vec<String> {
    let mut ids = Vec::new();
    if let Some(Some(auto_initialize)) = &parameter.auto_initialize {
        ids.push(auto_initialize.parameter_id.clone());
    }
    for rule in parameter.rules.iter().flatten() {
        if let Some(show) = &rule.show {
            ids.extend(show.parameters.iter().flatten().cloned());
            ids.extend(show.tasks.iter().flatten().cloned());
        }
    }
    if let Some(validations) = &parameter.validations {
        ids.extend(payload_ids(validations));
    }
    if let Some(data) = &parameter.data {
        for field in ["propertyFilters", "propertyValidations"] {
            if let Some(value) = data.get(field) {
                ids.extend(payload_ids(value));
            }
        }
    }
    ids
}

/// Id-shaped values under id-like keys; unparseable string payloads yield nothing
fn payload_ids(payload: &Value) -> Vec<String> {
    fn walk(value: &Value, ids: &mut Vec<String>) {
        match value {
            Value::Array(items) => items.iter().for_each(|item| walk(item, ids)),
            Value::Object(object) => {
                for (key, value) in object {
                    if is_id_reference(key, value) {
                        ids.extend(value.as_str().map(str::to_string));
                    } else {
                        walk(value, ids);
                    }
                }
            }
            _ => {}
        }
    }

    let mut ids = Vec::new();
    match payload {
        Value::String(encoded) => {
            if let Ok(parsed) = serde_json::from_str::<Value>(encoded) {
                walk(&parsed, &mut ids);
            }
        }
        other => walk(other, &mut ids),
    }
    ids
}

fn build_warnings(
    request: &DuplicationRequest,
    changes: &[OrderPositionChange],
    conflicts: &[String],
    external: &[String],
) -> Vec<Warning> {
    let mut warnings = Vec::new();

    if !changes.is_empty() && request.placement.auto_shift {
        warnings.push(Warning {
            kind: WarningKind::OrderShift,
            severity: Severity::Info,
            title: "Order Adjustment".to_string(),
            message: format!(
                "{} existing {}(s) will be renumbered to make room for {} cop{}",
                changes.len(),
                changes[0].kind,
                request.number_of_copies,
                if request.number_of_copies == 1 { "y" } else { "ies" }
            ),
            affected_entities: changes.iter().map(|change| change.id.clone()).collect(),
        });
    }

    if !external.is_empty() {
        warnings.push(Warning {
            kind: WarningKind::ExternalReference,
            severity: Severity::Warning,
            title: "External References Detected".to_string(),
            message: format!(
                "{} entit{} in the selection reference entities outside it",
                external.len(),
                if external.len() == 1 { "y" } else { "ies" }
            ),
            affected_entities: external.to_vec(),
        });
    }

    warnings.push(match request.reference_strategy {
        ReferenceStrategy::Keep => Warning {
            kind: WarningKind::ExternalReference,
            severity: Severity::Info,
            title: "External References Preserved".to_string(),
            message: "All copies will reference the same external entities.".to_string(),
            affected_entities: Vec::new(),
        },
        ReferenceStrategy::Remove => Warning {
            kind: WarningKind::ExternalReference,
            severity: Severity::Warning,
            title: "External References Removed".to_string(),
            message: "Automations, rules and mentions that point outside the selection will be removed from the copies."
                .to_string(),
            affected_entities: Vec::new(),
        },
    });

    if !conflicts.is_empty() {
        warnings.push(Warning {
            kind: WarningKind::NameConflict,
            severity: Severity::Warning,
            title: "Name Conflicts".to_string(),
            message: format!("These names already exist: {}", conflicts.join(", ")),
            affected_entities: Vec::new(),
        });
    }

    let excluded = request.components.excluded();
    if !excluded.is_empty() {
        warnings.push(Warning {
            kind: WarningKind::Other,
            severity: Severity::Info,
            title: "Components Excluded".to_string(),
            message: format!("The following components will not be copied: {}", excluded.join(", ")),
            affected_entities: Vec::new(),
        });
    }

    warnings
}
