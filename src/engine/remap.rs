//! Reference rewriting for one copy generation
//!
//! Every reference is resolved the same way: an id found in the mapping is
//! internal and gets the id of the current generation; anything else is
//! external and is kept or dropped according to the reference strategy.

use super::ids::is_id_reference;
use super::mapping::{IdMapping, MappedKind};
use super::request::{DuplicationRequest, ReferenceStrategy};
use crate::model::{Automation, Effect, MentionEntity, Parameter, ParameterRule, RichText, RichTextNode, TextNode};
use anyhow::{Context, Result};
use log::debug;
use serde_json::{Map, Value};

/// Everything needed to rewrite one generation of copies
#[derive(Debug, Clone, Copy)]
pub struct Generation<'a> {
    pub mapping: &'a IdMapping,
    pub index: usize,
    pub request: &'a DuplicationRequest,
}

/// Outcome of resolving a single reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// Internal reference, replaced by this generation's id
    Replace(String),
    /// External reference left as it was
    Keep,
    /// External reference removed together with its field or entry
    Drop,
}

impl<'a> Generation<'a> {
    pub fn new(mapping: &'a IdMapping, index: usize, request: &'a DuplicationRequest) -> Self {
        Self { mapping, index, request }
    }

    /// Fresh id for an entity inside the duplicated subtree
    pub fn new_id(&self, kind: MappedKind, old_id: &str) -> Result<String> {
        self.mapping
            .lookup(kind, old_id, self.index)
            .map(str::to_string)
            .with_context(|| format!("No identifier allocated for {:?} {} in copy {}", kind, old_id, self.index + 1))
    }

    pub fn resolve(&self, kind: MappedKind, old_id: &str) -> Rewrite {
        self.decide(self.mapping.lookup(kind, old_id, self.index))
    }

    /// Resolve a reference of unknown kind found in an opaque payload
    pub fn resolve_any(&self, old_id: &str) -> Rewrite {
        self.decide(self.mapping.lookup_any(old_id, self.index))
    }

    fn decide(&self, found: Option<&str>) -> Rewrite {
        match (found, self.request.reference_strategy) {
            (Some(new_id), _) => Rewrite::Replace(new_id.to_string()),
            (None, ReferenceStrategy::Keep) => Rewrite::Keep,
            (None, ReferenceStrategy::Remove) => Rewrite::Drop,
        }
    }
}

/// Rewrite a list of ids in place, dropping external entries when asked to
pub fn remap_id_list(ids: &mut Vec<String>, kind: MappedKind, generation: &Generation<'_>) {
    ids.retain_mut(|id| match generation.resolve(kind, id) {
        Rewrite::Replace(new_id) => {
            *id = new_id;
            true
        }
        Rewrite::Keep => true,
        Rewrite::Drop => false,
    });
}

/// Rewrite the reference surfaces of a parameter that the request enables
pub fn remap_parameter_references(parameter: &mut Parameter, generation: &Generation<'_>) -> Result<()> {
    let components = &generation.request.components;

    if let Some(Some(auto_initialize)) = &mut parameter.auto_initialize {
        match generation.resolve(MappedKind::Parameter, &auto_initialize.parameter_id) {
            Rewrite::Replace(new_id) => auto_initialize.parameter_id = new_id,
            Rewrite::Keep => {}
            Rewrite::Drop => {
                debug!("Dropping external autoInitialize on parameter {}", parameter.id);
                parameter.auto_initialize = None;
            }
        }
    }

    if components.parameter_rules {
        for rule in parameter.rules.iter_mut().flatten() {
            remap_rule(rule, generation);
        }
    }

    if components.parameter_validations {
        if let Some(validations) = &parameter.validations {
            parameter.validations = Some(
                remap_payload(validations, generation)
                    .with_context(|| format!("Failed to remap validations of parameter {}", parameter.id))?,
            );
        }

        if let Some(Value::Object(data)) = &mut parameter.data {
            for field in ["propertyFilters", "propertyValidations"] {
                if let Some(value) = data.get(field) {
                    let remapped = remap_payload(value, generation)
                        .with_context(|| format!("Failed to remap {} of parameter {}", field, parameter.id))?;
                    data.insert(field.to_string(), remapped);
                }
            }
        }
    }

    Ok(())
}

pub fn remap_rule(rule: &mut ParameterRule, generation: &Generation<'_>) {
    if let Some(show) = &mut rule.show {
        if let Some(parameters) = &mut show.parameters {
            remap_id_list(parameters, MappedKind::Parameter, generation);
        }
        if let Some(tasks) = &mut show.tasks {
            remap_id_list(tasks, MappedKind::Task, generation);
        }
    }
}

pub fn remap_automation(automation: &mut Automation, generation: &Generation<'_>) -> Result<()> {
    for (field, payload) in [
        ("actionDetails", &mut automation.action_details),
        ("triggerDetails", &mut automation.trigger_details),
    ] {
        if let Some(value) = payload {
            *value = remap_payload(value, generation)
                .with_context(|| format!("Failed to remap {} of automation {}", field, automation.id))?;
        }
    }
    Ok(())
}

/// Rewrite an opaque payload that is either inline JSON or a JSON-encoded string
///
/// String payloads are parsed, rewritten and serialized back. A string that
/// does not parse is an error: leaving it untouched would keep stale ids.
pub fn remap_payload(payload: &Value, generation: &Generation<'_>) -> Result<Value> {
    match payload {
        Value::String(encoded) if encoded.is_empty() => Ok(payload.clone()),
        Value::String(encoded) => {
            let parsed: Value = serde_json::from_str(encoded).context("Payload is not valid JSON")?;
            let remapped = remap_json(&parsed, generation);
            Ok(Value::String(serde_json::to_string(&remapped)?))
        }
        other => Ok(remap_json(other, generation)),
    }
}

/// Walk a JSON tree and rewrite every id-shaped value under an id-like key
pub fn remap_json(value: &Value, generation: &Generation<'_>) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(|item| remap_json(item, generation)).collect()),
        Value::Object(object) => {
            let mut result = Map::with_capacity(object.len());
            for (key, value) in object {
                if !is_id_reference(key, value) {
                    result.insert(key.clone(), remap_json(value, generation));
                    continue;
                }
                let old_id = value.as_str().unwrap_or_default();
                match generation.resolve_any(old_id) {
                    Rewrite::Replace(new_id) => {
                        result.insert(key.clone(), Value::String(new_id));
                    }
                    Rewrite::Keep => {
                        result.insert(key.clone(), value.clone());
                    }
                    Rewrite::Drop => debug!("Dropping external reference {}={}", key, old_id),
                }
            }
            Value::Object(result)
        }
        scalar => scalar.clone(),
    }
}

pub fn remap_effect(effect: &mut Effect, generation: &Generation<'_>) {
    for document in effect.documents_mut() {
        remap_rich_text(document, generation);
    }
}

/// Rewrite mention nodes; removed mentions become visible text markers
pub fn remap_rich_text(document: &mut RichText, generation: &Generation<'_>) {
    if let Some(children) = &mut document.root.children {
        remap_nodes(children, generation);
    }
}

fn remap_nodes(nodes: &mut [RichTextNode], generation: &Generation<'_>) {
    for node in nodes.iter_mut() {
        let replacement = match node {
            RichTextNode::Mention(mention) => {
                let kind = match mention.data.entity {
                    MentionEntity::Parameter => MappedKind::Parameter,
                    MentionEntity::Task => MappedKind::Task,
                    MentionEntity::Effect => MappedKind::Effect,
                    MentionEntity::Constant => continue,
                };
                match generation.resolve(kind, &mention.data.id) {
                    Rewrite::Replace(new_id) => {
                        mention.data.id = new_id;
                        None
                    }
                    Rewrite::Keep => None,
                    Rewrite::Drop => Some(RichTextNode::Text(TextNode::removed_marker(&mention.value))),
                }
            }
            RichTextNode::Element(element) => {
                if let Some(children) = &mut element.children {
                    remap_nodes(children, generation);
                }
                None
            }
            RichTextNode::Text(_) => None,
        };

        if let Some(replacement) = replacement {
            *node = replacement;
        }
    }
}
