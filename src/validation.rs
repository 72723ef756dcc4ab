//! Checks run before a configuration or request reaches the engine
//!
//! Problems are returned as data so the caller can list all of them at once.

use crate::engine::naming::{BASE_NAME_PLACEHOLDER, NUMBER_PLACEHOLDER};
use crate::engine::request::{DuplicationRequest, MAX_COPIES, MAX_NAME_LENGTH};
use crate::model::{Checklist, Selection};
use crate::sanitize;
use crate::tree;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Syntax,
    Schema,
    Structure,
    Request,
    Selection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl ValidationIssue {
    fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), field: None, line: None, column: None }
    }

    fn at(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let (Some(line), Some(column)) = (self.line, self.column) {
            write!(f, " (line {}, column {})", line, column)?;
        }
        if let Some(field) = &self.field {
            write!(f, " at {}", field)?;
        }
        Ok(())
    }
}

/// Parse raw text, reporting empty input or the syntax error position
pub fn validate_json_format(input: &str) -> Result<Value, ValidationIssue> {
    if input.trim().is_empty() {
        return Err(ValidationIssue::new(IssueKind::Syntax, "Input is empty"));
    }
    serde_json::from_str(&sanitize::preprocess(input)).map_err(|e| ValidationIssue {
        line: Some(e.line()),
        column: Some(e.column()),
        ..ValidationIssue::new(IssueKind::Syntax, e.to_string())
    })
}

/// Top-level shape: an array of checklists with `id`, `name` and `stageRequests`
pub fn validate_required_fields(config: &Value) -> Vec<ValidationIssue> {
    let Some(checklists) = config.as_array() else {
        return vec![ValidationIssue::new(
            IssueKind::Schema,
            "Configuration must be an array of checklist objects",
        )];
    };

    let mut issues = Vec::new();
    for (i, checklist) in checklists.iter().enumerate() {
        for field in ["id", "name", "stageRequests"] {
            if is_missing(checklist.get(field)) {
                issues.push(
                    ValidationIssue::new(
                        IssueKind::Schema,
                        format!("Checklist at index {} is missing required field: {}", i, field),
                    )
                    .at(format!("[{}].{}", i, field)),
                );
            }
        }
    }
    issues
}

/// Nested shape of stages, tasks and parameter lists
pub fn validate_structure(config: &Value) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (c, checklist) in config.as_array().into_iter().flatten().enumerate() {
        let checklist_name = text(checklist.get("name"));
        let Some(stages) = checklist.get("stageRequests").and_then(Value::as_array) else {
            issues.push(
                ValidationIssue::new(
                    IssueKind::Structure,
                    format!("Checklist \"{}\": stageRequests must be an array", checklist_name),
                )
                .at(format!("[{}].stageRequests", c)),
            );
            continue;
        };

        for (s, stage) in stages.iter().enumerate() {
            let stage_path = format!("[{}].stageRequests[{}]", c, s);
            if !has_identity(stage) {
                issues.push(
                    ValidationIssue::new(
                        IssueKind::Structure,
                        format!("Stage at index {} in \"{}\" is missing required fields", s, checklist_name),
                    )
                    .at(&stage_path),
                );
            }

            let stage_name = text(stage.get("name"));
            let Some(tasks) = stage.get("taskRequests").and_then(Value::as_array) else {
                issues.push(
                    ValidationIssue::new(
                        IssueKind::Structure,
                        format!("Stage \"{}\": taskRequests must be an array", stage_name),
                    )
                    .at(format!("{}.taskRequests", stage_path)),
                );
                continue;
            };

            for (t, task) in tasks.iter().enumerate() {
                let task_path = format!("{}.taskRequests[{}]", stage_path, t);
                if !has_identity(task) {
                    issues.push(
                        ValidationIssue::new(
                            IssueKind::Structure,
                            format!("Task at index {} in stage \"{}\" is missing required fields", t, stage_name),
                        )
                        .at(&task_path),
                    );
                }
                if !task.get("parameterRequests").is_some_and(Value::is_array) {
                    issues.push(
                        ValidationIssue::new(
                            IssueKind::Structure,
                            format!("Task \"{}\": parameterRequests must be an array", text(task.get("name"))),
                        )
                        .at(format!("{}.parameterRequests", task_path)),
                    );
                }
            }
        }
    }

    issues
}

/// Every check on raw configuration text, in order; stops at the first failing stage
pub fn validate_configuration(input: &str) -> Vec<ValidationIssue> {
    let value = match validate_json_format(input) {
        Ok(value) => value,
        Err(issue) => return vec![issue],
    };
    let issues = validate_required_fields(&value);
    if !issues.is_empty() {
        return issues;
    }
    validate_structure(&value)
}

pub fn validate_copy_count(count: usize) -> Option<String> {
    if count < 1 {
        Some("Must be at least 1".to_string())
    } else if count > MAX_COPIES {
        Some(format!("Maximum {} copies allowed", MAX_COPIES))
    } else {
        None
    }
}

pub fn validate_naming_pattern(template: &str, base_name: &str) -> Option<String> {
    if !template.contains(NUMBER_PLACEHOLDER) {
        return Some("Pattern must include {n} placeholder".to_string());
    }
    let sample = template
        .replacen(BASE_NAME_PLACEHOLDER, base_name, 1)
        .replacen(NUMBER_PLACEHOLDER, "001", 1);
    if sample.chars().count() > MAX_NAME_LENGTH {
        return Some(format!("Generated names would be too long (>{} characters)", MAX_NAME_LENGTH));
    }
    None
}

/// Request checks for copies of an entity called `entity_name`
pub fn validate_request(request: &DuplicationRequest, entity_name: &str) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if let Some(message) = validate_copy_count(request.number_of_copies) {
        issues.push(ValidationIssue::new(IssueKind::Request, message).at("numberOfCopies"));
    }
    let pattern = &request.naming_pattern;
    if let Some(message) = validate_naming_pattern(&pattern.template, pattern.base_name(entity_name)) {
        issues.push(ValidationIssue::new(IssueKind::Request, message).at("namingPattern.template"));
    }
    issues
}

/// Selections must be non-empty, of one kind and resolvable
pub fn validate_selections(config: &[Checklist], selections: &[Selection]) -> Vec<ValidationIssue> {
    let Some(first) = selections.first() else {
        return vec![ValidationIssue::new(IssueKind::Selection, "No entities selected")];
    };

    let mut issues = Vec::new();
    if selections.iter().any(|selection| selection.kind != first.kind) {
        issues.push(ValidationIssue::new(
            IssueKind::Selection,
            "All selected entities must be of the same kind",
        ));
    }
    for selection in selections {
        if tree::locate(config, &selection.id).is_none() {
            issues.push(
                ValidationIssue::new(IssueKind::Selection, format!("No stage, task or parameter with id {}", selection.id))
                    .at(selection.id.clone()),
            );
        }
    }

    let mut seen = HashSet::new();
    for selection in selections {
        if !seen.insert(&selection.id) {
            issues.push(
                ValidationIssue::new(IssueKind::Selection, format!("{} is selected more than once", selection.id))
                    .at(selection.id.clone()),
            );
        }
    }
    issues
}

/// Proposed names that already exist
pub fn detect_name_conflicts(proposed: &[String], existing: &[String]) -> Vec<String> {
    let existing: HashSet<&String> = existing.iter().collect();
    proposed.iter().filter(|name| existing.contains(name)).cloned().collect()
}

/// Order positions that occur more than once, once per repeat
pub fn detect_order_duplicates(orders: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::new();
    orders.iter().copied().filter(|order| !seen.insert(*order)).collect()
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn has_identity(entity: &Value) -> bool {
    !is_missing(entity.get("id")) && !is_missing(entity.get("name")) && entity.get("orderTree").is_some_and(Value::is_number)
}

fn text(value: Option<&Value>) -> &str {
    value.and_then(Value::as_str).unwrap_or_default()
}
