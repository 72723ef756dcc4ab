//! Typed view of an MES checklist configuration
//!
//! Every entity keeps the fields the engine does not understand in a flattened
//! `extra` map, so a configuration read through these types serializes back to
//! the same shape it came in with.

pub mod rich_text;
pub mod selection;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use rich_text::{ElementNode, MentionData, MentionEntity, MentionNode, RichText, RichTextNode, TextNode};
pub use selection::{EntityKind, EntityPath, Selection};

/// A whole configuration file: an array of checklists
pub type Configuration = Vec<Checklist>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub stage_requests: Vec<Stage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_requests: Option<Vec<Action>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: String,
    pub name: String,
    pub order_tree: i64,
    #[serde(default)]
    pub task_requests: Vec<Task>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub order_tree: i64,
    #[serde(default)]
    pub parameter_requests: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automation_requests: Option<Vec<Automation>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub id: String,
    pub order_tree: i64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub parameter_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub auto_initialize: Option<Option<AutoInitialize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<ParameterRule>>,
    /// Validation list; string-encoded JSON or inline JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validations: Option<Value>,
    /// Type-specific payload; `propertyFilters` and `propertyValidations` carry references
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Parameter {
    /// Label used for naming; unlabeled parameters fall back to their id
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) if !label.is_empty() => label.clone(),
            _ => format!("Parameter {}", self.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoInitialize {
    pub parameter_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<RuleShow>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleShow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Automation {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_details: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Checklist-level action fired by a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub trigger_entity_id: String,
    #[serde(default)]
    pub effect_requests: Vec<Effect>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    pub id: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub query: Option<Option<RichText>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub api_endpoint: Option<Option<RichText>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub api_payload: Option<Option<RichText>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Effect {
    /// Mutable access to whichever rich-text documents are present
    pub fn documents_mut(&mut self) -> impl Iterator<Item = &mut RichText> {
        [&mut self.query, &mut self.api_endpoint, &mut self.api_payload]
            .into_iter()
            .filter_map(|field| field.as_mut().and_then(|inner| inner.as_mut()))
    }
}

/// Parse a configuration from JSON text
pub fn parse_configuration(json: &str) -> anyhow::Result<Configuration> {
    use anyhow::Context;
    serde_json::from_str(json).context("Failed to parse checklist configuration")
}
