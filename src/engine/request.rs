//! Duplication request: everything the configuration form collects
//!
//! Field names follow the JSON the form produces, so request files can be
//! written in either JSON or TOML with the same keys.

use super::naming;
use serde::{Deserialize, Serialize};

pub const MAX_COPIES: usize = 100;
pub const MAX_NAME_LENGTH: usize = 512;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DuplicationRequest {
    pub number_of_copies: usize,
    pub naming_pattern: NamingPattern,
    pub ordering_strategy: OrderingStrategy,
    pub grouping_strategy: GroupingStrategy,
    pub components: Components,
    pub reference_strategy: ReferenceStrategy,
    pub placement: Placement,
    pub child_naming: ChildNaming,
}

impl Default for DuplicationRequest {
    fn default() -> Self {
        Self {
            number_of_copies: 1,
            naming_pattern: NamingPattern::default(),
            ordering_strategy: OrderingStrategy::Interleaved,
            grouping_strategy: GroupingStrategy::Relative,
            components: Components::default(),
            reference_strategy: ReferenceStrategy::Keep,
            placement: Placement::default(),
            child_naming: ChildNaming::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamingPattern {
    pub base_name_override: Option<String>,
    pub template: String,
    pub zero_padding: bool,
    pub padding_length: usize,
    pub starting_number: u64,
}

impl Default for NamingPattern {
    fn default() -> Self {
        Self {
            base_name_override: None,
            template: "{base_name} {n}".to_string(),
            zero_padding: true,
            padding_length: 3,
            starting_number: 1,
        }
    }
}

impl NamingPattern {
    /// Base name for copies of an entity called `name`
    pub fn base_name<'a>(&'a self, name: &'a str) -> &'a str {
        match self.base_name_override.as_deref() {
            Some(base) if !base.is_empty() => base,
            _ => name,
        }
    }

    /// Name of copy `copy_index` (zero based) of an entity called `name`
    pub fn render_copy(&self, name: &str, copy_index: usize) -> String {
        naming::render(
            &self.template,
            self.base_name(name),
            self.starting_number + copy_index as u64,
            self.zero_padding,
            self.padding_length,
        )
    }

    pub fn render_all(&self, name: &str, count: usize) -> Vec<String> {
        naming::render_many(
            &self.template,
            self.base_name(name),
            count,
            self.zero_padding,
            self.padding_length,
            self.starting_number,
        )
    }

    /// Numeric suffix of a copy name rendered from `name`
    pub fn suffix_of(&self, rendered: &str, name: &str) -> Option<String> {
        naming::extract_suffix(rendered, &self.template, self.base_name(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingStrategy {
    /// A1, B1, C1, A2, B2, C2
    Interleaved,
    /// A1, A2, B1, B2, C1, C2
    Sequential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingStrategy {
    /// Copies next to each original
    Relative,
    /// All copies in one block after the last original
    Grouped,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Components {
    pub automations: bool,
    pub linked_parameters: bool,
    pub parameter_rules: bool,
    pub parameter_validations: bool,
    pub schedules: bool,
    pub media: bool,
    pub recurrence: bool,
    pub actions: bool,
}

impl Default for Components {
    fn default() -> Self {
        Self {
            automations: true,
            linked_parameters: true,
            parameter_rules: true,
            parameter_validations: true,
            schedules: true,
            media: true,
            recurrence: true,
            actions: true,
        }
    }
}

impl Components {
    /// Names of switched-off components, in form order
    pub fn excluded(&self) -> Vec<&'static str> {
        [
            ("automations", self.automations),
            ("linkedParameters", self.linked_parameters),
            ("parameterRules", self.parameter_rules),
            ("parameterValidations", self.parameter_validations),
            ("schedules", self.schedules),
            ("media", self.media),
            ("recurrence", self.recurrence),
            ("actions", self.actions),
        ]
        .into_iter()
        .filter(|(_, included)| !included)
        .map(|(name, _)| name)
        .collect()
    }
}

/// What happens to references that point outside the duplicated subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceStrategy {
    Keep,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    After,
    Before,
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Placement {
    pub position: Position,
    pub auto_shift: bool,
}

impl Default for Placement {
    fn default() -> Self {
        Self { position: Position::After, auto_shift: true }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChildNaming {
    pub tasks: ChildNamingRule,
    pub parameters: ChildNamingRule,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChildNamingRule {
    pub apply_inherited_suffix: bool,
    pub suffix_prefix: String,
}

impl ChildNamingRule {
    /// Cascaded name for a descendant, or the original when the rule is off
    pub fn apply(&self, original: &str, parent_suffix: Option<&str>) -> String {
        match parent_suffix {
            Some(suffix) if self.apply_inherited_suffix => {
                naming::render_child_name(original, suffix, &self.suffix_prefix, true)
            }
            _ => original.to_string(),
        }
    }
}
