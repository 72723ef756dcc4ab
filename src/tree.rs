//! Browsing a configuration: outline nodes, counts, lookup and search

use crate::model::{Checklist, Configuration, EntityKind, Selection, Stage, Task};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::Serialize;
use std::ops::AddAssign;

/// Number of entities of each kind below a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub stages: usize,
    pub tasks: usize,
    pub parameters: usize,
    pub automations: usize,
    pub rules: usize,
    pub actions: usize,
    pub effects: usize,
}

impl EntityCounts {
    pub fn of_config(config: &[Checklist]) -> Self {
        let mut counts = Self::default();
        for checklist in config {
            counts += Self::of_checklist(checklist);
        }
        counts
    }

    pub fn of_checklist(checklist: &Checklist) -> Self {
        let mut counts = Self { stages: checklist.stage_requests.len(), ..Self::default() };
        for stage in &checklist.stage_requests {
            counts += Self::of_stage(stage);
        }
        for action in checklist.action_requests.iter().flatten() {
            counts.actions += 1;
            counts.effects += action.effect_requests.len();
        }
        counts
    }

    pub fn of_stage(stage: &Stage) -> Self {
        let mut counts = Self { tasks: stage.task_requests.len(), ..Self::default() };
        for task in &stage.task_requests {
            counts += Self::of_task(task);
        }
        counts
    }

    pub fn of_task(task: &Task) -> Self {
        Self {
            parameters: task.parameter_requests.len(),
            automations: task.automation_requests.as_ref().map_or(0, Vec::len),
            rules: task
                .parameter_requests
                .iter()
                .map(|parameter| parameter.rules.as_ref().map_or(0, Vec::len))
                .sum(),
            ..Self::default()
        }
    }

    pub fn total(&self) -> usize {
        self.stages + self.tasks + self.parameters + self.automations + self.rules + self.actions + self.effects
    }

    /// Entities present in `self` but not in `before`, per kind
    pub fn added_since(&self, before: &EntityCounts) -> EntityCounts {
        EntityCounts {
            stages: self.stages.saturating_sub(before.stages),
            tasks: self.tasks.saturating_sub(before.tasks),
            parameters: self.parameters.saturating_sub(before.parameters),
            automations: self.automations.saturating_sub(before.automations),
            rules: self.rules.saturating_sub(before.rules),
            actions: self.actions.saturating_sub(before.actions),
            effects: self.effects.saturating_sub(before.effects),
        }
    }
}

impl AddAssign for EntityCounts {
    fn add_assign(&mut self, other: Self) {
        self.stages += other.stages;
        self.tasks += other.tasks;
        self.parameters += other.parameters;
        self.automations += other.automations;
        self.rules += other.rules;
        self.actions += other.actions;
        self.effects += other.effects;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Checklist,
    Stage,
    Task,
    Parameter,
}

/// One node of the browsable outline
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    pub kind: NodeKind,
    pub id: String,
    pub name: String,
    pub order: Option<i64>,
    pub counts: EntityCounts,
    /// Present for every selectable node
    pub selection: Option<Selection>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Depth-first walk yielding `(depth, node)`
    pub fn walk(&self) -> Vec<(usize, &TreeNode)> {
        let mut nodes = Vec::new();
        self.walk_into(0, &mut nodes);
        nodes
    }

    fn walk_into<'a>(&'a self, depth: usize, nodes: &mut Vec<(usize, &'a TreeNode)>) {
        nodes.push((depth, self));
        for child in &self.children {
            child.walk_into(depth + 1, nodes);
        }
    }
}

pub fn build_tree(config: &[Checklist]) -> Vec<TreeNode> {
    config
        .iter()
        .enumerate()
        .map(|(c, checklist)| TreeNode {
            kind: NodeKind::Checklist,
            id: checklist.id.clone(),
            name: checklist.name.clone(),
            order: None,
            counts: EntityCounts::of_checklist(checklist),
            selection: None,
            children: checklist
                .stage_requests
                .iter()
                .enumerate()
                .map(|(s, stage)| TreeNode {
                    kind: NodeKind::Stage,
                    id: stage.id.clone(),
                    name: stage.name.clone(),
                    order: Some(stage.order_tree),
                    counts: EntityCounts::of_stage(stage),
                    selection: Some(Selection::stage(&stage.id, c, s)),
                    children: stage
                        .task_requests
                        .iter()
                        .enumerate()
                        .map(|(t, task)| TreeNode {
                            kind: NodeKind::Task,
                            id: task.id.clone(),
                            name: task.name.clone(),
                            order: Some(task.order_tree),
                            counts: EntityCounts::of_task(task),
                            selection: Some(Selection::task(&task.id, c, s, t)),
                            children: task
                                .parameter_requests
                                .iter()
                                .enumerate()
                                .map(|(p, parameter)| TreeNode {
                                    kind: NodeKind::Parameter,
                                    id: parameter.id.clone(),
                                    name: parameter.display_label(),
                                    order: Some(parameter.order_tree),
                                    counts: EntityCounts::default(),
                                    selection: Some(Selection::parameter(&parameter.id, c, s, t, Some(p))),
                                    children: Vec::new(),
                                })
                                .collect(),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect()
}

/// Selection descriptor for the stage, task or parameter with this id
pub fn locate(config: &[Checklist], id: &str) -> Option<Selection> {
    for (c, checklist) in config.iter().enumerate() {
        for (s, stage) in checklist.stage_requests.iter().enumerate() {
            if stage.id == id {
                return Some(Selection::stage(id, c, s));
            }
            for (t, task) in stage.task_requests.iter().enumerate() {
                if task.id == id {
                    return Some(Selection::task(id, c, s, t));
                }
                if let Some(p) = task.parameter_requests.iter().position(|parameter| parameter.id == id) {
                    return Some(Selection::parameter(id, c, s, t, Some(p)));
                }
            }
        }
    }
    None
}

/// Display name of the selected entity, if it exists
pub fn entity_name(config: &Configuration, selection: &Selection) -> Option<String> {
    let checklist = config.get(selection.path.checklist)?;
    let stages = &checklist.stage_requests;
    match selection.kind {
        EntityKind::Stage => stages.iter().find(|stage| stage.id == selection.id).map(|stage| stage.name.clone()),
        EntityKind::Task => stages
            .get(selection.path.stage?)?
            .task_requests
            .iter()
            .find(|task| task.id == selection.id)
            .map(|task| task.name.clone()),
        EntityKind::Parameter => stages
            .get(selection.path.stage?)?
            .task_requests
            .get(selection.path.task?)?
            .parameter_requests
            .iter()
            .find(|parameter| parameter.id == selection.id)
            .map(|parameter| parameter.display_label()),
    }
}

/// Fuzzy search over node names, best match first
pub fn search<'a>(tree: &'a [TreeNode], query: &str) -> Vec<(&'a TreeNode, i64)> {
    let matcher = SkimMatcherV2::default().ignore_case();
    let mut scored: Vec<(&TreeNode, i64)> = tree
        .iter()
        .flat_map(TreeNode::walk)
        .filter(|(_, node)| node.kind != NodeKind::Checklist)
        .filter_map(|(_, node)| matcher.fuzzy_match(&node.name, query).map(|score| (node, score)))
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
}
