//! Options shared by `preview`, `duplicate` and `settings save`, and the
//! loading steps every engine command goes through.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::*;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use mes_dup::config::{self, Config};
use mes_dup::engine::{
    DuplicationEngine, DuplicationRequest, GroupingStrategy, IdGenerator, OrderingStrategy, Position,
    ReferenceStrategy, SequentialIdGenerator, TimestampIdGenerator,
};
use mes_dup::model::{Configuration, Selection};
use mes_dup::{sanitize, tree, validation};

#[derive(Args, Debug, Clone, Default)]
pub struct RequestArgs {
    /// Request file (TOML or JSON) layered over the stored defaults
    #[arg(long, value_name = "FILE")]
    pub request: Option<PathBuf>,

    /// Number of copies per selected entity (1-100)
    #[arg(short = 'n', long)]
    pub copies: Option<usize>,

    /// Name template; must contain {n}, may contain {base_name}
    #[arg(short, long)]
    pub template: Option<String>,

    /// Base name used instead of each entity's own name
    #[arg(long)]
    pub base_name: Option<String>,

    /// Number of the first copy
    #[arg(long)]
    pub start: Option<u64>,

    /// Zero-pad copy numbers to this width
    #[arg(long, value_name = "WIDTH", conflicts_with = "no_pad")]
    pub pad: Option<usize>,

    /// Do not zero-pad copy numbers
    #[arg(long)]
    pub no_pad: bool,

    /// Order of copies when several entities are selected
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Where sequential copies go when several entities are selected
    #[arg(long, value_enum)]
    pub grouping: Option<GroupingArg>,

    /// Where copies of a single entity are inserted
    #[arg(long, value_enum)]
    pub position: Option<PositionArg>,

    /// Keep existing order positions instead of renumbering siblings
    #[arg(long)]
    pub no_auto_shift: bool,

    /// What to do with references that point outside the selection
    #[arg(long, value_enum)]
    pub references: Option<ReferencesArg>,

    /// Components to leave out of the copies
    #[arg(long, value_enum, value_delimiter = ',')]
    pub exclude: Vec<ComponentArg>,

    /// Append the copy number to task names under a copied stage
    #[arg(long, value_name = "PREFIX", num_args = 0..=1, default_missing_value = "")]
    pub cascade_tasks: Option<String>,

    /// Append the copy number to parameter labels under a copied stage or task
    #[arg(long, value_name = "PREFIX", num_args = 0..=1, default_missing_value = "")]
    pub cascade_parameters: Option<String>,

    /// Use sequential ids starting at this number instead of clock-based ones
    #[arg(
        long,
        value_name = "FIRST_ID",
        num_args = 0..=1,
        default_missing_value = "1000000000000000001"
    )]
    pub deterministic_ids: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Interleaved,
    Sequential,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GroupingArg {
    Relative,
    Grouped,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PositionArg {
    After,
    Before,
    Start,
    End,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReferencesArg {
    Keep,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ComponentArg {
    Automations,
    LinkedParameters,
    ParameterRules,
    ParameterValidations,
    Schedules,
    Media,
    Recurrence,
    Actions,
}

impl RequestArgs {
    /// Stored defaults, then the request file, then flags
    pub fn resolve(&self, settings: &Config) -> Result<DuplicationRequest> {
        let mut request = match &self.request {
            Some(path) => config::load_request_file(path, &settings.defaults)?,
            None => settings.defaults.clone(),
        };
        self.apply_flags(&mut request);
        debug!("Resolved request: {:?}", request);
        Ok(request)
    }

    fn apply_flags(&self, request: &mut DuplicationRequest) {
        if let Some(copies) = self.copies {
            request.number_of_copies = copies;
        }

        let pattern = &mut request.naming_pattern;
        if let Some(template) = &self.template {
            pattern.template = template.clone();
        }
        if let Some(base_name) = &self.base_name {
            pattern.base_name_override = Some(base_name.clone());
        }
        if let Some(start) = self.start {
            pattern.starting_number = start;
        }
        if let Some(width) = self.pad {
            pattern.zero_padding = true;
            pattern.padding_length = width;
        }
        if self.no_pad {
            pattern.zero_padding = false;
        }

        if let Some(strategy) = self.strategy {
            request.ordering_strategy = match strategy {
                StrategyArg::Interleaved => OrderingStrategy::Interleaved,
                StrategyArg::Sequential => OrderingStrategy::Sequential,
            };
        }
        if let Some(grouping) = self.grouping {
            request.grouping_strategy = match grouping {
                GroupingArg::Relative => GroupingStrategy::Relative,
                GroupingArg::Grouped => GroupingStrategy::Grouped,
            };
        }
        if let Some(position) = self.position {
            request.placement.position = match position {
                PositionArg::After => Position::After,
                PositionArg::Before => Position::Before,
                PositionArg::Start => Position::Start,
                PositionArg::End => Position::End,
            };
        }
        if self.no_auto_shift {
            request.placement.auto_shift = false;
        }
        if let Some(references) = self.references {
            request.reference_strategy = match references {
                ReferencesArg::Keep => ReferenceStrategy::Keep,
                ReferencesArg::Remove => ReferenceStrategy::Remove,
            };
        }

        let components = &mut request.components;
        for component in &self.exclude {
            let toggle = match component {
                ComponentArg::Automations => &mut components.automations,
                ComponentArg::LinkedParameters => &mut components.linked_parameters,
                ComponentArg::ParameterRules => &mut components.parameter_rules,
                ComponentArg::ParameterValidations => &mut components.parameter_validations,
                ComponentArg::Schedules => &mut components.schedules,
                ComponentArg::Media => &mut components.media,
                ComponentArg::Recurrence => &mut components.recurrence,
                ComponentArg::Actions => &mut components.actions,
            };
            *toggle = false;
        }

        if let Some(prefix) = &self.cascade_tasks {
            request.child_naming.tasks.apply_inherited_suffix = true;
            request.child_naming.tasks.suffix_prefix = prefix.clone();
        }
        if let Some(prefix) = &self.cascade_parameters {
            request.child_naming.parameters.apply_inherited_suffix = true;
            request.child_naming.parameters.suffix_prefix = prefix.clone();
        }
    }

    pub fn engine(&self) -> DuplicationEngine<Box<dyn IdGenerator>> {
        let ids: Box<dyn IdGenerator> = match self.deterministic_ids {
            Some(first) => {
                info!("Using sequential ids starting at {}", first);
                Box::new(SequentialIdGenerator::starting_at(first))
            }
            None => Box::new(TimestampIdGenerator::new()),
        };
        DuplicationEngine::with_generator(ids)
    }
}

/// Read, validate and parse a configuration file
pub fn load_configuration(path: &Path) -> Result<Configuration> {
    if !path.exists() {
        anyhow::bail!("Configuration file does not exist: {}", path.display());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read configuration: {}", path.display()))?;

    let issues = validation::validate_configuration(&content);
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("  {} {}", "✗".bright_red().bold(), issue);
        }
        anyhow::bail!("{} is not a valid checklist configuration", path.display());
    }

    sanitize::parse_configuration(&content)
}

/// Turn ids into selections and check them together with the request
pub fn select_entities(
    config: &Configuration,
    ids: &[String],
    request: &DuplicationRequest,
) -> Result<Vec<Selection>> {
    let mut selections = Vec::with_capacity(ids.len());
    for id in ids {
        let selection = tree::locate(config, id)
            .with_context(|| format!("No stage, task or parameter with id {}", id))?;
        selections.push(selection);
    }

    let mut issues = validation::validate_selections(config, &selections);
    if let Some(first) = selections.first() {
        let name = tree::entity_name(config, first).unwrap_or_default();
        issues.extend(validation::validate_request(request, &name));
    }

    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("  {} {}", "✗".bright_red().bold(), issue);
        }
        anyhow::bail!("Duplication request is not valid");
    }

    Ok(selections)
}
