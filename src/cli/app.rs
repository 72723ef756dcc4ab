use super::commands::duplicate::DuplicateCommands;
use super::commands::inspect::InspectCommands;
use super::commands::preview::PreviewCommands;
use super::commands::settings::SettingsCommands;
use super::commands::validate::ValidateCommands;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mes-dup")]
#[command(about = "Duplicate stages, tasks and parameters inside MES checklist configurations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the checklist tree with ids, order positions and counts
    Inspect(InspectCommands),
    /// Check a configuration file for structural problems
    Validate(ValidateCommands),
    /// Show what a duplication would change without writing anything
    Preview(PreviewCommands),
    /// Duplicate entities and write the new configuration
    Duplicate(DuplicateCommands),
    /// Stored default settings
    Settings(SettingsCommands),
}
