pub mod handler;

use clap::{Args, Subcommand};

use super::request::RequestArgs;

pub use handler::handle_settings_command;

#[derive(Args)]
pub struct SettingsCommands {
    #[command(subcommand)]
    pub command: SettingsSubcommands,
}

#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Show current settings
    Show,
    /// Print the settings file location
    Path,
    /// Store request options as the new defaults
    Save {
        #[command(flatten)]
        request: RequestArgs,
        /// Pretty-print written configurations
        #[arg(long)]
        pretty: Option<bool>,
        /// Ask before overwriting output files
        #[arg(long)]
        confirm_overwrite: Option<bool>,
    },
    /// Reset all settings to default values
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}
