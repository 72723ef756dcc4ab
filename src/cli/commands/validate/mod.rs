pub mod handler;

use clap::Args;
use std::path::PathBuf;

pub use handler::handle_validate_command;

#[derive(Args)]
pub struct ValidateCommands {
    /// Checklist configuration file (JSON)
    pub config: PathBuf,

    /// Print problems as JSON
    #[arg(long)]
    pub json: bool,
}
