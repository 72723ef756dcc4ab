pub mod handler;

use clap::Args;
use std::path::PathBuf;

pub use handler::handle_inspect_command;

#[derive(Args)]
pub struct InspectCommands {
    /// Checklist configuration file (JSON)
    pub config: PathBuf,

    /// Only list entities whose name matches this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Print the tree as JSON
    #[arg(long)]
    pub json: bool,
}
