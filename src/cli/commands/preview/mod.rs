pub mod handler;

use clap::Args;
use std::path::PathBuf;

use super::request::RequestArgs;

pub use handler::{handle_preview_command, print_preview};

#[derive(Args)]
pub struct PreviewCommands {
    /// Checklist configuration file (JSON)
    pub config: PathBuf,

    /// Ids of the stages, tasks or parameters to duplicate
    #[arg(short, long = "select", value_name = "ID", required = true, num_args = 1..)]
    pub select: Vec<String>,

    #[command(flatten)]
    pub request: RequestArgs,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}
