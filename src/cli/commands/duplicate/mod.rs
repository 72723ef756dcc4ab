pub mod handler;

use clap::Args;
use std::path::PathBuf;

use super::request::RequestArgs;

pub use handler::handle_duplicate_command;

#[derive(Args)]
pub struct DuplicateCommands {
    /// Checklist configuration file (JSON)
    pub config: PathBuf,

    /// Ids of the stages, tasks or parameters to duplicate
    #[arg(short, long = "select", value_name = "ID", required = true, num_args = 1..)]
    pub select: Vec<String>,

    #[command(flatten)]
    pub request: RequestArgs,

    /// Write the new configuration here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overwrite the output file without asking
    #[arg(short, long)]
    pub force: bool,

    /// Print the preview report before writing
    #[arg(long)]
    pub show_preview: bool,
}
