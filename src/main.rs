use anyhow::Result;
use clap::Parser;
use log::info;

mod cli;
mod ui;

use cli::{Cli, Commands};
use cli::commands::{
    handle_duplicate_command, handle_inspect_command, handle_preview_command, handle_settings_command,
    handle_validate_command,
};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env().init();

    let cli = Cli::parse();
    info!("Starting mes-dup");

    match cli.command {
        Commands::Inspect(args) => handle_inspect_command(args),
        Commands::Validate(args) => handle_validate_command(args),
        Commands::Preview(args) => handle_preview_command(args),
        Commands::Duplicate(args) => handle_duplicate_command(args),
        Commands::Settings(args) => handle_settings_command(args),
    }
}
