use anyhow::{Context, Result};
use colored::*;
use log::info;
use std::fs;

use super::DuplicateCommands;
use crate::cli::commands::preview::print_preview;
use crate::cli::commands::request::{load_configuration, select_entities};
use crate::ui::prompts::prompt_overwrite_confirmation;
use mes_dup::config::Config;
use mes_dup::preview;

pub fn handle_duplicate_command(args: DuplicateCommands) -> Result<()> {
    let settings = Config::load()?;
    let request = args.request.resolve(&settings)?;
    let config = load_configuration(&args.config)?;
    let selections = select_entities(&config, &args.select, &request)?;

    let mut engine = args.request.engine();
    let (report, modified) = preview::generate_preview(&mut engine, &config, &selections, &request)?;
    info!(
        "Duplication created {} entities from {} selections",
        report.summary.total_entities,
        selections.len()
    );

    let json = if settings.output.pretty {
        serde_json::to_string_pretty(&modified)
    } else {
        serde_json::to_string(&modified)
    }
    .context("Failed to serialize configuration")?;

    let Some(output) = &args.output else {
        if args.show_preview {
            // Keep stdout for the configuration itself
            eprintln!("{}", serde_json::to_string_pretty(&report)?);
        }
        println!("{}", json);
        return Ok(());
    };

    if args.show_preview {
        print_preview(&report);
        println!();
    }

    if output.exists() && settings.output.confirm_overwrite && !args.force {
        if !prompt_overwrite_confirmation(output)? {
            println!("Operation cancelled.");
            return Ok(());
        }
    }

    fs::write(output, json).with_context(|| format!("Failed to write configuration: {}", output.display()))?;

    println!(
        "{} Wrote {} new entities to {}",
        "✓".bright_green().bold(),
        report.summary.total_entities,
        output.display().to_string().bright_yellow().bold()
    );
    Ok(())
}
