use anyhow::Result;
use colored::*;
use log::info;

use super::PreviewCommands;
use crate::cli::commands::request::{load_configuration, select_entities};
use mes_dup::config::Config;
use mes_dup::preview::{self, PreviewData, Severity};

pub fn handle_preview_command(args: PreviewCommands) -> Result<()> {
    let settings = Config::load()?;
    let request = args.request.resolve(&settings)?;
    let config = load_configuration(&args.config)?;
    let selections = select_entities(&config, &args.select, &request)?;

    info!("Previewing duplication of {} entities", selections.len());
    let mut engine = args.request.engine();
    let (report, _) = preview::generate_preview(&mut engine, &config, &selections, &request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_preview(&report);
    }
    Ok(())
}

pub fn print_preview(report: &PreviewData) {
    let added = &report.summary.added;
    println!("{}", "Summary".bold().underline());
    for (label, count) in [
        ("Stages", added.stages),
        ("Tasks", added.tasks),
        ("Parameters", added.parameters),
        ("Automations", added.automations),
        ("Rules", added.rules),
        ("Actions", added.actions),
        ("Effects", added.effects),
    ] {
        if count > 0 {
            println!("  {:<12} +{}", label, count.to_string().bright_green());
        }
    }
    println!("  {:<12} +{}", "Total", report.summary.total_entities.to_string().bright_green().bold());

    println!();
    println!("{}", "New names".bold().underline());
    for name in &report.name_preview {
        println!("  {}", name.bright_cyan());
    }

    if !report.order_position_changes.is_empty() {
        println!();
        println!("{}", "Order changes".bold().underline());
        for change in &report.order_position_changes {
            println!(
                "  {} {} {} → {}",
                change.kind,
                change.name,
                change.old_position.to_string().dimmed(),
                change.new_position.to_string().bright_yellow()
            );
        }
    }

    if !report.warnings.is_empty() {
        println!();
        println!("{}", "Warnings".bold().underline());
        for warning in &report.warnings {
            let marker = match warning.severity {
                Severity::Info => "ℹ".bright_blue().bold(),
                Severity::Warning => "⚠".bright_yellow().bold(),
                Severity::Error => "✗".bright_red().bold(),
            };
            println!("  {} {}: {}", marker, warning.title.bold(), warning.message);
            if !warning.affected_entities.is_empty() {
                println!("      {}", warning.affected_entities.join(", ").dimmed());
            }
        }
    }
}
