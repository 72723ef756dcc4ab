use anyhow::{Context, Result};
use colored::*;
use log::info;
use std::fs;

use super::ValidateCommands;
use mes_dup::model::Configuration;
use mes_dup::{sanitize, validation};

pub fn handle_validate_command(args: ValidateCommands) -> Result<()> {
    info!("Validating {}", args.config.display());
    let content = fs::read_to_string(&args.config)
        .with_context(|| format!("Failed to read configuration: {}", args.config.display()))?;

    let issues = validation::validate_configuration(&content);

    // Numeric ids are quoted on load; worth knowing, not a failure
    let numeric_ids = serde_json::from_str::<serde_json::Value>(&content)
        .map(|raw| sanitize::numeric_id_paths(&raw))
        .unwrap_or_default();

    let duplicate_orders = if issues.is_empty() {
        let config = sanitize::parse_configuration(&content)?;
        duplicate_order_positions(&config)
    } else {
        Vec::new()
    };

    if args.json {
        let report = serde_json::json!({
            "issues": issues,
            "numericIds": numeric_ids,
            "duplicateOrderPositions": duplicate_orders,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for issue in &issues {
            println!("{} {}", "✗".bright_red().bold(), issue);
        }
        for path in &numeric_ids {
            println!("{} {}", "!".bright_yellow().bold(), path);
        }
        for message in &duplicate_orders {
            println!("{} {}", "!".bright_yellow().bold(), message);
        }
    }

    if !issues.is_empty() {
        anyhow::bail!("{} problem(s) found in {}", issues.len(), args.config.display());
    }

    if !args.json {
        println!("{} {} is a valid checklist configuration", "✓".bright_green().bold(), args.config.display());
    }
    Ok(())
}

/// Describe every container whose order positions repeat
fn duplicate_order_positions(config: &Configuration) -> Vec<String> {
    let mut messages = Vec::new();
    let mut report = |label: String, orders: Vec<i64>| {
        let duplicates = validation::detect_order_duplicates(&orders);
        if !duplicates.is_empty() {
            messages.push(format!("{}: order positions repeated: {:?}", label, duplicates));
        }
    };

    for checklist in config {
        report(
            format!("Stages of \"{}\"", checklist.name),
            checklist.stage_requests.iter().map(|stage| stage.order_tree).collect(),
        );
        for stage in &checklist.stage_requests {
            report(
                format!("Tasks of stage \"{}\"", stage.name),
                stage.task_requests.iter().map(|task| task.order_tree).collect(),
            );
            for task in &stage.task_requests {
                report(
                    format!("Parameters of task \"{}\"", task.name),
                    task.parameter_requests.iter().map(|parameter| parameter.order_tree).collect(),
                );
            }
        }
    }

    messages
}
