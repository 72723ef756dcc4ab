use anyhow::Result;
use colored::*;
use log::info;

use super::InspectCommands;
use crate::cli::commands::request::load_configuration;
use mes_dup::tree::{self, NodeKind, TreeNode};

pub fn handle_inspect_command(args: InspectCommands) -> Result<()> {
    info!("Inspecting {}", args.config.display());
    let config = load_configuration(&args.config)?;
    let nodes = tree::build_tree(&config);

    if let Some(query) = &args.search {
        let hits = tree::search(&nodes, query);
        if args.json {
            let hits: Vec<&TreeNode> = hits.iter().map(|(node, _)| *node).collect();
            println!("{}", serde_json::to_string_pretty(&hits)?);
            return Ok(());
        }
        if hits.is_empty() {
            println!("No entities match '{}'.", query.bright_yellow());
            return Ok(());
        }
        for (node, _) in hits {
            println!("{}", node_line(node));
        }
        return Ok(());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&nodes)?);
        return Ok(());
    }

    for checklist in &nodes {
        for (depth, node) in checklist.walk() {
            println!("{}{}", "  ".repeat(depth), node_line(node));
        }
        println!();
    }
    Ok(())
}

fn node_line(node: &TreeNode) -> String {
    let kind = match node.kind {
        NodeKind::Checklist => "checklist".bright_magenta().bold(),
        NodeKind::Stage => "stage".bright_blue().bold(),
        NodeKind::Task => "task".bright_green(),
        NodeKind::Parameter => "parameter".yellow(),
    };
    let order = node.order.map(|order| format!(" #{}", order)).unwrap_or_default();

    let counts = &node.counts;
    let summary = match node.kind {
        NodeKind::Checklist => format!(
            " ({} stages, {} tasks, {} parameters, {} actions)",
            counts.stages, counts.tasks, counts.parameters, counts.actions
        ),
        NodeKind::Stage => format!(" ({} tasks, {} parameters)", counts.tasks, counts.parameters),
        NodeKind::Task => format!(" ({} parameters, {} automations)", counts.parameters, counts.automations),
        NodeKind::Parameter => String::new(),
    };

    format!(
        "{} {}{} {}{}",
        kind,
        node.name,
        order.dimmed(),
        format!("[{}]", node.id).dimmed(),
        summary.dimmed()
    )
}
