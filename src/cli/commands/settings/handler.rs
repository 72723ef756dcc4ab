use anyhow::{Context, Result};
use colored::*;
use log::info;

use super::{SettingsCommands, SettingsSubcommands};
use crate::ui::prompts::prompt_reset_confirmation;
use mes_dup::config::Config;

pub fn handle_settings_command(args: SettingsCommands) -> Result<()> {
    match args.command {
        SettingsSubcommands::Show => show_command(),
        SettingsSubcommands::Path => {
            println!("{}", Config::get_config_path()?.display());
            Ok(())
        }
        SettingsSubcommands::Save { request, pretty, confirm_overwrite } => {
            info!("Saving default settings");
            let mut config = Config::load()?;
            config.defaults = request.resolve(&config)?;
            if let Some(pretty) = pretty {
                config.output.pretty = pretty;
            }
            if let Some(confirm_overwrite) = confirm_overwrite {
                config.output.confirm_overwrite = confirm_overwrite;
            }
            config.save()?;
            println!("{} Defaults saved", "✓".bright_green().bold());
            Ok(())
        }
        SettingsSubcommands::Reset { force } => reset_command(force),
    }
}

fn show_command() -> Result<()> {
    let config = Config::load()?;
    let rendered = toml::to_string_pretty(&config).context("Failed to serialize config to TOML")?;

    println!("{}", "Current settings".bold().underline());
    println!("{}", Config::get_config_path()?.display().to_string().dimmed());
    println!();
    println!("{}", rendered);
    Ok(())
}

/// Reset all settings to default values
///
/// # Arguments
/// * `force` - Skip confirmation prompt
fn reset_command(force: bool) -> Result<()> {
    info!("Resetting all settings to defaults");

    if !force && !prompt_reset_confirmation()? {
        println!("Operation cancelled.");
        return Ok(());
    }

    Config::default().save()?;
    println!("{} All settings have been reset to default values", "✓".bright_green().bold());
    Ok(())
}
