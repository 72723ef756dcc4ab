use crate::engine::DuplicationRequest;
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Request used when no request file or flag says otherwise
    #[serde(default)]
    pub defaults: DuplicationRequest,
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_pretty")]
    pub pretty: bool,
    /// Ask before replacing an existing output file
    #[serde(default = "default_confirm_overwrite")]
    pub confirm_overwrite: bool,
}

fn default_pretty() -> bool {
    true
}

fn default_confirm_overwrite() -> bool {
    true
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
            confirm_overwrite: default_confirm_overwrite(),
        }
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("mes-dup")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".mes-dup")
        };

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Config = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        debug!("Loaded config with {} default copies", config.defaults.number_of_copies);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        debug!("Saving config to: {:?}", config_path);

        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)
                    .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
                info!("Created config directory: {:?}", config_dir);
            }
        }

        let config_content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }
}

/// Layer a request file over `base`; keys missing from the file keep the base value
///
/// `.toml` files are read as TOML, anything else as JSON.
pub fn load_request_file(path: &Path, base: &DuplicationRequest) -> Result<DuplicationRequest> {
    debug!("Loading request file: {:?}", path);
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read request file: {:?}", path))?;

    let overlay: Value = if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml")) {
        let parsed: toml::Value =
            toml::from_str(&content).with_context(|| format!("Failed to parse request file: {:?}", path))?;
        serde_json::to_value(parsed).context("Failed to convert TOML request")?
    } else {
        serde_json::from_str(&content).with_context(|| format!("Failed to parse request file: {:?}", path))?
    };

    merge_request(base, overlay).with_context(|| format!("Invalid request in {:?}", path))
}

pub fn merge_request(base: &DuplicationRequest, overlay: Value) -> Result<DuplicationRequest> {
    let mut merged = serde_json::to_value(base).context("Failed to serialize base request")?;
    merge_values(&mut merged, overlay);
    serde_json::from_value(merged).context("Failed to read merged request")
}

fn merge_values(target: &mut Value, overlay: Value) {
    match (target, overlay) {
        (Value::Object(target), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match target.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, overlay) => *target = overlay,
    }
}
