//! Configuration file management for mealplan.
//!
//! Provides a TOML-based config file at `~/.config/mealplan/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Address the server binds to when nothing else is configured.
pub const DEFAULT_BIND: &str = "127.0.0.1";
/// Port the server listens on when nothing else is configured.
pub const DEFAULT_PORT: u16 = 8080;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub planner: PlannerSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PlannerSection {
    /// Fixed seed for backfill draws. Every plan with the same inputs is
    /// then identical; leave unset for varied plans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the mealplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/mealplan` or
/// `~/.config/mealplan`, also on macOS.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("mealplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("mealplan")
}

/// Return the path to the mealplan config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file at `path`.
pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Load and parse the default config file. Returns an error if it does not
/// exist.
pub fn load_config() -> Result<ConfigFile> {
    load_config_from(&config_path())
}

/// Serialize and write the config file to `path`, creating parent dirs as
/// needed.
pub fn save_config_to(config: &ConfigFile, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    Ok(())
}

pub fn save_config(config: &ConfigFile) -> Result<()> {
    save_config_to(config, &config_path())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub seed: Option<u64>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone, PartialEq)]
pub struct MealplanConfig {
    pub bind: String,
    pub port: u16,
    pub seed: Option<u64>,
}

impl MealplanConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Bind: `--bind` > `MEALPLAN_BIND` > `server.bind` > `127.0.0.1`
    /// - Port: `--port` > `MEALPLAN_PORT` > `server.port` > `8080`
    /// - Seed: `--seed` > `MEALPLAN_SEED` > `planner.seed` > none
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let file_config = load_config().ok();
        Self::resolve_with(cli, file_config.as_ref())
    }

    fn resolve_with(cli: &CliOverrides, file: Option<&ConfigFile>) -> Result<Self> {
        let bind = if let Some(bind) = &cli.bind {
            bind.clone()
        } else if let Ok(bind) = std::env::var("MEALPLAN_BIND") {
            bind
        } else if let Some(cfg) = file {
            cfg.server.bind.clone()
        } else {
            DEFAULT_BIND.to_string()
        };

        let port = if let Some(port) = cli.port {
            port
        } else if let Ok(port) = std::env::var("MEALPLAN_PORT") {
            port.parse()
                .with_context(|| format!("MEALPLAN_PORT is not a valid port: {port:?}"))?
        } else if let Some(cfg) = file {
            cfg.server.port
        } else {
            DEFAULT_PORT
        };

        let seed = if cli.seed.is_some() {
            cli.seed
        } else if let Ok(seed) = std::env::var("MEALPLAN_SEED") {
            Some(
                seed.parse()
                    .with_context(|| format!("MEALPLAN_SEED is not a valid seed: {seed:?}"))?,
            )
        } else {
            file.and_then(|cfg| cfg.planner.seed)
        };

        Ok(Self { bind, port, seed })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
