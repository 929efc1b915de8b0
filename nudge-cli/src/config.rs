use anyhow::{Context, Result};
use nudge_core::DayBoundary;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_nudge_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IANA zone that decides where a day starts for recurrence.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Used when RUST_LOG is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub session: SessionSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSection {
    /// Ask before deleting a task from the catalog.
    pub confirm_delete: bool,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self { confirm_delete: true }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            log_level: default_log_level(),
            session: SessionSection::default(),
        }
    }
}

impl Config {
    pub fn day_boundary(&self) -> Result<DayBoundary> {
        DayBoundary::from_name(&self.timezone).context("config.toml: timezone")
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_nudge_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Missing file means defaults; a bad timezone is caught later by `day_boundary`.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

/// What `config init` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigInit {
    Written,
    AlreadyExists,
}

pub fn init_config() -> Result<(PathBuf, ConfigInit)> {
    let p = config_path()?;
    let outcome = init_config_at(&p)?;
    Ok((p, outcome))
}

/// Write the default config unless one is already there. Never overwrites.
pub fn init_config_at(path: &Path) -> Result<ConfigInit> {
    if path.exists() {
        return Ok(ConfigInit::AlreadyExists);
    }
    let s = toml::to_string_pretty(&Config::default()).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(ConfigInit::Written)
}
