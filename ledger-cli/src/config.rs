use anyhow::{Context, Result};
use ledger_core::ParseOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_ledger_home;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub parse: ParseSection,
    pub display: DisplaySection,
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseSection {
    /// "auto" or a single character
    pub delimiter: String,
    /// IANA zone for dates without an offset
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    pub max_warnings: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    pub level: String,
}

impl Default for ParseSection {
    fn default() -> Self {
        Self {
            delimiter: "auto".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self { max_warnings: 50 }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Parse options from the config, with command-line overrides applied.
    pub fn parse_options(
        &self,
        delimiter: Option<&str>,
        timezone: Option<&str>,
    ) -> Result<ParseOptions> {
        let delimiter = delimiter.unwrap_or(self.parse.delimiter.as_str());
        let timezone = timezone.unwrap_or(self.parse.timezone.as_str());
        ParseOptions::from_settings(delimiter, timezone).context("invalid parse settings")
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_ledger_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config_to(p: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config(cfg: &Config) -> Result<()> {
    print!("{}", toml::to_string_pretty(cfg).context("serialize config")?);
    Ok(())
}
