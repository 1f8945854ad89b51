use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use iqonboard_core::settings::{DEFAULT_AUTH, DEFAULT_IMPORT_FILE, DEFAULT_ORGANIZATION, DEFAULT_URL};
use iqonboard_core::{MatchMode, OnboardSettings};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct ProfileConfig {
    pub url: Option<String>,
    pub default_org: Option<String>,
    pub match_mode: Option<MatchMode>,
    pub timeout_secs: Option<u64>,
}

pub type ConfigFile = HashMap<String, ProfileConfig>;

pub const CONFIG_KEYS: [&str; 4] = ["url", "default_org", "match_mode", "timeout_secs"];

impl ProfileConfig {
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "url" => self.url = Some(value.to_string()),
            "default_org" => self.default_org = Some(value.to_string()),
            "match_mode" => {
                self.match_mode = Some(value.parse().map_err(anyhow::Error::msg)?);
            }
            "timeout_secs" => {
                self.timeout_secs = Some(
                    value
                        .parse()
                        .with_context(|| format!("Invalid timeout: {value}"))?,
                );
            }
            other => anyhow::bail!(
                "Unknown config key: {other}. Valid keys: {}",
                CONFIG_KEYS.join(", ")
            ),
        }
        Ok(())
    }
}

fn config_dir() -> Result<PathBuf> {
    let dir = dirs::home_dir()
        .context("Cannot determine home directory")?
        .join(".iqonboard");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn load_all() -> Result<ConfigFile> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(ConfigFile::new());
    }
    let content = fs::read_to_string(&path)?;
    let cfg: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    Ok(cfg)
}

pub fn load_profile(profile: &str) -> Result<ProfileConfig> {
    let mut all = load_all()?;
    Ok(all.remove(profile).unwrap_or_default())
}

pub fn save_profile(profile: &str, config: &ProfileConfig) -> Result<()> {
    let mut all = load_all()?;
    all.insert(profile.to_string(), config.clone());
    let content = toml::to_string_pretty(&all)?;
    fs::write(config_path()?, content)?;
    Ok(())
}

/// Merge flags/env, the config profile and built-in defaults, in that order.
pub fn resolve_settings(cli: &Cli, profile: &ProfileConfig) -> Result<OnboardSettings> {
    let url = cli
        .url
        .as_deref()
        .or(profile.url.as_deref())
        .unwrap_or(DEFAULT_URL);
    let auth = cli.auth.as_deref().unwrap_or(DEFAULT_AUTH);
    let file_name = cli.file_name.as_deref().unwrap_or(DEFAULT_IMPORT_FILE);
    let default_org = cli
        .default_org
        .as_deref()
        .or(profile.default_org.as_deref())
        .unwrap_or(DEFAULT_ORGANIZATION);
    let match_mode = cli
        .match_mode
        .map(MatchMode::from)
        .or(profile.match_mode)
        .unwrap_or_default();
    let timeout = cli
        .timeout_secs
        .or(profile.timeout_secs)
        .map(Duration::from_secs);

    let settings = OnboardSettings::new(url, auth)
        .with_context(|| format!("Invalid server settings for {url}"))?
        .with_import_file(file_name)
        .with_default_organization(default_org)
        .with_match_mode(match_mode)
        .with_timeout(timeout);
    Ok(settings)
}
