use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_YEAR: i32 = 2021;
pub const DEFAULT_DELAY_SECONDS: u64 = 2;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub publish: PublishConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct BoardConfig {
    /// Name of the board to publish cards to.
    pub board_name: Option<String>,
    /// Name of the list on that board to add cards to.
    pub list_name: Option<String>,
    /// Label id attached to every card. Find it by opening the board in a
    /// browser and appending `.json` to the URL, then searching for
    /// `labels`.
    pub label_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Year used for due dates; the schedule CSV only has month and day.
    pub year: i32,
    /// Seconds to pause between cards.
    pub delay_seconds: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            year: DEFAULT_YEAR,
            delay_seconds: DEFAULT_DELAY_SECONDS,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        // If config doesn't exist, create default
        if !config_path.exists() {
            let default_config = Config::default();
            default_config.save()?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }
}

fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "syllaboard", "syllaboard")
        .context("Failed to determine config directory")?;

    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Trello API credentials. Only the process environment (or a `.env` file
/// loaded at startup) supplies these; they never live in the config file.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub key: String,
    pub token: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            key: require_env("TRELLO_API_KEY")?,
            token: require_env("TRELLO_API_TOKEN")?,
        })
    }
}

/// Base URL for the Trello API, overridable for testing against a local
/// server.
pub fn api_base() -> String {
    env::var("TRELLO_API_BASE").unwrap_or_else(|_| crate::trello::DEFAULT_BASE_URL.to_string())
}

fn require_env(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(anyhow!(
            "{name} environment variable not set. Set your Trello credentials using: export {name}='your-value-here'"
        )),
    }
}
