use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Represents the complete configuration for tagflow.
///
/// Holds the version map location and the remote server settings. Every
/// field can be overridden from the command line; the file only provides
/// defaults.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_version_map")]
    pub version_map: String,

    #[serde(default)]
    pub remote: RemoteConfig,
}

fn default_version_map() -> String {
    "version-map.json".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            version_map: default_version_map(),
            remote: RemoteConfig::default(),
        }
    }
}

/// Configuration for the hosted repository API and downstream pipeline.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RemoteConfig {
    /// Base server URL, e.g. "https://git.example.com"
    pub server: Option<String>,

    /// Repository in "owner/name" form
    pub repo: Option<String>,

    /// Workflow file to dispatch after tagging
    pub workflow: Option<String>,

    /// Git remote to push tags to
    #[serde(default = "default_remote_name")]
    pub remote: String,

    /// Sync verification attempts before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_remote_name() -> String {
    "origin".to_string()
}

fn default_max_attempts() -> u32 {
    5
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            server: None,
            repo: None,
            workflow: None,
            remote: default_remote_name(),
            max_attempts: default_max_attempts(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `tagflow.toml` in current directory
/// 3. `.tagflow.toml` in user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config, Box<dyn std::error::Error>> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./tagflow.toml").exists() {
        fs::read_to_string("./tagflow.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".tagflow.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}
