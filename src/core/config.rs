/*
 * Persists the small per-user settings record, currently just the path of the
 * last tally file that was opened or created. The record lives in
 * `settings.json` inside the application's local config directory.
 *
 * Callers treat this store as a convenience: the session logs and ignores its
 * errors. The trait (`ConfigManagerOperations`) lets tests substitute an
 * in-memory implementation.
 */
use crate::core::path_utils;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

const SETTINGS_FILENAME: &str = "settings.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub last_file: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Serde(serde_json::Error),
    NoProjectDirectory,
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::Serde(e) => write!(f, "Configuration format error: {e}"),
            ConfigError::NoProjectDirectory => {
                write!(f, "Could not determine the configuration directory")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Serde(e) => Some(e),
            ConfigError::NoProjectDirectory => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub trait ConfigManagerOperations: Send + Sync {
    fn load_settings(&self, app_name: &str) -> Result<Settings>;
    fn save_settings(&self, app_name: &str, settings: &Settings) -> Result<()>;
}

// `config_dir_override` pins the directory instead of resolving it per app name.
pub struct CoreConfigManager {
    config_dir_override: Option<PathBuf>,
}

impl CoreConfigManager {
    pub fn new() -> Self {
        CoreConfigManager {
            config_dir_override: None,
        }
    }

    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        CoreConfigManager {
            config_dir_override: Some(config_dir),
        }
    }

    fn settings_path(&self, app_name: &str) -> Result<PathBuf> {
        let dir = match &self.config_dir_override {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                dir.clone()
            }
            None => path_utils::get_base_app_config_local_dir(app_name)
                .ok_or(ConfigError::NoProjectDirectory)?,
        };
        Ok(dir.join(SETTINGS_FILENAME))
    }
}

impl Default for CoreConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManagerOperations for CoreConfigManager {
    /*
     * Reads the settings record. A missing file is not an error and yields the
     * defaults; an empty or whitespace-only file is treated the same way.
     */
    fn load_settings(&self, app_name: &str) -> Result<Settings> {
        let file_path = self.settings_path(app_name)?;
        log::trace!("CoreConfigManager: Loading settings for '{app_name}' from {file_path:?}");

        if !file_path.exists() {
            log::debug!("CoreConfigManager: Settings file {file_path:?} does not exist.");
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(&file_path)?;
        if contents.trim().is_empty() {
            log::debug!("CoreConfigManager: Settings file {file_path:?} is empty.");
            return Ok(Settings::default());
        }

        let settings: Settings = serde_json::from_str(&contents)?;
        log::debug!(
            "CoreConfigManager: Loaded settings (last_file: {:?}).",
            settings.last_file
        );
        Ok(settings)
    }

    fn save_settings(&self, app_name: &str, settings: &Settings) -> Result<()> {
        let file_path = self.settings_path(app_name)?;
        let text = serde_json::to_string_pretty(settings)?;
        fs::write(&file_path, text)?;
        log::debug!(
            "CoreConfigManager: Saved settings (last_file: {:?}) to {file_path:?}.",
            settings.last_file
        );
        Ok(())
    }
}
