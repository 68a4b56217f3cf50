//! Saved view defaults, kept as TOML in the user's config directory.

use std::path;

use serde_derive::Deserialize;
use serde_derive::Serialize;
use thiserror::Error;
use tracing::{event, Level};

use crate::model::config;

const FILE_NAME: &str = "view.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not encode settings: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("could not locate config directory: {0}")]
    Xdg(#[from] xdg::BaseDirectoriesError),
    #[error("invalid settings: {0}")]
    Invalid(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub view: config::ViewConfiguration,
}

fn base_directories() -> Result<xdg::BaseDirectories, SettingsError> {
    Ok(xdg::BaseDirectories::with_prefix("hexview")?)
}

impl Settings {
    pub fn from_toml(text: &str) -> Result<Settings, SettingsError> {
        let settings: Settings = toml::from_str(text)?;
        settings.view.validate()?;
        Ok(settings)
    }

    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Loads from `path`. A missing file just means defaults.
    pub fn load_from(path: &path::Path) -> Result<Settings, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                event!(Level::DEBUG, path = %path.display(), "loading settings");
                Settings::from_toml(&text)
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                event!(Level::DEBUG, path = %path.display(), "no settings file, using defaults");
                Ok(Settings::default())
            },
            Err(e) => Err(e.into()),
        }
    }

    pub fn save_to(&self, path: &path::Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_toml()?)?;
        event!(Level::INFO, path = %path.display(), "saved settings");
        Ok(())
    }

    /// Loads `$XDG_CONFIG_HOME/hexview/view.toml`, or defaults if there is none.
    pub fn load() -> Result<Settings, SettingsError> {
        match base_directories()?.find_config_file(FILE_NAME) {
            Some(path) => Settings::load_from(&path),
            None => Ok(Settings::default()),
        }
    }

    /// Saves to the XDG config directory, creating it if needed. Returns
    /// where the file went.
    pub fn save(&self) -> Result<path::PathBuf, SettingsError> {
        let path = base_directories()?.place_config_file(FILE_NAME)?;
        self.save_to(&path)?;
        Ok(path)
    }
}
