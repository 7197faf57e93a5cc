use crate::settings::Settings;
use eyre::Result;
use serde_json;
use std::{fs, path::PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    filepath: PathBuf,
}

impl Config {
    pub fn new() -> Result<Self> {
        let prefix = get_app_data_prefix()?;
        Self::load_from(prefix.join("configuration.json"))
    }

    /// Config holding `settings` that has not been read from disk. Saving it
    /// writes to `filepath`.
    pub fn with_settings(settings: Settings, filepath: PathBuf) -> Self {
        Self { settings, filepath }
    }

    /// Save current configuration to file
    pub fn save(&self) -> Result<()> {
        let config_json = serde_json::json!({
            "Setting": self.settings,
        });

        let config_str = serde_json::to_string_pretty(&config_json)?;

        if let Some(parent) = self.filepath.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.filepath, config_str)?;
        Ok(())
    }

    /// Load configuration from a custom path, writing defaults there when the
    /// file does not exist yet. Unknown or malformed values fall back to
    /// their defaults.
    pub fn load_from(filepath: PathBuf) -> Result<Self> {
        let mut settings = Settings::default();

        if filepath.exists() {
            let config_str = fs::read_to_string(&filepath)?;
            match serde_json::from_str::<serde_json::Value>(&config_str) {
                Ok(user_config) => {
                    if let Some(user_settings) = user_config.get("Setting") {
                        match serde_json::from_value::<Settings>(user_settings.clone()) {
                            Ok(parsed) => settings = parsed,
                            Err(err) => log::warn!(
                                "ignoring invalid settings in {}: {}",
                                filepath.display(),
                                err
                            ),
                        }
                    }
                }
                Err(err) => {
                    log::warn!("could not parse {}: {}", filepath.display(), err);
                }
            }
        } else {
            let config = Self {
                settings,
                filepath,
            };
            config.save()?;
            return Ok(config);
        }

        Ok(Self {
            settings,
            filepath,
        })
    }
}

pub fn get_app_data_prefix() -> Result<PathBuf> {
    if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
        let path = PathBuf::from(config_home).join("hnav");
        return Ok(path);
    } else if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home.clone()).join(".config").join("hnav");
        if path.exists() {
            return Ok(path);
        } else {
            return Ok(PathBuf::from(home).join(".hnav"));
        }
    } else if let Some(user_profile) = std::env::var_os("USERPROFILE") {
        return Ok(PathBuf::from(user_profile).join(".hnav"));
    }

    Err(eyre::eyre!(
        "Could not determine application data directory"
    ))
}
