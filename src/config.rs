//! Application configuration
//!
//! TOML file in the user config dir. Holds the log level, an optional
//! profile directory override, and the hotkey bindings table mapping a
//! profile name to the chord that restores it, e.g.
//!
//! ```toml
//! log_level = "info"
//!
//! [hotkeys]
//! docked = "ctrl+alt+1"
//! projector = "ctrl+alt+2"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Where profiles are stored. Defaults to `<config dir>/profiles`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_dir: Option<PathBuf>,

    /// Profile name → hotkey chord restored by the `listen` command.
    #[serde(default)]
    pub hotkeys: BTreeMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            profile_dir: None,
            hotkeys: BTreeMap::new(),
        }
    }
}

impl Config {
    fn app_dir() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(constants::config::APP_DIR);
        path
    }

    fn config_path() -> PathBuf {
        Self::app_dir().join(constants::config::FILENAME)
    }

    /// Directory profiles are captured into and restored from.
    pub fn profile_dir(&self) -> PathBuf {
        self.profile_dir
            .clone()
            .unwrap_or_else(|| Self::app_dir().join(constants::config::PROFILES_DIR))
    }

    /// Load the config file, generating a default one on first run.
    /// A file that exists but does not parse is a user error we refuse to
    /// overwrite; the process exits so they can fix it.
    ///
    /// Runs before the tracing subscriber is installed (the config carries
    /// the log level), so messages here go to stderr directly.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        if let Ok(contents) = fs::read_to_string(&config_path) {
            match toml::from_str::<Config>(&contents) {
                Ok(config) => return config,
                Err(e) => {
                    eprintln!("Failed to parse {}: {e}", config_path.display());
                    eprintln!("Please fix the syntax errors in your config file.");
                    std::process::exit(1);
                }
            }
        }

        let config = Config::default();
        if let Err(e) = config.save() {
            eprintln!("Failed to write default config: {e:?}");
        } else {
            eprintln!(
                "Generated default config at {} for you to edit",
                config_path.display()
            );
        }
        config
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context(format!(
                "Failed to create config directory: {}",
                parent.display()
            ))?;
        }
        let contents =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        fs::write(&path, contents)
            .context(format!("Failed to write config file to {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.log_level, "info");
        assert!(config.hotkeys.is_empty());
        assert!(config.profile_dir.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let contents = r#"
            log_level = "debug"
            profile_dir = "/tmp/profiles"

            [hotkeys]
            docked = "ctrl+alt+1"
            projector = "ctrl+alt+2"
        "#;
        let config: Config = toml::from_str(contents).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.profile_dir(), PathBuf::from("/tmp/profiles"));
        assert_eq!(config.hotkeys.get("docked").unwrap(), "ctrl+alt+1");
        assert_eq!(config.hotkeys.len(), 2);
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.log_level, "info");
        assert!(config.hotkeys.is_empty());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config
            .hotkeys
            .insert("docked".to_string(), "ctrl+alt+d".to_string());
        let contents = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&contents).unwrap();
        assert_eq!(parsed.log_level, config.log_level);
        assert_eq!(parsed.hotkeys, config.hotkeys);
    }
}
