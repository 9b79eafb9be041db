use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::store::DEFAULT_STORAGE_KEY;
use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Empty means the profile's data directory
    #[serde(default)]
    pub storage_path: String,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default = "default_current_theme")]
    pub current_theme: String,
    #[serde(default)]
    pub themes: HashMap<String, Theme>,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

/// Key names as written in the config file, e.g. "q", "Space", "F1", "Ctrl+s".
/// Bindings left out of the file keep their default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub quit: String,
    pub new: String,
    pub edit: String,
    pub save: String,
    pub delete: String,
    pub toggle_checked: String,
    pub list_up: String,
    pub list_down: String,
    pub next_field: String,
    pub help: String,
}

/// Colors as names, "#RRGGBB" or "rgb(r, g, b)".
/// An empty `highlight_fg` is derived from `highlight_bg`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub fg: String,
    pub bg: String,
    pub highlight_bg: String,
    pub highlight_fg: String,
    pub checked_fg: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: String::new(),
            storage_key: default_storage_key(),
            log_level: None,
            key_bindings: KeyBindings::default(),
            current_theme: default_current_theme(),
            themes: HashMap::new(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let key = |name: &str| name.to_string();
        Self {
            quit: key("q"),
            new: key("n"),
            edit: key("e"),
            save: key("Ctrl+s"),
            delete: key("d"),
            toggle_checked: key("Space"),
            list_up: key("k"),
            list_down: key("j"),
            next_field: key("Tab"),
            help: key("F1"),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::preset("white", "black", "blue", "white", "darkgray")
    }
}

impl Theme {
    fn preset(fg: &str, bg: &str, highlight_bg: &str, highlight_fg: &str, checked_fg: &str) -> Self {
        Self {
            fg: fg.to_string(),
            bg: bg.to_string(),
            highlight_bg: highlight_bg.to_string(),
            highlight_fg: highlight_fg.to_string(),
            checked_fg: checked_fg.to_string(),
        }
    }

    /// Built-in themes, selectable by name without a `[themes]` entry
    pub fn get_preset_themes() -> HashMap<String, Theme> {
        [
            ("default", Theme::default()),
            ("dark", Theme::preset("white", "black", "cyan", "black", "gray")),
            ("light", Theme::preset("black", "white", "blue", "white", "gray")),
            ("green", Theme::preset("green", "black", "yellow", "black", "darkgray")),
            ("monochrome", Theme::preset("white", "black", "white", "black", "gray")),
        ]
        .into_iter()
        .map(|(name, theme)| (name.to_string(), theme))
        .collect()
    }
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_current_theme() -> String {
    "default".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
}

impl Config {
    /// Load configuration from the profile's config file, or create default if missing
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        Self::load_from_path(&config_path, profile)
    }

    /// Load configuration from an explicit path, or create default there if missing.
    /// The storage path follows the profile unless the file sets one.
    pub fn load_from_path(config_path: &Path, profile: utils::Profile) -> Result<Self, ConfigError> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)
                .map_err(|e| ConfigError::ReadError(e.to_string()))?;
            let mut config: Config = toml::from_str(&contents)?;
            if config.storage_path.trim().is_empty() {
                config.storage_path = Self::default_storage_path_for_profile(profile);
            }
            log::debug!("event=config_load module=config status=ok path={}", config_path.display());
            Ok(config)
        } else {
            let mut config = Config::default();
            config.storage_path = Self::default_storage_path_for_profile(profile);
            config.save_to_path(config_path)?;
            log::info!("event=config_create module=config status=ok path={}", config_path.display());
            Ok(config)
        }
    }

    /// Save configuration to the given file
    pub fn save_to_path(&mut self, config_path: &Path) -> Result<(), ConfigError> {
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, toml_string)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile)
            .ok_or_else(|| ConfigError::ConfigDirError("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("config.toml"))
    }

    /// Get default storage path for a specific profile
    fn default_storage_path_for_profile(profile: utils::Profile) -> String {
        if let Some(data_dir) = utils::get_data_dir(profile) {
            data_dir.join("storage.db").to_string_lossy().to_string()
        } else {
            format!("~/.local/share/{}/storage.db", profile.app_name())
        }
    }

    /// Get the expanded storage path (with ~ expansion)
    pub fn get_storage_path(&self) -> PathBuf {
        if self.storage_path.trim().is_empty() {
            return utils::expand_path(&Self::default_storage_path_for_profile(utils::Profile::Prod));
        }
        utils::expand_path(&self.storage_path)
    }

    /// Log level from config, or the build-mode default
    pub fn effective_log_level(&self) -> &str {
        match self.log_level.as_deref() {
            Some(level) if !level.trim().is_empty() => level,
            _ if cfg!(debug_assertions) => "debug",
            _ => "info",
        }
    }

    /// Get the currently active theme
    /// If highlight_fg is not set (empty string), it will be calculated from highlight_bg
    pub fn get_active_theme(&self) -> Theme {
        use crate::tui::widgets::color::{format_color_for_display, get_contrast_text_color, parse_color};

        let mut theme = if let Some(theme) = self.themes.get(&self.current_theme) {
            theme.clone()
        } else if let Some(theme) = Theme::get_preset_themes().get(&self.current_theme) {
            theme.clone()
        } else {
            Theme::get_preset_themes()
                .get("default")
                .cloned()
                .unwrap_or_default()
        };

        if theme.highlight_fg.is_empty() {
            let highlight_bg_color = parse_color(&theme.highlight_bg);
            let calculated_fg = get_contrast_text_color(highlight_bg_color);
            theme.highlight_fg = format_color_for_display(&calculated_fg);
        }

        theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Profile;

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config = toml::from_str("current_theme = \"dark\"\n[key_bindings]\nquit = \"x\"\n").unwrap();
        assert_eq!(config.current_theme, "dark");
        assert_eq!(config.key_bindings.quit, "x");
        assert_eq!(config.key_bindings.new, "n");
        assert_eq!(config.storage_key, "todos");
        assert_eq!(config.config_version, Some(CURRENT_CONFIG_VERSION));
    }

    #[test]
    fn load_creates_file_then_reads_it_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut created = Config::load_from_path(&path, Profile::Dev).unwrap();
        assert!(path.exists());

        created.storage_key = "work".to_string();
        created.current_theme = "green".to_string();
        created.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path, Profile::Dev).unwrap();
        assert_eq!(loaded.storage_key, "work");
        assert_eq!(loaded.current_theme, "green");
        assert_eq!(loaded.storage_path, created.storage_path);
    }

    #[test]
    fn unknown_current_theme_falls_back_to_default() {
        let mut config = Config::default();
        config.current_theme = "neon".to_string();
        assert_eq!(config.get_active_theme(), Theme::get_preset_themes()["default"]);
    }

    #[test]
    fn user_theme_shadows_preset_of_same_name() {
        let mut config = Config::default();
        let mut theme = Theme::default();
        theme.fg = "yellow".to_string();
        config.themes.insert("dark".to_string(), theme);
        config.current_theme = "dark".to_string();
        assert_eq!(config.get_active_theme().fg, "yellow");
    }

    #[test]
    fn empty_highlight_fg_is_derived() {
        let mut config = Config::default();
        let mut theme = Theme::default();
        theme.highlight_fg = String::new();
        theme.highlight_bg = "black".to_string();
        config.themes.insert("custom".to_string(), theme);
        config.current_theme = "custom".to_string();
        assert_eq!(config.get_active_theme().highlight_fg, "white");
    }
}
