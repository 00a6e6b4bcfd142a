use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app::controllers::dispatcher::RestorePolicy;
use crate::app::controllers::history::DEFAULT_HISTORY_CAPACITY;
use crate::app::domain::style::PresentationStyle;
use crate::app::infrastructure::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Number of snapshots the undo history keeps, current state included.
    /// At most 30.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    #[serde(default)]
    pub restore_policy: RestorePolicy,

    #[serde(default = "default_font")]
    pub default_font: String,

    #[serde(default = "default_font_size")]
    pub default_font_size: u32,

    #[serde(default = "default_color")]
    pub default_color: String,

    /// Overrides where saved files live
    #[serde(default)]
    pub store_dir: Option<String>,

    /// Default `tracing` filter directive; `RUST_LOG` wins when set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_font() -> String {
    "Arial".to_string()
}

fn default_font_size() -> u32 {
    16
}

fn default_color() -> String {
    "black".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            restore_policy: RestorePolicy::default(),
            default_font: default_font(),
            default_font_size: default_font_size(),
            default_color: default_color(),
            store_dir: None,
            log_filter: default_log_filter(),
        }
    }
}

impl EditorSettings {
    /// Load settings from the default location, or create defaults if missing
    pub fn load() -> Self {
        let config_path = Self::get_config_path();
        match Self::load_from(&config_path) {
            Some(settings) => settings,
            None => {
                let default = Self::default();
                // Try to save defaults for next time
                let _ = default.save();
                default
            }
        }
    }

    /// Read settings from `path`. Returns `None` when the file does not
    /// exist; unreadable or invalid settings degrade to defaults.
    pub fn load_from(path: &Path) -> Option<Self> {
        let contents = fs::read_to_string(path).ok()?;
        let mut settings = match serde_json::from_str::<Self>(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to parse settings: {}. Using defaults.", e);
                return Some(Self::default());
            }
        };
        if settings.history_capacity > DEFAULT_HISTORY_CAPACITY {
            tracing::warn!(
                "History capacity {} is above the limit, using {}",
                settings.history_capacity,
                DEFAULT_HISTORY_CAPACITY
            );
            settings.history_capacity = DEFAULT_HISTORY_CAPACITY;
        }
        match settings.validate() {
            Ok(()) => Some(settings),
            Err(e) => {
                tracing::warn!("{}. Using defaults.", e);
                Some(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.history_capacity == 0 {
            return Err(AppError::Settings(
                "history capacity must be at least 1".to_string(),
            ));
        }
        if self.history_capacity > DEFAULT_HISTORY_CAPACITY {
            return Err(AppError::Settings(format!(
                "history capacity must be at most {}",
                DEFAULT_HISTORY_CAPACITY
            )));
        }
        if self.default_font_size == 0 {
            return Err(AppError::Settings("font size must be positive".to_string()));
        }
        Ok(())
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("keypad");
        path.push("settings.json");
        path
    }

    /// Directory saved files go to: `store_dir` if set, else
    /// `data_dir/keypad/files`.
    pub fn resolved_store_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.store_dir {
            return PathBuf::from(dir);
        }
        let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("keypad");
        path.push("files");
        path
    }

    /// Style every new buffer starts out with
    pub fn default_style(&self) -> PresentationStyle {
        PresentationStyle {
            font: self.default_font.clone(),
            size: self.default_font_size,
            color: self.default_color.clone(),
        }
    }
}
