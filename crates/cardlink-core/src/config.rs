use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{CardlinkError, Result};

/// Top-level configuration for a Cardlink host.
///
/// Loaded from `~/.cardlink/config.toml` by default. Widget action
/// configuration is not part of this file; it belongs to the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardlinkConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub debounce: DebounceConfig,
    #[serde(default)]
    pub confirmation: ConfirmationConfig,
}

impl CardlinkConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CardlinkConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CardlinkError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General host settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Gesture burst collapsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    /// Quiet window in milliseconds.
    pub wait_ms: u64,
    /// Fire on the leading edge of a burst instead of the trailing edge.
    pub immediate: bool,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            wait_ms: 250,
            immediate: false,
        }
    }
}

impl DebounceConfig {
    pub fn wait(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.wait_ms)
    }
}

/// Confirmation prompt settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Prompt used when an action's confirmation carries no text.
    /// `{action}` is replaced by the action kind, e.g. `call-service`.
    pub default_template: String,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            default_template: "Are you sure you want to {action}?".to_string(),
        }
    }
}

impl ConfirmationConfig {
    /// Render the default prompt for an action kind.
    pub fn default_text(&self, action: &str) -> String {
        self.default_template.replace("{action}", action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = CardlinkConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.debounce.wait_ms, 250);
        assert!(!config.debounce.immediate);
        assert_eq!(
            config.confirmation.default_template,
            "Are you sure you want to {action}?"
        );
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[debounce]
wait_ms = 100
immediate = true

[confirmation]
default_template = "Really {action}?"
"#;
        let file = create_temp_config(content);
        let config = CardlinkConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.debounce.wait_ms, 100);
        assert!(config.debounce.immediate);
        assert_eq!(config.confirmation.default_text("toggle"), "Really toggle?");
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[debounce]
wait_ms = 40
"#;
        let file = create_temp_config(content);
        let config = CardlinkConfig::load(file.path()).unwrap();
        assert_eq!(config.debounce.wait_ms, 40);
        assert!(!config.debounce.immediate);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_load_invalid_toml_is_config_error() {
        let file = create_temp_config("[debounce\nwait_ms = ");
        let err = CardlinkConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, CardlinkError::Config(_)));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = CardlinkConfig::load_or_default(Path::new("/nonexistent/cardlink.toml"));
        assert_eq!(config.debounce.wait_ms, 250);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = CardlinkConfig::default();
        config.general.log_level = "trace".to_string();
        config.debounce.immediate = true;
        config.save(&path).unwrap();

        let loaded = CardlinkConfig::load(&path).unwrap();
        assert_eq!(loaded.general.log_level, "trace");
        assert!(loaded.debounce.immediate);
    }

    #[test]
    fn test_default_text_embeds_action_kind() {
        let config = ConfirmationConfig::default();
        assert_eq!(
            config.default_text("call-service"),
            "Are you sure you want to call-service?"
        );
    }

    #[test]
    fn test_debounce_wait_duration() {
        let config = DebounceConfig {
            wait_ms: 100,
            immediate: false,
        };
        assert_eq!(config.wait(), std::time::Duration::from_millis(100));
    }
}
