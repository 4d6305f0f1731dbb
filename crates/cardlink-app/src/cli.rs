//! CLI argument definitions for the Cardlink host.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use cardlink_action::Gesture;
use clap::Parser;
use std::path::PathBuf;

/// Cardlink: replay a gesture on a dashboard widget against an in-memory backend.
#[derive(Parser, Debug)]
#[command(name = "cardlink", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Widget configuration (JSON with entity and *_action fields).
    #[arg(long = "card")]
    pub card: PathBuf,

    /// Entity states (JSON object of entity id to state).
    #[arg(long = "states")]
    pub states: Option<PathBuf>,

    /// Acting user id, matched against confirmation exemptions.
    #[arg(short = 'u', long = "user")]
    pub user: Option<String>,

    /// Gesture to perform: tap, hold or double_tap.
    #[arg(short = 'g', long = "gesture", default_value = "tap")]
    pub gesture: Gesture,

    /// Perform the gesture this many times in a burst.
    #[arg(short = 'r', long = "repeat", default_value_t = 1)]
    pub repeat: u32,

    /// Write the effective configuration back to the config path.
    #[arg(long = "save-config")]
    pub save_config: bool,

    /// Answer every confirmation with yes.
    #[arg(short = 'y', long = "yes", conflicts_with = "no")]
    pub yes: bool,

    /// Answer every confirmation with no.
    #[arg(short = 'n', long = "no")]
    pub no: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > CARDLINK_CONFIG env var > ~/.cardlink/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("CARDLINK_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }

    /// Scripted confirmation answer, or `None` to ask on stdin.
    pub fn resolve_answer(&self) -> Option<bool> {
        match (self.yes, self.no) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".cardlink").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".cardlink").join("config.toml");
    }
    PathBuf::from("config.toml")
}
