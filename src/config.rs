//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/ledger/ledger.toml`
//! 3. Environment variables: `LEDGER_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{DEFAULT_BRANCH_NAME, DEFAULT_DESCRIPTION};

/// Name of the snapshot file inside `base_dir`.
pub const STATE_FILE_NAME: &str = "ledger.toml";

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub base_dir: Option<PathBuf>,
    pub state_file: Option<PathBuf>,
    pub initial_branch: Option<String>,
    pub initial_description: Option<String>,
}

/// Unified configuration for the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base directory for ledger data (default: ~/.ledger)
    pub base_dir: PathBuf,
    /// Snapshot file (default: <base_dir>/ledger.toml)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
    /// Name of the branch a fresh ledger starts with
    pub initial_branch: String,
    /// Description of that branch
    pub initial_description: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: dirs_default_base_dir(),
            state_file: None,
            initial_branch: DEFAULT_BRANCH_NAME.to_string(),
            initial_description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

/// Get the default base directory (~/.ledger).
fn dirs_default_base_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".ledger"))
        .unwrap_or_else(|| PathBuf::from("~/.ledger"))
}

/// Get the XDG config directory for the ledger.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ledger").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("ledger.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}`; unknown variables leave the input as is.
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(e) => {
            debug!("cannot expand {raw}: {e}");
            path.to_path_buf()
        }
    }
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Where the ledger snapshot lives.
    pub fn state_path(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(|| self.base_dir.join(STATE_FILE_NAME))
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.base_dir = expand_path(&self.base_dir);
        self.state_file = self.state_file.as_deref().map(expand_path);
    }

    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            base_dir: overlay
                .base_dir
                .clone()
                .unwrap_or_else(|| self.base_dir.clone()),
            state_file: overlay
                .state_file
                .clone()
                .or_else(|| self.state_file.clone()),
            initial_branch: overlay
                .initial_branch
                .clone()
                .unwrap_or_else(|| self.initial_branch.clone()),
            initial_description: overlay
                .initial_description
                .clone()
                .unwrap_or_else(|| self.initial_description.clone()),
        }
    }

    /// Load settings with layered precedence from the global config file.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load settings with `config_file` standing in for the global config.
    ///
    /// A missing file is skipped; an unreadable or malformed one is an error.
    pub fn load_from(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Config file
        if let Some(path) = config_file {
            if path.exists() {
                debug!("loading config from {}", path.display());
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        current.validate()?;
        Ok(current)
    }

    /// Apply LEDGER_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("LEDGER").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("base_dir") {
            settings.base_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("state_file") {
            settings.state_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("initial_branch") {
            settings.initial_branch = val;
        }
        if let Ok(val) = config.get_string("initial_description") {
            settings.initial_description = val;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.initial_branch.is_empty() {
            return Err(ApplicationError::Config {
                message: "initial_branch must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# ledger configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/ledger/ledger.toml
#   Env:    LEDGER_* environment variables (explicit overrides)

# Base directory for ledger data
# base_dir = "~/.ledger"

# Snapshot file (defaults to <base_dir>/ledger.toml)
# state_file = "~/.ledger/ledger.toml"

# Branch a fresh ledger starts with
# initial_branch = "Initial"
# initial_description = "no description"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load_from(None).expect("load defaults");
        assert!(settings.base_dir.to_string_lossy().contains(".ledger"));
        assert_eq!(settings.initial_branch, "Initial");
    }

    #[test]
    fn given_no_state_file_when_state_path_then_inside_base_dir() {
        let settings = Settings {
            base_dir: PathBuf::from("/data"),
            ..Settings::default()
        };
        assert_eq!(settings.state_path(), PathBuf::from("/data/ledger.toml"));
    }

    #[test]
    fn given_tilde_in_base_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            base_dir: PathBuf::from("~/.ledger"),
            state_file: Some(PathBuf::from("$HOME/books.toml")),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let base = settings.base_dir.to_string_lossy().to_string();
        assert!(base.starts_with(&home), "base_dir: {base}");
        assert!(!base.contains('~'), "base_dir: {base}");
        assert_eq!(
            settings.state_file,
            Some(PathBuf::from(format!("{home}/books.toml")))
        );
    }

    #[test]
    fn given_partial_overlay_when_merged_then_unspecified_fields_kept() {
        let base = Settings::default();
        let overlay = RawSettings {
            initial_branch: Some("Main".to_string()),
            ..RawSettings::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.initial_branch, "Main");
        assert_eq!(merged.initial_description, base.initial_description);
        assert_eq!(merged.base_dir, base.base_dir);
    }
}
