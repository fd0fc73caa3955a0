//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/skilltree/skilltree.toml`
//! 3. Local config: `<dir>/.skilltree.toml` (working directory by default)
//! 4. Environment variables: `SKILLTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::util::path::expand_env_vars;

/// Icon grid geometry, in pixels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Edge length of a square skill icon
    pub icon_size: f32,
    /// Space between neighbouring icons
    pub gap: f32,
    /// Offset of the whole grid from the top-left corner
    pub padding: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            icon_size: 128.0,
            gap: 16.0,
            padding: 16.0,
        }
    }
}

/// Raw layout config for intermediate parsing (`None` → not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutConfig {
    pub icon_size: Option<f32>,
    pub gap: Option<f32>,
    pub padding: Option<f32>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub skills_file: Option<PathBuf>,
    pub default_max_points: Option<i32>,
    #[serde(default)]
    pub layout: RawLayoutConfig,
}

impl LayoutConfig {
    fn merge(&self, overlay: &RawLayoutConfig) -> Self {
        Self {
            icon_size: overlay.icon_size.unwrap_or(self.icon_size),
            gap: overlay.gap.unwrap_or(self.gap),
            padding: overlay.padding.unwrap_or(self.padding),
        }
    }
}

/// Unified configuration for skilltree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Skill document used when `--file` is not given (default: built-in demo)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills_file: Option<PathBuf>,
    /// Max points for leaves that do not declare their own
    pub default_max_points: i32,
    /// Icon grid geometry
    pub layout: LayoutConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            skills_file: None,
            default_max_points: 5,
            layout: LayoutConfig::default(),
        }
    }
}

/// Get the XDG config directory for skilltree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "skilltree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("skilltree.toml"))
}

/// Get the path to the local config file in `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".skilltree.toml")
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
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(path) = &self.skills_file {
            let expanded = expand_env_vars(path.to_string_lossy().as_ref());
            self.skills_file = Some(PathBuf::from(expanded));
        }
    }

    /// Merge overlay config onto self (base): overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            skills_file: overlay
                .skills_file
                .clone()
                .or_else(|| self.skills_file.clone()),
            default_max_points: overlay
                .default_max_points
                .unwrap_or(self.default_max_points),
            layout: self.layout.merge(&overlay.layout),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Directory holding `.skilltree.toml`, if any
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/skilltree/skilltree.toml`
    /// 3. Local config: `<local_dir>/.skilltree.toml`
    /// 4. Environment variables: `SKILLTREE_*` prefix, `__` for nesting
    ///    (e.g. `SKILLTREE_LAYOUT__ICON_SIZE=64`)
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply SKILLTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("SKILLTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("skills_file") {
            settings.skills_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_int("default_max_points") {
            settings.default_max_points = i32::try_from(val).map_err(|_| {
                ApplicationError::Config {
                    message: format!("default_max_points out of range: {}", val),
                }
            })?;
        }
        if let Ok(val) = config.get_float("layout.icon_size") {
            settings.layout.icon_size = val as f32;
        }
        if let Ok(val) = config.get_float("layout.gap") {
            settings.layout.gap = val as f32;
        }
        if let Ok(val) = config.get_float("layout.padding") {
            settings.layout.padding = val as f32;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.default_max_points < 0 {
            return Err(ApplicationError::Config {
                message: format!(
                    "default_max_points must not be negative: {}",
                    self.default_max_points
                ),
            });
        }
        if self.layout.icon_size <= 0.0 || self.layout.gap < 0.0 {
            return Err(ApplicationError::Config {
                message: format!(
                    "invalid layout: icon_size={} gap={}",
                    self.layout.icon_size, self.layout.gap
                ),
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
        r#"# skilltree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/skilltree/skilltree.toml
#   Local:  ./.skilltree.toml
#   Env:    SKILLTREE_* environment variables (SKILLTREE_LAYOUT__GAP=8)

# Skill document (.json or .toml) used when --file is not given.
# Without it the built-in demo tree is used.
# skills_file = "~/games/skills.json"

# Max points for leaves that do not declare max_points
# default_max_points = 5

[layout]
# icon_size = 128.0
# gap = 16.0
# padding = 16.0
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
    fn given_defaults_when_created_then_match_demo_geometry() {
        let settings = Settings::default();
        assert_eq!(settings.default_max_points, 5);
        assert_eq!(settings.layout.icon_size, 128.0);
        assert_eq!(settings.layout.gap, 16.0);
        assert!(settings.skills_file.is_none());
    }

    #[test]
    fn given_overlay_when_merging_then_only_specified_fields_change() {
        let base = Settings::default();
        let overlay = RawSettings {
            skills_file: Some(PathBuf::from("skills.toml")),
            default_max_points: None,
            layout: RawLayoutConfig {
                gap: Some(4.0),
                ..RawLayoutConfig::default()
            },
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.skills_file, Some(PathBuf::from("skills.toml")));
        assert_eq!(merged.default_max_points, 5);
        assert_eq!(merged.layout.gap, 4.0);
        assert_eq!(merged.layout.icon_size, 128.0);
    }

    #[test]
    fn given_tilde_in_skills_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            skills_file: Some(PathBuf::from("~/skills.json")),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let path = settings.skills_file.unwrap();
        assert!(
            path.to_string_lossy().starts_with(&home),
            "skills_file should start with home dir: {}",
            path.display()
        );
    }

    #[test]
    fn given_negative_max_points_when_validating_then_errors() {
        let settings = Settings {
            default_max_points: -1,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ApplicationError::Config { .. })
        ));
    }

    #[test]
    fn given_settings_when_serialized_then_round_trips_through_toml() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
