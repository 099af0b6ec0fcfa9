use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::TimelineSettings;

const SETTINGS_FILE: &str = "timeline.toml";

/// Reads and writes [`TimelineSettings`] as TOML.
pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Service for the per-user config file, if a home directory is known.
    pub fn for_user() -> Option<Self> {
        Self::default_path().map(Self::new)
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "Ken24T", "TimelineEngine")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings; a missing file yields the defaults.
    pub fn load(&self) -> Result<TimelineSettings> {
        if !self.path.exists() {
            log::info!(
                "no settings at {}, using defaults",
                self.path.display()
            );
            return Ok(TimelineSettings::default());
        }

        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read settings from {}", self.path.display()))?;
        let settings: TimelineSettings = toml::from_str(&data)
            .with_context(|| format!("failed to parse settings in {}", self.path.display()))?;
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings in {}: {}", self.path.display(), e))?;

        Ok(settings)
    }

    pub fn save(&self, settings: &TimelineSettings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create dir {}", parent.display()))?;
        }

        let data = toml::to_string_pretty(settings)?;
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write settings to {}", self.path.display()))?;
        Ok(())
    }

    /// Reset settings to defaults
    pub fn reset(&self) -> Result<()> {
        self.save(&TimelineSettings::default())
    }
}
