//! User settings
//!
//! Audio preferences, the last used mode and preset, cue preferences and
//! user-defined presets.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use ringtimer::config::audio::DEFAULT_VOLUME;
use ringtimer::config::cues::DEFAULT_WARNING_LEAD_SECS;
use ringtimer::presets::{self, PresetKind};
use ringtimer::timer::TimerConfig;

use crate::config::app::SETTINGS_FILE;
use crate::data::storage;
use crate::error::{AppError, Result};
use crate::session::TimerMode;

/// Settings file format version for migrations
const SETTINGS_VERSION: u32 = 1;

/// A user-defined round/rest layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPreset {
    pub label: String,
    pub work_secs: u32,
    pub rest_secs: u32,
    pub rounds: u32,
    /// `round` or `interval`
    #[serde(default)]
    pub mode: TimerMode,
}

impl CustomPreset {
    pub fn to_config(&self) -> TimerConfig {
        TimerConfig::new(self.work_secs, self.rest_secs, self.rounds).with_label(&self.label)
    }
}

/// A preset resolved to an engine mode and configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPreset {
    pub mode: TimerMode,
    pub config: TimerConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// File format version
    #[serde(default = "default_version")]
    pub version: u32,

    // === Audio ===
    /// Cue volume (0.0 - 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,

    #[serde(default)]
    pub muted: bool,

    // === Session ===
    #[serde(default)]
    pub last_mode: TimerMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_preset: Option<String>,

    // === Cues ===
    /// Warning beep lead in seconds (0 disables the warning)
    #[serde(default = "default_warning_lead")]
    pub warning_lead_secs: u32,

    /// Round mode: add a rest phase after the final round
    #[serde(default)]
    pub rest_after_last_round: bool,

    // === Presets ===
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_presets: Vec<CustomPreset>,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

fn default_warning_lead() -> u32 {
    DEFAULT_WARNING_LEAD_SECS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            volume: default_volume(),
            muted: false,
            last_mode: TimerMode::default(),
            last_preset: None,
            warning_lead_secs: default_warning_lead(),
            rest_after_last_round: false,
            custom_presets: Vec::new(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from the config directory, falling back to defaults
    pub fn load() -> Result<Self> {
        Ok(storage::load::<Settings>(SETTINGS_FILE)?.unwrap_or_default())
    }

    /// Load settings from a specific path, falling back to defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        Ok(storage::load_from::<Settings>(path)?.unwrap_or_default())
    }

    pub fn save(&self) -> Result<()> {
        storage::save(SETTINGS_FILE, self)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        storage::save_to(path, self)
    }

    /// Set volume (clamped to 0.0 - 1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Volume actually applied to the output, considering mute
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Apply the stored cue preferences to an engine configuration
    pub fn apply_preferences(&self, config: TimerConfig) -> TimerConfig {
        config
            .with_warning_lead(self.warning_lead_secs)
            .with_rest_after_last_round(self.rest_after_last_round)
    }

    /// Add or replace a custom preset.
    ///
    /// Labels are matched case-insensitively. Built-in labels cannot be
    /// shadowed and the layout must be a valid timer configuration.
    pub fn add_custom_preset(&mut self, preset: CustomPreset) -> Result<()> {
        if presets::find(&preset.label).is_some() {
            return Err(AppError::Config(format!(
                "'{}' is a built-in preset",
                preset.label
            )));
        }
        if preset.mode == TimerMode::Stopwatch {
            return Err(AppError::Config(
                "presets apply to round or interval mode".to_string(),
            ));
        }
        preset.to_config().validate()?;

        debug!(label = %preset.label, "custom preset saved");
        match self.custom_index(&preset.label) {
            Some(i) => self.custom_presets[i] = preset,
            None => self.custom_presets.push(preset),
        }
        Ok(())
    }

    /// Remove a custom preset; returns whether one was removed
    pub fn remove_custom_preset(&mut self, label: &str) -> bool {
        match self.custom_index(label) {
            Some(i) => {
                self.custom_presets.remove(i);
                true
            }
            None => false,
        }
    }

    /// Look up a preset by label: built-ins first, then custom presets.
    /// The stored cue preferences are applied to the result.
    pub fn resolve_preset(&self, label: &str) -> Result<ResolvedPreset> {
        let (mode, config) = if let Some(preset) = presets::find(label) {
            let mode = match preset.kind {
                PresetKind::Rounds => TimerMode::Round,
                PresetKind::Interval => TimerMode::Interval,
            };
            (mode, preset.to_config())
        } else if let Some(i) = self.custom_index(label) {
            let custom = &self.custom_presets[i];
            (custom.mode, custom.to_config())
        } else {
            return Err(AppError::NotFound(format!("preset '{}'", label)));
        };

        Ok(ResolvedPreset {
            mode,
            config: self.apply_preferences(config),
        })
    }

    fn custom_index(&self, label: &str) -> Option<usize> {
        let wanted = label.trim().to_lowercase();
        self.custom_presets
            .iter()
            .position(|p| p.label.trim().to_lowercase() == wanted)
    }
}
