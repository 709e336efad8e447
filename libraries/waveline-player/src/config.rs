//! Player configuration
//!
//! Settings come from an optional TOML file, overridden by `WAVELINE_*`
//! environment variables (nested keys use `__`, e.g.
//! `WAVELINE_WAVEFORM__HEIGHT=80`).

use crate::error::{PlayerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "WAVELINE";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// Prefix for audio and artwork urls
    #[serde(default)]
    pub base_url: String,

    /// Initial volume (0-100, default: 75)
    #[serde(default = "default_volume")]
    pub volume: f64,

    #[serde(default)]
    pub waveform: WaveformSettings,
}

/// Rendering options forwarded to the waveform engine
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WaveformSettings {
    /// Host element selector the engine renders into
    #[serde(default = "default_container")]
    pub container: String,

    /// Waveform height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Unplayed portion color (theme secondary color)
    #[serde(default)]
    pub wave_color: Option<String>,

    /// Played portion color (theme primary color)
    #[serde(default)]
    pub progress_color: Option<String>,

    #[serde(default = "default_true")]
    pub normalize: bool,

    #[serde(default = "default_bar_width")]
    pub bar_width: u32,

    #[serde(default = "default_bar_gap")]
    pub bar_gap: u32,

    #[serde(default = "default_bar_radius")]
    pub bar_radius: u32,

    /// Allow clicking the waveform to seek
    #[serde(default = "default_true")]
    pub interact: bool,

    #[serde(default = "default_true")]
    pub drag_to_seek: bool,
}

impl Default for WaveformSettings {
    fn default() -> Self {
        Self {
            container: default_container(),
            height: default_height(),
            wave_color: None,
            progress_color: None,
            normalize: true,
            bar_width: default_bar_width(),
            bar_gap: default_bar_gap(),
            bar_radius: default_bar_radius(),
            interact: true,
            drag_to_seek: true,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            volume: default_volume(),
            waveform: WaveformSettings::default(),
        }
    }
}

impl PlayerConfig {
    /// Load configuration from an optional file and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Load configuration with an explicit environment map
    ///
    /// `env = None` reads the process environment.
    pub fn load_with_env(path: Option<&Path>, env: Option<config::Map<String, String>>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(PlayerError::Settings(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;

        tracing::debug!(
            base_url = %config.base_url,
            volume = config.volume,
            "Loaded player configuration"
        );

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.volume) {
            return Err(PlayerError::Settings(format!(
                "volume must be within 0-100, got {}",
                self.volume
            )));
        }

        if self.waveform.height == 0 {
            return Err(PlayerError::Settings(
                "waveform height must be greater than zero".to_string(),
            ));
        }

        if self.waveform.container.trim().is_empty() {
            return Err(PlayerError::Settings(
                "waveform container selector is required".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_volume() -> f64 {
    75.0
}

fn default_container() -> String {
    "#waveline_waveform-wrapper".to_string()
}

fn default_height() -> u32 {
    60
}

fn default_bar_width() -> u32 {
    3
}

fn default_bar_gap() -> u32 {
    1
}

fn default_bar_radius() -> u32 {
    30
}

fn default_true() -> bool {
    true
}
