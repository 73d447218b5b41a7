//! Player preferences and shootout tuning
//!
//! Read once at startup. In the browser the host page may embed a JSON
//! block (`<script id="game-config" type="application/json">`); missing
//! fields keep their defaults.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::sim::ShootoutConfig;

const MAX_DIFFICULTY: f32 = 5.0;
const MAX_DIFFICULTY_INCREMENT: f32 = 1.0;

/// Clamp into range; non-finite values fall back to `default`
fn clamp_or(name: &str, value: f32, range: RangeInclusive<f32>, default: f32) -> f32 {
    if !value.is_finite() {
        log::warn!("{name} must be finite; using {default}");
        return default;
    }
    let clamped = value.clamp(*range.start(), *range.end());
    if clamped != value {
        log::warn!("{name} {value} out of range; using {clamped}");
    }
    clamped
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Start with sound off
    pub muted: bool,
    /// Pause and mute when the window loses focus
    pub pause_on_blur: bool,

    // === Play ===
    /// Keeper moves by itself (attract mode)
    pub autoplay: bool,
    /// Fixed run seed; random when absent
    pub seed: Option<u64>,
    pub shootout: ShootoutConfig,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            pause_on_blur: true,

            autoplay: false,
            seed: None,
            shootout: ShootoutConfig::default(),

            show_fps: false,
        }
    }
}

impl Settings {
    /// DOM id of the embedded config block
    pub const CONFIG_ELEMENT_ID: &'static str = "game-config";

    /// Parse settings from JSON. Unknown fields are ignored.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Clamp volumes and keep the shootout playable
    fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        if self.shootout.shots_per_round == 0 {
            log::warn!("shots_per_round must be at least 1; using 1");
            self.shootout.shots_per_round = 1;
        }
        if self.shootout.max_rounds == 0 {
            log::warn!("max_rounds must be at least 1; using 1");
            self.shootout.max_rounds = 1;
        }

        let defaults = ShootoutConfig::default();
        let shootout = &mut self.shootout;
        shootout.initial_difficulty = clamp_or(
            "initial_difficulty",
            shootout.initial_difficulty,
            0.0..=MAX_DIFFICULTY,
            defaults.initial_difficulty,
        );
        shootout.difficulty_increment = clamp_or(
            "difficulty_increment",
            shootout.difficulty_increment,
            0.0..=MAX_DIFFICULTY_INCREMENT,
            defaults.difficulty_increment,
        );
        self
    }

    /// Gain applied to sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Load settings from the page's config block (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        match text {
            Some(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from #{}", Self::CONFIG_ELEMENT_ID);
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed game config: {e}");
                    Self::default()
                }
            },
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from a JSON file path (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: Option<&str>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {path}");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings in {path}: {e}");
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {path}: {e}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let settings = Settings::from_json("{}").expect("valid json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_shootout_override() {
        let settings = Settings::from_json(
            r#"{ "autoplay": true, "shootout": { "shots_per_round": 5, "max_rounds": 1 } }"#,
        )
        .expect("valid json");
        assert!(settings.autoplay);
        assert_eq!(settings.shootout.shots_per_round, 5);
        assert_eq!(settings.shootout.max_rounds, 1);
        assert_eq!(settings.shootout.time_between_shots_ms, 3000);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(Settings::from_json("{ \"muted\": ").is_err());
        assert!(Settings::from_json(r#"{ "master_volume": "loud" }"#).is_err());
    }

    #[test]
    fn test_values_are_sanitized() {
        let settings = Settings::from_json(
            r#"{ "master_volume": 3.0, "sfx_volume": -1.0, "shootout": { "shots_per_round": 0, "max_rounds": 0 } }"#,
        )
        .expect("valid json");
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.sfx_volume, 0.0);
        assert_eq!(settings.shootout.shots_per_round, 1);
        assert_eq!(settings.shootout.max_rounds, 1);
    }

    #[test]
    fn test_difficulty_is_clamped() {
        let settings = Settings::from_json(
            r#"{ "shootout": { "initial_difficulty": -1.999999, "difficulty_increment": 7.5 } }"#,
        )
        .expect("valid json");
        assert_eq!(settings.shootout.initial_difficulty, 0.0);
        assert_eq!(settings.shootout.difficulty_increment, MAX_DIFFICULTY_INCREMENT);

        let settings =
            Settings::from_json(r#"{ "shootout": { "initial_difficulty": 1e39 } }"#)
                .expect("valid json");
        assert!(settings.shootout.initial_difficulty.is_finite());
        assert!(settings.shootout.initial_difficulty <= MAX_DIFFICULTY);
    }

    #[test]
    fn test_effective_volume() {
        let mut settings = Settings::default();
        assert!((settings.effective_volume() - 0.8).abs() < 1e-6);
        settings.muted = true;
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_from(Some("/nonexistent/spot-kick.json"));
        assert_eq!(settings, Settings::default());
    }
}
