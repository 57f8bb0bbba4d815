//! Visual settings and preferences
//!
//! Read from LocalStorage on the web. Never written by the game itself; the
//! host page (or a user in devtools) owns the stored JSON.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Points in the background cloud
    pub fn background_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 400,
            QualityPreset::Medium => 1200,
            QualityPreset::High => 2000,
        }
    }

    /// Stars drawn behind the mini-game
    pub fn starfield_stars(&self) -> usize {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium | QualityPreset::High => 120,
        }
    }

    /// Upper bound for the device pixel ratio used by the GPU surface
    pub fn max_pixel_ratio(&self) -> f64 {
        match self {
            QualityPreset::Low => 1.0,
            QualityPreset::Medium | QualityPreset::High => 2.0,
        }
    }
}

/// Site-wide visual settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    /// Reduced motion (no camera parallax, frozen point cloud)
    pub reduced_motion: bool,

    /// Draw "Score: N" inside the game canvas
    pub show_score_overlay: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            reduced_motion: false,
            show_score_overlay: true,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "hypertunnel_settings";

    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse settings JSON, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed settings: {}", e);
                Self::default()
            }
        }
    }

    /// Effective camera parallax (respects reduced_motion)
    pub fn parallax_enabled(&self) -> bool {
        !self.reduced_motion
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_medium() {
        let settings = Settings::default();
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert_eq!(settings.quality.background_particles(), 1200);
        assert_eq!(settings.quality.starfield_stars(), 120);
        assert!(settings.parallax_enabled());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"quality":"low","reduced_motion":true}"#);
        assert_eq!(settings.quality, QualityPreset::Low);
        assert!(settings.reduced_motion);
        assert!(settings.show_score_overlay);
        assert!(!settings.parallax_enabled());
    }

    #[test]
    fn test_malformed_json_uses_defaults() {
        assert_eq!(Settings::from_json("{not json"), Settings::default());
    }

    #[test]
    fn test_from_preset() {
        let settings = Settings::from_preset(QualityPreset::High);
        assert_eq!(settings.quality.background_particles(), 2000);
        assert_eq!(settings.quality.max_pixel_ratio(), 2.0);
    }
}
