//! Game settings
//!
//! Loaded from JSON (partial documents fall back to defaults per field) and
//! validated before a session is built from them.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_CATCHUP_TICKS;
use crate::sim::{ScrollerConfig, StackerConfig};

/// Difficulty presets for the side-scroller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Gap height range (min, max) in pixels
    pub fn gap_range(&self) -> (f32, f32) {
        match self {
            Difficulty::Easy => (150.0, 220.0),
            Difficulty::Normal => (crate::consts::GAP_MIN, crate::consts::GAP_MAX),
            Difficulty::Hard => (110.0, 160.0),
        }
    }

    /// Pipe scroll speed in pixels per tick
    pub fn scroll_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 2.5,
            Difficulty::Normal => crate::consts::SCROLL_SPEED,
            Difficulty::Hard => 4.0,
        }
    }
}

/// Error type for settings loading
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "IO error: {}", e),
            SettingsError::Parse(e) => write!(f, "Parse error: {}", e),
            SettingsError::Invalid(msg) => write!(f, "Invalid settings: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Settings for both games and their sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub scroller: ScrollerConfig,
    pub stacker: StackerConfig,
    /// Ticks an interval may fire in one `advance` call before time is dropped
    pub max_catchup_ticks: u32,
    /// Fixed run seed; `None` seeds from the clock
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            scroller: ScrollerConfig::default(),
            stacker: StackerConfig::default(),
            max_catchup_ticks: MAX_CATCHUP_TICKS,
            seed: None,
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset (applies preset defaults)
    pub fn from_preset(preset: Difficulty) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a difficulty preset (updates difficulty-dependent fields)
    pub fn apply_preset(&mut self, preset: Difficulty) {
        self.difficulty = preset;
        let (gap_min, gap_max) = preset.gap_range();
        self.scroller.gap_min = gap_min;
        self.scroller.gap_max = gap_max;
        self.scroller.scroll_speed = preset.scroll_speed();
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.scroller.validate()?;
        self.stacker.validate()?;
        if self.max_catchup_ticks == 0 {
            return Err(SettingsError::Invalid(
                "max_catchup_ticks must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_presets_validate() {
        for preset in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            let settings = Settings::from_preset(preset);
            assert!(settings.validate().is_ok(), "{}", preset.as_str());
            assert_eq!(settings.difficulty, preset);
        }
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::parse("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("medium"), Some(Difficulty::Normal));
        assert_eq!(Difficulty::parse("nightmare"), None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "scroller": { "gravity": 0.8 }, "seed": 9 }"#)
            .expect("valid settings");
        assert_eq!(settings.scroller.gravity, 0.8);
        assert_eq!(settings.scroller.jump_impulse, crate::consts::JUMP_IMPULSE);
        assert_eq!(settings.stacker, StackerConfig::default());
        assert_eq!(settings.seed, Some(9));
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings::from_preset(Difficulty::Easy);
        let json = settings.to_json().expect("serializes");
        assert_eq!(Settings::from_json(&json).expect("parses"), settings);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Settings::from_json(r#"{ "stacker": { "width": 3 } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        assert!(err.to_string().contains("stacker"));

        let err = Settings::from_json(r#"{ "max_catchup_ticks": 0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::load("/definitely/not/here/settings.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
