use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detection::domain::region_merger::MergeStrategy;
use crate::shared::constants::{
    DEFAULT_BLOCK_SIZE, DEFAULT_MIN_AREA, DEFAULT_MIN_CONFIDENCE, DEFAULT_MIN_SKIN_PIXELS,
    DEFAULT_MIN_SKIN_RATIO, SETTINGS_DIR_NAME, SETTINGS_FILE_NAME,
};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize settings for {path}: {source}")]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to write settings to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Tunables of the skin-tone detector and capture session.
///
/// Missing fields in a settings file fall back to the defaults, which
/// are the tuned detection thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorSettings {
    pub block_size: u32,
    pub min_skin_ratio: f64,
    pub min_skin_pixels: u32,
    pub min_confidence: f64,
    pub min_area: i64,
    pub merge_strategy: MergeStrategy,
    pub processing_delay_ms: u64,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            min_skin_ratio: DEFAULT_MIN_SKIN_RATIO,
            min_skin_pixels: DEFAULT_MIN_SKIN_PIXELS,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            min_area: DEFAULT_MIN_AREA,
            merge_strategy: MergeStrategy::SinglePass,
            processing_delay_ms: 0,
        }
    }
}

impl DetectorSettings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    /// Loads settings from the user config directory, or defaults when
    /// no file exists there.
    pub fn load_default() -> Result<Self, SettingsError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json =
            serde_json::to_string_pretty(self).map_err(|source| SettingsError::Serialize {
                path: path.to_path_buf(),
                source,
            })?;
        let write_err = |source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, json).map_err(write_err)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.block_size == 0 {
            return Err(SettingsError::Invalid("block_size must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.min_skin_ratio) {
            return Err(SettingsError::Invalid(format!(
                "min_skin_ratio must be between 0.0 and 1.0, got {}",
                self.min_skin_ratio
            )));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(SettingsError::Invalid(format!(
                "min_confidence must be between 0.0 and 1.0, got {}",
                self.min_confidence
            )));
        }
        if self.min_area < 0 {
            return Err(SettingsError::Invalid(format!(
                "min_area must not be negative, got {}",
                self.min_area
            )));
        }
        Ok(())
    }

    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_match_tuned_thresholds() {
        let s = DetectorSettings::default();
        assert_eq!(s.block_size, 50);
        assert_relative_eq!(s.min_skin_ratio, 0.3);
        assert_eq!(s.min_skin_pixels, 100);
        assert_relative_eq!(s.min_confidence, 0.4);
        assert_eq!(s.min_area, 1000);
        assert_eq!(s.merge_strategy, MergeStrategy::SinglePass);
        assert_eq!(s.processing_delay(), Duration::ZERO);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = DetectorSettings {
            block_size: 20,
            merge_strategy: MergeStrategy::Transitive,
            processing_delay_ms: 500,
            ..DetectorSettings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(DetectorSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "block_size": 32, "merge_strategy": "transitive" }"#).unwrap();

        let s = DetectorSettings::load(&path).unwrap();
        assert_eq!(s.block_size, 32);
        assert_eq!(s.merge_strategy, MergeStrategy::Transitive);
        assert_eq!(s.min_skin_pixels, 100);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let err = DetectorSettings::load(Path::new("/nonexistent/settings.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }

    #[test]
    fn test_load_malformed_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();
        let err = DetectorSettings::load(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "block_size": 0 }"#).unwrap();
        let err = DetectorSettings::load(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_validate_ranges() {
        let ok = DetectorSettings::default();
        assert!(ok.validate().is_ok());

        let bad_ratio = DetectorSettings {
            min_skin_ratio: 1.5,
            ..DetectorSettings::default()
        };
        assert!(bad_ratio.validate().is_err());

        let bad_confidence = DetectorSettings {
            min_confidence: -0.1,
            ..DetectorSettings::default()
        };
        assert!(bad_confidence.validate().is_err());

        let bad_area = DetectorSettings {
            min_area: -1,
            ..DetectorSettings::default()
        };
        assert!(bad_area.validate().is_err());
    }

    #[test]
    fn test_save_under_a_file_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let err = DetectorSettings::default()
            .save(&blocker.join("settings.json"))
            .unwrap_err();
        assert!(matches!(err, SettingsError::Write { .. }));
    }

    #[test]
    fn test_serialize_error_is_not_reported_as_parse() {
        let source = serde_json::from_str::<u8>("x").unwrap_err();
        let err = SettingsError::Serialize {
            path: PathBuf::from("settings.json"),
            source,
        };
        assert!(err.to_string().starts_with("failed to serialize settings"));
    }
}
