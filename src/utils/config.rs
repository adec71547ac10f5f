use crate::core::{
    Coordinate, DEFAULT_ARRIVAL_THRESHOLD_M, DEFAULT_GUIDE_AHEAD_M, DEFAULT_HEADING_SMOOTHING,
    DEFAULT_ORIGIN_ACCEPT_RADIUS_M,
};
use crate::hardware::WatchOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Sign convention for the device-relative arrow yaw
///
/// Renderers disagree on whether a positive yaw turns the arrow clockwise or
/// counter-clockwise, so the convention is a deployment setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YawConvention {
    /// `yaw = -(bearing - heading)`
    #[default]
    DeviceRelative,
    /// `yaw = bearing - heading`
    DeviceRelativeInverted,
}

/// Arrow scale as a function of remaining distance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    /// Distance (m) that maps to a scale of 1.0
    pub divisor_m: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            divisor_m: 30.0,
            min: 0.8,
            max: 3.0,
        }
    }
}

impl ScaleConfig {
    /// Scale factor for the given remaining distance
    pub fn scale_for(&self, distance_m: f64) -> f64 {
        (distance_m / self.divisor_m).clamp(self.min, self.max)
    }
}

/// Guidance engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    /// Distance from the destination that counts as arrival (meters)
    pub arrival_threshold_m: f64,
    /// Distance ahead of the user at which the guide point is placed (meters)
    pub guide_ahead_m: f64,
    /// Maximum distance from the origin anchor at which guidance may start (meters)
    pub origin_accept_radius_m: f64,
    /// Calibration point the user must be near before starting
    pub origin_anchor: Option<Coordinate>,
    /// Compass smoothing coefficient in (0, 1]
    pub heading_smoothing: f64,
    pub yaw_convention: YawConvention,
    pub scale: ScaleConfig,
    /// Options handed to the position source on subscribe
    pub watch: WatchOptions,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            arrival_threshold_m: DEFAULT_ARRIVAL_THRESHOLD_M,
            guide_ahead_m: DEFAULT_GUIDE_AHEAD_M,
            origin_accept_radius_m: DEFAULT_ORIGIN_ACCEPT_RADIUS_M,
            origin_anchor: None,
            heading_smoothing: DEFAULT_HEADING_SMOOTHING,
            yaw_convention: YawConvention::default(),
            scale: ScaleConfig::default(),
            watch: WatchOptions::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    #[error("invalid origin parameter '{0}': expected \"lat,lon\"")]
    InvalidOrigin(String),
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Outcome of validating a configuration
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigError>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

fn invalid(parameter: &str, value: f64, reason: &str) -> ConfigError {
    ConfigError::InvalidParameter {
        parameter: parameter.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl GuidanceConfig {
    /// Load and validate a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;
        let config: GuidanceConfig = serde_json::from_str(&content)?;

        let validation = config.validate();
        for warning in &validation.warnings {
            warn!(path = %path_str, "{}", warning);
        }
        if let Some(error) = validation.errors.into_iter().next() {
            return Err(error);
        }

        debug!(path = %path_str, "loaded guidance config");
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let content = serde_json::to_string_pretty(self)?;

        fs::write(&path, content).map_err(|source| ConfigError::Io {
            path: path_str,
            source,
        })
    }

    /// Check every parameter; errors make the config unusable, warnings do not
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if !(self.arrival_threshold_m > 0.0) {
            result.errors.push(invalid(
                "arrival_threshold_m",
                self.arrival_threshold_m,
                "arrival threshold must be positive",
            ));
        } else if self.arrival_threshold_m > 25.0 {
            result
                .warnings
                .push("Arrival threshold above 25 m may announce arrival far from the destination".to_string());
        } else if self.arrival_threshold_m < 3.0 {
            result
                .warnings
                .push("Arrival threshold below typical GPS accuracy may never trigger".to_string());
        }

        if !(self.guide_ahead_m > 0.0) {
            result.errors.push(invalid(
                "guide_ahead_m",
                self.guide_ahead_m,
                "guide point must be ahead of the user",
            ));
        }

        if !(self.origin_accept_radius_m > 0.0) {
            result.errors.push(invalid(
                "origin_accept_radius_m",
                self.origin_accept_radius_m,
                "acceptance radius must be positive",
            ));
        }

        if let Some(anchor) = &self.origin_anchor {
            if let Err(e) = Coordinate::new(anchor.latitude, anchor.longitude) {
                result.errors.push(ConfigError::InvalidParameter {
                    parameter: "origin_anchor".to_string(),
                    value: anchor.to_string(),
                    reason: e.to_string(),
                });
            }
        }

        if !(self.heading_smoothing > 0.0 && self.heading_smoothing <= 1.0) {
            result.errors.push(invalid(
                "heading_smoothing",
                self.heading_smoothing,
                "smoothing coefficient must be in (0, 1]",
            ));
        }

        if !(self.scale.divisor_m > 0.0) {
            result.errors.push(invalid(
                "scale.divisor_m",
                self.scale.divisor_m,
                "scale divisor must be positive",
            ));
        }
        if !(self.scale.min > 0.0 && self.scale.min <= self.scale.max) {
            result.errors.push(invalid(
                "scale.min",
                self.scale.min,
                "scale bounds must satisfy 0 < min <= max",
            ));
        }

        if self.watch.timeout_ms == 0 {
            result.errors.push(invalid(
                "watch.timeout_ms",
                0.0,
                "position timeout must be positive",
            ));
        }

        result
    }
}

/// Parse an origin anchor given as `"lat,lon"` (URL query style)
pub fn parse_origin_param(raw: &str) -> Result<Coordinate, ConfigError> {
    let invalid = || ConfigError::InvalidOrigin(raw.to_string());

    let mut parts = raw.split(',').map(str::trim);
    let lat: f64 = parts.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
    let lon: f64 = parts.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
    if parts.next().is_some() {
        return Err(invalid());
    }

    Coordinate::new(lat, lon).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GuidanceConfig::default();
        assert_eq!(config.arrival_threshold_m, 4.0);
        assert_eq!(config.guide_ahead_m, 6.0);
        assert_eq!(config.origin_accept_radius_m, 12.0);
        assert!(config.origin_anchor.is_none());
        assert!(config.validate().is_valid());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GuidanceConfig {
            arrival_threshold_m: -1.0,
            heading_smoothing: 1.5,
            scale: ScaleConfig {
                divisor_m: 30.0,
                min: 3.0,
                max: 1.0,
            },
            ..Default::default()
        };

        let result = config.validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors.len(), 3);
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let config = GuidanceConfig {
            guide_ahead_m: f64::NAN,
            ..Default::default()
        };
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guidance.json");

        let config = GuidanceConfig {
            arrival_threshold_m: 8.0,
            guide_ahead_m: 15.0,
            origin_anchor: Some(Coordinate::new_unchecked(4.661, -74.0597)),
            yaw_convention: YawConvention::DeviceRelativeInverted,
            ..Default::default()
        };
        config.save_to_file(&path).unwrap();

        let loaded = GuidanceConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{ "arrival_threshold_m": 10.0, "yaw_convention": "device_relative_inverted" }"#)
            .unwrap();

        let loaded = GuidanceConfig::from_file(&path).unwrap();
        assert_eq!(loaded.arrival_threshold_m, 10.0);
        assert_eq!(loaded.yaw_convention, YawConvention::DeviceRelativeInverted);
        assert_eq!(loaded.guide_ahead_m, DEFAULT_GUIDE_AHEAD_M);
        assert_eq!(loaded.watch, WatchOptions::default());
    }

    #[test]
    fn test_invalid_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{ "origin_accept_radius_m": 0.0 }"#).unwrap();

        assert!(matches!(
            GuidanceConfig::from_file(&path),
            Err(ConfigError::InvalidParameter { .. })
        ));
        assert!(matches!(
            GuidanceConfig::from_file(dir.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_parse_origin_param() {
        let origin = parse_origin_param(" 4.661, -74.0597 ").unwrap();
        assert_eq!(origin, Coordinate::new_unchecked(4.661, -74.0597));

        assert!(parse_origin_param("4.661").is_err());
        assert!(parse_origin_param("abc,def").is_err());
        assert!(parse_origin_param("1,2,3").is_err());
        assert!(parse_origin_param("95,0").is_err());
    }

    #[test]
    fn test_scale_clamped() {
        let scale = ScaleConfig::default();
        assert_eq!(scale.scale_for(0.0), 0.8);
        assert_eq!(scale.scale_for(45.0), 1.5);
        assert_eq!(scale.scale_for(500.0), 3.0);
    }
}
