//! Configuration

pub mod config;

pub use config::{parse_origin_param, ConfigError, GuidanceConfig, ScaleConfig, ValidationResult, YawConvention};
