//! Heading source contract

use serde::{Deserialize, Serialize};

/// Raw orientation reading from the device
///
/// iOS-style sources fill `compass_heading`; others report the device-frame
/// `device_alpha` rotation plus the current `screen_angle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrientationSample {
    pub compass_heading: Option<f64>,
    pub device_alpha: Option<f64>,
    pub screen_angle: Option<f64>,
}

impl OrientationSample {
    pub fn compass(heading: f64) -> Self {
        Self {
            compass_heading: Some(heading),
            ..Default::default()
        }
    }

    pub fn device(alpha: f64, screen_angle: f64) -> Self {
        Self {
            compass_heading: None,
            device_alpha: Some(alpha),
            screen_angle: Some(screen_angle),
        }
    }
}

/// Orientation feed, gated behind a one-time permission request
pub trait HeadingSource {
    /// Ask the platform for sensor access. Returns whether samples will flow.
    fn request_permission(&mut self) -> bool;

    /// Next pending sample, if any. Never blocks.
    fn next_sample(&mut self) -> Option<OrientationSample>;
}
