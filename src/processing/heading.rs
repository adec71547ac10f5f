use crate::algorithms::geodesy::{normalize_degrees, signed_angle_diff};
use crate::core::DEFAULT_HEADING_SMOOTHING;
use crate::hardware::OrientationSample;
use tracing::debug;

/// Exponentially smoothed compass heading
///
/// Smoothing is applied to the signed shortest-path difference between the raw
/// and stored heading, so a sequence crossing north moves through 0° instead of
/// swinging back across 180°.
#[derive(Debug, Clone)]
pub struct HeadingFusion {
    /// Smoothed heading in [0, 360), once any sample has been seen
    smoothed: Option<f64>,
    /// Set permanently by the first usable sample
    has_sensor: bool,
    /// Blend factor applied to each new sample
    smoothing: f64,
    /// Usable samples ingested so far
    sample_count: u64,
}

impl HeadingFusion {
    /// Create a fusion stage with the default smoothing coefficient
    pub fn new() -> Self {
        Self::with_smoothing(DEFAULT_HEADING_SMOOTHING)
    }

    /// Create a fusion stage with a custom smoothing coefficient in (0, 1]
    pub fn with_smoothing(smoothing: f64) -> Self {
        Self {
            smoothed: None,
            has_sensor: false,
            smoothing: smoothing.clamp(f64::EPSILON, 1.0),
            sample_count: 0,
        }
    }

    /// Raw heading in [0, 360) carried by a sample, if it carries one
    ///
    /// A compass heading wins over the device-frame rotation, which is corrected
    /// by the screen rotation offset.
    pub fn raw_heading(sample: &OrientationSample) -> Option<f64> {
        if let Some(heading) = sample.compass_heading.filter(|h| h.is_finite()) {
            return Some(normalize_degrees(heading));
        }

        let alpha = sample.device_alpha.filter(|a| a.is_finite())?;
        let screen = sample.screen_angle.filter(|s| s.is_finite()).unwrap_or(0.0);
        Some(normalize_degrees(alpha - screen))
    }

    /// Blend one orientation sample into the estimate
    pub fn ingest(&mut self, sample: &OrientationSample) {
        let Some(raw) = Self::raw_heading(sample) else {
            return;
        };

        if !self.has_sensor {
            debug!(heading = raw, "compass heading available");
        }
        self.has_sensor = true;
        self.sample_count += 1;

        self.smoothed = Some(match self.smoothed {
            None => raw,
            Some(stored) => {
                normalize_degrees(stored + self.smoothing * signed_angle_diff(raw, stored))
            }
        });
    }

    /// Smoothed heading, or `None` while no sensor has reported
    pub fn current(&self) -> Option<f64> {
        if self.has_sensor {
            self.smoothed
        } else {
            None
        }
    }

    pub fn has_sensor(&self) -> bool {
        self.has_sensor
    }

    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }
}

impl Default for HeadingFusion {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_until_first_sample() {
        let mut fusion = HeadingFusion::new();
        assert_eq!(fusion.current(), None);

        fusion.ingest(&OrientationSample::default());
        assert_eq!(fusion.current(), None);
        assert!(!fusion.has_sensor());

        fusion.ingest(&OrientationSample::compass(42.0));
        assert_eq!(fusion.current(), Some(42.0));
        assert!(fusion.has_sensor());
    }

    #[test]
    fn test_compass_takes_precedence() {
        let sample = OrientationSample {
            compass_heading: Some(10.0),
            device_alpha: Some(200.0),
            screen_angle: Some(90.0),
        };
        assert_eq!(HeadingFusion::raw_heading(&sample), Some(10.0));
    }

    #[test]
    fn test_device_alpha_corrected_by_screen_angle() {
        assert_eq!(HeadingFusion::raw_heading(&OrientationSample::device(30.0, 90.0)), Some(300.0));

        let no_screen = OrientationSample {
            device_alpha: Some(370.0),
            ..Default::default()
        };
        assert_eq!(HeadingFusion::raw_heading(&no_screen), Some(10.0));
    }

    #[test]
    fn test_smoothing_blends_signed_difference() {
        let mut fusion = HeadingFusion::with_smoothing(0.12);
        fusion.ingest(&OrientationSample::compass(100.0));
        fusion.ingest(&OrientationSample::compass(200.0));

        let heading = fusion.current().unwrap();
        assert!((heading - 112.0).abs() < 1e-9);
        assert_eq!(fusion.sample_count(), 2);
    }

    #[test]
    fn test_wraparound_takes_short_path() {
        let mut fusion = HeadingFusion::new();
        let mut previous = None;

        for raw in [355.0, 357.0, 359.0, 1.0, 3.0, 5.0, 5.0, 5.0, 5.0, 5.0] {
            fusion.ingest(&OrientationSample::compass(raw));
            let heading = fusion.current().unwrap();
            assert!((0.0..360.0).contains(&heading), "heading {} out of range", heading);

            if let Some(prev) = previous {
                let step: f64 = signed_angle_diff(heading, prev);
                assert!(step >= 0.0, "heading moved backwards: {} -> {}", prev, heading);
                assert!(step.abs() <= 180.0);
            }
            previous = Some(heading);
        }

        // Converging on 5 degrees through north, not back through 180
        let heading = fusion.current().unwrap();
        assert!(heading > 355.0 || heading < 5.0);
    }

    #[test]
    fn test_non_finite_samples_ignored() {
        let mut fusion = HeadingFusion::new();
        fusion.ingest(&OrientationSample::compass(f64::NAN));
        assert!(!fusion.has_sensor());

        fusion.ingest(&OrientationSample::compass(90.0));
        fusion.ingest(&OrientationSample::compass(f64::INFINITY));
        assert_eq!(fusion.current(), Some(90.0));
        assert_eq!(fusion.sample_count(), 1);
    }
}
