//! Guidance API types and error taxonomy

use crate::core::Coordinate;
use crate::hardware::{PositionErrorKind, SourceError};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for guidance operations
pub type GuidanceResult<T> = Result<T, GuidanceError>;

/// Guidance state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuidanceState {
    /// No active guidance
    Idle,
    /// Destination chosen, waiting for the user to confirm they are at the origin
    AwaitingOrigin,
    /// Subscription open, updates flowing
    Guiding,
    /// Destination reached; subscription closed
    Arrived,
    /// Guidance stopped by the user before arrival
    Stopped,
}

impl fmt::Display for GuidanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GuidanceState::Idle => "idle",
            GuidanceState::AwaitingOrigin => "awaiting origin",
            GuidanceState::Guiding => "guiding",
            GuidanceState::Arrived => "arrived",
            GuidanceState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Guidance errors
///
/// Everything except [`GuidanceError::StreamTerminated`] leaves the session
/// usable; see [`GuidanceError::is_recoverable`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GuidanceError {
    #[error("no destination selected")]
    NoDestinationSelected,
    /// Recover by recalibrating at the current fix or by forcing the start
    #[error("too far from the starting point (~{distance_m:.0} m, limit {radius_m:.0} m)")]
    OriginTooFar { distance_m: f64, radius_m: f64 },
    #[error("{}", kind.user_message())]
    PositionUnavailable {
        kind: PositionErrorKind,
        message: String,
    },
    #[error("position stream ended; restart guidance")]
    StreamTerminated,
    #[error("cannot {operation} while {state}")]
    InvalidState {
        state: GuidanceState,
        operation: &'static str,
    },
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl GuidanceError {
    /// Whether the session can carry on after this error
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, GuidanceError::StreamTerminated)
    }
}

/// How to start guidance
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StartRequest {
    /// Current fix, checked against the origin anchor
    pub current_fix: Option<Coordinate>,
    /// Start even when the fix is outside the origin acceptance radius
    pub force: bool,
}

impl StartRequest {
    /// Start from the given fix, subject to the origin check
    pub fn at(fix: Coordinate) -> Self {
        Self {
            current_fix: Some(fix),
            force: false,
        }
    }

    /// Skip the origin check
    pub fn forced() -> Self {
        Self {
            current_fix: None,
            force: true,
        }
    }
}

/// Per-fix guidance output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuidanceUpdate {
    /// Remaining great-circle distance (meters)
    pub distance_m: f64,
    /// Bearing from the user to the destination, [0, 360)
    pub bearing_deg: f64,
    /// Where the indicator should be placed
    pub target_guide_point: Coordinate,
    /// Guide point as East/North/Up meters from the user fix
    pub guide_offset: Vector3<f64>,
    /// Indicator rotation, [0, 360)
    pub yaw_deg: f64,
    /// Indicator scale factor
    pub scale: f64,
    pub arrived: bool,
    /// Smoothed device heading used for the yaw, if a compass is reporting
    pub heading_deg: Option<f64>,
    /// Timestamp of the fix this update was computed from (ms since epoch)
    pub timestamp_ms: u64,
    /// One-line human readable status
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_stream_termination_is_fatal() {
        assert!(!GuidanceError::StreamTerminated.is_recoverable());
        assert!(GuidanceError::NoDestinationSelected.is_recoverable());
        assert!(GuidanceError::OriginTooFar {
            distance_m: 50.0,
            radius_m: 12.0
        }
        .is_recoverable());
        assert!(GuidanceError::PositionUnavailable {
            kind: PositionErrorKind::Timeout,
            message: String::new(),
        }
        .is_recoverable());
    }

    #[test]
    fn test_error_messages() {
        let too_far = GuidanceError::OriginTooFar {
            distance_m: 49.6,
            radius_m: 12.0,
        };
        assert_eq!(too_far.to_string(), "too far from the starting point (~50 m, limit 12 m)");

        let invalid = GuidanceError::InvalidState {
            state: GuidanceState::Idle,
            operation: "stop",
        };
        assert_eq!(invalid.to_string(), "cannot stop while idle");

        let denied = GuidanceError::PositionUnavailable {
            kind: PositionErrorKind::PermissionDenied,
            message: "User denied Geolocation".to_string(),
        };
        assert_eq!(denied.to_string(), PositionErrorKind::PermissionDenied.user_message());
    }
}
