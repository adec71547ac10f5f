//! Position source error types

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failure reported by the platform for an individual position request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionErrorKind {
    /// The user or platform refused location access
    PermissionDenied,
    /// No fix could be obtained (no signal, hardware off)
    Unavailable,
    /// The source gave up waiting for a fix
    Timeout,
    /// Anything the platform did not classify
    Unknown,
}

impl PositionErrorKind {
    /// Map a W3C geolocation error code (1, 2, 3) to a kind
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => PositionErrorKind::PermissionDenied,
            2 => PositionErrorKind::Unavailable,
            3 => PositionErrorKind::Timeout,
            _ => PositionErrorKind::Unknown,
        }
    }

    /// Message suitable for showing to a pedestrian
    pub fn user_message(&self) -> &'static str {
        match self {
            PositionErrorKind::PermissionDenied => {
                "Location permission denied. Enable location access on your device."
            }
            PositionErrorKind::Unavailable => "Location unavailable. Check that GPS is turned on.",
            PositionErrorKind::Timeout => "Timed out waiting for a location fix. Still trying.",
            PositionErrorKind::Unknown => "Unknown location error.",
        }
    }
}

impl fmt::Display for PositionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PositionErrorKind::PermissionDenied => "permission denied",
            PositionErrorKind::Unavailable => "position unavailable",
            PositionErrorKind::Timeout => "timeout",
            PositionErrorKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Error event delivered on an open subscription
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct PositionError {
    pub kind: PositionErrorKind,
    pub message: String,
}

impl PositionError {
    pub fn new(kind: PositionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Failure to open a subscription at all
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    #[error("position source is not supported on this device")]
    NotSupported,
}

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_code() {
        assert_eq!(PositionErrorKind::from_code(1), PositionErrorKind::PermissionDenied);
        assert_eq!(PositionErrorKind::from_code(2), PositionErrorKind::Unavailable);
        assert_eq!(PositionErrorKind::from_code(3), PositionErrorKind::Timeout);
        assert_eq!(PositionErrorKind::from_code(42), PositionErrorKind::Unknown);
    }

    #[test]
    fn test_error_display() {
        let error = PositionError::new(PositionErrorKind::Timeout, "no fix after 7000ms");
        assert_eq!(error.to_string(), "timeout: no fix after 7000ms");
    }
}
