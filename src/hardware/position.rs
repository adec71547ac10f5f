//! Position source contract

use crate::core::Coordinate;
use crate::hardware::{PositionError, SourceResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one open position subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u32);

impl SubscriptionHandle {
    pub fn new(id: u32) -> Self {
        SubscriptionHandle(id)
    }
}

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "watch#{}", self.0)
    }
}

/// Options passed to the source when subscribing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchOptions {
    /// Ask for GPS-grade accuracy rather than network location
    pub high_accuracy: bool,
    /// Oldest cached fix the source may hand back (milliseconds)
    pub max_staleness_ms: u32,
    /// How long the source waits for a fix before reporting a timeout (milliseconds)
    pub timeout_ms: u32,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            max_staleness_ms: 1000,
            timeout_ms: 7000,
        }
    }
}

/// A single position reading
#[derive(Debug, Clone, PartialEq)]
pub struct PositionFix {
    pub coordinate: Coordinate,
    /// Horizontal accuracy radius (meters), when the source reports one
    pub accuracy_m: Option<f64>,
    /// Milliseconds since epoch
    pub timestamp_ms: u64,
}

impl PositionFix {
    pub fn new(coordinate: Coordinate, timestamp_ms: u64) -> Self {
        Self {
            coordinate,
            accuracy_m: None,
            timestamp_ms,
        }
    }

    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }
}

/// Something delivered on an open subscription
#[derive(Debug, Clone, PartialEq)]
pub enum PositionEvent {
    Fix(PositionFix),
    Error(PositionError),
    /// The source will deliver nothing further on this subscription
    Closed,
}

/// Asynchronous position feed
///
/// Events are pulled with [`PositionSource::poll`]; a source that is driven by
/// platform callbacks queues them until polled.
pub trait PositionSource {
    /// Open a subscription
    fn subscribe(&mut self, options: &WatchOptions) -> SourceResult<SubscriptionHandle>;

    /// Close a subscription. Cancelling an unknown or already closed handle is a no-op.
    fn cancel(&mut self, handle: SubscriptionHandle);

    /// Next pending event for `handle`, if any. Never blocks.
    fn poll(&mut self, handle: SubscriptionHandle) -> Option<PositionEvent>;
}
