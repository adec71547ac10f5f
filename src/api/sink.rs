//! Presentation sink contract

use crate::api::types::GuidanceUpdate;
use tracing::info;

/// Receiver of guidance output
///
/// All calls are fire-and-forget; the engine never waits on the sink.
pub trait PresentationSink {
    /// Show a new guidance update
    fn render(&mut self, update: &GuidanceUpdate);

    /// Show or hide the directional indicator
    fn set_visible(&mut self, visible: bool);

    /// Terminal arrival notice
    fn show_arrived(&mut self, destination: &str);

    /// Human-readable problem report
    fn show_error(&mut self, message: &str);
}

/// One call received by a [`RecordingSink`]
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Render(GuidanceUpdate),
    Visible(bool),
    Arrived(String),
    Error(String),
}

/// Sink that keeps every call, for tests and headless hosts
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Vec<SinkCall>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SinkCall] {
        &self.calls
    }

    /// Rendered updates, oldest first
    pub fn updates(&self) -> Vec<&GuidanceUpdate> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SinkCall::Render(update) => Some(update),
                _ => None,
            })
            .collect()
    }

    pub fn last_update(&self) -> Option<&GuidanceUpdate> {
        self.updates().into_iter().last()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SinkCall::Error(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Indicator visibility after the most recent `set_visible`
    pub fn is_visible(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|call| match call {
                SinkCall::Visible(visible) => Some(*visible),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn arrived_at(&self) -> Option<&str> {
        self.calls.iter().find_map(|call| match call {
            SinkCall::Arrived(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

impl PresentationSink for RecordingSink {
    fn render(&mut self, update: &GuidanceUpdate) {
        self.calls.push(SinkCall::Render(update.clone()));
    }

    fn set_visible(&mut self, visible: bool) {
        self.calls.push(SinkCall::Visible(visible));
    }

    fn show_arrived(&mut self, destination: &str) {
        self.calls.push(SinkCall::Arrived(destination.to_string()));
    }

    fn show_error(&mut self, message: &str) {
        self.calls.push(SinkCall::Error(message.to_string()));
    }
}

/// Sink that writes every call to the `tracing` log
#[derive(Debug, Default)]
pub struct TracingSink;

impl PresentationSink for TracingSink {
    fn render(&mut self, update: &GuidanceUpdate) {
        info!(
            distance_m = update.distance_m,
            bearing_deg = update.bearing_deg,
            yaw_deg = update.yaw_deg,
            scale = update.scale,
            guide_lat = update.target_guide_point.latitude,
            guide_lon = update.target_guide_point.longitude,
            "{}",
            update.text
        );
    }

    fn set_visible(&mut self, visible: bool) {
        info!(visible, "indicator visibility");
    }

    fn show_arrived(&mut self, destination: &str) {
        info!(destination, "arrived");
    }

    fn show_error(&mut self, message: &str) {
        info!(error = message, "guidance error shown");
    }
}
