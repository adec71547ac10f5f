//! Mock sources for testing and the demo walk

use crate::core::Coordinate;
use crate::hardware::{
    HeadingSource, OrientationSample, PositionError, PositionErrorKind, PositionEvent,
    PositionFix, PositionSource, SourceError, SourceResult, SubscriptionHandle, WatchOptions,
};
use std::collections::VecDeque;

/// Interval between scripted fixes (milliseconds)
const MOCK_FIX_INTERVAL_MS: u64 = 1000;

/// Recorded call against a [`MockPositionSource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceCall {
    Subscribe(SubscriptionHandle),
    Cancel(SubscriptionHandle),
}

/// Scripted position source
///
/// Queued events are delivered to whichever subscription is open when
/// [`PositionSource::poll`] is called.
#[derive(Debug)]
pub struct MockPositionSource {
    next_handle: u32,
    active: Vec<SubscriptionHandle>,
    events: VecDeque<PositionEvent>,
    calls: Vec<SourceCall>,
    last_options: Option<WatchOptions>,
    refuse_with: Option<SourceError>,
    clock_ms: u64,
}

impl MockPositionSource {
    /// Create a new mock source with an empty script
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            active: Vec::new(),
            events: VecDeque::new(),
            calls: Vec::new(),
            last_options: None,
            refuse_with: None,
            clock_ms: 1_700_000_000_000,
        }
    }

    /// Queue a fix at the given coordinate
    pub fn push_fix(&mut self, coordinate: Coordinate) {
        self.clock_ms += MOCK_FIX_INTERVAL_MS;
        let fix = PositionFix::new(coordinate, self.clock_ms).with_accuracy(5.0);
        self.events.push_back(PositionEvent::Fix(fix));
    }

    /// Queue a sequence of fixes
    pub fn push_track(&mut self, track: &[Coordinate]) {
        for coordinate in track {
            self.push_fix(*coordinate);
        }
    }

    /// Queue an error event
    pub fn push_error(&mut self, kind: PositionErrorKind, message: &str) {
        self.events
            .push_back(PositionEvent::Error(PositionError::new(kind, message)));
    }

    /// Queue the end of the stream
    pub fn push_closed(&mut self) {
        self.events.push_back(PositionEvent::Closed);
    }

    /// Make the next subscribe calls fail with `error`
    pub fn refuse_subscriptions(&mut self, error: SourceError) {
        self.refuse_with = Some(error);
    }

    /// Every subscribe/cancel call, in order
    pub fn calls(&self) -> &[SourceCall] {
        &self.calls
    }

    pub fn subscribe_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SourceCall::Subscribe(_)))
            .count()
    }

    pub fn cancel_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SourceCall::Cancel(_)))
            .count()
    }

    /// Subscriptions that are currently open
    pub fn active_subscriptions(&self) -> &[SubscriptionHandle] {
        &self.active
    }

    pub fn last_options(&self) -> Option<&WatchOptions> {
        self.last_options.as_ref()
    }

    /// Number of events still waiting to be polled
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}

impl Default for MockPositionSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionSource for MockPositionSource {
    fn subscribe(&mut self, options: &WatchOptions) -> SourceResult<SubscriptionHandle> {
        if let Some(error) = &self.refuse_with {
            return Err(error.clone());
        }

        let handle = SubscriptionHandle::new(self.next_handle);
        self.next_handle += 1;
        self.active.push(handle);
        self.calls.push(SourceCall::Subscribe(handle));
        self.last_options = Some(options.clone());
        Ok(handle)
    }

    fn cancel(&mut self, handle: SubscriptionHandle) {
        self.calls.push(SourceCall::Cancel(handle));
        self.active.retain(|h| *h != handle);
    }

    fn poll(&mut self, handle: SubscriptionHandle) -> Option<PositionEvent> {
        if !self.active.contains(&handle) {
            return None;
        }
        self.events.pop_front()
    }
}

/// Scripted heading source
#[derive(Debug, Default)]
pub struct MockHeadingSource {
    grant_permission: bool,
    permission_requests: u32,
    samples: VecDeque<OrientationSample>,
}

impl MockHeadingSource {
    /// Create a heading source that grants or refuses sensor access
    pub fn new(grant_permission: bool) -> Self {
        Self {
            grant_permission,
            permission_requests: 0,
            samples: VecDeque::new(),
        }
    }

    pub fn push_sample(&mut self, sample: OrientationSample) {
        self.samples.push_back(sample);
    }

    /// Queue compass headings (iOS-style samples)
    pub fn push_compass_headings(&mut self, headings: &[f64]) {
        for heading in headings {
            self.push_sample(OrientationSample::compass(*heading));
        }
    }

    pub fn permission_requests(&self) -> u32 {
        self.permission_requests
    }
}

impl HeadingSource for MockHeadingSource {
    fn request_permission(&mut self) -> bool {
        self.permission_requests += 1;
        self.grant_permission
    }

    fn next_sample(&mut self) -> Option<OrientationSample> {
        if !self.grant_permission {
            return None;
        }
        self.samples.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_and_cancel_are_recorded() {
        let mut source = MockPositionSource::new();
        let first = source.subscribe(&WatchOptions::default()).unwrap();
        source.cancel(first);
        let second = source.subscribe(&WatchOptions::default()).unwrap();

        assert_ne!(first, second);
        assert_eq!(
            source.calls(),
            &[
                SourceCall::Subscribe(first),
                SourceCall::Cancel(first),
                SourceCall::Subscribe(second)
            ]
        );
        assert_eq!(source.active_subscriptions(), &[second]);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut source = MockPositionSource::new();
        let handle = source.subscribe(&WatchOptions::default()).unwrap();
        source.cancel(handle);
        source.cancel(handle);
        assert!(source.active_subscriptions().is_empty());
    }

    #[test]
    fn test_events_only_reach_open_subscriptions() {
        let mut source = MockPositionSource::new();
        source.push_fix(Coordinate::new_unchecked(4.661, -74.0597));

        let handle = source.subscribe(&WatchOptions::default()).unwrap();
        source.cancel(handle);
        assert!(source.poll(handle).is_none());
        assert_eq!(source.pending_events(), 1);

        let handle = source.subscribe(&WatchOptions::default()).unwrap();
        assert!(matches!(source.poll(handle), Some(PositionEvent::Fix(_))));
        assert!(source.poll(handle).is_none());
    }

    #[test]
    fn test_refused_subscription() {
        let mut source = MockPositionSource::new();
        source.refuse_subscriptions(SourceError::NotSupported);
        assert_eq!(
            source.subscribe(&WatchOptions::default()),
            Err(SourceError::NotSupported)
        );
        assert_eq!(source.subscribe_count(), 0);
    }

    #[test]
    fn test_heading_permission_gate() {
        let mut denied = MockHeadingSource::new(false);
        denied.push_compass_headings(&[10.0]);
        assert!(!denied.request_permission());
        assert!(denied.next_sample().is_none());

        let mut granted = MockHeadingSource::new(true);
        granted.push_compass_headings(&[10.0]);
        assert!(granted.request_permission());
        assert_eq!(granted.next_sample(), Some(OrientationSample::compass(10.0)));
        assert_eq!(granted.permission_requests(), 1);
    }
}
