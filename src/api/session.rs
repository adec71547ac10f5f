//! Guidance session state machine
//!
//! A [`GuidanceSession`] owns the chosen destination, the origin anchor, the
//! single open position subscription and the heading estimate. Hosts feed it
//! events either by calling [`GuidanceSession::process`] from their event loop
//! (pull) or by forwarding platform callbacks to
//! [`GuidanceSession::handle_event`] (push). Every path out of `Guiding`
//! cancels the subscription before the state changes.

use crate::algorithms::geodesy::{
    destination_point, distance_meters, local_offset, normalize_degrees, signed_angle_diff,
    try_bearing_degrees,
};
use crate::api::formatting::{arrival_text, guidance_text};
use crate::api::sink::PresentationSink;
use crate::api::types::{GuidanceError, GuidanceResult, GuidanceState, GuidanceUpdate, StartRequest};
use crate::core::{Coordinate, Destination};
use crate::hardware::{
    HeadingSource, OrientationSample, PositionErrorKind, PositionEvent, PositionFix,
    PositionSource, SubscriptionHandle,
};
use crate::processing::HeadingFusion;
use crate::utils::config::{ConfigError, GuidanceConfig, YawConvention};
use tracing::{debug, info, warn};

/// Shown when the compass permission request is refused
const COMPASS_REFUSED_MESSAGE: &str =
    "Compass access not granted. The arrow will point relative to north.";

/// One guidance session
pub struct GuidanceSession<S: PositionSource, P: PresentationSink> {
    config: GuidanceConfig,
    source: S,
    sink: P,
    heading: HeadingFusion,
    state: GuidanceState,
    destination: Option<Destination>,
    origin_anchor: Option<Coordinate>,
    /// At most one open subscription; `Some` only while `Guiding`
    subscription: Option<SubscriptionHandle>,
    /// Used when a fix lands exactly on the destination
    last_bearing: Option<f64>,
    last_error: Option<GuidanceError>,
}

impl<S: PositionSource, P: PresentationSink> GuidanceSession<S, P> {
    /// Create an idle session. The configuration is validated first.
    pub fn new(config: GuidanceConfig, source: S, sink: P) -> Result<Self, ConfigError> {
        let validation = config.validate();
        for warning in &validation.warnings {
            warn!("{}", warning);
        }
        if let Some(error) = validation.errors.into_iter().next() {
            return Err(error);
        }

        Ok(Self {
            heading: HeadingFusion::with_smoothing(config.heading_smoothing),
            origin_anchor: config.origin_anchor,
            config,
            source,
            sink,
            state: GuidanceState::Idle,
            destination: None,
            subscription: None,
            last_bearing: None,
            last_error: None,
        })
    }

    pub fn state(&self) -> GuidanceState {
        self.state
    }

    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    pub fn origin_anchor(&self) -> Option<Coordinate> {
        self.origin_anchor
    }

    /// Handle of the open position subscription, if any
    pub fn subscription(&self) -> Option<SubscriptionHandle> {
        self.subscription
    }

    pub fn heading(&self) -> &HeadingFusion {
        &self.heading
    }

    pub fn config(&self) -> &GuidanceConfig {
        &self.config
    }

    /// Most recent error reported through the sink, cleared by the next fix
    pub fn last_error(&self) -> Option<&GuidanceError> {
        self.last_error.as_ref()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut P {
        &mut self.sink
    }

    /// Configure or clear the origin anchor
    pub fn set_origin_anchor(&mut self, anchor: Option<Coordinate>) {
        debug!(anchor = ?anchor, "origin anchor set");
        self.origin_anchor = anchor;
    }

    /// Replace the origin anchor with the user's current fix
    pub fn recalibrate(&mut self, fix: Coordinate) {
        info!(previous = ?self.origin_anchor, anchor = %fix, "recalibrated origin anchor");
        self.origin_anchor = Some(fix);
    }

    /// Choose where to guide the user
    ///
    /// With an origin anchor configured the session waits in `AwaitingOrigin`
    /// for [`GuidanceSession::start`]; otherwise guidance starts immediately.
    pub fn select_destination(&mut self, destination: Destination) -> GuidanceResult<GuidanceState> {
        if self.state == GuidanceState::Guiding {
            return Err(GuidanceError::InvalidState {
                state: self.state,
                operation: "select a destination",
            });
        }

        info!(id = destination.id, name = %destination.name, "destination selected");
        self.destination = Some(destination);
        self.last_bearing = None;
        // `start` refuses Arrived; a new destination begins a new walk
        if self.state == GuidanceState::Arrived {
            self.transition(GuidanceState::Idle);
        }

        if self.origin_anchor.is_some() {
            self.transition(GuidanceState::AwaitingOrigin);
        } else {
            self.start(StartRequest::default())?;
        }
        Ok(self.state)
    }

    /// Open the position subscription and begin guiding
    ///
    /// Restarting while already guiding replaces the subscription; the old one
    /// is cancelled before the new one is opened.
    pub fn start(&mut self, request: StartRequest) -> GuidanceResult<()> {
        if self.state == GuidanceState::Arrived {
            return Err(GuidanceError::InvalidState {
                state: self.state,
                operation: "start",
            });
        }
        if self.destination.is_none() {
            return Err(GuidanceError::NoDestinationSelected);
        }

        if !request.force {
            self.check_origin(request.current_fix)?;
        }

        self.cancel_subscription();
        let handle = match self.source.subscribe(&self.config.watch) {
            Ok(handle) => handle,
            Err(e) => {
                warn!(error = %e, "position subscription refused");
                if self.state == GuidanceState::Guiding {
                    self.transition(GuidanceState::Idle);
                    self.sink.set_visible(false);
                }
                let error = GuidanceError::from(e);
                self.report(&error);
                return Err(error);
            }
        };

        debug!(%handle, forced = request.force, "position subscription opened");
        self.subscription = Some(handle);
        self.transition(GuidanceState::Guiding);
        self.sink.set_visible(true);
        Ok(())
    }

    /// Stop guiding before arrival
    pub fn stop(&mut self) -> GuidanceResult<()> {
        if self.state != GuidanceState::Guiding {
            return Err(GuidanceError::InvalidState {
                state: self.state,
                operation: "stop",
            });
        }

        self.cancel_subscription();
        self.transition(GuidanceState::Stopped);
        self.sink.set_visible(false);
        Ok(())
    }

    /// End the session: close the subscription and forget destination and anchor
    pub fn end(&mut self) {
        self.cancel_subscription();
        if self.state == GuidanceState::Guiding {
            self.sink.set_visible(false);
        }
        self.destination = None;
        self.origin_anchor = None;
        self.last_bearing = None;
        self.transition(GuidanceState::Idle);
    }

    /// Drain pending position events from the source
    ///
    /// Returns the number of events handled. Position errors are reported to the
    /// sink and do not interrupt draining; a closed stream ends it with
    /// [`GuidanceError::StreamTerminated`].
    pub fn process(&mut self) -> GuidanceResult<usize> {
        let mut handled = 0;

        while let Some(handle) = self.subscription {
            let Some(event) = self.source.poll(handle) else {
                break;
            };
            handled += 1;

            match self.handle_event(handle, event) {
                Ok(_) | Err(GuidanceError::PositionUnavailable { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        Ok(handled)
    }

    /// Handle one event delivered for `handle`
    ///
    /// Events for any handle other than the open subscription are late
    /// deliveries from a cancelled watch and are dropped.
    pub fn handle_event(
        &mut self,
        handle: SubscriptionHandle,
        event: PositionEvent,
    ) -> GuidanceResult<Option<GuidanceUpdate>> {
        if self.subscription != Some(handle) {
            debug!(%handle, active = ?self.subscription, "dropping event for inactive subscription");
            return Ok(None);
        }

        match event {
            PositionEvent::Fix(fix) => self.on_fix(&fix).map(Some),
            PositionEvent::Error(e) => {
                warn!(kind = %e.kind, detail = %e.message, "position source error");
                let error = GuidanceError::PositionUnavailable {
                    kind: e.kind,
                    message: e.message,
                };
                self.report(&error);
                Err(error)
            }
            PositionEvent::Closed => {
                warn!(%handle, "position stream closed by source");
                self.cancel_subscription();
                self.transition(GuidanceState::Idle);
                self.sink.set_visible(false);
                let error = GuidanceError::StreamTerminated;
                self.report(&error);
                Err(error)
            }
        }
    }

    /// Blend one orientation sample into the heading estimate
    pub fn ingest_orientation(&mut self, sample: &OrientationSample) {
        self.heading.ingest(sample);
    }

    /// Request compass access; without it yaw stays world-relative
    pub fn enable_compass<H: HeadingSource>(&mut self, source: &mut H) -> bool {
        let granted = source.request_permission();
        if granted {
            info!("compass access granted");
        } else {
            warn!("compass access refused, using world-relative yaw");
            self.sink.show_error(COMPASS_REFUSED_MESSAGE);
        }
        granted
    }

    /// Drain pending orientation samples into the heading estimate
    pub fn process_orientation<H: HeadingSource>(&mut self, source: &mut H) -> usize {
        let mut count = 0;
        while let Some(sample) = source.next_sample() {
            self.heading.ingest(&sample);
            count += 1;
        }
        count
    }

    fn check_origin(&self, current_fix: Option<Coordinate>) -> GuidanceResult<()> {
        let Some(anchor) = self.origin_anchor else {
            return Ok(());
        };
        let fix = current_fix.ok_or_else(|| GuidanceError::PositionUnavailable {
            kind: PositionErrorKind::Unavailable,
            message: "no current fix to compare with the origin anchor".to_string(),
        })?;

        let distance_m = distance_meters(&fix, &anchor);
        let radius_m = self.config.origin_accept_radius_m;
        if distance_m > radius_m {
            warn!(distance_m, radius_m, "too far from origin anchor");
            return Err(GuidanceError::OriginTooFar {
                distance_m,
                radius_m,
            });
        }
        Ok(())
    }

    fn on_fix(&mut self, fix: &PositionFix) -> GuidanceResult<GuidanceUpdate> {
        let Some(destination) = self.destination.clone() else {
            return Err(GuidanceError::NoDestinationSelected);
        };
        self.last_error = None;
        let user = fix.coordinate;
        let target = destination.location;

        let distance_m = distance_meters(&user, &target);
        let bearing_deg = try_bearing_degrees(&user, &target)
            .or(self.last_bearing)
            .unwrap_or(0.0);
        self.last_bearing = Some(bearing_deg);

        let heading_deg = self.heading.current();
        let yaw_deg = self.yaw_for(bearing_deg, heading_deg);
        let scale = self.config.scale.scale_for(distance_m);

        if distance_m <= self.config.arrival_threshold_m {
            let update = GuidanceUpdate {
                distance_m,
                bearing_deg,
                target_guide_point: target,
                guide_offset: local_offset(&user, &target),
                yaw_deg,
                scale,
                arrived: true,
                heading_deg,
                timestamp_ms: fix.timestamp_ms,
                text: arrival_text(&destination.name),
            };

            self.sink.render(&update);
            self.cancel_subscription();
            self.transition(GuidanceState::Arrived);
            self.sink.set_visible(false);
            self.sink.show_arrived(&destination.name);
            info!(destination = %destination.name, distance_m, "arrived");
            return Ok(update);
        }

        let guide_point = destination_point(&user, bearing_deg, self.config.guide_ahead_m);
        let update = GuidanceUpdate {
            distance_m,
            bearing_deg,
            target_guide_point: guide_point,
            guide_offset: local_offset(&user, &guide_point),
            yaw_deg,
            scale,
            arrived: false,
            heading_deg,
            timestamp_ms: fix.timestamp_ms,
            text: guidance_text(&destination.name, distance_m, bearing_deg),
        };

        debug!(distance_m, bearing_deg, yaw_deg, "guidance update");
        self.sink.render(&update);
        Ok(update)
    }

    /// Arrow yaw: relative to the device facing when a compass reports,
    /// otherwise a world-relative fallback
    fn yaw_for(&self, bearing_deg: f64, heading_deg: Option<f64>) -> f64 {
        match heading_deg {
            Some(heading) => {
                let diff = signed_angle_diff(bearing_deg, heading);
                match self.config.yaw_convention {
                    YawConvention::DeviceRelative => normalize_degrees(-diff),
                    YawConvention::DeviceRelativeInverted => normalize_degrees(diff),
                }
            }
            None => normalize_degrees(bearing_deg + 180.0),
        }
    }

    fn cancel_subscription(&mut self) {
        if let Some(handle) = self.subscription.take() {
            self.source.cancel(handle);
            debug!(%handle, "position subscription cancelled");
        }
    }

    fn transition(&mut self, next: GuidanceState) {
        if self.state != next {
            info!(from = %self.state, to = %next, "guidance state changed");
            self.state = next;
        }
    }

    fn report(&mut self, error: &GuidanceError) {
        self.sink.show_error(&error.to_string());
        self.last_error = Some(error.clone());
    }
}

impl<S: PositionSource, P: PresentationSink> Drop for GuidanceSession<S, P> {
    fn drop(&mut self) {
        self.cancel_subscription();
    }
}
