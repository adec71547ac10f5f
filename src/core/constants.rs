//! Physical constants and guidance defaults

/// Mean Earth radius used by the spherical model (m)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Distance from the destination at which the user counts as arrived (m)
pub const DEFAULT_ARRIVAL_THRESHOLD_M: f64 = 4.0;

/// How far ahead of the user the guide point is projected (m)
pub const DEFAULT_GUIDE_AHEAD_M: f64 = 6.0;

/// Maximum distance from the origin anchor at which guidance may start (m)
pub const DEFAULT_ORIGIN_ACCEPT_RADIUS_M: f64 = 12.0;

/// Exponential smoothing coefficient for compass headings
pub const DEFAULT_HEADING_SMOOTHING: f64 = 0.12;
