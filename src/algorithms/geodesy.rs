//! Spherical geodesy for pedestrian guidance
//!
//! All functions take and return degrees and work on a sphere of radius
//! [`EARTH_RADIUS_M`]. Over the few hundred metres of a campus walk the
//! spherical model is well inside GPS noise, so no ellipsoid corrections
//! are applied.

use crate::core::{Coordinate, EARTH_RADIUS_M};
use nalgebra::Vector3;

/// Wrap an angle into [0, 360)
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid of a tiny negative value rounds up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed shortest-path difference `a - b`, in [-180, 180]
pub fn signed_angle_diff(a: f64, b: f64) -> f64 {
    let mut diff = normalize_degrees(a) - normalize_degrees(b);
    if diff > 180.0 {
        diff -= 360.0;
    }
    if diff < -180.0 {
        diff += 360.0;
    }
    diff
}

/// Wrap a longitude into (-180, 180]
fn normalize_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        180.0
    } else {
        wrapped
    }
}

/// Great-circle distance in metres (haversine)
pub fn distance_meters(a: &Coordinate, b: &Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push h just past 1.0 for antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Initial great-circle bearing from `from` toward `to`, in [0, 360)
///
/// Meaningless when the two points coincide; use [`try_bearing_degrees`]
/// when that can happen.
pub fn bearing_degrees(from: &Coordinate, to: &Coordinate) -> f64 {
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let d_lambda = (to.longitude - from.longitude).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();

    normalize_degrees(y.atan2(x).to_degrees())
}

/// Bearing from `from` to `to`, or `None` when the points coincide
pub fn try_bearing_degrees(from: &Coordinate, to: &Coordinate) -> Option<f64> {
    if from == to {
        None
    } else {
        Some(bearing_degrees(from, to))
    }
}

/// Point reached by travelling `distance_m` from `origin` along `bearing_deg`
pub fn destination_point(origin: &Coordinate, bearing_deg: f64, distance_m: f64) -> Coordinate {
    let delta = distance_m / EARTH_RADIUS_M;
    let theta = bearing_deg.to_radians();
    let phi1 = origin.latitude.to_radians();
    let lambda1 = origin.longitude.to_radians();

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());

    Coordinate::new_unchecked(phi2.to_degrees(), normalize_longitude(lambda2.to_degrees()))
}

/// East/North/Up offset of `point` relative to `reference`, in metres
///
/// Flat-earth approximation around `reference`; only meaningful for short
/// distances such as the guide-ahead point.
pub fn local_offset(reference: &Coordinate, point: &Coordinate) -> Vector3<f64> {
    let d_lat = (point.latitude - reference.latitude).to_radians();
    let d_lon = signed_angle_diff(point.longitude, reference.longitude).to_radians();

    let north = d_lat * EARTH_RADIUS_M;
    let east = d_lon * EARTH_RADIUS_M * reference.latitude.to_radians().cos();

    Vector3::new(east, north, 0.0)
}
