//! Human-readable guidance text

/// Distance as shown to a pedestrian: whole metres below 1 km, otherwise km
pub fn format_distance(distance_m: f64) -> String {
    if distance_m < 1000.0 {
        format!("{} m", distance_m.round() as i64)
    } else {
        format!("{:.1} km", distance_m / 1000.0)
    }
}

/// Status line for an in-progress guidance update
pub fn guidance_text(destination: &str, distance_m: f64, bearing_deg: f64) -> String {
    // 359.6 rounds to 360, which reads wrong on a compass
    let bearing = (bearing_deg.round() as i64).rem_euclid(360);
    format!(
        "Destination: {} | Distance: {} | Bearing: {}°",
        destination,
        format_distance(distance_m),
        bearing
    )
}

/// Status line once the destination has been reached
pub fn arrival_text(destination: &str) -> String {
    format!("You have arrived at {}", destination)
}
