//! Simulated campus walk
//!
//! Usage: `wayfinding [--config guidance.json] [--catalog pois.json] [--dest ID] [--origin LAT,LON]`
//!
//! Walks a scripted pedestrian from the campus entrance to a destination using
//! the mock position and heading sources, logging every guidance update.

use std::env;
use std::error::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wayfinding::{
    bearing_degrees, destination_point, distance_meters, parse_origin_param, Coordinate,
    DestinationCatalog, DestinationQuery, GuidanceConfig, GuidanceError, GuidanceSession,
    GuidanceState, JsonCatalog, MockHeadingSource, MockPositionSource, StartRequest, TracingSink,
};

const DEMO_CATALOG: &str = r#"[
    { "id": 1, "name": "Library", "latitude": 4.660982, "longitude": -74.059616 },
    { "id": 2, "name": "Cafeteria", "latitude": 4.661226, "longitude": -74.059538 },
    { "id": 3, "name": "Sports Center", "latitude": 4.6625, "longitude": -74.0581 }
]"#;

/// Campus entrance the scripted walk starts from
const ENTRANCE: Coordinate = Coordinate::new_unchecked(4.661000, -74.059700);

/// Distance covered between fixes (meters)
const STEP_M: f64 = 3.0;

#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    catalog: Option<String>,
    dest: Option<u32>,
    origin: Option<String>,
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut args = Args::default();
    let mut iter = env::args().skip(1);

    while let Some(flag) = iter.next() {
        let mut value = || iter.next().ok_or_else(|| format!("missing value for {}", flag));
        match flag.as_str() {
            "--config" => args.config = Some(value()?),
            "--catalog" => args.catalog = Some(value()?),
            "--dest" => args.dest = Some(value()?.parse()?),
            "--origin" => args.origin = Some(value()?),
            other => return Err(format!("unknown argument: {}", other).into()),
        }
    }
    Ok(args)
}

/// Straight-line track from `from` toward `to`, one fix per step
fn scripted_track(from: &Coordinate, to: &Coordinate) -> Vec<Coordinate> {
    let total = distance_meters(from, to);
    let bearing = bearing_degrees(from, to);
    let steps = (total / STEP_M).ceil() as usize;

    (0..=steps)
        .map(|i| destination_point(from, bearing, (i as f64 * STEP_M).min(total)))
        .collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = parse_args()?;

    let mut config = match &args.config {
        Some(path) => GuidanceConfig::from_file(path)?,
        None => GuidanceConfig::default(),
    };
    if let Some(origin) = &args.origin {
        config.origin_anchor = Some(parse_origin_param(origin)?);
    }

    let catalog = match &args.catalog {
        Some(path) => JsonCatalog::from_file(path)?,
        None => JsonCatalog::from_json_str(DEMO_CATALOG)?,
    };
    let destination = catalog
        .resolve(DestinationQuery::Id(args.dest.unwrap_or(2)))
        .ok_or("destination not found in catalog")?;
    info!(destination = %destination.name, location = %destination.location, "walking to destination");

    let track = scripted_track(&ENTRANCE, &destination.location);
    let walk_bearing = bearing_degrees(&ENTRANCE, &destination.location);

    let mut source = MockPositionSource::new();
    source.push_track(&track);

    let mut compass = MockHeadingSource::new(true);
    // Pedestrian sways a little around the walking direction
    compass.push_compass_headings(&[
        walk_bearing - 20.0,
        walk_bearing - 8.0,
        walk_bearing + 5.0,
        walk_bearing + 2.0,
    ]);

    let mut session = GuidanceSession::new(config, source, TracingSink)?;
    session.enable_compass(&mut compass);
    session.process_orientation(&mut compass);

    if session.select_destination(destination)? == GuidanceState::AwaitingOrigin {
        match session.start(StartRequest::at(ENTRANCE)) {
            Err(GuidanceError::OriginTooFar { distance_m, .. }) => {
                warn!(distance_m, "not at the origin anchor, recalibrating here");
                session.recalibrate(ENTRANCE);
                session.start(StartRequest::at(ENTRANCE))?;
            }
            other => other?,
        }
    }

    let handled = session.process()?;
    info!(fixes = handled, state = %session.state(), "walk finished");

    if session.state() != GuidanceState::Arrived {
        session.stop()?;
    }
    Ok(())
}
