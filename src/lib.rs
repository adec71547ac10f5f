//! Pedestrian Wayfinding Guidance Engine
//!
//! Turns a live position feed and compass samples into directional guidance
//! toward a campus point of interest: distance, bearing, a guide point a few
//! metres ahead, and an arrow yaw relative to where the device is facing.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod utils;
pub mod hardware;
pub mod api;

// Re-export commonly used types
pub use core::{Coordinate, CoordinateError, Destination, EARTH_RADIUS_M};
pub use algorithms::geodesy::{bearing_degrees, destination_point, distance_meters};
pub use processing::HeadingFusion;
pub use hardware::{
    HeadingSource, MockHeadingSource, MockPositionSource, OrientationSample, PositionError,
    PositionErrorKind, PositionEvent, PositionFix, PositionSource, SourceError,
    SubscriptionHandle, WatchOptions,
};
pub use api::{
    CatalogError, DestinationCatalog, DestinationQuery, GuidanceError, GuidanceResult,
    GuidanceSession, GuidanceState, GuidanceUpdate, JsonCatalog, PresentationSink,
    RecordingSink, StartRequest, TracingSink,
};
pub use utils::{parse_origin_param, ConfigError, GuidanceConfig, YawConvention};
