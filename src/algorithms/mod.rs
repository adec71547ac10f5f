//! Core guidance algorithms

pub mod geodesy;

pub use geodesy::{
    bearing_degrees, destination_point, distance_meters, local_offset, normalize_degrees,
    signed_angle_diff, try_bearing_degrees,
};
