//! Sensor processing

pub mod heading;

pub use heading::HeadingFusion;
