//! Guidance engine API
//!
//! The session state machine plus the contracts it talks to on the
//! presentation and catalog side.

pub mod session;
pub mod types;
pub mod sink;
pub mod catalog;
pub mod formatting;

pub use session::GuidanceSession;
pub use types::{GuidanceError, GuidanceResult, GuidanceState, GuidanceUpdate, StartRequest};
pub use sink::{PresentationSink, RecordingSink, SinkCall, TracingSink};
pub use catalog::{CatalogError, DestinationCatalog, DestinationQuery, JsonCatalog};
pub use formatting::{arrival_text, format_distance, guidance_text};
