//! Sensor source abstraction layer
//!
//! The engine never talks to a GPS receiver or compass directly. Hosts wrap
//! whatever platform API they have in [`PositionSource`] and [`HeadingSource`];
//! the mock implementations here drive tests and the demo walk.

pub mod position;
pub mod orientation;
pub mod mock;
pub mod error;

pub use position::{PositionSource, PositionFix, PositionEvent, SubscriptionHandle, WatchOptions};
pub use orientation::{HeadingSource, OrientationSample};
pub use mock::{MockPositionSource, MockHeadingSource, SourceCall};
pub use error::{PositionError, PositionErrorKind, SourceError, SourceResult};
