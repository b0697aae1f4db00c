// `macro_use` puts the log macros (`error!`, `warn!`, `debug!`, `info!` and `trace!`) in scope for the crate
#[macro_use]
extern crate log;

pub mod builder;
pub mod canvas;
pub mod error;
pub mod interchange;
pub mod node;
pub mod polygon;
pub mod transform;
pub mod wkt;

pub use error::DocumentError;
pub use polygon::GeoPolygon;

/// A geographic position stored as `x` = longitude and `y` = latitude, both in degrees.
pub type GeoPoint = glam::DVec2;

/// Default map center (Seoul City Hall) used when nothing else has been chosen.
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::new(126.978, 37.5665);

/// Name of the canvas layer whose children store previously committed corner coordinates.
pub const COORDINATES_LAYER_NAME: &str = "Coordinates Layer";
