//! The abstract map the polygon is edited on: a geographic center, a zoom level and a viewport in screen pixels.

use crate::consts::{DEFAULT_VIEWPORT_SIZE, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM, TILE_SIZE};
use crate::input::ViewportPosition;

use geoframe_document::{DEFAULT_CENTER, GeoPoint, GeoPolygon};
use glam::DVec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
	pub center: GeoPoint,
	pub zoom: f64,
	pub viewport_size: DVec2,
}

impl Default for MapView {
	fn default() -> Self {
		Self::new(DEFAULT_CENTER, DEFAULT_ZOOM)
	}
}

impl MapView {
	pub fn new(center: GeoPoint, zoom: f64) -> Self {
		Self {
			center,
			zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
			viewport_size: DVec2::from(DEFAULT_VIEWPORT_SIZE),
		}
	}

	/// Degrees of longitude covered by one screen pixel at the current zoom.
	pub fn resolution(&self) -> f64 {
		360. / (TILE_SIZE * 2_f64.powf(self.zoom))
	}

	pub fn set_zoom(&mut self, zoom: f64) {
		self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
	}

	pub fn coordinate_from_pixel(&self, pixel: ViewportPosition) -> GeoPoint {
		let offset = (pixel - self.viewport_size / 2.) * self.resolution();
		self.center + DVec2::new(offset.x, -offset.y)
	}

	pub fn pixel_from_coordinate(&self, coordinate: GeoPoint) -> ViewportPosition {
		let offset = (coordinate - self.center) / self.resolution();
		self.viewport_size / 2. + DVec2::new(offset.x, -offset.y)
	}

	/// Converts a screen-space drag into a geographic offset.
	pub fn delta_from_pixels(&self, delta: DVec2) -> DVec2 {
		DVec2::new(delta.x, -delta.y) * self.resolution()
	}

	/// Centers the view on the middle of the polygon's extent. Degenerate extents leave the view unchanged.
	pub fn fit_center(&mut self, polygon: &GeoPolygon) -> bool {
		let size = polygon.extent_size();
		if size.x <= 0. || size.y <= 0. {
			trace!("Not recentering the map on a degenerate extent");
			return false;
		}
		self.center = polygon.extent_center();
		true
	}
}
