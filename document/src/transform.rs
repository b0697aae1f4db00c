//! Linear mapping between design-canvas pixels and geographic degrees.
//!
//! This is not a geodesic projection. A fixed number of degrees per pixel is applied around a center point, which is accurate
//! enough for the small extents of a single design selection.

use crate::{GeoPoint, GeoPolygon};

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

/// Degrees of longitude and latitude covered by one canvas pixel.
pub const DEGREES_PER_PIXEL: f64 = 1e-6;

/// The selected shape as exported from the design tool, in canvas pixel units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelRect {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
	/// Counter-clockwise rotation in degrees around the top-left corner.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rotation: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub corner_radius: Option<f64>,
}

impl PixelRect {
	pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
		Self {
			x,
			y,
			width,
			height,
			..Default::default()
		}
	}

	/// A rectangle with no area describes no shape and must not be rendered.
	pub fn is_degenerate(&self) -> bool {
		!(self.width > 0. && self.height > 0.)
	}

	/// The four corners in canvas space ordered top-left, top-right, bottom-right, bottom-left.
	pub fn corners(&self) -> [DVec2; 4] {
		let origin = DVec2::new(self.x, self.y);
		let local = [DVec2::ZERO, DVec2::new(self.width, 0.), DVec2::new(self.width, self.height), DVec2::new(0., self.height)];

		// Canvas Y points down, so a counter-clockwise rotation on screen is a negative angle here
		let rotation = DAffine2::from_angle(-self.rotation.unwrap_or_default().to_radians());
		local.map(|offset| origin + rotation.transform_vector2(offset))
	}
}

/// Places canvas pixels around a geographic center using a fixed scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasProjection {
	pub center: GeoPoint,
	pub degrees_per_pixel: f64,
}

impl Default for CanvasProjection {
	fn default() -> Self {
		Self::new(crate::DEFAULT_CENTER)
	}
}

impl CanvasProjection {
	pub fn new(center: GeoPoint) -> Self {
		Self {
			center,
			degrees_per_pixel: DEGREES_PER_PIXEL,
		}
	}

	pub fn with_scale(center: GeoPoint, degrees_per_pixel: f64) -> Self {
		Self { center, degrees_per_pixel }
	}

	pub fn pixel_to_geo(&self, pixel: DVec2) -> GeoPoint {
		GeoPoint::new(self.center.x + pixel.x * self.degrees_per_pixel, self.center.y - pixel.y * self.degrees_per_pixel)
	}

	pub fn geo_to_pixel(&self, point: GeoPoint) -> DVec2 {
		DVec2::new((point.x - self.center.x) / self.degrees_per_pixel, (self.center.y - point.y) / self.degrees_per_pixel)
	}

	pub fn rect_to_polygon(&self, rect: &PixelRect) -> GeoPolygon {
		GeoPolygon::from_corners(rect.corners().map(|corner| self.pixel_to_geo(corner)))
	}
}

/// Maps a canvas pixel offset to a geographic point around `center` using [`DEGREES_PER_PIXEL`].
pub fn pixel_to_geo(x: f64, y: f64, center: GeoPoint) -> GeoPoint {
	CanvasProjection::new(center).pixel_to_geo(DVec2::new(x, y))
}

/// Projects all four corners of `rect` around `center` and closes the ring.
pub fn rect_to_polygon(rect: &PixelRect, center: GeoPoint) -> GeoPolygon {
	CanvasProjection::new(center).rect_to_polygon(rect)
}

/// Arithmetic mean of every given point. For a closed ring this counts the first corner twice.
pub fn center_of(coordinates: &[GeoPoint]) -> GeoPoint {
	if coordinates.is_empty() {
		return GeoPoint::ZERO;
	}
	coordinates.iter().sum::<DVec2>() / coordinates.len() as f64
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::polygon::Corner;
	use pretty_assertions::assert_eq;

	#[test]
	fn zero_offset_is_identity() {
		for center in [GeoPoint::ZERO, crate::DEFAULT_CENTER, GeoPoint::new(-179.5, -89.9)] {
			assert_eq!(pixel_to_geo(0., 0., center), center);
		}
	}

	#[test]
	fn y_axis_is_inverted() {
		let point = pixel_to_geo(10., 20., GeoPoint::ZERO);
		assert!((point - GeoPoint::new(10e-6, -20e-6)).length() < 1e-15);
	}

	#[test]
	fn rect_corners_are_ordered_from_top_left() {
		let center = GeoPoint::new(126.978, 37.5665);
		let polygon = rect_to_polygon(&PixelRect::new(0., 0., 100., 50.), center);
		let [top_left, top_right, bottom_right, bottom_left] = polygon.corners();

		assert_eq!(top_left, center);
		assert!(top_right.x > top_left.x && top_right.y == top_left.y);
		assert!(bottom_right.x == top_right.x && bottom_right.y < top_right.y);
		assert!(bottom_left.x == top_left.x && bottom_left.y == bottom_right.y);
		assert_eq!(polygon.ring()[0], polygon.ring()[4]);
		assert!(polygon.is_simple());
	}

	#[test]
	fn rotation_pivots_on_top_left() {
		let rect = PixelRect {
			rotation: Some(90.),
			..PixelRect::new(10., 10., 100., 50.)
		};
		let corners = rect.corners();
		assert_eq!(corners[0], DVec2::new(10., 10.));
		// A quarter turn counter-clockwise sends the top edge straight up the screen
		assert!((corners[1] - DVec2::new(10., -90.)).length() < 1e-9);

		let polygon = rect_to_polygon(&rect, GeoPoint::ZERO);
		assert!(polygon.is_simple());
		assert!((polygon.corner(Corner::TopLeft) - pixel_to_geo(10., 10., GeoPoint::ZERO)).length() < 1e-15);
	}

	#[test]
	fn geo_to_pixel_inverts_pixel_to_geo() {
		let projection = CanvasProjection::new(crate::DEFAULT_CENTER);
		let pixel = DVec2::new(42., -17.);
		assert!((projection.geo_to_pixel(projection.pixel_to_geo(pixel)) - pixel).length() < 1e-6);
	}

	#[test]
	fn zero_width_rect_is_degenerate() {
		assert!(PixelRect::new(0., 0., 0., 10.).is_degenerate());
		assert!(!PixelRect::new(0., 0., 1., 10.).is_degenerate());
	}

	#[test]
	fn center_of_averages_every_point() {
		let points = [GeoPoint::new(0., 0.), GeoPoint::new(2., 0.), GeoPoint::new(2., 2.), GeoPoint::new(0., 2.), GeoPoint::new(0., 0.)];
		assert_eq!(center_of(&points), GeoPoint::new(0.8, 0.8));
		assert_eq!(center_of(&[]), GeoPoint::ZERO);
	}
}
