use crate::consts::MIN_MODIFY_RADIUS_FRACTION;

use geoframe_document::polygon::Corner;
use geoframe_document::{GeoPoint, GeoPolygon};

/// Scales and rotates the ring about its extent center by dragging one corner.
///
/// The scale is the ratio of the pointer's distance from the center to the grabbed corner's distance, and the rotation is the
/// change in angle between them. Each update is applied to the geometry captured when the gesture began.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModifyGesture {
	corner: Corner,
	original: GeoPolygon,
	pivot: GeoPoint,
	initial_radius: f64,
	initial_angle: f64,
}

impl ModifyGesture {
	/// Returns `None` when the corner sits too close to the center for the gesture to be stable.
	pub fn begin(polygon: &GeoPolygon, corner: Corner) -> Option<Self> {
		let pivot = polygon.extent_center();
		let offset = polygon.corner(corner) - pivot;
		let initial_radius = offset.length();

		let min_radius = polygon.extent_size().max_element() * MIN_MODIFY_RADIUS_FRACTION;
		if !(initial_radius > min_radius) {
			trace!("Corner {corner:?} is within {min_radius} of the center, not modifying");
			return None;
		}

		Some(Self {
			corner,
			original: *polygon,
			pivot,
			initial_radius,
			initial_angle: offset.y.atan2(offset.x),
		})
	}

	pub fn corner(&self) -> Corner {
		self.corner
	}

	pub fn original(&self) -> &GeoPolygon {
		&self.original
	}

	pub fn pivot(&self) -> GeoPoint {
		self.pivot
	}

	/// Scale factor and rotation in radians for the pointer position, or `None` when it sits on the pivot.
	pub fn scale_and_rotation(&self, pointer: GeoPoint) -> Option<(f64, f64)> {
		let offset = pointer - self.pivot;
		let current_radius = offset.length();
		if !(current_radius > 0.) {
			return None;
		}
		Some((current_radius / self.initial_radius, offset.y.atan2(offset.x) - self.initial_angle))
	}

	pub fn update(&self, pointer: GeoPoint) -> Option<GeoPolygon> {
		let (scale, angle) = self.scale_and_rotation(pointer)?;
		let modified = self.original.scaled_and_rotated(scale, angle, self.pivot);
		if !modified.is_simple() {
			trace!("Skipping a modification that would collapse the ring");
			return None;
		}
		Some(modified)
	}
}
