//! Pointer gestures on the edited polygon and the hit testing that chooses between them.

pub mod modify;
pub mod translate;

pub use modify::ModifyGesture;
pub use translate::TranslateGesture;

use crate::input::ViewportPosition;
use crate::map_view::MapView;

use geoframe_document::GeoPolygon;
use geoframe_document::polygon::Corner;

/// What lies under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTarget {
	Corner(Corner),
	Body,
	Outside,
}

impl HoverTarget {
	/// Corners are tested in ring order and the first one within `threshold` screen pixels wins.
	pub fn hit_test(view: &MapView, polygon: &GeoPolygon, pointer: ViewportPosition, threshold: f64) -> Self {
		let corner = Corner::ALL.into_iter().find(|&corner| view.pixel_from_coordinate(polygon.corner(corner)).distance(pointer) < threshold);

		match corner {
			Some(corner) => HoverTarget::Corner(corner),
			None if polygon.contains(view.coordinate_from_pixel(pointer)) => HoverTarget::Body,
			None => HoverTarget::Outside,
		}
	}
}
