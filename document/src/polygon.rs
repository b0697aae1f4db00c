use crate::{DocumentError, GeoPoint, wkt};

use glam::{DAffine2, DVec2};
use kurbo::{BezPath, Line, PathSeg, Point, Shape};
use serde::{Deserialize, Serialize};

/// Number of points in a closed quadrilateral ring (four corners plus the closing repeat of the first).
pub const RING_LENGTH: usize = 5;

/// Index of each corner in the ring, in the order the ring is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
	TopLeft,
	TopRight,
	BottomRight,
	BottomLeft,
}

impl Corner {
	pub const ALL: [Corner; 4] = [Corner::TopLeft, Corner::TopRight, Corner::BottomRight, Corner::BottomLeft];

	pub fn index(self) -> usize {
		self as usize
	}

	pub fn from_index(index: usize) -> Option<Self> {
		Self::ALL.get(index).copied()
	}

	/// Human readable label, also used when the corners are written back to the canvas as layer names.
	pub fn label(self) -> &'static str {
		match self {
			Corner::TopLeft => "Top Left",
			Corner::TopRight => "Top Right",
			Corner::BottomRight => "Bottom Right",
			Corner::BottomLeft => "Bottom Left",
		}
	}
}

/// A closed four-cornered ring of geographic points.
///
/// The ring always holds exactly five points where the last repeats the first. Corners are ordered top-left, top-right,
/// bottom-right, bottom-left as they were when the polygon was first projected from the canvas; edits move them but never reorder them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GeoPolygon {
	ring: [GeoPoint; RING_LENGTH],
}

impl GeoPolygon {
	pub fn from_corners(corners: [GeoPoint; 4]) -> Self {
		let [top_left, top_right, bottom_right, bottom_left] = corners;
		Self {
			ring: [top_left, top_right, bottom_right, bottom_left, top_left],
		}
	}

	/// Builds a polygon from an explicit ring. A ring of four points is closed automatically, a ring of five must already be closed.
	///
	/// The corners must be distinct and the edges must not cross.
	pub fn try_from_ring(points: &[GeoPoint]) -> Result<Self, DocumentError> {
		let polygon = match points {
			[a, b, c, d] => Self::from_corners([*a, *b, *c, *d]),
			[a, b, c, d, e] if a == e => Self::from_corners([*a, *b, *c, *d]),
			[_, _, _, _, _] => return Err(DocumentError::parse(wkt::serialize_geometry(points), "ring is not closed")),
			_ => {
				return Err(DocumentError::InvalidRing {
					expected: RING_LENGTH,
					found: points.len(),
				});
			}
		};

		if !polygon.is_simple() {
			return Err(DocumentError::parse(polygon.to_wkt(), "ring repeats a corner or crosses itself"));
		}
		Ok(polygon)
	}

	pub fn ring(&self) -> &[GeoPoint; RING_LENGTH] {
		&self.ring
	}

	pub fn corners(&self) -> [GeoPoint; 4] {
		[self.ring[0], self.ring[1], self.ring[2], self.ring[3]]
	}

	pub fn corner(&self, corner: Corner) -> GeoPoint {
		self.ring[corner.index()]
	}

	/// Arithmetic mean of every ring point, including the closing duplicate.
	pub fn ring_mean(&self) -> GeoPoint {
		crate::transform::center_of(&self.ring)
	}

	/// Arithmetic mean of the four corners.
	pub fn corner_mean(&self) -> GeoPoint {
		self.corners().iter().sum::<DVec2>() / 4.
	}

	/// Axis-aligned bounding box as `[min, max]`.
	pub fn extent(&self) -> [GeoPoint; 2] {
		let corners = self.corners();
		let min = corners.iter().copied().fold(DVec2::splat(f64::INFINITY), DVec2::min);
		let max = corners.iter().copied().fold(DVec2::splat(f64::NEG_INFINITY), DVec2::max);
		[min, max]
	}

	/// Center of the bounding box, the pivot used for scaling and rotating the polygon.
	pub fn extent_center(&self) -> GeoPoint {
		let [min, max] = self.extent();
		min.lerp(max, 0.5)
	}

	pub fn extent_size(&self) -> DVec2 {
		let [min, max] = self.extent();
		max - min
	}

	pub fn transformed(&self, transform: DAffine2) -> Self {
		let mut ring = self.ring;
		for point in ring.iter_mut() {
			*point = transform.transform_point2(*point);
		}
		Self { ring }
	}

	pub fn translated(&self, delta: DVec2) -> Self {
		self.transformed(DAffine2::from_translation(delta))
	}

	/// Uniformly scales and then rotates the polygon around `pivot`.
	pub fn scaled_and_rotated(&self, scale: f64, angle: f64, pivot: GeoPoint) -> Self {
		let transform = DAffine2::from_translation(pivot) * DAffine2::from_angle(angle) * DAffine2::from_scale(DVec2::splat(scale)) * DAffine2::from_translation(-pivot);
		self.transformed(transform)
	}

	/// Length of the top edge and of the left edge in degrees.
	pub fn edge_lengths(&self) -> DVec2 {
		let [top_left, top_right, _, bottom_left] = self.corners();
		DVec2::new(top_left.distance(top_right), top_left.distance(bottom_left))
	}

	pub fn is_degenerate(&self) -> bool {
		let size = self.edge_lengths();
		!(size.x > 0. && size.y > 0.) || !size.is_finite()
	}

	/// Returns `true` if the corners are distinct and no two non-adjacent edges cross.
	pub fn is_simple(&self) -> bool {
		let corners = self.corners();
		let distinct = (0..4).all(|i| ((i + 1)..4).all(|j| corners[i] != corners[j]));
		if !distinct {
			return false;
		}

		let edges = self.edges();
		[(0, 2), (1, 3)].into_iter().all(|(a, b)| PathSeg::Line(edges[a]).intersect_line(edges[b]).is_empty())
	}

	/// Returns `true` if `point` lies inside the polygon body.
	pub fn contains(&self, point: GeoPoint) -> bool {
		self.path().contains(to_point(point))
	}

	pub fn to_wkt(&self) -> String {
		wkt::serialize_geometry(&self.ring)
	}

	fn edges(&self) -> [Line; 4] {
		let r = &self.ring;
		[
			Line::new(to_point(r[0]), to_point(r[1])),
			Line::new(to_point(r[1]), to_point(r[2])),
			Line::new(to_point(r[2]), to_point(r[3])),
			Line::new(to_point(r[3]), to_point(r[0])),
		]
	}

	fn path(&self) -> BezPath {
		let mut path = BezPath::new();
		path.move_to(to_point(self.ring[0]));
		for point in &self.ring[1..4] {
			path.line_to(to_point(*point));
		}
		path.close_path();
		path
	}
}

impl TryFrom<String> for GeoPolygon {
	type Error = DocumentError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl std::str::FromStr for GeoPolygon {
	type Err = DocumentError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::try_from_ring(&wkt::parse_geometry(s)?)
	}
}

impl From<GeoPolygon> for String {
	fn from(polygon: GeoPolygon) -> Self {
		polygon.to_wkt()
	}
}

impl std::fmt::Display for GeoPolygon {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.to_wkt())
	}
}

fn to_point(vec: DVec2) -> Point {
	Point::new(vec.x, vec.y)
}
