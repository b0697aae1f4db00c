//! Places the SVG snapshot of the selection over the edited polygon.

use crate::consts::SVG_DATA_URL_PREAMBLE;
use crate::map_view::MapView;
use crate::messages::FrontendMessage;

use base64::Engine;
use geoframe_document::{GeoPoint, GeoPolygon};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

mod base64_serde {
	//! Basic wrapper for [`serde`] to perform [`base64`] encoding

	use base64::Engine;
	use serde::{Deserialize, Deserializer, Serializer};
	use std::sync::Arc;

	pub fn as_base64<S: Serializer>(bytes: &Arc<[u8]>, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
	}

	pub fn from_base64<'a, D: Deserializer<'a>>(deserializer: D) -> Result<Arc<[u8]>, D::Error> {
		let string = String::deserialize(deserializer)?;
		base64::engine::general_purpose::STANDARD
			.decode(string)
			.map(Arc::from)
			.map_err(|err| serde::de::Error::custom(err.to_string()))
	}
}

/// The raw SVG bytes exported by the host for the selection. Travels as base64 text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SvgPayload(#[serde(serialize_with = "base64_serde::as_base64", deserialize_with = "base64_serde::from_base64")] Arc<[u8]>);

impl SvgPayload {
	pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
		Self(bytes.into())
	}

	pub fn bytes(&self) -> &[u8] {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn data_url(&self) -> String {
		let mut url = String::with_capacity(SVG_DATA_URL_PREAMBLE.len() + self.0.len() * 4 / 3 + 4);
		url.push_str(SVG_DATA_URL_PREAMBLE);
		base64::engine::general_purpose::STANDARD.encode_string(&self.0, &mut url);
		url
	}
}

impl From<String> for SvgPayload {
	fn from(svg: String) -> Self {
		Self::new(svg.into_bytes())
	}
}

/// Where and how the snapshot is drawn. Width and height are in screen pixels, rotation in radians clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayPlacement {
	pub position: GeoPoint,
	pub width: f64,
	pub height: f64,
	pub rotation: f64,
}

impl OverlayPlacement {
	pub fn is_degenerate(&self) -> bool {
		!(self.width > 0. && self.height > 0.) || !self.width.is_finite() || !self.height.is_finite() || !self.rotation.is_finite()
	}
}

/// Sizes the snapshot to the polygon's top and left edges at the view's resolution and centers it on the corners.
pub fn compute_placement(view: &MapView, polygon: &GeoPolygon) -> OverlayPlacement {
	let [top_left, top_right, _, bottom_left] = polygon.corners();
	let resolution = view.resolution();
	let top_edge = top_right - top_left;

	OverlayPlacement {
		position: polygon.corner_mean(),
		width: top_left.distance(top_right) / resolution,
		height: top_left.distance(bottom_left) / resolution,
		rotation: -top_edge.y.atan2(top_edge.x),
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SvgOverlay {
	pub placement: OverlayPlacement,
	pub image_url: String,
}

/// Owns the single overlay shown on the map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayRenderer {
	svg: Option<SvgPayload>,
	image_url: Option<String>,
	current: Option<SvgOverlay>,
}

impl OverlayRenderer {
	pub fn set_svg(&mut self, svg: Option<SvgPayload>) {
		self.image_url = svg.as_ref().filter(|svg| !svg.is_empty()).map(SvgPayload::data_url);
		self.svg = svg;
	}

	pub fn svg(&self) -> Option<&SvgPayload> {
		self.svg.as_ref()
	}

	pub fn current(&self) -> Option<&SvgOverlay> {
		self.current.as_ref()
	}

	pub fn clear(&mut self, responses: &mut VecDeque<FrontendMessage>) {
		if self.current.take().is_some() {
			responses.push_back(FrontendMessage::ClearOverlays);
		}
	}

	/// Replaces the overlay with one placed over `polygon`.
	pub fn render(&mut self, view: &MapView, polygon: &GeoPolygon, responses: &mut VecDeque<FrontendMessage>) -> Option<&SvgOverlay> {
		self.clear(responses);

		let Some(image_url) = &self.image_url else {
			trace!("No SVG snapshot to overlay");
			return None;
		};

		let placement = compute_placement(view, polygon);
		if placement.is_degenerate() {
			trace!("Skipping a degenerate overlay placement {placement:?}");
			return None;
		}

		let overlay = SvgOverlay {
			placement,
			image_url: image_url.clone(),
		};
		responses.push_back(FrontendMessage::UpdateOverlay { overlay: overlay.clone() });
		self.current = Some(overlay);
		self.current.as_ref()
	}
}
