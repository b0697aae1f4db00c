use crate::interaction::HoverTarget;

use geoframe_document::polygon::Corner;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum MouseCursorIcon {
	#[default]
	Default,
	Grab,
	Grabbing,
	Move,
	NWResize,
	NEResize,
	SEResize,
	SWResize,
}

impl MouseCursorIcon {
	pub fn resize(corner: Corner) -> Self {
		match corner {
			Corner::TopLeft => MouseCursorIcon::NWResize,
			Corner::TopRight => MouseCursorIcon::NEResize,
			Corner::BottomRight => MouseCursorIcon::SEResize,
			Corner::BottomLeft => MouseCursorIcon::SWResize,
		}
	}

	/// The cursor shown over `target`. A button held outside the feature grabs the map.
	pub fn for_target(target: HoverTarget, button_held: bool) -> Self {
		match target {
			HoverTarget::Corner(corner) => Self::resize(corner),
			HoverTarget::Body => MouseCursorIcon::Move,
			HoverTarget::Outside if button_held => MouseCursorIcon::Grabbing,
			HoverTarget::Outside => MouseCursorIcon::Grab,
		}
	}

	/// CSS `cursor` value.
	pub fn css_name(self) -> &'static str {
		match self {
			MouseCursorIcon::Default => "default",
			MouseCursorIcon::Grab => "grab",
			MouseCursorIcon::Grabbing => "grabbing",
			MouseCursorIcon::Move => "move",
			MouseCursorIcon::NWResize => "nw-resize",
			MouseCursorIcon::NEResize => "ne-resize",
			MouseCursorIcon::SEResize => "se-resize",
			MouseCursorIcon::SWResize => "sw-resize",
		}
	}
}
