use crate::cursor::MouseCursorIcon;
use crate::input::{Key, ModifierKeys, MouseState};
use crate::overlay::SvgOverlay;

use geoframe_document::GeoPoint;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Input delivered to an [`EditingSession`](crate::session::EditingSession) by the map frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionMessage {
	PointerDown { mouse_state: MouseState, modifier_keys: ModifierKeys },
	PointerMove { mouse_state: MouseState, modifier_keys: ModifierKeys },
	PointerUp { mouse_state: MouseState, modifier_keys: ModifierKeys },
	PointerCancel,
	KeyDown { key: Key, modifier_keys: ModifierKeys },
	KeyUp { key: Key, modifier_keys: ModifierKeys },
	Zoom { zoom: f64 },
	ResizeViewport { size: DVec2 },
	Undo,
	Redo,
	Abort,
	/// Lets time-based work such as the debounced overlay refresh run.
	Tick,
}

/// What the map frontend should draw in response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FrontendMessage {
	UpdateMouseCursor { cursor: MouseCursorIcon },
	UpdatePolygon { ring: Vec<GeoPoint>, modifying: bool },
	ClearPolygon,
	UpdateOverlay { overlay: SvgOverlay },
	ClearOverlays,
	UpdateMapView { center: GeoPoint, zoom: f64 },
}
