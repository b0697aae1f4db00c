use crate::input::{Key, ModifierKeys, MouseKeys, MouseState};
use crate::map_view::MapView;
use crate::messages::{FrontendMessage, SessionMessage};
use crate::overlay::SvgPayload;
use crate::preferences::EditorPreferences;
use crate::session::EditingSession;

use geoframe_document::polygon::Corner;
use geoframe_document::{GeoPoint, GeoPolygon};
use glam::DVec2;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Zoom at which the two degree wide test square spans about 180 pixels.
pub const SQUARE_ZOOM: f64 = 7.;

/// Axis-aligned square with corners at (±1, ±1).
pub fn square() -> GeoPolygon {
	GeoPolygon::from_corners([GeoPoint::new(-1., 1.), GeoPoint::new(1., 1.), GeoPoint::new(1., -1.), GeoPoint::new(-1., -1.)])
}

pub fn square_view() -> MapView {
	MapView::new(GeoPoint::ZERO, SQUARE_ZOOM)
}

#[track_caller]
pub fn assert_close(actual: f64, expected: f64) {
	assert!((actual - expected).abs() < 1e-9, "{actual} is not close to {expected}");
}

/// A set of utility functions to make the writing of session tests more declarative
pub struct SessionTestUtils {
	pub session: EditingSession,
	pub responses: VecDeque<FrontendMessage>,
	pub now: Instant,
}

impl SessionTestUtils {
	pub fn create() -> Self {
		let _ = env_logger::builder().is_test(true).try_init();

		let preferences = EditorPreferences {
			default_center: GeoPoint::ZERO,
			initial_zoom: SQUARE_ZOOM,
			..Default::default()
		};
		Self {
			session: EditingSession::new(preferences),
			responses: VecDeque::new(),
			now: Instant::now(),
		}
	}

	/// A session editing [`square`] with an SVG snapshot loaded.
	pub fn with_square() -> Self {
		let mut utils = Self::create();
		utils.session.open_polygon(square(), Some(SvgPayload::from("<svg/>".to_string())), &mut utils.responses);
		utils
	}

	pub fn handle_message(&mut self, message: SessionMessage) {
		self.session.process_message(message, self.now, &mut self.responses);
	}

	pub fn advance(&mut self, duration: Duration) {
		self.now += duration;
		self.handle_message(SessionMessage::Tick);
	}

	pub fn geometry(&self) -> GeoPolygon {
		*self.session.geometry().expect("the session should be open")
	}

	pub fn corner_pixel(&self, corner: Corner) -> DVec2 {
		self.session.view().pixel_from_coordinate(self.geometry().corner(corner))
	}

	pub fn pixel(&self, point: GeoPoint) -> DVec2 {
		self.session.view().pixel_from_coordinate(point)
	}

	pub fn move_mouse(&mut self, position: DVec2, modifier_keys: ModifierKeys, mouse_keys: MouseKeys) {
		let mouse_state = MouseState { position, mouse_keys };
		self.handle_message(SessionMessage::PointerMove { mouse_state, modifier_keys });
	}

	pub fn left_mousedown(&mut self, position: DVec2, modifier_keys: ModifierKeys) {
		let mouse_state = MouseState { position, mouse_keys: MouseKeys::LEFT };
		self.handle_message(SessionMessage::PointerDown { mouse_state, modifier_keys });
	}

	pub fn mouseup(&mut self, position: DVec2, modifier_keys: ModifierKeys) {
		let mouse_state = MouseState { position, mouse_keys: MouseKeys::NONE };
		self.handle_message(SessionMessage::PointerUp { mouse_state, modifier_keys });
	}

	pub fn drag(&mut self, from: DVec2, to: DVec2, modifier_keys: ModifierKeys) {
		self.move_mouse(from, modifier_keys, MouseKeys::NONE);
		self.left_mousedown(from, modifier_keys);
		self.move_mouse(to, modifier_keys, MouseKeys::LEFT);
		self.mouseup(to, modifier_keys);
	}

	pub fn press(&mut self, key: Key, modifier_keys: ModifierKeys) {
		self.handle_message(SessionMessage::KeyDown { key, modifier_keys });
		self.handle_message(SessionMessage::KeyUp { key, modifier_keys });
	}

	pub fn take_responses(&mut self) -> Vec<FrontendMessage> {
		self.responses.drain(..).collect()
	}
}
