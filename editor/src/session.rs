//! The editing session: owns the edited polygon, its history, the overlay and the map view, and runs the edit tool's state
//! machine over incoming [`SessionMessage`]s.

use crate::EditorError;
use crate::cursor::MouseCursorIcon;
use crate::debounce::ZoomDebouncer;
use crate::feature::EditableFeature;
use crate::history::{EditCheckpoint, HistoryStack};
use crate::input::{ModifierKeys, Shortcut, ViewportPosition};
use crate::interaction::{HoverTarget, ModifyGesture, TranslateGesture};
use crate::map_view::MapView;
use crate::messages::{FrontendMessage, SessionMessage};
use crate::overlay::{OverlayRenderer, SvgPayload};
use crate::preferences::EditorPreferences;

use geoframe_document::builder::{PolygonBuilder, PolygonSource};
use geoframe_document::node::ExtractedNode;
use geoframe_document::polygon::RING_LENGTH;
use geoframe_document::transform::CanvasProjection;
use geoframe_document::{GeoPoint, GeoPolygon};
use std::collections::VecDeque;
use std::time::Instant;

pub trait Fsm {
	/// Values the state machine keeps between events, such as the gesture in progress.
	type ToolData;

	/// Based on the current state and the incoming event, performs a step and returns the next state.
	#[must_use]
	fn transition(self, message: &SessionMessage, tool_data: &mut Self::ToolData, context: &mut EditContext, responses: &mut VecDeque<FrontendMessage>) -> Self;

	/// Sets the mouse cursor for the state, if it changed.
	fn update_cursor(&self, tool_data: &mut Self::ToolData, context: &EditContext, responses: &mut VecDeque<FrontendMessage>);
}

/// The parts of the session a transition may touch.
pub struct EditContext<'a> {
	pub feature: Option<&'a mut EditableFeature>,
	pub history: &'a mut HistoryStack,
	pub view: &'a mut MapView,
	pub overlay: &'a mut OverlayRenderer,
	pub preferences: &'a EditorPreferences,
	pub overlay_stale: &'a mut bool,
}

impl EditContext<'_> {
	fn refresh_overlay(&mut self, responses: &mut VecDeque<FrontendMessage>) {
		*self.overlay_stale = false;
		if let Some(feature) = self.feature.as_deref() {
			self.overlay.render(self.view, feature.geometry(), responses);
		}
	}

	/// Holding the batch-edit modifier defers the overlay refresh until it is released.
	fn finish_edit(&mut self, modifier_keys: ModifierKeys, responses: &mut VecDeque<FrontendMessage>) {
		if modifier_keys.batch_edit() {
			*self.overlay_stale = true;
		} else {
			self.refresh_overlay(responses);
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditToolFsmState {
	#[default]
	Ready,
	Translating,
	Modifying,
	Panning,
}

#[derive(Clone, Debug, Default)]
pub struct EditToolData {
	last_pointer: ViewportPosition,
	translate: Option<TranslateGesture>,
	modify: Option<ModifyGesture>,
	checkpoint: Option<EditCheckpoint>,
	cursor: MouseCursorIcon,
}

impl EditToolData {
	fn start_gesture(&mut self, position: ViewportPosition, modifier_keys: ModifierKeys, context: &mut EditContext, responses: &mut VecDeque<FrontendMessage>) -> EditToolFsmState {
		let Some(geometry) = context.feature.as_deref().map(|feature| *feature.geometry()) else {
			return EditToolFsmState::Panning;
		};

		let target = HoverTarget::hit_test(context.view, &geometry, position, context.preferences.corner_threshold);
		if let HoverTarget::Corner(corner) = target {
			if !modifier_keys.platform_only() {
				if let Some(gesture) = ModifyGesture::begin(&geometry, corner) {
					debug!("Modifying from the {} corner", corner.label());
					self.modify = Some(gesture);
					self.checkpoint = Some(context.history.begin_edit(geometry.to_wkt()));
					context.overlay.clear(responses);
					return EditToolFsmState::Modifying;
				}
			}
		}

		let pointer = context.view.coordinate_from_pixel(position);
		if !geometry.contains(pointer) {
			return EditToolFsmState::Panning;
		}

		debug!("Translating");
		self.translate = Some(TranslateGesture::begin(&geometry, pointer));
		self.checkpoint = Some(context.history.begin_edit(geometry.to_wkt()));
		context.overlay.clear(responses);
		EditToolFsmState::Translating
	}

	fn finish_gesture(&mut self) {
		self.translate = None;
		self.modify = None;
		self.checkpoint = None;
	}

	/// Puts the geometry back the way it was when the gesture began and forgets its history entry.
	fn abort(&mut self, context: &mut EditContext, responses: &mut VecDeque<FrontendMessage>) {
		let original = match (self.translate.take(), self.modify.take()) {
			(Some(gesture), _) => Some(*gesture.original()),
			(_, Some(gesture)) => Some(*gesture.original()),
			_ => None,
		};

		if let (Some(original), Some(feature)) = (original, context.feature.as_deref_mut()) {
			feature.set_geometry(original);
			responses.push_back(polygon_message(feature));
		}
		if let Some(checkpoint) = self.checkpoint.take() {
			context.history.cancel_edit(checkpoint);
		}
		debug!("Aborted the gesture");

		context.refresh_overlay(responses);
	}
}

impl Fsm for EditToolFsmState {
	type ToolData = EditToolData;

	fn transition(self, message: &SessionMessage, tool_data: &mut Self::ToolData, context: &mut EditContext, responses: &mut VecDeque<FrontendMessage>) -> Self {
		match (self, message) {
			(EditToolFsmState::Ready, SessionMessage::PointerDown { mouse_state, modifier_keys }) if mouse_state.mouse_keys.primary() => {
				tool_data.last_pointer = mouse_state.position;
				tool_data.start_gesture(mouse_state.position, *modifier_keys, context, responses)
			}
			(EditToolFsmState::Ready, SessionMessage::PointerMove { mouse_state, .. }) => {
				tool_data.last_pointer = mouse_state.position;
				EditToolFsmState::Ready
			}
			(EditToolFsmState::Translating, SessionMessage::PointerMove { mouse_state, .. }) => {
				tool_data.last_pointer = mouse_state.position;
				let pointer = context.view.coordinate_from_pixel(mouse_state.position);

				if let (Some(gesture), Some(feature)) = (&tool_data.translate, context.feature.as_deref_mut()) {
					feature.set_geometry(gesture.update(pointer));
					responses.push_back(polygon_message(feature));
				}

				EditToolFsmState::Translating
			}
			(EditToolFsmState::Modifying, SessionMessage::PointerMove { mouse_state, .. }) => {
				tool_data.last_pointer = mouse_state.position;
				let pointer = context.view.coordinate_from_pixel(mouse_state.position);

				if let (Some(gesture), Some(feature)) = (&tool_data.modify, context.feature.as_deref_mut()) {
					if let Some(modified) = gesture.update(pointer) {
						feature.set_modify_geometry(modified);
						responses.push_back(polygon_message(feature));
					}
				}

				EditToolFsmState::Modifying
			}
			(EditToolFsmState::Panning, SessionMessage::PointerMove { mouse_state, .. }) => {
				let delta = mouse_state.position - tool_data.last_pointer;
				tool_data.last_pointer = mouse_state.position;

				let offset = context.view.delta_from_pixels(delta);
				context.view.center -= offset;
				responses.push_back(map_view_message(context.view));

				EditToolFsmState::Panning
			}
			(EditToolFsmState::Translating, SessionMessage::PointerUp { modifier_keys, .. }) => {
				tool_data.finish_gesture();
				context.finish_edit(*modifier_keys, responses);

				EditToolFsmState::Ready
			}
			(EditToolFsmState::Modifying, SessionMessage::PointerUp { modifier_keys, .. }) => {
				if let Some(feature) = context.feature.as_deref_mut() {
					feature.commit_modify_geometry();
					responses.push_back(polygon_message(feature));
				}
				tool_data.finish_gesture();
				context.finish_edit(*modifier_keys, responses);

				EditToolFsmState::Ready
			}
			(EditToolFsmState::Panning, SessionMessage::PointerUp { .. } | SessionMessage::Abort | SessionMessage::PointerCancel) => EditToolFsmState::Ready,
			(EditToolFsmState::Translating | EditToolFsmState::Modifying, SessionMessage::Abort | SessionMessage::PointerCancel) => {
				tool_data.abort(context, responses);

				EditToolFsmState::Ready
			}
			(state, _) => state,
		}
	}

	fn update_cursor(&self, tool_data: &mut Self::ToolData, context: &EditContext, responses: &mut VecDeque<FrontendMessage>) {
		let cursor = match self {
			EditToolFsmState::Translating => MouseCursorIcon::Move,
			EditToolFsmState::Modifying => tool_data.modify.map(|gesture| MouseCursorIcon::resize(gesture.corner())).unwrap_or_default(),
			EditToolFsmState::Panning => MouseCursorIcon::Grabbing,
			EditToolFsmState::Ready => match context.feature.as_deref() {
				Some(feature) => {
					let target = HoverTarget::hit_test(context.view, feature.display_geometry(), tool_data.last_pointer, context.preferences.corner_threshold);
					MouseCursorIcon::for_target(target, false)
				}
				None => MouseCursorIcon::Grab,
			},
		};

		if cursor != tool_data.cursor {
			tool_data.cursor = cursor;
			responses.push_back(FrontendMessage::UpdateMouseCursor { cursor });
		}
	}
}

fn polygon_message(feature: &EditableFeature) -> FrontendMessage {
	FrontendMessage::UpdatePolygon {
		ring: feature.display_geometry().ring().to_vec(),
		modifying: feature.modify_geometry().is_some(),
	}
}

fn map_view_message(view: &MapView) -> FrontendMessage {
	FrontendMessage::UpdateMapView { center: view.center, zoom: view.zoom }
}

/// One polygon being edited on the map, from [`EditingSession::open`] to [`EditingSession::dispose`].
#[derive(Debug, Clone)]
pub struct EditingSession {
	preferences: EditorPreferences,
	view: MapView,
	/// Where the top left of a pixel rectangle lands on the map.
	center: GeoPoint,
	nodes: Vec<ExtractedNode>,
	feature: Option<EditableFeature>,
	history: HistoryStack,
	overlay: OverlayRenderer,
	zoom_debouncer: ZoomDebouncer,
	fsm_state: EditToolFsmState,
	tool_data: EditToolData,
	modifier_keys: ModifierKeys,
	overlay_stale: bool,
}

impl Default for EditingSession {
	fn default() -> Self {
		Self::new(EditorPreferences::default())
	}
}

impl EditingSession {
	pub fn new(preferences: EditorPreferences) -> Self {
		Self {
			view: MapView::new(preferences.default_center, preferences.initial_zoom),
			center: preferences.default_center,
			nodes: Vec::new(),
			feature: None,
			history: HistoryStack::with_max_depth(preferences.max_history_depth),
			overlay: OverlayRenderer::default(),
			zoom_debouncer: ZoomDebouncer::new(preferences.zoom_debounce()),
			fsm_state: EditToolFsmState::default(),
			tool_data: EditToolData::default(),
			modifier_keys: ModifierKeys::empty(),
			overlay_stale: false,
			preferences,
		}
	}

	fn projection(&self) -> CanvasProjection {
		CanvasProjection::with_scale(self.center, self.preferences.degrees_per_pixel)
	}

	/// Starts editing the polygon built from the host's selection. An empty selection closes the session.
	///
	/// On a parse error the session is left as it was.
	pub fn open(&mut self, nodes: Vec<ExtractedNode>, svg: Option<SvgPayload>, responses: &mut VecDeque<FrontendMessage>) -> Result<(), EditorError> {
		let built = PolygonBuilder::with_projection(self.projection()).build(&nodes).inspect_err(|err| error!("Could not build the polygon: {err}"))?;

		let Some(built) = built else {
			info!("Nothing selected");
			self.dispose(responses);
			return Ok(());
		};

		let degenerate_rect = built.source == PolygonSource::Rectangle && nodes.first().is_some_and(|first| first.rect().is_degenerate());
		if degenerate_rect || built.polygon.is_degenerate() {
			trace!("Skipping the selection without area: {}", built.polygon);
			self.dispose(responses);
			return Ok(());
		}

		info!("Opened {} nodes, polygon from {:?}", nodes.len(), built.source);
		self.open_polygon(built.polygon, svg, responses);
		self.nodes = nodes;
		Ok(())
	}

	/// Starts editing `polygon` directly.
	pub fn open_polygon(&mut self, polygon: GeoPolygon, svg: Option<SvgPayload>, responses: &mut VecDeque<FrontendMessage>) {
		self.reset_interaction();
		self.nodes.clear();
		self.history.clear();
		self.feature = Some(EditableFeature::new(polygon));
		self.overlay.set_svg(svg);

		self.view.fit_center(&polygon);
		responses.push_back(map_view_message(&self.view));
		self.push_polygon(responses);
		self.refresh_overlay(responses);
	}

	/// Releases the feature, history, overlay and any pending recompute.
	pub fn dispose(&mut self, responses: &mut VecDeque<FrontendMessage>) {
		self.reset_interaction();
		self.nodes.clear();
		self.history.clear();
		self.zoom_debouncer.cancel();
		self.overlay.clear(responses);
		self.overlay.set_svg(None);
		self.overlay_stale = false;

		if self.feature.take().is_some() {
			responses.push_back(FrontendMessage::ClearPolygon);
		}
		self.tool_data.cursor = MouseCursorIcon::Default;
		responses.push_back(FrontendMessage::UpdateMouseCursor { cursor: MouseCursorIcon::Default });
	}

	/// Moves the anchor of the selection to `center`, as after a location search. History is reset.
	pub fn recenter(&mut self, center: GeoPoint, responses: &mut VecDeque<FrontendMessage>) {
		self.center = center;

		let Some(first) = self.nodes.first() else {
			self.view.center = center;
			responses.push_back(map_view_message(&self.view));
			return;
		};

		let polygon = self.projection().rect_to_polygon(&first.rect());
		self.reset_interaction();
		self.history.clear();
		if let Some(feature) = self.feature.as_mut() {
			feature.set_geometry(polygon);
		}

		self.view.fit_center(&polygon);
		responses.push_back(map_view_message(&self.view));
		self.push_polygon(responses);
		self.refresh_overlay(responses);
	}

	pub fn process_message(&mut self, message: SessionMessage, now: Instant, responses: &mut VecDeque<FrontendMessage>) {
		match &message {
			SessionMessage::PointerDown { modifier_keys, .. }
			| SessionMessage::PointerMove { modifier_keys, .. }
			| SessionMessage::PointerUp { modifier_keys, .. }
			| SessionMessage::KeyDown { modifier_keys, .. }
			| SessionMessage::KeyUp { modifier_keys, .. } => self.modifier_keys = *modifier_keys,
			_ => {}
		}

		match message {
			SessionMessage::KeyDown { key, modifier_keys } => match Shortcut::from_key(key, modifier_keys) {
				Some(Shortcut::Undo) => self.undo(responses),
				Some(Shortcut::Redo) => self.redo(responses),
				Some(Shortcut::Abort) => self.transition(&SessionMessage::Abort, responses),
				None => {}
			},
			SessionMessage::KeyUp { key, .. } => {
				if key.is_platform_modifier() && !self.modifier_keys.batch_edit() && self.overlay_stale && self.fsm_state == EditToolFsmState::Ready {
					debug!("Batch edit finished, refreshing the overlay");
					self.refresh_overlay(responses);
				}
			}
			SessionMessage::Undo => self.undo(responses),
			SessionMessage::Redo => self.redo(responses),
			SessionMessage::Zoom { zoom } => self.zoom(zoom, now, responses),
			SessionMessage::ResizeViewport { size } => self.view.viewport_size = size,
			SessionMessage::Tick => self.tick(now, responses),
			SessionMessage::PointerDown { .. } | SessionMessage::PointerMove { .. } | SessionMessage::PointerUp { .. } | SessionMessage::PointerCancel | SessionMessage::Abort => {
				self.transition(&message, responses)
			}
		}
	}

	fn transition(&mut self, message: &SessionMessage, responses: &mut VecDeque<FrontendMessage>) {
		let mut context = EditContext {
			feature: self.feature.as_mut(),
			history: &mut self.history,
			view: &mut self.view,
			overlay: &mut self.overlay,
			preferences: &self.preferences,
			overlay_stale: &mut self.overlay_stale,
		};

		let state = self.fsm_state.transition(message, &mut self.tool_data, &mut context, responses);
		if state != self.fsm_state {
			trace!("{:?} -> {state:?}", self.fsm_state);
		}
		state.update_cursor(&mut self.tool_data, &context, responses);
		self.fsm_state = state;
	}

	fn zoom(&mut self, zoom: f64, now: Instant, responses: &mut VecDeque<FrontendMessage>) {
		self.view.set_zoom(zoom);
		responses.push_back(map_view_message(&self.view));

		if self.modifier_keys.batch_edit() {
			self.overlay_stale = true;
			return;
		}
		self.overlay.clear(responses);
		self.zoom_debouncer.schedule(now);
	}

	fn tick(&mut self, now: Instant, responses: &mut VecDeque<FrontendMessage>) {
		if !self.zoom_debouncer.poll(now) {
			return;
		}
		if self.fsm_state == EditToolFsmState::Ready {
			self.refresh_overlay(responses);
		} else {
			self.overlay_stale = true;
		}
	}

	/// Restores the latest undo snapshot. Does nothing mid-gesture or with an empty undo stack.
	pub fn undo(&mut self, responses: &mut VecDeque<FrontendMessage>) {
		if self.fsm_state != EditToolFsmState::Ready {
			return;
		}
		let Some(feature) = self.feature.as_mut() else { return };
		let Some(previous) = self.history.undo(feature.geometry().to_wkt()) else {
			trace!("Nothing to undo");
			return;
		};

		match previous.parse::<GeoPolygon>() {
			Ok(polygon) => {
				feature.set_geometry(polygon);
				self.push_polygon(responses);
				self.refresh_overlay(responses);
			}
			Err(err) => {
				error!("Could not restore the undo snapshot: {err}");
				self.history.redo(previous);
			}
		}
	}

	/// Restores the latest redo snapshot. Does nothing mid-gesture or with an empty redo stack.
	pub fn redo(&mut self, responses: &mut VecDeque<FrontendMessage>) {
		if self.fsm_state != EditToolFsmState::Ready {
			return;
		}
		let Some(feature) = self.feature.as_mut() else { return };
		let Some(next) = self.history.redo(feature.geometry().to_wkt()) else {
			trace!("Nothing to redo");
			return;
		};

		match next.parse::<GeoPolygon>() {
			Ok(polygon) => {
				feature.set_geometry(polygon);
				self.push_polygon(responses);
				self.refresh_overlay(responses);
			}
			Err(err) => {
				error!("Could not restore the redo snapshot: {err}");
				self.history.undo(next);
			}
		}
	}

	fn reset_interaction(&mut self) {
		if let Some(feature) = self.feature.as_mut() {
			feature.discard_modify_geometry();
		}
		self.tool_data.finish_gesture();
		self.fsm_state = EditToolFsmState::Ready;
	}

	fn refresh_overlay(&mut self, responses: &mut VecDeque<FrontendMessage>) {
		self.overlay_stale = false;
		if let Some(feature) = &self.feature {
			self.overlay.render(&self.view, feature.geometry(), responses);
		}
	}

	fn push_polygon(&self, responses: &mut VecDeque<FrontendMessage>) {
		if let Some(feature) = &self.feature {
			responses.push_back(polygon_message(feature));
		}
	}

	/// The committed ring as (longitude, latitude) pairs, ready to be sent back to the canvas.
	pub fn polygon_coordinates(&self) -> Option<[GeoPoint; RING_LENGTH]> {
		self.feature.as_ref().map(|feature| *feature.geometry().ring())
	}

	pub fn geometry(&self) -> Option<&GeoPolygon> {
		self.feature.as_ref().map(EditableFeature::geometry)
	}

	pub fn feature(&self) -> Option<&EditableFeature> {
		self.feature.as_ref()
	}

	pub fn nodes(&self) -> &[ExtractedNode] {
		&self.nodes
	}

	pub fn history(&self) -> &HistoryStack {
		&self.history
	}

	pub fn overlay(&self) -> &OverlayRenderer {
		&self.overlay
	}

	pub fn view(&self) -> &MapView {
		&self.view
	}

	pub fn center(&self) -> GeoPoint {
		self.center
	}

	pub fn fsm_state(&self) -> EditToolFsmState {
		self.fsm_state
	}

	pub fn is_open(&self) -> bool {
		self.feature.is_some()
	}

	pub fn is_overlay_stale(&self) -> bool {
		self.overlay_stale
	}

	pub fn preferences(&self) -> &EditorPreferences {
		&self.preferences
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::input::{Key, MouseKeys};
	use crate::test_utils::{SessionTestUtils, assert_close, square};
	use geoframe_document::polygon::Corner;
	use geoframe_document::transform::PixelRect;
	use glam::DVec2;
	use pretty_assertions::assert_eq;
	use std::time::Duration;

	fn overlay_updates(responses: &[FrontendMessage]) -> usize {
		responses.iter().filter(|message| matches!(message, FrontendMessage::UpdateOverlay { .. })).count()
	}

	#[test]
	fn corner_drag_scales_about_the_center() {
		let mut utils = SessionTestUtils::with_square();
		let from = utils.corner_pixel(Corner::TopRight);
		let to = utils.pixel(GeoPoint::new(2., 2.));

		utils.drag(from, to, ModifierKeys::empty());

		let geometry = utils.geometry();
		assert!(geometry.corner(Corner::BottomLeft).distance(GeoPoint::new(-2., -2.)) < 1e-9);
		assert!(geometry.corner(Corner::TopRight).distance(GeoPoint::new(2., 2.)) < 1e-9);
		assert_eq!(utils.session.fsm_state(), EditToolFsmState::Ready);
		assert_eq!(utils.session.feature().unwrap().modify_geometry(), None);
		assert_eq!(utils.session.history().undo_depth(), 1);
	}

	#[test]
	fn modify_geometry_is_shown_until_release() {
		let mut utils = SessionTestUtils::with_square();
		let from = utils.corner_pixel(Corner::BottomLeft);
		utils.left_mousedown(from, ModifierKeys::empty());
		assert_eq!(utils.session.fsm_state(), EditToolFsmState::Modifying);

		utils.move_mouse(utils.pixel(GeoPoint::new(-3., -3.)), ModifierKeys::empty(), MouseKeys::LEFT);
		assert_eq!(utils.geometry(), square());
		assert!(utils.session.feature().unwrap().modify_geometry().is_some());
		assert!(matches!(utils.responses.back(), Some(FrontendMessage::UpdatePolygon { modifying: true, .. })));
	}

	#[test]
	fn undo_and_redo_a_translation() {
		let mut utils = SessionTestUtils::with_square();
		let before = utils.geometry().to_wkt();
		let from = utils.pixel(GeoPoint::ZERO);

		utils.drag(from, from + DVec2::new(20., 10.), ModifierKeys::empty());
		let after = utils.geometry().to_wkt();
		assert_ne!(before, after);
		assert!(utils.geometry().corner_mean().x > 0.);

		utils.press(Key::KeyZ, ModifierKeys::CONTROL);
		assert_eq!(utils.geometry().to_wkt(), before);
		let placement = utils.session.overlay().current().unwrap().placement;
		assert!(placement.position.distance(utils.geometry().corner_mean()) < 1e-12);

		utils.press(Key::KeyZ, ModifierKeys::CONTROL | ModifierKeys::SHIFT);
		assert_eq!(utils.geometry().to_wkt(), after);
		let placement = utils.session.overlay().current().unwrap().placement;
		assert!(placement.position.distance(utils.geometry().corner_mean()) < 1e-12);

		utils.press(Key::KeyZ, ModifierKeys::CONTROL);
		utils.press(Key::KeyY, ModifierKeys::CONTROL);
		assert_eq!(utils.geometry().to_wkt(), after);
	}

	#[test]
	fn undo_without_history_does_nothing() {
		let mut utils = SessionTestUtils::with_square();
		utils.press(Key::KeyZ, ModifierKeys::CONTROL);
		utils.handle_message(SessionMessage::Redo);
		assert_eq!(utils.geometry(), square());
	}

	#[test]
	fn new_edit_clears_redo() {
		let mut utils = SessionTestUtils::with_square();
		let center = utils.pixel(GeoPoint::ZERO);
		utils.drag(center, center + DVec2::new(5., 0.), ModifierKeys::empty());
		utils.handle_message(SessionMessage::Undo);
		assert!(utils.session.history().can_redo());

		utils.drag(center, center + DVec2::new(0., 5.), ModifierKeys::empty());
		assert!(!utils.session.history().can_redo());
	}

	#[test]
	fn escape_restores_the_geometry_and_history() {
		let mut utils = SessionTestUtils::with_square();
		let from = utils.corner_pixel(Corner::TopLeft);
		utils.left_mousedown(from, ModifierKeys::empty());
		utils.move_mouse(utils.pixel(GeoPoint::new(-4., 2.)), ModifierKeys::empty(), MouseKeys::LEFT);

		utils.press(Key::Escape, ModifierKeys::empty());

		assert_eq!(utils.session.fsm_state(), EditToolFsmState::Ready);
		assert_eq!(utils.geometry(), square());
		assert_eq!(utils.session.feature().unwrap().modify_geometry(), None);
		assert_eq!(utils.session.history().undo_depth(), 0);
		assert!(utils.session.overlay().current().is_some());

		// Releasing the button afterwards must not commit anything
		utils.mouseup(from, ModifierKeys::empty());
		assert_eq!(utils.geometry(), square());
	}

	#[test]
	fn pointer_cancel_aborts_a_translation() {
		let mut utils = SessionTestUtils::with_square();
		let center = utils.pixel(GeoPoint::ZERO);
		utils.left_mousedown(center, ModifierKeys::empty());
		utils.move_mouse(center + DVec2::new(30., 30.), ModifierKeys::empty(), MouseKeys::LEFT);
		assert_ne!(utils.geometry(), square());

		utils.handle_message(SessionMessage::PointerCancel);
		assert_eq!(utils.geometry(), square());
		assert!(!utils.session.history().can_undo());
	}

	#[test]
	fn platform_modifier_alone_does_not_modify() {
		let mut utils = SessionTestUtils::with_square();
		let corner = utils.corner_pixel(Corner::TopRight);
		utils.left_mousedown(corner + DVec2::new(-3., 3.), ModifierKeys::CONTROL);
		assert_eq!(utils.session.fsm_state(), EditToolFsmState::Translating);
	}

	#[test]
	fn batch_edits_defer_the_overlay_refresh() {
		let mut utils = SessionTestUtils::with_square();
		assert!(utils.session.overlay().current().is_some());
		let center = utils.pixel(GeoPoint::ZERO);

		utils.drag(center, center + DVec2::new(10., 0.), ModifierKeys::CONTROL);
		utils.drag(center, center + DVec2::new(0., 10.), ModifierKeys::CONTROL);
		assert!(utils.session.overlay().current().is_none());
		assert!(utils.session.is_overlay_stale());
		assert_eq!(utils.session.history().undo_depth(), 2);

		utils.handle_message(SessionMessage::KeyUp {
			key: Key::Control,
			modifier_keys: ModifierKeys::empty(),
		});
		assert!(!utils.session.is_overlay_stale());
		let placement = utils.session.overlay().current().unwrap().placement;
		assert!(placement.position.distance(utils.geometry().corner_mean()) < 1e-12);
	}

	#[test]
	fn zoom_refreshes_the_overlay_once_after_the_last_event() {
		let mut utils = SessionTestUtils::with_square();
		utils.take_responses();

		utils.handle_message(SessionMessage::Zoom { zoom: 8. });
		assert!(utils.session.overlay().current().is_none());
		utils.advance(Duration::from_millis(100));
		utils.handle_message(SessionMessage::Zoom { zoom: 9. });
		utils.advance(Duration::from_millis(100));
		assert_eq!(overlay_updates(&utils.take_responses()), 0);

		utils.advance(Duration::from_millis(100));
		utils.advance(Duration::from_millis(500));
		assert_eq!(overlay_updates(&utils.take_responses()), 1);

		let overlay = utils.session.overlay().current().unwrap();
		assert_close(overlay.placement.width, 2. / utils.session.view().resolution());
	}

	#[test]
	fn zoom_during_a_batch_edit_is_deferred() {
		let mut utils = SessionTestUtils::with_square();
		utils.handle_message(SessionMessage::KeyDown {
			key: Key::Control,
			modifier_keys: ModifierKeys::CONTROL,
		});
		utils.handle_message(SessionMessage::Zoom { zoom: 8. });
		utils.advance(Duration::from_secs(1));
		assert!(utils.session.is_overlay_stale());
	}

	#[test]
	fn cursor_follows_the_hover_target() {
		let mut utils = SessionTestUtils::with_square();
		let last_cursor = |utils: &SessionTestUtils| {
			utils.responses.iter().rev().find_map(|message| match message {
				FrontendMessage::UpdateMouseCursor { cursor } => Some(*cursor),
				_ => None,
			})
		};

		utils.move_mouse(utils.corner_pixel(Corner::BottomRight), ModifierKeys::empty(), MouseKeys::NONE);
		assert_eq!(last_cursor(&utils), Some(MouseCursorIcon::SEResize));

		utils.move_mouse(utils.pixel(GeoPoint::ZERO), ModifierKeys::empty(), MouseKeys::NONE);
		assert_eq!(last_cursor(&utils), Some(MouseCursorIcon::Move));

		utils.move_mouse(DVec2::new(5., 5.), ModifierKeys::empty(), MouseKeys::NONE);
		assert_eq!(last_cursor(&utils), Some(MouseCursorIcon::Grab));

		utils.left_mousedown(DVec2::new(5., 5.), ModifierKeys::empty());
		assert_eq!(last_cursor(&utils), Some(MouseCursorIcon::Grabbing));
	}

	#[test]
	fn dragging_outside_pans_the_map() {
		let mut utils = SessionTestUtils::with_square();
		let center = utils.session.view().center;
		let resolution = utils.session.view().resolution();

		utils.drag(DVec2::new(5., 5.), DVec2::new(15., 25.), ModifierKeys::empty());

		let moved = utils.session.view().center;
		assert_close(moved.x, center.x - 10. * resolution);
		assert_close(moved.y, center.y + 20. * resolution);
		assert_eq!(utils.geometry(), square());
		assert!(!utils.session.history().can_undo());
	}

	#[test]
	fn open_builds_from_the_selection_and_recenter_moves_it() {
		let _ = env_logger::builder().is_test(true).try_init();
		let mut session = EditingSession::default();
		let mut responses = VecDeque::new();
		let node = ExtractedNode::new("1:2", "Box", "RECTANGLE", PixelRect::new(0., 0., 100., 50.));

		session.open(vec![node], None, &mut responses).unwrap();
		assert!(session.is_open());
		assert_eq!(session.geometry().unwrap().corner(Corner::TopLeft), geoframe_document::DEFAULT_CENTER);
		assert_eq!(session.view().center, session.geometry().unwrap().extent_center());
		assert!(session.overlay().current().is_none());

		let seoul_station = GeoPoint::new(126.9707, 37.5547);
		session.recenter(seoul_station, &mut responses);
		assert_eq!(session.geometry().unwrap().corner(Corner::TopLeft), seoul_station);
		assert!(!session.history().can_undo());

		let ring = session.polygon_coordinates().unwrap();
		assert_eq!(ring[0], ring[4]);
	}

	#[test]
	fn recenter_without_a_selection_pans() {
		let mut session = EditingSession::default();
		let mut responses = VecDeque::new();
		session.recenter(GeoPoint::new(2.35, 48.85), &mut responses);
		assert_eq!(session.view().center, GeoPoint::new(2.35, 48.85));
		assert!(!session.is_open());
	}

	#[test]
	fn selection_without_area_opens_nothing() {
		let mut session = EditingSession::default();
		let mut responses = VecDeque::new();
		let node = ExtractedNode::new("1:2", "Dot", "RECTANGLE", PixelRect::new(0., 0., 0., 0.));

		session.open(vec![node], Some(SvgPayload::from("<svg/>".to_string())), &mut responses).unwrap();

		assert!(!session.is_open());
		assert!(session.polygon_coordinates().is_none());
		assert!(!responses.iter().any(|message| matches!(message, FrontendMessage::UpdatePolygon { .. } | FrontendMessage::UpdateOverlay { .. })));
	}

	#[test]
	fn selection_without_area_closes_an_open_session() {
		let mut utils = SessionTestUtils::with_square();
		let node = ExtractedNode::new("1", "Line", "LINE", PixelRect::new(0., 0., 40., 0.));

		utils.session.open(vec![node], None, &mut utils.responses).unwrap();
		assert!(!utils.session.is_open());
		assert!(utils.take_responses().contains(&FrontendMessage::ClearPolygon));
	}

	#[test]
	fn malformed_selection_leaves_the_session_unchanged() {
		let mut utils = SessionTestUtils::with_square();
		let node = ExtractedNode {
			geometry: Some("POLYGON((1 2, 3".into()),
			..ExtractedNode::new("1", "Lot", "FRAME", PixelRect::new(0., 0., 1., 1.))
		};

		assert!(utils.session.open(vec![node], None, &mut utils.responses).is_err());
		assert_eq!(utils.geometry(), square());
	}

	#[test]
	fn empty_selection_and_dispose_close_the_session() {
		let mut utils = SessionTestUtils::with_square();
		utils.session.open(Vec::new(), None, &mut utils.responses).unwrap();
		assert!(!utils.session.is_open());
		assert!(utils.session.overlay().current().is_none());
		assert!(utils.take_responses().contains(&FrontendMessage::ClearPolygon));

		let mut utils = SessionTestUtils::with_square();
		utils.handle_message(SessionMessage::Zoom { zoom: 9. });
		utils.session.dispose(&mut utils.responses);
		utils.advance(Duration::from_secs(1));
		assert!(utils.session.polygon_coordinates().is_none());
		assert_eq!(overlay_updates(&utils.take_responses()), 1);
	}
}
