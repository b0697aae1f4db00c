use crate::EditorError;
use crate::consts::{CORNER_THRESHOLD_PX, DEFAULT_ZOOM, FILE_API_BASE_URL, GEOCODING_BASE_URL, HTTP_TIMEOUT_SECS, MAX_HISTORY_DEPTH, ZOOM_DEBOUNCE_MS};

use geoframe_document::transform::DEGREES_PER_PIXEL;
use geoframe_document::{DEFAULT_CENTER, GeoPoint};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// User-tunable settings, stored as RON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorPreferences {
	/// Where pixel rectangles are anchored and the map opens when nothing is selected.
	pub default_center: GeoPoint,
	pub initial_zoom: f64,
	pub corner_threshold: f64,
	pub degrees_per_pixel: f64,
	pub zoom_debounce_ms: u64,
	pub max_history_depth: usize,
	pub file_api_base_url: String,
	pub geocoding_base_url: String,
	pub http_timeout_secs: u64,
	pub file_api_token: Option<String>,
}

impl Default for EditorPreferences {
	fn default() -> Self {
		Self {
			default_center: DEFAULT_CENTER,
			initial_zoom: DEFAULT_ZOOM,
			corner_threshold: CORNER_THRESHOLD_PX,
			degrees_per_pixel: DEGREES_PER_PIXEL,
			zoom_debounce_ms: ZOOM_DEBOUNCE_MS,
			max_history_depth: MAX_HISTORY_DEPTH,
			file_api_base_url: FILE_API_BASE_URL.into(),
			geocoding_base_url: GEOCODING_BASE_URL.into(),
			http_timeout_secs: HTTP_TIMEOUT_SECS,
			file_api_token: None,
		}
	}
}

impl EditorPreferences {
	pub fn from_ron(text: &str) -> Result<Self, EditorError> {
		Ok(ron::from_str(text)?)
	}

	pub fn to_ron(&self) -> Result<String, EditorError> {
		Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
	}

	pub fn load(path: &Path) -> Result<Self, EditorError> {
		let text = std::fs::read_to_string(path).map_err(|err| EditorError::Preferences(format!("{}: {err}", path.display())))?;
		let preferences = Self::from_ron(&text)?;
		info!("Loaded preferences from {}", path.display());
		Ok(preferences)
	}

	pub fn zoom_debounce(&self) -> Duration {
		Duration::from_millis(self.zoom_debounce_ms)
	}

	pub fn http_timeout(&self) -> Duration {
		Duration::from_secs(self.http_timeout_secs)
	}
}
