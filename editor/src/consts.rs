// MAP
/// Edge length of one web map tile in pixels.
pub const TILE_SIZE: f64 = 256.;
pub const DEFAULT_ZOOM: f64 = 19.;
pub const MIN_ZOOM: f64 = 0.;
pub const MAX_ZOOM: f64 = 28.;
pub const DEFAULT_VIEWPORT_SIZE: [f64; 2] = [800., 600.];

// INTERACTION
/// Screen distance within which a press grabs a corner instead of the polygon body.
pub const CORNER_THRESHOLD_PX: f64 = 10.;
/// A corner closer to the center than this fraction of the larger extent side cannot start a modify gesture.
pub const MIN_MODIFY_RADIUS_FRACTION: f64 = 1. / 3.;

// HISTORY
pub const MAX_HISTORY_DEPTH: usize = 100;

// OVERLAY
pub const ZOOM_DEBOUNCE_MS: u64 = 200;
pub const SVG_DATA_URL_PREAMBLE: &str = "data:image/svg+xml;base64,";

// NETWORK
pub const FILE_API_BASE_URL: &str = "https://api.figma.com";
pub const GEOCODING_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const FILE_API_TOKEN_HEADER: &str = "X-Figma-Token";
pub const HTTP_TIMEOUT_SECS: u64 = 20;
pub const USER_AGENT: &str = concat!("geoframe/", env!("CARGO_PKG_VERSION"));
