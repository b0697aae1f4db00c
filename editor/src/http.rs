//! Blocking clients for the design-file API and the geocoding search, each with an explicit timeout.

use crate::EditorError;
use crate::consts::{FILE_API_TOKEN_HEADER, USER_AGENT};
use crate::preferences::EditorPreferences;

use geoframe_document::GeoPoint;
use geoframe_document::interchange::json::nodes_from_file_api;
use geoframe_document::node::ExtractedNode;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

fn build_client(preferences: &EditorPreferences) -> Result<Client, EditorError> {
	Ok(Client::builder().user_agent(USER_AGENT).timeout(preferences.http_timeout()).build()?)
}

fn parse_base_url(base: &str) -> Result<Url, EditorError> {
	// A base without a trailing slash would lose its last path segment when joined
	let mut url = Url::parse(base)?;
	if !url.path().ends_with('/') {
		url.set_path(&format!("{}/", url.path()));
	}
	Ok(url)
}

fn check_status(response: Response) -> Result<Response, EditorError> {
	let status = response.status();
	if status.is_success() {
		return Ok(response);
	}
	let body = response.text().unwrap_or_default();
	Err(EditorError::Http(format!("{status}: {}", body.trim())))
}

/// Reads node documents from the design tool's REST API.
#[derive(Debug, Clone)]
pub struct FileApiClient {
	client: Client,
	base_url: Url,
	token: String,
}

impl FileApiClient {
	pub fn new(preferences: &EditorPreferences) -> Result<Self, EditorError> {
		let token = preferences.file_api_token.clone().filter(|token| !token.is_empty()).ok_or_else(|| EditorError::Misc("no file API token is configured".into()))?;

		Ok(Self {
			client: build_client(preferences)?,
			base_url: parse_base_url(&preferences.file_api_base_url)?,
			token,
		})
	}

	/// `{base}/v1/files/{file_key}/nodes?ids=..&geometry=paths`
	pub fn nodes_url(&self, file_key: &str, ids: &[String]) -> Result<Url, EditorError> {
		let mut url = self.base_url.join("v1/files/")?;
		url.path_segments_mut().map_err(|_| EditorError::Http(format!("{} cannot be a base URL", self.base_url)))?.pop_if_empty().push(file_key).push("nodes");
		url.query_pairs_mut().append_pair("ids", &ids.join(",")).append_pair("geometry", "paths");
		Ok(url)
	}

	/// The raw `nodes` response, suitable for augmenting and saving.
	pub fn fetch_nodes(&self, file_key: &str, ids: &[String]) -> Result<Value, EditorError> {
		let url = self.nodes_url(file_key, ids)?;
		info!("Fetching {} nodes from {url}", ids.len());

		let response = self.client.get(url).header(FILE_API_TOKEN_HEADER, &self.token).send()?;
		Ok(check_status(response)?.json()?)
	}

	pub fn fetch_extracted_nodes(&self, file_key: &str, ids: &[String]) -> Result<Vec<ExtractedNode>, EditorError> {
		Ok(nodes_from_file_api(&self.fetch_nodes(file_key, ids)?)?)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeocodingResult {
	pub display_name: String,
	pub location: GeoPoint,
}

#[derive(Debug, Deserialize)]
struct Place {
	lat: String,
	lon: String,
	#[serde(default)]
	display_name: String,
}

/// Parses a search response, whose coordinates are strings. Only the first place is used.
pub fn parse_search_response(body: &str) -> Result<Option<GeocodingResult>, EditorError> {
	let places: Vec<Place> = serde_json::from_str(body).map_err(|err| EditorError::Http(format!("unexpected search response: {err}")))?;
	let Some(place) = places.into_iter().next() else { return Ok(None) };

	let coordinate = |text: &str| text.trim().parse::<f64>().map_err(|err| EditorError::Http(format!("bad coordinate `{text}`: {err}")));
	Ok(Some(GeocodingResult {
		location: GeoPoint::new(coordinate(&place.lon)?, coordinate(&place.lat)?),
		display_name: place.display_name,
	}))
}

/// Looks up free-text places.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
	client: Client,
	base_url: Url,
}

impl GeocodingClient {
	pub fn new(preferences: &EditorPreferences) -> Result<Self, EditorError> {
		Ok(Self {
			client: build_client(preferences)?,
			base_url: parse_base_url(&preferences.geocoding_base_url)?,
		})
	}

	/// `{base}/search?q=..&format=json&addressdetails=1&limit=1`
	pub fn search_url(&self, query: &str) -> Result<Url, EditorError> {
		let mut url = self.base_url.join("search")?;
		url.query_pairs_mut()
			.append_pair("q", query)
			.append_pair("format", "json")
			.append_pair("addressdetails", "1")
			.append_pair("limit", "1");
		Ok(url)
	}

	pub fn search(&self, query: &str) -> Result<Option<GeocodingResult>, EditorError> {
		let query = query.trim();
		if query.is_empty() {
			return Ok(None);
		}

		let url = self.search_url(query)?;
		debug!("Searching {url}");
		let body = check_status(self.client.get(url).send()?)?.text()?;
		let result = parse_search_response(&body)?;
		if result.is_none() {
			warn!("No place found for `{query}`");
		}
		Ok(result)
	}
}
