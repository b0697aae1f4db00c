use anyhow::{Context as _, Result, anyhow, bail};
use geoframe_document::builder::PolygonBuilder;
use geoframe_document::interchange::json::{NodeWithSvg, augment_with_polygon};
use geoframe_document::interchange::{attach_polygon, csv};
use geoframe_document::node::ExtractedNode;
use geoframe_document::transform::CanvasProjection;
use geoframe_document::{GeoPoint, GeoPolygon};
use geoframe_editor::bridge::CreateNodesPayload;
use geoframe_editor::http::{FileApiClient, GeocodingClient};
use geoframe_editor::overlay::SvgPayload;
use geoframe_editor::preferences::EditorPreferences;
use geoframe_editor::session::EditingSession;
use log::info;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

pub struct Context {
	pub preferences: EditorPreferences,
}

impl Context {
	pub fn load(config: Option<&Path>, center: Option<GeoPoint>) -> Result<Self> {
		let mut preferences = match config {
			Some(path) => EditorPreferences::load(path)?,
			None => EditorPreferences::default(),
		};
		if let Some(center) = center {
			preferences.default_center = center;
		}
		Ok(Self { preferences })
	}

	fn projection(&self) -> CanvasProjection {
		CanvasProjection::with_scale(self.preferences.default_center, self.preferences.degrees_per_pixel)
	}

	fn build_polygon(&self, nodes: &[ExtractedNode]) -> Result<GeoPolygon> {
		let built = PolygonBuilder::with_projection(self.projection()).build(nodes)?.ok_or_else(|| anyhow!("the selection is empty"))?;
		info!("Polygon built from {:?}", built.source);
		Ok(built.polygon)
	}
}

/// Nodes read from an exported file, with the SVG snapshot if the file carried one.
#[derive(Debug, Default, PartialEq)]
pub struct Selection {
	pub nodes: Vec<ExtractedNode>,
	pub svg: Option<String>,
}

pub fn parse_selection(text: &str, is_csv: bool) -> Result<Selection> {
	if is_csv {
		return Ok(Selection {
			nodes: csv::parse_csv(text)?,
			svg: None,
		});
	}

	if let Ok(envelope) = NodeWithSvg::parse(text) {
		return Ok(Selection {
			nodes: vec![envelope.parent_node],
			svg: Some(envelope.svg_string).filter(|svg| !svg.is_empty()),
		});
	}
	let nodes = serde_json::from_str(text).context("expected a `{parentNode, svgString}` envelope or an array of nodes")?;
	Ok(Selection { nodes, svg: None })
}

fn load_selection(path: &Path) -> Result<Selection> {
	let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
	let is_csv = path.extension().is_some_and(|extension| extension.eq_ignore_ascii_case("csv"));
	parse_selection(&text, is_csv).with_context(|| format!("parsing {}", path.display()))
}

fn load_svg(path: Option<&Path>, fallback: Option<String>) -> Result<Option<SvgPayload>> {
	match path {
		Some(path) => Ok(Some(SvgPayload::new(fs::read(path).with_context(|| format!("reading {}", path.display()))?))),
		None => Ok(fallback.map(SvgPayload::from)),
	}
}

fn write_or_return(output: Option<&Path>, text: String) -> Result<Option<String>> {
	let Some(path) = output else { return Ok(Some(text)) };
	fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
	info!("Wrote {}", path.display());
	Ok(None)
}

pub fn polygon(context: &Context, input: &Path, search: Option<&str>) -> Result<Option<String>> {
	let selection = load_selection(input)?;
	let mut session = EditingSession::new(context.preferences.clone());
	let mut responses = VecDeque::new();
	session.open(selection.nodes, None, &mut responses)?;

	if let Some(query) = search {
		let place = GeocodingClient::new(&context.preferences)?.search(query)?.ok_or_else(|| anyhow!("no place found for `{query}`"))?;
		info!("Moving the selection to {}", place.display_name);
		session.recenter(place.location, &mut responses);
	}

	let geometry = session.geometry().ok_or_else(|| anyhow!("the selection is empty"))?;
	Ok(Some(geometry.to_wkt()))
}

pub fn export_csv(context: &Context, input: &Path, output: Option<&Path>) -> Result<Option<String>> {
	let selection = load_selection(input)?;
	write_or_return(output, csv::export_csv(&selection.nodes, &context.projection())?)
}

pub fn export_json(context: &Context, input: &Path, output: Option<&Path>, svg: Option<&Path>) -> Result<Option<String>> {
	let selection = load_selection(input)?;
	let polygon = context.build_polygon(&selection.nodes)?;

	let Some(mut parent_node) = selection.nodes.into_iter().next() else { bail!("the selection is empty") };
	attach_polygon(&mut parent_node, polygon);

	let svg_string = match svg {
		Some(path) => fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?,
		None => selection.svg.unwrap_or_default(),
	};
	write_or_return(output, NodeWithSvg { parent_node, svg_string }.to_pretty_json()?)
}

pub fn search(context: &Context, query: &str) -> Result<Option<String>> {
	let result = GeocodingClient::new(&context.preferences)?.search(query)?;
	Ok(Some(match result {
		Some(place) => format!("{}, {}\t{}", place.location.x, place.location.y, place.display_name),
		None => format!("No place found for `{query}`"),
	}))
}

pub fn fetch_nodes(context: &Context, file_key: &str, ids: &[String], polygon: Option<&str>, output: Option<&Path>) -> Result<Option<String>> {
	let mut response = FileApiClient::new(&context.preferences)?.fetch_nodes(file_key, ids)?;

	if let Some(polygon) = polygon {
		let polygon = polygon.parse::<GeoPolygon>()?;
		let augmented = augment_with_polygon(&mut response, &polygon)?;
		info!("Stored the polygon on {augmented} documents");
	}
	write_or_return(output, serde_json::to_string_pretty(&response)?)
}

pub fn create_nodes(context: &Context, input: &Path, svg: Option<&Path>) -> Result<Option<String>> {
	let selection = load_selection(input)?;
	let polygon = context.build_polygon(&selection.nodes)?;
	let svg = load_svg(svg, selection.svg)?;

	let request = CreateNodesPayload::new(&polygon, &selection.nodes, svg)?.into_request();
	Ok(Some(serde_json::to_string_pretty(&request)?))
}
