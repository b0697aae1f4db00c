//! The message protocol between the map UI and the design tool host, and an async client for it.

use crate::EditorError;
use crate::overlay::SvgPayload;

use futures::StreamExt;
use futures::channel::mpsc;
use geoframe_document::canvas::{CanvasNode, coordinates_layer};
use geoframe_document::interchange::attach_polygon;
use geoframe_document::node::ExtractedNode;
use geoframe_document::{GeoPoint, GeoPolygon};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Sent by the UI to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum HostRequest {
	GetNodes,
	CreateNodes {
		coordinates: Vec<GeoPoint>,
		svg: Option<SvgPayload>,
		#[serde(default)]
		nodes: Vec<CanvasNode>,
	},
}

/// Sent by the host to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum HostResponse {
	SelectedNodes {
		nodes: Vec<ExtractedNode>,
		#[serde(default)]
		svg: Option<SvgPayload>,
		#[serde(default)]
		file_key: Option<String>,
	},
	/// Older hosts answer `get-nodes` with the bare node list.
	Nodes { nodes: Vec<ExtractedNode> },
	HideLoading,
	Error { message: String },
}

impl HostResponse {
	pub fn from_json(text: &str) -> Result<Self, EditorError> {
		serde_json::from_str(text).map_err(|err| EditorError::Bridge(format!("unreadable host message: {err}")))
	}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionPayload {
	pub nodes: Vec<ExtractedNode>,
	pub svg: Option<SvgPayload>,
	pub file_key: Option<String>,
}

/// Everything the host needs to write a committed polygon back onto the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateNodesPayload {
	pub coordinates: Vec<GeoPoint>,
	pub svg: Option<SvgPayload>,
	pub nodes: Vec<CanvasNode>,
}

impl CreateNodesPayload {
	/// Recreates the first selected node with `polygon` attached, followed by its Coordinates Layer.
	pub fn new(polygon: &GeoPolygon, selection: &[ExtractedNode], svg: Option<SvgPayload>) -> Result<Self, EditorError> {
		let mut nodes = Vec::new();
		if let Some(first) = selection.first() {
			let mut annotated = first.clone();
			attach_polygon(&mut annotated, *polygon);
			nodes.push(CanvasNode::from_extracted(&annotated)?);
			nodes.push(CanvasNode::from_extracted(&coordinates_layer(polygon, first.rect()))?);
		}

		Ok(Self {
			coordinates: polygon.ring().to_vec(),
			svg,
			nodes,
		})
	}

	pub fn into_request(self) -> HostRequest {
		HostRequest::CreateNodes {
			coordinates: self.coordinates,
			svg: self.svg,
			nodes: self.nodes,
		}
	}
}

/// Request/response access to the design tool host.
pub trait HostBridge {
	/// Asks the host for the current selection.
	fn request_selection(&mut self) -> impl Future<Output = Result<SelectionPayload, EditorError>>;

	/// Hands the nodes to the host and waits until it has created them.
	fn send_nodes(&mut self, payload: CreateNodesPayload) -> impl Future<Output = Result<(), EditorError>>;
}

/// A [`HostBridge`] over in-process channels. The other ends are held by a [`HostEndpoint`].
#[derive(Debug)]
pub struct LocalHostBridge {
	requests: mpsc::UnboundedSender<HostRequest>,
	responses: mpsc::UnboundedReceiver<HostResponse>,
}

/// The host's side of a [`LocalHostBridge`].
#[derive(Debug)]
pub struct HostEndpoint {
	pub requests: mpsc::UnboundedReceiver<HostRequest>,
	pub responses: mpsc::UnboundedSender<HostResponse>,
}

impl HostEndpoint {
	pub fn respond(&self, response: HostResponse) -> Result<(), EditorError> {
		self.responses.unbounded_send(response).map_err(|err| EditorError::Bridge(err.to_string()))
	}
}

impl LocalHostBridge {
	pub fn new() -> (Self, HostEndpoint) {
		let (request_sender, request_receiver) = mpsc::unbounded();
		let (response_sender, response_receiver) = mpsc::unbounded();

		let bridge = Self {
			requests: request_sender,
			responses: response_receiver,
		};
		let endpoint = HostEndpoint {
			requests: request_receiver,
			responses: response_sender,
		};
		(bridge, endpoint)
	}

	fn send(&self, request: HostRequest) -> Result<(), EditorError> {
		self.requests.unbounded_send(request).map_err(|err| EditorError::Bridge(err.to_string()))
	}

	async fn next_response(&mut self) -> Result<HostResponse, EditorError> {
		self.responses.next().await.ok_or_else(|| EditorError::Bridge("the host closed the connection".into()))
	}
}

impl HostBridge for LocalHostBridge {
	async fn request_selection(&mut self) -> Result<SelectionPayload, EditorError> {
		self.send(HostRequest::GetNodes)?;

		loop {
			match self.next_response().await? {
				HostResponse::SelectedNodes { nodes, svg, file_key } => return Ok(SelectionPayload { nodes, svg, file_key }),
				HostResponse::Nodes { nodes } => return Ok(SelectionPayload { nodes, ..Default::default() }),
				HostResponse::Error { message } => return Err(EditorError::Bridge(message)),
				HostResponse::HideLoading => trace!("Ignoring hide-loading while waiting for the selection"),
			}
		}
	}

	async fn send_nodes(&mut self, payload: CreateNodesPayload) -> Result<(), EditorError> {
		debug!("Sending {} nodes to the host", payload.nodes.len());
		self.send(payload.into_request())?;

		loop {
			match self.next_response().await? {
				HostResponse::HideLoading => return Ok(()),
				HostResponse::Error { message } => return Err(EditorError::Bridge(message)),
				other => trace!("Ignoring {other:?} while waiting for the nodes to be created"),
			}
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::test_utils::square;
	use futures::executor::block_on;
	use geoframe_document::COORDINATES_LAYER_NAME;
	use geoframe_document::transform::PixelRect;
	use pretty_assertions::assert_eq;
	use serde_json::json;

	fn rectangle() -> ExtractedNode {
		ExtractedNode::new("1:2", "Lot", "RECTANGLE", PixelRect::new(0., 0., 100., 50.))
	}

	#[test]
	fn requests_use_the_host_wire_format() {
		assert_eq!(serde_json::to_value(HostRequest::GetNodes).unwrap(), json!({ "type": "get-nodes" }));

		let request = CreateNodesPayload::new(&square(), &[], None).unwrap().into_request();
		let value = serde_json::to_value(request).unwrap();
		assert_eq!(value["type"], "create-nodes");
		assert_eq!(value["coordinates"][0], json!([-1.0, 1.0]));
		assert_eq!(value["coordinates"].as_array().unwrap().len(), 5);
	}

	#[test]
	fn selected_nodes_are_read_from_the_wire() {
		let text = r#"{ "type": "selected-nodes", "fileKey": "abc", "svg": "PHN2Zy8+",
			"nodes": [{ "id": 12, "name": "Lot", "type": "FRAME", "x": 0, "y": 0, "width": 10, "height": 20, "children": [] }] }"#;

		let HostResponse::SelectedNodes { nodes, svg, file_key } = HostResponse::from_json(text).unwrap() else {
			panic!("expected selected nodes");
		};
		assert_eq!(nodes[0].id, "12");
		assert_eq!(svg.unwrap().bytes(), b"<svg/>");
		assert_eq!(file_key.as_deref(), Some("abc"));
	}

	#[test]
	fn unknown_message_is_a_bridge_error() {
		assert!(matches!(HostResponse::from_json(r#"{ "type": "teleport" }"#), Err(EditorError::Bridge(_))));
	}

	#[test]
	fn payload_recreates_the_node_and_its_coordinates_layer() {
		let payload = CreateNodesPayload::new(&square(), &[rectangle()], None).unwrap();

		assert_eq!(payload.coordinates, square().ring().to_vec());
		assert_eq!(payload.nodes.len(), 2);
		assert_eq!(payload.nodes[0].name(), "Lot");
		assert_eq!(payload.nodes[1].name(), COORDINATES_LAYER_NAME);
		assert_eq!(payload.nodes[1].children().len(), 4);
	}

	#[test]
	fn unsupported_selection_cannot_be_sent_back() {
		let sticky = ExtractedNode::new("1", "Note", "STICKY", PixelRect::new(0., 0., 1., 1.));
		assert!(matches!(CreateNodesPayload::new(&square(), &[sticky], None), Err(EditorError::Document(_))));
	}

	#[test]
	fn request_selection_round_trip() {
		let (mut bridge, mut endpoint) = LocalHostBridge::new();
		endpoint.respond(HostResponse::HideLoading).unwrap();
		endpoint
			.respond(HostResponse::SelectedNodes {
				nodes: vec![rectangle()],
				svg: None,
				file_key: Some("abc".into()),
			})
			.unwrap();

		let selection = block_on(bridge.request_selection()).unwrap();
		assert_eq!(selection.nodes, vec![rectangle()]);
		assert_eq!(selection.file_key.as_deref(), Some("abc"));
		assert_eq!(block_on(endpoint.requests.next()), Some(HostRequest::GetNodes));
	}

	#[test]
	fn legacy_nodes_response_is_accepted() {
		let (mut bridge, endpoint) = LocalHostBridge::new();
		endpoint.respond(HostResponse::Nodes { nodes: vec![rectangle()] }).unwrap();

		let selection = block_on(bridge.request_selection()).unwrap();
		assert_eq!(selection.nodes.len(), 1);
		assert_eq!(selection.svg, None);
	}

	#[test]
	fn send_nodes_waits_for_hide_loading() {
		let (mut bridge, mut endpoint) = LocalHostBridge::new();
		endpoint.respond(HostResponse::HideLoading).unwrap();

		let payload = CreateNodesPayload::new(&square(), &[rectangle()], None).unwrap();
		block_on(bridge.send_nodes(payload.clone())).unwrap();
		assert_eq!(block_on(endpoint.requests.next()), Some(payload.into_request()));
	}

	#[test]
	fn host_errors_and_hang_ups_surface() {
		let (mut bridge, endpoint) = LocalHostBridge::new();
		endpoint.respond(HostResponse::Error { message: "No selection".into() }).unwrap();
		assert!(matches!(block_on(bridge.request_selection()), Err(EditorError::Bridge(message)) if message == "No selection"));

		drop(endpoint);
		assert!(matches!(block_on(bridge.send_nodes(CreateNodesPayload::new(&square(), &[], None).unwrap())), Err(EditorError::Bridge(_))));
	}
}
