//! Reading and writing the simplified Well-Known-Text form `POLYGON((lon lat, lon lat, ...))`.

use crate::{DocumentError, GeoPoint};

const PREFIX: &str = "POLYGON";

/// Parses a simplified WKT polygon into its ordered coordinates.
pub fn parse_geometry(input: &str) -> Result<Vec<GeoPoint>, DocumentError> {
	let trimmed = input.trim();

	let body = trimmed
		.strip_prefix(PREFIX)
		.or_else(|| trimmed.get(..PREFIX.len()).filter(|prefix| prefix.eq_ignore_ascii_case(PREFIX)).map(|_| &trimmed[PREFIX.len()..]))
		.ok_or_else(|| DocumentError::parse(input, "expected `POLYGON`"))?
		.trim_start();

	let body = body
		.strip_prefix("((")
		.and_then(|rest| rest.trim_end().strip_suffix("))"))
		.ok_or_else(|| DocumentError::parse(input, "expected the ring to be wrapped in `((` and `))`"))?;

	if body.contains(['(', ')']) {
		return Err(DocumentError::parse(input, "only a single ring is supported"));
	}
	if body.trim().is_empty() {
		return Err(DocumentError::parse(input, "the ring has no coordinates"));
	}

	body.split(',').map(|pair| parse_pair(input, pair)).collect()
}

fn parse_pair(input: &str, pair: &str) -> Result<GeoPoint, DocumentError> {
	let mut numbers = pair.split_whitespace().map(|value| value.parse::<f64>().map_err(|err| DocumentError::parse(input, format!("`{value}` is not a number: {err}"))));

	match (numbers.next(), numbers.next(), numbers.next()) {
		(Some(lon), Some(lat), None) => Ok(GeoPoint::new(lon?, lat?)),
		_ => Err(DocumentError::parse(input, format!("`{}` is not a `lon lat` pair", pair.trim()))),
	}
}

/// Writes coordinates as a simplified WKT polygon. This is the inverse of [`parse_geometry`].
pub fn serialize_geometry(coordinates: &[GeoPoint]) -> String {
	let pairs = coordinates.iter().map(|point| format!("{} {}", point.x, point.y)).collect::<Vec<_>>().join(", ");
	format!("{PREFIX}(({pairs}))")
}
