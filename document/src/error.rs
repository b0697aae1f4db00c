use thiserror::Error;

/// A set of different errors that can occur when using this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
	#[error("Failed to parse geometry `{input}`: {reason}")]
	Parse { input: String, reason: String },

	#[error("A polygon ring needs {expected} points but {found} were given")]
	InvalidRing { expected: usize, found: usize },

	#[error("Unsupported node type: {0}")]
	UnsupportedNodeType(String),

	#[error("The CSV file contained no rows")]
	EmptyCsv,

	#[error("Invalid CSV data: {0}")]
	Csv(String),

	#[error("Invalid JSON data: {0}")]
	Json(String),
}

impl DocumentError {
	pub(crate) fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::Parse {
			input: input.into(),
			reason: reason.into(),
		}
	}
}

impl From<csv::Error> for DocumentError {
	fn from(error: csv::Error) -> Self {
		DocumentError::Csv(error.to_string())
	}
}

impl From<serde_json::Error> for DocumentError {
	fn from(error: serde_json::Error) -> Self {
		DocumentError::Json(error.to_string())
	}
}
