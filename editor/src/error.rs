use geoframe_document::DocumentError;

use thiserror::Error;

/// The error type used by the Geoframe editor.
#[derive(Debug, Error)]
pub enum EditorError {
	#[error("The operation caused a document error:\n{0}")]
	Document(#[from] DocumentError),

	#[error("The request failed:\n{0}")]
	Http(String),

	#[error("The request timed out:\n{0}")]
	Timeout(String),

	#[error("The host did not answer as expected:\n{0}")]
	Bridge(String),

	#[error("Could not read the preferences:\n{0}")]
	Preferences(String),

	#[error("{0}")]
	Misc(String),
}

macro_rules! derive_from {
	($type:ty, $kind:ident) => {
		impl From<$type> for EditorError {
			fn from(error: $type) -> Self {
				EditorError::$kind(format!("{error}"))
			}
		}
	};
}

derive_from!(&str, Misc);
derive_from!(String, Misc);
derive_from!(ron::error::SpannedError, Preferences);
derive_from!(ron::Error, Preferences);
derive_from!(url::ParseError, Http);

impl From<reqwest::Error> for EditorError {
	fn from(error: reqwest::Error) -> Self {
		if error.is_timeout() { EditorError::Timeout(error.to_string()) } else { EditorError::Http(error.to_string()) }
	}
}

