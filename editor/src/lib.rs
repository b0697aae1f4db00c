//! Interactive editing of a design node's geographic footprint on a map.
//!
//! The crate is frontend agnostic: an [`EditingSession`](session::EditingSession) consumes [`SessionMessage`]s describing user
//! input and answers with [`FrontendMessage`]s describing what a map frontend should draw.

#[macro_use]
extern crate log;

pub mod bridge;
pub mod consts;
pub mod cursor;
pub mod debounce;
pub mod error;
pub mod feature;
pub mod history;
pub mod http;
pub mod input;
pub mod interaction;
pub mod map_view;
pub mod messages;
pub mod overlay;
pub mod preferences;
pub mod session;

#[cfg(test)]
pub mod test_utils;

pub use error::EditorError;
pub use messages::{FrontendMessage, SessionMessage};
