//! Failure taxonomy for the graph pipeline.

use thiserror::Error;

use crate::graph::layout::LayoutError;

/// Message shown for a start id that is not an unsigned 32-bit integer.
pub const INVALID_START_ID: &str = "Invalid Song ID";

/// Everything that can go wrong between a route parameter and a laid-out scene.
#[derive(Debug, Error)]
pub enum GraphError {
	/// The start id is negative, too large or not a number.
	#[error("Invalid Song ID")]
	InvalidStartId {
		/// Raw route parameter as received.
		input: String,
	},
	/// The API answered with a non-success status; the body text is the message.
	#[error("{message}")]
	Remote {
		/// HTTP status code.
		status: u16,
		/// Response body, verbatim.
		message: String,
	},
	/// The request never produced a response.
	#[error("{0}")]
	Transport(#[from] reqwest::Error),
	/// A success response that does not describe a consistent graph.
	#[error("malformed graph payload: {0}")]
	MalformedPayload(String),
	/// The layout engine rejected the graph.
	#[error(transparent)]
	Layout(#[from] LayoutError),
}

impl GraphError {
	/// HTTP status associated with the failure, when there is one.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Remote { status, .. } => Some(*status),
			Self::Transport(err) => err.status().map(|s| s.as_u16()),
			_ => None,
		}
	}
}

impl From<serde_json::Error> for GraphError {
	fn from(err: serde_json::Error) -> Self {
		Self::MalformedPayload(err.to_string())
	}
}

/// Terminal failure value handed to the view layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
	/// HTTP status, shown ahead of the message when known.
	pub status: Option<u16>,
	/// Human readable message.
	pub message: String,
}

impl Failure {
	/// A failure without an associated status code.
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			status: None,
			message: message.into(),
		}
	}
}

impl From<GraphError> for Failure {
	fn from(err: GraphError) -> Self {
		Self {
			status: err.status(),
			message: err.to_string(),
		}
	}
}

impl std::fmt::Display for Failure {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.status {
			Some(status) => write!(f, "{status} {}", self.message),
			None => f.write_str(&self.message),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn remote_error_keeps_body_verbatim() {
		let failure = Failure::from(GraphError::Remote {
			status: 404,
			message: "not found".into(),
		});
		assert_eq!(failure.status, Some(404));
		assert_eq!(failure.message, "not found");
		assert_eq!(failure.to_string(), "404 not found");
	}

	#[test]
	fn invalid_start_id_has_fixed_message() {
		let failure = Failure::from(GraphError::InvalidStartId { input: "-1".into() });
		assert_eq!(failure, Failure::new(INVALID_START_ID));
	}

	#[test]
	fn layout_error_is_transparent() {
		let err = GraphError::from(LayoutError::UnknownNode { id: "7".into() });
		assert_eq!(err.to_string(), "edge references unknown node 7");
		assert_eq!(err.status(), None);
	}
}
