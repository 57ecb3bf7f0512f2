use axum::{
	Json,
	http::StatusCode,
	response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::filters::FilterCategory;

pub const QUERY_REQUIRED: &str = "Query parameter is required and must be a string";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
	#[error("API request failed with status {0}")]
	Status(u16),

	#[error("API request failed: {0}")]
	Transport(String),

	#[error("invalid JSON from provider: {0}")]
	Parse(String),
}

#[derive(Error, Debug)]
pub enum ProxyError {
	#[error("Query parameter is required and must be a string")]
	Validation,

	#[error("{}", .category.failure_message())]
	Upstream {
		category: FilterCategory,
		#[source]
		source: UpstreamError,
	},
}

impl IntoResponse for ProxyError {
	fn into_response(self) -> Response {
		match &self {
			ProxyError::Validation => {
				(StatusCode::BAD_REQUEST, Json(json!({ "error": self.to_string() }))).into_response()
			}
			ProxyError::Upstream { source, .. } => (
				StatusCode::INTERNAL_SERVER_ERROR,
				Json(json!({
					"error": self.to_string(),
					"details": source.to_string(),
				})),
			)
				.into_response(),
		}
	}
}
