use axum::{Json, body::Bytes, extract::State};
use serde_json::{Value, json};
use tracing::{info, warn};

use super::ProxyState;
use super::error::ProxyError;
use crate::filters::FilterCategory;

/// `POST /api/linkedin-filters/<slug>`: validate, forward, wrap.
pub async fn filter_handler(
	category: FilterCategory,
	State(state): State<ProxyState>,
	body: Bytes,
) -> Result<Json<Value>, ProxyError> {
	let query = extract_query(&body)?;
	let trimmed = query.trim();
	info!(%category, query = trimmed, "filter lookup");

	let data = state
		.upstream
		.lookup(category, trimmed)
		.await
		.map_err(|source| {
			warn!(%category, error = %source, "upstream lookup failed");
			ProxyError::Upstream { category, source }
		})?;

	Ok(Json(json!({
		"success": true,
		"data": data,
		"query": query,
	})))
}

pub async fn health_handler() -> Json<Value> {
	Json(json!({ "status": "ok" }))
}

fn extract_query(body: &[u8]) -> Result<String, ProxyError> {
	let payload: Value = serde_json::from_slice(body).map_err(|_| ProxyError::Validation)?;
	match payload.get("query") {
		Some(Value::String(query)) if !query.is_empty() => Ok(query.clone()),
		_ => Err(ProxyError::Validation),
	}
}
