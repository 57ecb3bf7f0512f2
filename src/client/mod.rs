//! Typed access to the proxy routes.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

pub mod hook;

use crate::filters::FilterCategory;
pub use hook::{Lookup, LookupSource, LookupStatus, SuggestionService};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SuggestionError {
	#[error("Unsupported filter type: {0}")]
	Unsupported(FilterCategory),

	#[error("{0}")]
	Rejected(String),

	#[error("proxy unreachable: {0}")]
	Transport(String),

	#[error("unexpected response from proxy: {0}")]
	Parse(String),
}

/// Anything that can answer a suggestion query with raw provider records.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
	fn supports(&self, category: FilterCategory) -> bool;

	async fn fetch(&self, category: FilterCategory, query: &str) -> Result<Vec<Value>, SuggestionError>;
}

#[derive(Debug, Deserialize)]
struct Envelope {
	#[serde(default)]
	success: bool,
	#[serde(default)]
	data: Value,
	#[serde(default)]
	error: Option<String>,
}

#[derive(Clone)]
pub struct SuggestionClient {
	http: reqwest::Client,
	base_url: String,
	routes: BTreeSet<FilterCategory>,
}

impl SuggestionClient {
	pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

	/// A client with routes for every category.
	pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
		Self::with_timeout(base_url, Self::DEFAULT_TIMEOUT)
	}

	pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
		let http = reqwest::Client::builder().timeout(timeout).build()?;
		Ok(Self {
			http,
			base_url: base_url.into().trim_end_matches('/').to_string(),
			routes: FilterCategory::ALL.into_iter().collect(),
		})
	}

	/// Restrict the categories this client has routes for.
	#[must_use]
	pub fn with_routes(mut self, routes: impl IntoIterator<Item = FilterCategory>) -> Self {
		self.routes = routes.into_iter().collect();
		self
	}

	pub async fn job_titles(&self, query: &str) -> Result<Vec<Value>, SuggestionError> {
		self.suggestions(FilterCategory::JobTitle, query).await
	}

	pub async fn companies(&self, query: &str) -> Result<Vec<Value>, SuggestionError> {
		self.suggestions(FilterCategory::Company, query).await
	}

	pub async fn locations(&self, query: &str) -> Result<Vec<Value>, SuggestionError> {
		self.suggestions(FilterCategory::Location, query).await
	}

	pub async fn experience_levels(&self, query: &str) -> Result<Vec<Value>, SuggestionError> {
		self.suggestions(FilterCategory::Experience, query).await
	}

	pub async fn education(&self, query: &str) -> Result<Vec<Value>, SuggestionError> {
		self.suggestions(FilterCategory::Education, query).await
	}

	/// Raw provider records for `query`. Blank queries make no request.
	pub async fn suggestions(
		&self,
		category: FilterCategory,
		query: &str,
	) -> Result<Vec<Value>, SuggestionError> {
		if query.trim().is_empty() {
			return Ok(Vec::new());
		}
		if !self.routes.contains(&category) {
			return Err(SuggestionError::Unsupported(category));
		}

		let url = format!("{}/{}", self.base_url, category.slug());
		debug!(%category, %url, "requesting suggestions");
		let response = self
			.http
			.post(&url)
			.json(&json!({ "query": query }))
			.send()
			.await
			.map_err(|err| SuggestionError::Transport(err.to_string()))?;

		let status = response.status();
		let body = response
			.bytes()
			.await
			.map_err(|err| SuggestionError::Transport(err.to_string()))?;
		let envelope: Option<Envelope> = serde_json::from_slice(&body).ok();

		match envelope {
			Some(envelope) if status.is_success() && envelope.success => records(envelope.data),
			Some(Envelope {
				error: Some(message),
				..
			}) => Err(SuggestionError::Rejected(message)),
			_ => Err(SuggestionError::Rejected(category.failure_message())),
		}
	}
}

#[async_trait]
impl SuggestionSource for SuggestionClient {
	fn supports(&self, category: FilterCategory) -> bool {
		self.routes.contains(&category)
	}

	async fn fetch(&self, category: FilterCategory, query: &str) -> Result<Vec<Value>, SuggestionError> {
		self.suggestions(category, query).await
	}
}

/// The provider nests its list as `{"data": [...]}`; a bare list is accepted
/// too. A success without a list (a quota notice, `null`) is not an empty
/// result, so it surfaces as a parse error.
fn records(data: Value) -> Result<Vec<Value>, SuggestionError> {
	match data {
		Value::Array(items) => Ok(items),
		Value::Object(mut map) => match map.remove("data") {
			Some(Value::Array(items)) => Ok(items),
			Some(other) => Err(SuggestionError::Parse(format!(
				"expected a list under data, got {}",
				kind(&other)
			))),
			None => Err(SuggestionError::Parse(format!(
				"expected a list under data, got an object with keys {}",
				map.keys().cloned().collect::<Vec<_>>().join(", ")
			))),
		},
		other => Err(SuggestionError::Parse(format!(
			"expected a list of records, got {}",
			kind(&other)
		))),
	}
}

fn kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "a list",
		Value::Object(_) => "an object",
	}
}
