//! The people-search provider behind the proxy routes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use tracing::debug;

use super::error::UpstreamError;
use crate::config::Credentials;
use crate::filters::FilterCategory;

pub const KEY_HEADER: &str = "x-rapidapi-key";
pub const HOST_HEADER: &str = "x-rapidapi-host";

#[async_trait]
pub trait Upstream: Send + Sync {
	/// Forward an already trimmed query and return the provider's JSON body.
	async fn lookup(&self, category: FilterCategory, query: &str) -> Result<Value, UpstreamError>;
}

pub struct RapidApi {
	http: reqwest::Client,
	base_url: String,
}

impl RapidApi {
	pub fn new(
		base_url: impl Into<String>,
		credentials: &Credentials,
		timeout: Duration,
	) -> anyhow::Result<Self> {
		let mut headers = HeaderMap::new();
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		let mut key = HeaderValue::from_str(&credentials.api_key)
			.map_err(|_| anyhow::anyhow!("{} contains invalid header characters", Credentials::KEY_VAR))?;
		key.set_sensitive(true);
		headers.insert(KEY_HEADER, key);
		headers.insert(
			HOST_HEADER,
			HeaderValue::from_str(&credentials.api_host).map_err(|_| {
				anyhow::anyhow!("{} contains invalid header characters", Credentials::HOST_VAR)
			})?,
		);

		let http = reqwest::Client::builder()
			.default_headers(headers)
			.timeout(timeout)
			.build()?;
		Ok(Self {
			http,
			base_url: base_url.into().trim_end_matches('/').to_string(),
		})
	}

	fn endpoint(&self, category: FilterCategory) -> String {
		format!("{}/{}", self.base_url, category.endpoint())
	}
}

#[async_trait]
impl Upstream for RapidApi {
	async fn lookup(&self, category: FilterCategory, query: &str) -> Result<Value, UpstreamError> {
		let url = self.endpoint(category);
		debug!(%category, %url, "forwarding filter lookup");
		let response = self
			.http
			.post(&url)
			.json(&json!({ "query": query }))
			.send()
			.await
			.map_err(|err| UpstreamError::Transport(err.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			return Err(UpstreamError::Status(status.as_u16()));
		}

		let body = response
			.bytes()
			.await
			.map_err(|err| UpstreamError::Transport(err.to_string()))?;
		serde_json::from_slice(&body).map_err(|err| UpstreamError::Parse(err.to_string()))
	}
}
