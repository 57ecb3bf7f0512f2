//! Proxy service: one route per filter category in front of the provider.

use std::sync::Arc;

use axum::{
	Router,
	body::Bytes,
	extract::State,
	routing::{get, post},
};
use tokio::net::TcpListener;
use tokio::signal::{self, ctrl_c};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};

pub mod error;
pub mod routes;
pub mod upstream;

use crate::config::ROUTE_PREFIX;
use crate::filters::FilterCategory;
use routes::{filter_handler, health_handler};
pub use upstream::{RapidApi, Upstream};

#[derive(Clone)]
pub struct ProxyState {
	pub upstream: Arc<dyn Upstream>,
}

pub fn router(upstream: Arc<dyn Upstream>) -> Router {
	let mut router = Router::new().route("/health", get(health_handler));
	for category in FilterCategory::ALL {
		let path = format!("{ROUTE_PREFIX}/{}", category.slug());
		router = router.route(
			&path,
			post(move |state: State<ProxyState>, body: Bytes| filter_handler(category, state, body)),
		);
	}
	let trace = TraceLayer::new_for_http()
		.make_span_with(DefaultMakeSpan::new().level(Level::INFO))
		.on_response(DefaultOnResponse::new().level(Level::INFO));
	router.layer(trace).with_state(ProxyState { upstream })
}

pub async fn serve(listener: TcpListener, upstream: Arc<dyn Upstream>) -> anyhow::Result<()> {
	let address = listener.local_addr()?;
	info!("Proxy listening on {address}");

	axum::serve(listener, router(upstream))
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	info!("Proxy shut down");
	Ok(())
}

async fn shutdown_signal() {
	let ctrl_c = async {
		match ctrl_c().await {
			Ok(()) => info!("Received Ctrl+C, shutting down"),
			Err(err) => {
				warn!("Failed to install Ctrl+C handler: {err}");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
				info!("Received terminate signal, shutting down");
			}
			Err(err) => {
				warn!("Failed to install terminate handler: {err}");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}

#[cfg(test)]
pub(crate) mod testing {
	use std::sync::{Arc, Mutex};

	use async_trait::async_trait;
	use serde_json::Value;
	use tokio::net::TcpListener;

	use super::error::UpstreamError;
	use super::{Upstream, router};
	use crate::config::ROUTE_PREFIX;
	use crate::filters::FilterCategory;

	/// Upstream stub that records every forwarded call.
	pub struct RecordingUpstream {
		reply: Result<Value, UpstreamError>,
		calls: Mutex<Vec<(FilterCategory, String)>>,
	}

	impl RecordingUpstream {
		pub fn ok(payload: Value) -> Self {
			Self {
				reply: Ok(payload),
				calls: Mutex::new(Vec::new()),
			}
		}

		pub fn failing(error: UpstreamError) -> Self {
			Self {
				reply: Err(error),
				calls: Mutex::new(Vec::new()),
			}
		}

		pub fn calls(&self) -> Vec<(FilterCategory, String)> {
			self.calls.lock().unwrap().clone()
		}
	}

	#[async_trait]
	impl Upstream for RecordingUpstream {
		async fn lookup(&self, category: FilterCategory, query: &str) -> Result<Value, UpstreamError> {
			self.calls.lock().unwrap().push((category, query.to_string()));
			self.reply.clone()
		}
	}

	/// Serve the proxy on an ephemeral port; returns the route prefix URL.
	pub async fn spawn_proxy(upstream: Arc<dyn Upstream>) -> String {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let address = listener.local_addr().unwrap();
		tokio::spawn(async move {
			axum::serve(listener, router(upstream)).await.unwrap();
		});
		format!("http://{address}{ROUTE_PREFIX}")
	}
}
