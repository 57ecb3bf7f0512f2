use std::fs::File;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tracing_subscriber::{EnvFilter, fmt};

use crate::client::{SuggestionClient, SuggestionService};
use crate::config::Config;
use crate::normalize::{FieldMapping, Normalizer};

pub mod browse;
pub mod categories;
pub mod serve;
pub mod suggest;

fn env_filter() -> EnvFilter {
	EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_stderr_logging() -> Result<()> {
	fmt()
		.with_env_filter(env_filter())
		.with_writer(std::io::stderr)
		.try_init()
		.map_err(|err| anyhow::anyhow!("failed to install logger: {err}"))
}

/// Log to `path`, keeping the terminal free for the filter panel.
pub fn init_file_logging(path: &Path) -> Result<()> {
	let file = File::create(path)
		.with_context(|| format!("failed to create log file {}", path.display()))?;
	fmt()
		.with_env_filter(env_filter())
		.with_ansi(false)
		.with_writer(Mutex::new(file))
		.try_init()
		.map_err(|err| anyhow::anyhow!("failed to install logger: {err}"))
}

fn runtime() -> Result<Runtime> {
	tokio::runtime::Builder::new_multi_thread()
		.enable_all()
		.build()
		.context("failed to start the async runtime")
}

/// The lookup service the panel and `suggest` share: proxy client,
/// normalizer and fallback catalog, all from `config`.
fn suggestion_service(config: &Config) -> Result<SuggestionService> {
	let client = SuggestionClient::with_timeout(config.proxy_url.as_str(), config.client_timeout)?;
	let normalizer = Normalizer::new(FieldMapping::LINKEDIN_V1, config.id_fallback);
	Ok(SuggestionService::new(
		Arc::new(client),
		normalizer,
		config.fallback()?,
	))
}
