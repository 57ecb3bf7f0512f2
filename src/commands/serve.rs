use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;

use crate::config::{Config, Credentials, ROUTE_PREFIX};
use crate::filters::FilterCategory;
use crate::output;
use crate::server::{self, RapidApi};

pub fn run(config_path: Option<&Path>) -> Result<()> {
	let config = Config::load(config_path)?;
	let credentials = Credentials::from_env()?;

	output::divider();
	output::heading("Filter proxy");
	match &config.config_file {
		Some(path) => output::label_value("Configuration", path.display()),
		None => output::note("Configuration: <defaults>"),
	}
	output::label_value("Listening", format!("http://{}{ROUTE_PREFIX}", config.bind));
	output::label_value("Upstream", &config.upstream_url);
	output::label_value("Provider host", &credentials.api_host);
	output::label_value("Timeout", format!("{}s", config.upstream_timeout.as_secs_f32()));
	output::label_value(
		"Routes",
		FilterCategory::ALL
			.iter()
			.map(|category| category.slug())
			.collect::<Vec<_>>()
			.join(", "),
	);
	output::divider();

	let upstream = RapidApi::new(config.upstream_url.as_str(), &credentials, config.upstream_timeout)?;
	super::runtime()?.block_on(async {
		let listener = TcpListener::bind(config.bind)
			.await
			.with_context(|| format!("failed to bind {}", config.bind))?;
		server::serve(listener, Arc::new(upstream)).await
	})
}
