use std::path::Path;

use anyhow::{Context, Result};
use panel_widgets::theme;

use crate::config::Config;
use crate::{output, tui};

pub fn run(config_path: Option<&Path>, theme_name: &str, json: bool) -> Result<()> {
	let config = Config::load(config_path)?;
	let theme = theme::by_name(theme_name).with_context(|| {
		format!(
			"unknown theme {theme_name:?} (available: {})",
			theme::NAMES.join(", ")
		)
	})?;
	let service = super::suggestion_service(&config)?;
	let runtime = super::runtime()?;

	let selection = tui::run(
		service,
		runtime.handle().clone(),
		config.debounce,
		theme,
		config.proxy_url.as_str(),
	)?;

	if json {
		println!("{}", serde_json::to_string_pretty(&selection)?);
	} else {
		output::heading("Search configuration");
		output::selection(&selection);
	}
	Ok(())
}
