use std::path::Path;

use anyhow::Result;

use crate::config::Config;
use crate::filters::FilterCategory;
use crate::output;

/// One lookup through the same service the panel uses, fallback included.
pub fn run(category: &str, query: &str, config_path: Option<&Path>, json: bool) -> Result<()> {
	let category: FilterCategory = category.parse()?;
	let config = Config::load(config_path)?;
	let service = super::suggestion_service(&config)?;

	let lookup = super::runtime()?.block_on(service.lookup(category, query));

	if let Some(warning) = lookup.warning() {
		output::warn(&warning);
	}
	if json {
		println!("{}", serde_json::to_string_pretty(&lookup.suggestions)?);
	} else {
		output::suggestions(&lookup.suggestions);
	}
	Ok(())
}
