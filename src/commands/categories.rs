use owo_colors::OwoColorize;

use crate::config::ROUTE_PREFIX;
use crate::filters::FilterCategory;

pub fn run() {
	for category in FilterCategory::ALL {
		println!(
			"{:<12} {:<28} {}/{:<12} {}",
			category.key().bold(),
			category.label(),
			ROUTE_PREFIX.dimmed(),
			category.slug(),
			category.endpoint().dimmed()
		);
	}
}
