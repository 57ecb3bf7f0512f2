use std::fmt::Display;

use owo_colors::OwoColorize;

use crate::filters::Suggestion;
use crate::selection::FilterSelection;

pub fn divider() {
	eprintln!("{}", "─".repeat(56).blue());
}

pub fn heading(text: &str) {
	eprintln!("{}", text.bold().cyan());
}

pub fn note(text: &str) {
	eprintln!("{}", text.dimmed());
}

pub fn label_value(label: &str, value: impl Display) {
	eprintln!("{} {}", format!("{label}:").bold(), value);
}

pub fn warn(message: &str) {
	eprintln!("{}", message.yellow().bold());
}

/// One line per suggestion on stdout: id, then name.
pub fn suggestions(items: &[Suggestion]) {
	if items.is_empty() {
		note("No suggestions found");
		return;
	}
	for item in items {
		println!("{}  {}", item.id.dimmed(), item.name);
	}
}

/// The final search configuration, grouped by category on stdout.
pub fn selection(selection: &FilterSelection) {
	if selection.is_empty() {
		println!("{}", "No filters applied".dimmed());
		return;
	}
	for summary in selection.summary() {
		println!(
			"{} {}",
			format!("{}:", summary.category.label()).bold(),
			format!("{} included, {} excluded", summary.included, summary.excluded).dimmed()
		);
		for filter in selection.bucket(summary.category) {
			if filter.include {
				println!("  {} {}", "+".green().bold(), filter.name().green());
			} else {
				println!("  {} {}", "-".red().bold(), filter.name().red());
			}
		}
	}
}
