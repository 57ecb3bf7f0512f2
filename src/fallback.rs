use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::filters::{FilterCategory, Suggestion};

/// Local sample suggestions served when a live lookup fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackCatalog {
	entries: Vec<Suggestion>,
}

const BUILTIN: &[(&str, &str, FilterCategory)] = &[
	("1", "Frontend Developer", FilterCategory::JobTitle),
	("2", "Frontend Engineer", FilterCategory::JobTitle),
	("3", "React Developer", FilterCategory::JobTitle),
	("4", "UI/UX Developer", FilterCategory::JobTitle),
	("5", "Google", FilterCategory::Company),
	("6", "Microsoft", FilterCategory::Company),
	("7", "Meta", FilterCategory::Company),
	("8", "Apple", FilterCategory::Company),
	("9", "San Francisco, CA", FilterCategory::Location),
	("10", "New York, NY", FilterCategory::Location),
	("11", "Seattle, WA", FilterCategory::Location),
	("12", "Austin, TX", FilterCategory::Location),
	("13", "Entry Level", FilterCategory::Experience),
	("14", "Mid Level", FilterCategory::Experience),
	("15", "Senior Level", FilterCategory::Experience),
	("16", "Executive Level", FilterCategory::Experience),
	("17", "Bachelor's Degree", FilterCategory::Education),
	("18", "Master's Degree", FilterCategory::Education),
	("19", "PhD", FilterCategory::Education),
	("20", "Bootcamp", FilterCategory::Education),
];

impl FallbackCatalog {
	#[must_use]
	pub fn new(entries: impl IntoIterator<Item = Suggestion>) -> Self {
		Self {
			entries: entries.into_iter().collect(),
		}
	}

	#[must_use]
	pub fn empty() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn builtin() -> Self {
		Self::new(
			BUILTIN
				.iter()
				.map(|&(id, name, category)| Suggestion::new(id, name, category)),
		)
	}

	/// Read a JSON array of `{id, name, type}` records.
	pub fn from_file(path: &Path) -> Result<Self> {
		let contents = fs::read_to_string(path)
			.with_context(|| format!("failed to read fallback catalog {}", path.display()))?;
		let entries: Vec<Suggestion> = serde_json::from_str(&contents)
			.with_context(|| format!("failed to parse fallback catalog {}", path.display()))?;
		Ok(Self::new(entries))
	}

	/// Entries of `category` whose name contains `query`, ignoring case.
	pub fn matching(&self, category: FilterCategory, query: &str) -> Vec<Suggestion> {
		let needle = query.trim().to_lowercase();
		self.entries
			.iter()
			.filter(|entry| entry.category == category)
			.filter(|entry| entry.name.to_lowercase().contains(&needle))
			.cloned()
			.collect()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn names(suggestions: &[Suggestion]) -> Vec<&str> {
		suggestions.iter().map(|s| s.name.as_str()).collect()
	}

	#[test]
	fn substring_match_ignores_case() {
		let catalog = FallbackCatalog::builtin();
		let hits = catalog.matching(FilterCategory::JobTitle, "frontend");
		assert_eq!(names(&hits), vec!["Frontend Developer", "Frontend Engineer"]);

		let hits = catalog.matching(FilterCategory::JobTitle, "DEVELOPER");
		assert_eq!(hits.len(), 3);
	}

	#[test]
	fn matches_stay_within_the_category() {
		let catalog = FallbackCatalog::builtin();
		assert!(catalog.matching(FilterCategory::Company, "Frontend").is_empty());
		assert_eq!(names(&catalog.matching(FilterCategory::Location, ", wa")), vec!["Seattle, WA"]);
	}

	#[test]
	fn builtin_covers_every_category() {
		let catalog = FallbackCatalog::builtin();
		assert_eq!(catalog.len(), 20);
		for category in FilterCategory::ALL {
			assert_eq!(catalog.matching(category, "").len(), 4);
		}
	}

	#[test]
	fn loads_a_custom_catalog_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("catalog.json");
		fs::write(
			&path,
			r#"[{"id": "x1", "name": "Staff Engineer", "type": "job_title"}]"#,
		)
		.unwrap();

		let catalog = FallbackCatalog::from_file(&path).unwrap();
		assert_eq!(
			catalog.matching(FilterCategory::JobTitle, "staff"),
			vec![Suggestion::new("x1", "Staff Engineer", FilterCategory::JobTitle)]
		);
	}

	#[test]
	fn malformed_catalog_names_the_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("broken.json");
		fs::write(&path, "{").unwrap();
		let err = FallbackCatalog::from_file(&path).unwrap_err();
		assert!(err.to_string().contains("broken.json"));
	}
}
