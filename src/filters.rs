//! Filter categories and the records that flow through them.
//!
//! The category set is closed: it drives the proxy routes, the upstream
//! endpoints, the tabs of the terminal view and the bucket order of a
//! selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCategory {
	JobTitle,
	Company,
	Location,
	Experience,
	Education,
}

impl FilterCategory {
	/// Registry order. Summaries and tabs follow it.
	pub const ALL: [FilterCategory; 5] = [
		FilterCategory::JobTitle,
		FilterCategory::Company,
		FilterCategory::Location,
		FilterCategory::Experience,
		FilterCategory::Education,
	];

	pub fn key(self) -> &'static str {
		match self {
			FilterCategory::JobTitle => "job_title",
			FilterCategory::Company => "company",
			FilterCategory::Location => "location",
			FilterCategory::Experience => "experience",
			FilterCategory::Education => "education",
		}
	}

	/// Path segment of the proxy route.
	pub fn slug(self) -> &'static str {
		match self {
			FilterCategory::JobTitle => "job-title",
			other => other.key(),
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			FilterCategory::JobTitle => "Job Title",
			FilterCategory::Company => "Company",
			FilterCategory::Location => "Location",
			FilterCategory::Experience => "Experience Level",
			FilterCategory::Education => "Education/School",
		}
	}

	/// Upstream provider endpoint, relative to the provider base URL.
	pub fn endpoint(self) -> &'static str {
		match self {
			FilterCategory::JobTitle => "filter_job_title",
			FilterCategory::Company => "filter_company",
			FilterCategory::Location => "filter_geography_location_region",
			FilterCategory::Experience => "filter_seniority_level",
			FilterCategory::Education => "filter_school",
		}
	}

	/// Message used when a lookup fails without a more specific reason.
	pub fn failure_message(self) -> String {
		format!("Failed to fetch {} suggestions", self.noun())
	}

	pub fn placeholder(self) -> String {
		format!("Search {}...", self.label().to_lowercase())
	}

	pub fn index(self) -> usize {
		match self {
			FilterCategory::JobTitle => 0,
			FilterCategory::Company => 1,
			FilterCategory::Location => 2,
			FilterCategory::Experience => 3,
			FilterCategory::Education => 4,
		}
	}

	pub fn next(self) -> Self {
		Self::ALL[(self.index() + 1) % Self::ALL.len()]
	}

	pub fn previous(self) -> Self {
		Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
	}

	fn noun(self) -> &'static str {
		match self {
			FilterCategory::JobTitle => "job title",
			FilterCategory::Company => "company",
			FilterCategory::Location => "location",
			FilterCategory::Experience => "experience level",
			FilterCategory::Education => "education",
		}
	}
}

impl fmt::Display for FilterCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.key())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported filter type: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for FilterCategory {
	type Err = UnknownCategory;

	/// Accepts either the key (`job_title`) or the route slug (`job-title`).
	fn from_str(value: &str) -> Result<Self, Self::Err> {
		let needle = value.trim().to_ascii_lowercase();
		Self::ALL
			.into_iter()
			.find(|category| category.key() == needle || category.slug() == needle)
			.ok_or_else(|| UnknownCategory(value.to_string()))
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
	pub id: String,
	pub name: String,
	#[serde(rename = "type")]
	pub category: FilterCategory,
}

impl Suggestion {
	#[must_use]
	pub fn new(id: impl Into<String>, name: impl Into<String>, category: FilterCategory) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			category,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFilter {
	#[serde(flatten)]
	pub suggestion: Suggestion,
	pub include: bool,
}

impl SelectedFilter {
	pub fn id(&self) -> &str {
		&self.suggestion.id
	}

	pub fn name(&self) -> &str {
		&self.suggestion.name
	}

	pub fn category(&self) -> FilterCategory {
		self.suggestion.category
	}
}
