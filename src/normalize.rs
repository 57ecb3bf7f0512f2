//! Mapping raw provider records onto [`Suggestion`]s.
//!
//! Provider field names differ by category and API version, so the fields
//! tried for the id and the display name are an explicit, ordered table.

use std::hash::Hasher;

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::Deserialize;
use serde_json::Value;
use twox_hash::XxHash64;

use crate::filters::{FilterCategory, Suggestion};

/// Ordered field lookups for one provider version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
	pub id_fields: &'static [&'static str],
	pub name_fields: &'static [&'static str],
}

impl FieldMapping {
	/// LinkedIn Sales Navigator filter endpoints.
	pub const LINKEDIN_V1: FieldMapping = FieldMapping {
		id_fields: &["companyId"],
		name_fields: &["displayValue", "text", "label"],
	};
}

impl Default for FieldMapping {
	fn default() -> Self {
		Self::LINKEDIN_V1
	}
}

/// How an id is produced for a record that carries none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdFallback {
	/// Stable across fetches: re-selecting the same name replaces the
	/// earlier decision.
	#[default]
	NameHash,
	/// Fresh opaque id per record.
	Random,
}

impl IdFallback {
	fn make(self, name: &str) -> String {
		match self {
			IdFallback::NameHash => {
				let mut hasher = XxHash64::with_seed(0);
				hasher.write(name.to_lowercase().as_bytes());
				format!("name-{:016x}", hasher.finish())
			}
			IdFallback::Random => rand::thread_rng()
				.sample_iter(&Alphanumeric)
				.take(9)
				.map(char::from)
				.collect::<String>()
				.to_lowercase(),
		}
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
	pub mapping: FieldMapping,
	pub id_fallback: IdFallback,
}

impl Normalizer {
	#[must_use]
	pub fn new(mapping: FieldMapping, id_fallback: IdFallback) -> Self {
		Self {
			mapping,
			id_fallback,
		}
	}

	/// Records without a usable name are dropped.
	pub fn suggestion(&self, record: &Value, category: FilterCategory) -> Option<Suggestion> {
		let name = first_text(record, self.mapping.name_fields)?;
		let id = first_text(record, self.mapping.id_fields)
			.unwrap_or_else(|| self.id_fallback.make(&name));
		Some(Suggestion::new(id, name, category))
	}

	pub fn suggestions(&self, records: &[Value], category: FilterCategory) -> Vec<Suggestion> {
		records
			.iter()
			.filter_map(|record| self.suggestion(record, category))
			.collect()
	}
}

fn first_text(record: &Value, fields: &[&str]) -> Option<String> {
	fields.iter().find_map(|field| match record.get(field)? {
		Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
		Value::Number(number) => Some(number.to_string()),
		_ => None,
	})
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	#[test]
	fn company_record_keeps_upstream_id() {
		let normalizer = Normalizer::default();
		let suggestion = normalizer
			.suggestion(&json!({"companyId": "5", "displayValue": "Google"}), FilterCategory::Company)
			.unwrap();
		assert_eq!(suggestion, Suggestion::new("5", "Google", FilterCategory::Company));
	}

	#[test]
	fn numeric_ids_become_strings() {
		let normalizer = Normalizer::default();
		let suggestion = normalizer
			.suggestion(&json!({"companyId": 1441, "displayValue": "Google"}), FilterCategory::Company)
			.unwrap();
		assert_eq!(suggestion.id, "1441");
	}

	#[test]
	fn name_fields_are_tried_in_order() {
		let normalizer = Normalizer::default();
		let from_text = normalizer
			.suggestion(&json!({"text": "Berlin", "label": "ignored"}), FilterCategory::Location)
			.unwrap();
		assert_eq!(from_text.name, "Berlin");

		let from_label = normalizer
			.suggestion(&json!({"displayValue": "", "label": "PhD"}), FilterCategory::Education)
			.unwrap();
		assert_eq!(from_label.name, "PhD");
	}

	#[test]
	fn nameless_records_are_dropped() {
		let normalizer = Normalizer::default();
		let records = vec![json!({"companyId": "9"}), json!({"text": "Director"})];
		let suggestions = normalizer.suggestions(&records, FilterCategory::Experience);
		assert_eq!(suggestions.len(), 1);
		assert_eq!(suggestions[0].name, "Director");
	}

	#[test]
	fn name_hash_ids_are_stable_and_case_insensitive() {
		let normalizer = Normalizer::default();
		let first = normalizer
			.suggestion(&json!({"text": "Senior"}), FilterCategory::Experience)
			.unwrap();
		let second = normalizer
			.suggestion(&json!({"label": "SENIOR"}), FilterCategory::Experience)
			.unwrap();
		assert_eq!(first.id, second.id);
		assert!(first.id.starts_with("name-"));
	}

	#[test]
	fn random_ids_are_opaque() {
		let normalizer = Normalizer::new(FieldMapping::LINKEDIN_V1, IdFallback::Random);
		let suggestion = normalizer
			.suggestion(&json!({"text": "Senior"}), FilterCategory::Experience)
			.unwrap();
		assert_eq!(suggestion.id.len(), 9);
		assert!(suggestion.id.chars().all(|ch| ch.is_ascii_alphanumeric()));
	}

	#[test]
	fn custom_mapping_is_honoured() {
		const SCHOOLS: FieldMapping = FieldMapping {
			id_fields: &["schoolId", "id"],
			name_fields: &["schoolName"],
		};
		let normalizer = Normalizer::new(SCHOOLS, IdFallback::NameHash);
		let suggestion = normalizer
			.suggestion(&json!({"id": "42", "schoolName": "MIT"}), FilterCategory::Education)
			.unwrap();
		assert_eq!(suggestion, Suggestion::new("42", "MIT", FilterCategory::Education));
	}
}
