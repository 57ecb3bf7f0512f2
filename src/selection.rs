use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::filters::{FilterCategory, SelectedFilter, Suggestion};

/// Include/exclude decisions of one search, bucketed by category.
///
/// Buckets keep insertion order. Re-adding an id moves it to the end of its
/// bucket with the newer decision, so a `(category, id)` pair appears at most
/// once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
	buckets: [Vec<SelectedFilter>; 5],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySummary {
	pub category: FilterCategory,
	pub included: usize,
	pub excluded: usize,
}

impl FilterSelection {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, suggestion: Suggestion, include: bool) {
		let bucket = &mut self.buckets[suggestion.category.index()];
		bucket.retain(|existing| existing.id() != suggestion.id);
		bucket.push(SelectedFilter {
			suggestion,
			include,
		});
	}

	pub fn remove(&mut self, id: &str, category: FilterCategory) -> Option<SelectedFilter> {
		let bucket = &mut self.buckets[category.index()];
		let position = bucket.iter().position(|existing| existing.id() == id)?;
		Some(bucket.remove(position))
	}

	pub fn bucket(&self, category: FilterCategory) -> &[SelectedFilter] {
		&self.buckets[category.index()]
	}

	pub fn total_count(&self) -> usize {
		self.buckets.iter().map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.total_count() == 0
	}

	/// Include/exclude counts for every non-empty bucket, in registry order.
	pub fn summary(&self) -> Vec<CategorySummary> {
		FilterCategory::ALL
			.into_iter()
			.filter_map(|category| {
				let bucket = self.bucket(category);
				if bucket.is_empty() {
					return None;
				}
				let included = bucket.iter().filter(|filter| filter.include).count();
				Some(CategorySummary {
					category,
					included,
					excluded: bucket.len() - included,
				})
			})
			.collect()
	}

	/// Every selected filter, bucket by bucket in registry order.
	pub fn iter(&self) -> impl Iterator<Item = &SelectedFilter> {
		self.buckets.iter().flatten()
	}
}

impl Serialize for FilterSelection {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(FilterCategory::ALL.len()))?;
		for category in FilterCategory::ALL {
			map.serialize_entry(category.key(), self.bucket(category))?;
		}
		map.end()
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn frontend() -> Suggestion {
		Suggestion::new("1", "Frontend Developer", FilterCategory::JobTitle)
	}

	#[test]
	fn add_then_remove_restores_every_bucket() {
		for category in FilterCategory::ALL {
			let mut selection = FilterSelection::new();
			selection.add(Suggestion::new("a", "Alpha", category), true);
			let before = selection.clone();

			selection.add(Suggestion::new("b", "Beta", category), false);
			let removed = selection.remove("b", category);

			assert_eq!(removed.map(|filter| filter.include), Some(false));
			assert_eq!(selection, before);
		}
	}

	#[test]
	fn re_adding_replaces_the_previous_decision() {
		let mut selection = FilterSelection::new();
		selection.add(frontend(), true);
		selection.add(frontend(), false);

		let bucket = selection.bucket(FilterCategory::JobTitle);
		assert_eq!(bucket.len(), 1);
		assert_eq!(bucket[0].id(), "1");
		assert!(!bucket[0].include);
	}

	#[test]
	fn replacement_moves_to_the_end() {
		let mut selection = FilterSelection::new();
		selection.add(frontend(), true);
		selection.add(
			Suggestion::new("3", "React Developer", FilterCategory::JobTitle),
			true,
		);
		selection.add(frontend(), false);

		let names: Vec<&str> = selection
			.bucket(FilterCategory::JobTitle)
			.iter()
			.map(SelectedFilter::name)
			.collect();
		assert_eq!(names, vec!["React Developer", "Frontend Developer"]);
	}

	#[test]
	fn same_id_in_different_categories_is_distinct() {
		let mut selection = FilterSelection::new();
		selection.add(Suggestion::new("7", "Meta", FilterCategory::Company), true);
		selection.add(Suggestion::new("7", "Remote", FilterCategory::Location), true);
		assert_eq!(selection.total_count(), 2);
	}

	#[test]
	fn remove_missing_id_is_a_no_op() {
		let mut selection = FilterSelection::new();
		selection.add(frontend(), true);
		assert!(selection.remove("missing", FilterCategory::JobTitle).is_none());
		assert!(selection.remove("1", FilterCategory::Company).is_none());
		assert_eq!(selection.total_count(), 1);
	}

	#[test]
	fn total_count_tracks_distinct_adds() {
		let mut selection = FilterSelection::new();
		let mut added = 0;
		for category in FilterCategory::ALL {
			for n in 0..3 {
				selection.add(Suggestion::new(format!("{n}"), format!("{category} {n}"), category), n % 2 == 0);
				added += 1;
				assert_eq!(selection.total_count(), added);
			}
		}
		let bucket_sum: usize = FilterCategory::ALL
			.into_iter()
			.map(|category| selection.bucket(category).len())
			.sum();
		assert_eq!(selection.total_count(), bucket_sum);
		assert_eq!(selection.iter().count(), 15);
	}

	#[test]
	fn every_entry_lives_in_its_own_category_bucket() {
		let mut selection = FilterSelection::new();
		selection.add(frontend(), true);
		selection.add(Suggestion::new("5", "Google", FilterCategory::Company), false);
		for category in FilterCategory::ALL {
			assert!(selection.bucket(category).iter().all(|f| f.category() == category));
		}
	}

	#[test]
	fn summary_skips_empty_buckets_in_registry_order() {
		let mut selection = FilterSelection::new();
		selection.add(Suggestion::new("19", "PhD", FilterCategory::Education), false);
		selection.add(frontend(), true);
		selection.add(
			Suggestion::new("2", "Frontend Engineer", FilterCategory::JobTitle),
			false,
		);

		assert_eq!(
			selection.summary(),
			vec![
				CategorySummary {
					category: FilterCategory::JobTitle,
					included: 1,
					excluded: 1,
				},
				CategorySummary {
					category: FilterCategory::Education,
					included: 0,
					excluded: 1,
				},
			]
		);
	}

	#[test]
	fn serializes_as_category_map() {
		let mut selection = FilterSelection::new();
		selection.add(Suggestion::new("5", "Google", FilterCategory::Company), true);
		let json = serde_json::to_value(&selection).unwrap();
		assert_eq!(json["company"][0]["name"], "Google");
		assert_eq!(json["job_title"], serde_json::json!([]));
	}
}
