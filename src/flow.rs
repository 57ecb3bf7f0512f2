//! Search flow of the filter panel.
//!
//! Keystrokes re-arm a debounce deadline; a fetch is handed out only after
//! the quiet period. Every change that makes earlier results meaningless
//! (keystroke, category switch, cleared query, committed filter) bumps the
//! generation, and results stamped with an older generation are dropped.

use std::time::{Duration, Instant};

use crate::client::Lookup;
use crate::filters::{FilterCategory, SelectedFilter, Suggestion};
use crate::selection::FilterSelection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
	Idle,
	CategorySelected,
	Querying,
	SuggestionsShown,
	NoSuggestions,
	ErrorFallback,
}

/// A fetch that is due. Hand the result back to [`SearchFlow::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
	pub generation: u64,
	pub category: FilterCategory,
	pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
	quiet: Duration,
	deadline: Option<Instant>,
}

impl Debouncer {
	#[must_use]
	pub fn new(quiet: Duration) -> Self {
		Self {
			quiet,
			deadline: None,
		}
	}

	/// Re-arm, cancelling any pending deadline.
	pub fn trigger(&mut self, now: Instant) {
		self.deadline = Some(now + self.quiet);
	}

	pub fn cancel(&mut self) {
		self.deadline = None;
	}

	/// Fires at most once per armed deadline.
	pub fn fire(&mut self, now: Instant) -> bool {
		match self.deadline {
			Some(deadline) if now >= deadline => {
				self.deadline = None;
				true
			}
			_ => false,
		}
	}

	pub fn remaining(&self, now: Instant) -> Option<Duration> {
		self.deadline
			.map(|deadline| deadline.saturating_duration_since(now))
	}
}

#[derive(Debug, Clone)]
pub struct SearchFlow {
	state: FlowState,
	category: Option<FilterCategory>,
	query: String,
	suggestions: Vec<Suggestion>,
	warning: Option<String>,
	debouncer: Debouncer,
	generation: u64,
	selection: FilterSelection,
}

impl SearchFlow {
	#[must_use]
	pub fn new(debounce: Duration) -> Self {
		Self {
			state: FlowState::Idle,
			category: None,
			query: String::new(),
			suggestions: Vec::new(),
			warning: None,
			debouncer: Debouncer::new(debounce),
			generation: 0,
			selection: FilterSelection::new(),
		}
	}

	pub fn state(&self) -> FlowState {
		self.state
	}

	pub fn category(&self) -> Option<FilterCategory> {
		self.category
	}

	pub fn query(&self) -> &str {
		&self.query
	}

	pub fn suggestions(&self) -> &[Suggestion] {
		&self.suggestions
	}

	pub fn warning(&self) -> Option<&str> {
		self.warning.as_deref()
	}

	pub fn selection(&self) -> &FilterSelection {
		&self.selection
	}

	pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
		self.debouncer.remaining(now)
	}

	/// Switch category. Query and suggestions reset at once, without waiting
	/// for the debounce.
	pub fn select_category(&mut self, category: FilterCategory) {
		self.category = Some(category);
		self.reset_search();
	}

	pub fn set_query(&mut self, query: impl Into<String>, now: Instant) {
		let query = query.into();
		if query == self.query {
			return;
		}
		if self.category.is_none() {
			return;
		}
		if query.trim().is_empty() {
			self.query = query;
			self.invalidate();
			self.suggestions.clear();
			self.warning = None;
			self.state = FlowState::CategorySelected;
			return;
		}
		self.query = query;
		self.invalidate();
		self.debouncer.trigger(now);
		self.state = FlowState::Querying;
	}

	pub fn clear_query(&mut self) {
		if self.category.is_some() {
			self.reset_search();
		}
	}

	/// Hand out the pending fetch once its quiet period has elapsed.
	pub fn poll(&mut self, now: Instant) -> Option<FetchTicket> {
		if !self.debouncer.fire(now) {
			return None;
		}
		let category = self.category?;
		Some(FetchTicket {
			generation: self.generation,
			category,
			query: self.query.clone(),
		})
	}

	/// Apply a fetch result. Returns `false` when the result is stale.
	pub fn resolve(&mut self, generation: u64, lookup: Lookup) -> bool {
		if generation != self.generation || self.state != FlowState::Querying {
			return false;
		}
		self.warning = lookup.warning();
		self.state = if lookup.is_fallback() {
			FlowState::ErrorFallback
		} else if lookup.suggestions.is_empty() {
			FlowState::NoSuggestions
		} else {
			FlowState::SuggestionsShown
		};
		self.suggestions = lookup.suggestions;
		true
	}

	/// Commit a suggestion as include or exclude and return to an empty
	/// query in the same category.
	pub fn add_filter(&mut self, suggestion: Suggestion, include: bool) {
		let category = suggestion.category;
		self.selection.add(suggestion, include);
		self.category = Some(category);
		self.reset_search();
	}

	pub fn remove_filter(&mut self, id: &str, category: FilterCategory) -> Option<SelectedFilter> {
		self.selection.remove(id, category)
	}

	fn reset_search(&mut self) {
		self.query.clear();
		self.suggestions.clear();
		self.warning = None;
		self.invalidate();
		self.state = FlowState::CategorySelected;
	}

	fn invalidate(&mut self) {
		self.generation += 1;
		self.debouncer.cancel();
	}
}
