use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::warn;

use super::{SuggestionError, SuggestionSource};
use crate::fallback::FallbackCatalog;
use crate::filters::{FilterCategory, Suggestion};
use crate::normalize::Normalizer;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupStatus {
	pub loading: bool,
	pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupSource {
	Live,
	/// Sample data served because the live lookup failed.
	Fallback { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
	pub suggestions: Vec<Suggestion>,
	pub source: LookupSource,
}

impl Lookup {
	fn live(suggestions: Vec<Suggestion>) -> Self {
		Self {
			suggestions,
			source: LookupSource::Live,
		}
	}

	pub fn is_fallback(&self) -> bool {
		matches!(self.source, LookupSource::Fallback { .. })
	}

	/// Warning shown next to sample results.
	pub fn warning(&self) -> Option<String> {
		match &self.source {
			LookupSource::Live => None,
			LookupSource::Fallback { reason } => Some(format!("Using sample data - {reason}")),
		}
	}
}

/// Suggestion lookups with loading/error tracking and a sample-data
/// fallback, so a non-empty query never ends in an empty failure state.
///
/// The status follows the most recently started lookup. An older lookup that
/// finishes later leaves it untouched.
#[derive(Clone)]
pub struct SuggestionService {
	source: Arc<dyn SuggestionSource>,
	normalizer: Normalizer,
	fallback: Arc<FallbackCatalog>,
	status: Arc<watch::Sender<LookupStatus>>,
	latest: Arc<AtomicU64>,
}

impl SuggestionService {
	pub fn new(
		source: Arc<dyn SuggestionSource>,
		normalizer: Normalizer,
		fallback: FallbackCatalog,
	) -> Self {
		let (status, _) = watch::channel(LookupStatus::default());
		Self {
			source,
			normalizer,
			fallback: Arc::new(fallback),
			status: Arc::new(status),
			latest: Arc::new(AtomicU64::new(0)),
		}
	}

	pub fn status(&self) -> LookupStatus {
		self.status.borrow().clone()
	}

	pub fn subscribe(&self) -> watch::Receiver<LookupStatus> {
		self.status.subscribe()
	}

	pub async fn lookup(&self, category: FilterCategory, query: &str) -> Lookup {
		if query.trim().is_empty() {
			return Lookup::live(Vec::new());
		}

		let mut request = 0;
		self.status.send_modify(|status| {
			request = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
			*status = LookupStatus {
				loading: true,
				error: None,
			};
		});

		let (lookup, error) = match self.fetch(category, query).await {
			Ok(suggestions) => (Lookup::live(suggestions), None),
			Err(err) => {
				let reason = err.to_string();
				warn!(%category, query, error = %reason, "suggestion lookup failed, serving sample data");
				let lookup = Lookup {
					suggestions: self.fallback.matching(category, query),
					source: LookupSource::Fallback {
						reason: reason.clone(),
					},
				};
				(lookup, Some(reason))
			}
		};

		self.status.send_if_modified(|status| {
			if self.latest.load(Ordering::SeqCst) != request {
				return false;
			}
			status.loading = false;
			status.error = error;
			true
		});
		lookup
	}

	async fn fetch(
		&self,
		category: FilterCategory,
		query: &str,
	) -> Result<Vec<Suggestion>, SuggestionError> {
		if !self.source.supports(category) {
			return Err(SuggestionError::Unsupported(category));
		}
		let records = self.source.fetch(category, query).await?;
		Ok(self.normalizer.suggestions(&records, category))
	}
}
