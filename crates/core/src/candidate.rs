use std::sync::Arc;

/// A filterable line together with the order in which its source produced it.
///
/// The discovery index only breaks ties between equal scores; candidates are
/// never reordered by it independently of their score.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
	pub index: usize,
	pub text: Arc<str>,
}

impl Candidate {
	#[must_use]
	pub fn new(index: usize, text: impl Into<Arc<str>>) -> Self {
		Self {
			index,
			text: text.into(),
		}
	}
}

/// Candidate paired with the score it obtained against the current pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoredCandidate {
	pub candidate: Candidate,
	/// Match quality; `0` is a neutral match, higher is better.
	pub score: i64,
	/// Matched character positions for highlighting, absent for empty patterns.
	/// Shared so that ranking snapshots never copy them.
	pub positions: Option<Arc<[usize]>>,
}

impl ScoredCandidate {
	#[must_use]
	pub fn text(&self) -> &str {
		&self.candidate.text
	}

	#[must_use]
	pub fn index(&self) -> usize {
		self.candidate.index
	}
}
