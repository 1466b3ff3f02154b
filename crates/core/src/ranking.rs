use std::sync::Arc;

use crate::candidate::ScoredCandidate;

/// Matches ordered by descending score, ties kept in discovery order.
///
/// Non-matches never enter the set, so every observable prefix is a valid
/// ranking of the candidates scored so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RankedResults {
	entries: Vec<ScoredCandidate>,
}

impl RankedResults {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert a scored candidate and return the rank it landed at.
	///
	/// The entry goes in front of the first element scoring strictly lower,
	/// which places it after every equal-scored element already present.
	/// Candidates scoring below zero are rejected and `None` is returned.
	pub fn insert(&mut self, entry: ScoredCandidate) -> Option<usize> {
		if entry.score < 0 {
			return None;
		}
		let rank = self
			.entries
			.partition_point(|existing| existing.score >= entry.score);
		self.entries.insert(rank, entry);
		Some(rank)
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}

	#[must_use]
	pub fn as_slice(&self) -> &[ScoredCandidate] {
		&self.entries
	}

	pub fn iter(&self) -> impl Iterator<Item = &ScoredCandidate> {
		self.entries.iter()
	}

	/// Copy the current ranking into an immutable, shareable snapshot.
	///
	/// Entries only hold reference-counted text and positions, so this is one
	/// allocation for the slice and no per-entry heap traffic.
	#[must_use]
	pub fn snapshot(&self) -> Arc<[ScoredCandidate]> {
		Arc::from(self.entries.as_slice())
	}
}
