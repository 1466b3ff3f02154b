//! Scoring seam between the filter pass and the fuzzy matcher.

use frizbee::{Config, match_indices};

/// Score reported for candidates that do not match the pattern.
pub const NO_MATCH: i64 = -1;

/// Score given to every candidate while the pattern is empty.
pub const NEUTRAL_SCORE: i64 = 0;

/// Outcome of scoring one candidate against one pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Score {
	pub value: i64,
	pub positions: Option<Vec<usize>>,
}

impl Score {
	#[must_use]
	pub fn no_match() -> Self {
		Self {
			value: NO_MATCH,
			positions: None,
		}
	}

	#[must_use]
	pub fn neutral() -> Self {
		Self {
			value: NEUTRAL_SCORE,
			positions: None,
		}
	}

	#[must_use]
	pub fn is_match(&self) -> bool {
		self.value >= 0
	}
}

/// Pure fuzzy-match function `score(text, pattern)`.
///
/// Implementations may keep scratch memory between calls; the engine only
/// ever drives a scorer from the one filter pass holding the scoring lock.
pub trait Scorer: Send {
	fn score(&mut self, text: &str, pattern: &str) -> Score;
}

impl<F> Scorer for F
where
	F: FnMut(&str, &str) -> Score + Send,
{
	fn score(&mut self, text: &str, pattern: &str) -> Score {
		self(text, pattern)
	}
}

/// Builds matching options for interactive filtering: every pattern
/// character must appear in order, no typos are tolerated.
#[must_use]
pub fn interactive_config() -> Config {
	Config {
		prefilter: true,
		max_typos: Some(0),
		sort: false,
		..Config::default()
	}
}

/// Default scorer backed by frizbee's Smith-Waterman matcher.
pub struct FrizbeeScorer {
	config: Config,
}

impl FrizbeeScorer {
	#[must_use]
	pub fn new(config: Config) -> Self {
		Self { config }
	}
}

impl Default for FrizbeeScorer {
	fn default() -> Self {
		Self::new(interactive_config())
	}
}

impl Scorer for FrizbeeScorer {
	fn score(&mut self, text: &str, pattern: &str) -> Score {
		if text.is_empty() || pattern.is_empty() {
			return Score::no_match();
		}
		match match_indices(pattern, text, &self.config) {
			// frizbee rows scoring zero carry no signal and are dropped.
			Some(found) if found.score > 0 => Score {
				value: i64::from(found.score),
				positions: Some(char_positions(text, found.indices)),
			},
			_ => Score::no_match(),
		}
	}
}

/// Map frizbee's byte offsets to ascending, distinct character indices.
fn char_positions(text: &str, mut offsets: Vec<usize>) -> Vec<usize> {
	offsets.sort_unstable();
	let mut offsets = offsets.into_iter().peekable();
	let mut positions = Vec::with_capacity(offsets.len());
	for (ordinal, (start, ch)) in text.char_indices().enumerate() {
		if offsets.peek().is_none() {
			break;
		}
		let end = start + ch.len_utf8();
		let mut hit = false;
		while offsets.next_if(|offset| *offset < end).is_some() {
			hit = true;
		}
		if hit {
			positions.push(ordinal);
		}
	}
	positions
}
