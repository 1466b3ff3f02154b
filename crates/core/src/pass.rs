//! Filter passes: one full re-ranking of every known candidate, plus any that
//! stream in while the pass runs, against a fixed pattern.
//!
//! Passes serialise on the scoring lock. Whoever starts a new pass cancels
//! the previous pass's restart token before the new pass waits for the lock,
//! so the old pass notices between candidates and releases it promptly.
//! While scoring, a pass publishes partial snapshots on a fixed tick and one
//! final snapshot once the candidate stream is exhausted. Aborted passes never
//! publish a final snapshot.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, select, tick};

use crate::cancel::CancelToken;
use crate::candidate::{Candidate, ScoredCandidate};
use crate::ranking::RankedResults;
use crate::scorer::{Score, Scorer};
use crate::session::Message;

/// Everything guarded by the scoring lock.
pub struct ScoringState {
	scorer: Box<dyn Scorer>,
	known: Vec<Candidate>,
	live: Option<Receiver<String>>,
	ranking: RankedResults,
}

impl ScoringState {
	/// Fresh state for a session whose candidates arrive on `live`.
	#[must_use]
	pub fn new(scorer: Box<dyn Scorer>, live: Receiver<String>) -> Self {
		Self {
			scorer,
			known: Vec::new(),
			live: Some(live),
			ranking: RankedResults::new(),
		}
	}

	/// Candidates discovered so far, in discovery order.
	#[must_use]
	pub fn known(&self) -> &[Candidate] {
		&self.known
	}

	/// Ranking left behind by the most recent pass.
	#[must_use]
	pub fn ranking(&self) -> &RankedResults {
		&self.ranking
	}

	/// Whether the candidate stream is still open.
	#[must_use]
	pub fn is_streaming(&self) -> bool {
		self.live.is_some()
	}
}

/// Ranking published by a pass, tagged with the session and pass that
/// produced it so the controller can drop stale deliveries.
#[derive(Clone, Debug)]
pub struct PassSnapshot {
	pub session: u64,
	pub pass: u64,
	pub results: Arc<[ScoredCandidate]>,
	/// `true` exactly once per pass, on the final snapshot.
	pub complete: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PassOutcome {
	/// Every candidate was scored and the final snapshot was sent.
	Completed,
	/// A newer pass or session cancellation took over.
	Aborted,
	/// Nobody is listening for snapshots any more.
	HungUp,
}

/// One filter pass, ready to run.
#[derive(Clone, Debug)]
pub struct FilterPass {
	pub session: u64,
	pub id: u64,
	pub pattern: String,
	pub throttle: Duration,
	/// Raised when the whole session ends.
	pub session_cancel: CancelToken,
	/// Raised when a newer pass supersedes this one.
	pub restart: CancelToken,
}

impl FilterPass {
	fn aborted(&self) -> bool {
		self.restart.is_cancelled() || self.session_cancel.is_cancelled()
	}

	/// Run the pass on its own thread.
	pub fn spawn(
		self,
		scoring: Arc<Mutex<ScoringState>>,
		tx: Sender<Message>,
	) -> JoinHandle<PassOutcome> {
		thread::spawn(move || self.run(&scoring, &tx))
	}

	/// Run the pass on the calling thread, blocking until it completes or
	/// aborts.
	pub fn run(&self, scoring: &Mutex<ScoringState>, tx: &Sender<Message>) -> PassOutcome {
		if self.aborted() {
			return PassOutcome::Aborted;
		}
		// A pass that panicked mid-insert leaves a ranking we clear anyway.
		let mut guard = scoring
			.lock()
			.unwrap_or_else(|poisoned| poisoned.into_inner());
		let outcome = self.score_all(&mut guard, tx);
		tracing::trace!(
			session = self.session,
			pass = self.id,
			?outcome,
			known = guard.known.len(),
			matches = guard.ranking.as_slice().len(),
			"filter pass finished"
		);
		outcome
	}

	fn score_all(&self, state: &mut ScoringState, tx: &Sender<Message>) -> PassOutcome {
		if self.aborted() {
			return PassOutcome::Aborted;
		}

		let ScoringState {
			scorer,
			known,
			live,
			ranking,
		} = state;
		ranking.clear();

		let ticker = tick(self.throttle);
		let mut publisher = Publisher::new(tx, self.session, self.id);

		for candidate in known.iter() {
			if self.aborted() {
				return PassOutcome::Aborted;
			}
			if let Some(entry) = score_candidate(&mut **scorer, &self.pattern, candidate.clone()) {
				ranking.insert(entry);
				publisher.mark_dirty();
			}
			if self.aborted() {
				return PassOutcome::Aborted;
			}
			if ticker.try_recv().is_ok() && !publisher.flush_partial(ranking) {
				return PassOutcome::HungUp;
			}
		}

		if let Some(incoming) = live.clone() {
			let restart = self.restart.signal().clone();
			let session_cancel = self.session_cancel.signal().clone();
			loop {
				if self.aborted() {
					return PassOutcome::Aborted;
				}
				select! {
					recv(incoming) -> received => {
						let Ok(text) = received else {
							break;
						};
						let candidate = Candidate::new(known.len(), text);
						known.push(candidate.clone());
						if let Some(entry) = score_candidate(&mut **scorer, &self.pattern, candidate) {
							ranking.insert(entry);
							publisher.mark_dirty();
						}
					}
					recv(ticker) -> _ => {
						if self.aborted() {
							return PassOutcome::Aborted;
						}
						if !publisher.flush_partial(ranking) {
							return PassOutcome::HungUp;
						}
					}
					recv(restart) -> _ => return PassOutcome::Aborted,
					recv(session_cancel) -> _ => return PassOutcome::Aborted,
				}
			}
			*live = None;
		}

		if self.aborted() {
			return PassOutcome::Aborted;
		}
		if publisher.finish(ranking) {
			PassOutcome::Completed
		} else {
			PassOutcome::HungUp
		}
	}
}

fn score_candidate(
	scorer: &mut dyn Scorer,
	pattern: &str,
	candidate: Candidate,
) -> Option<ScoredCandidate> {
	let score = if pattern.is_empty() {
		Score::neutral()
	} else {
		scorer.score(&candidate.text, pattern)
	};
	score.is_match().then(|| ScoredCandidate {
		candidate,
		score: score.value,
		positions: score.positions.map(Arc::from),
	})
}

/// Sends ranking snapshots back to the controller.
struct Publisher<'a> {
	tx: &'a Sender<Message>,
	session: u64,
	pass: u64,
	dirty: bool,
}

impl<'a> Publisher<'a> {
	fn new(tx: &'a Sender<Message>, session: u64, pass: u64) -> Self {
		// Clearing the previous ranking is itself a change worth publishing.
		Self {
			tx,
			session,
			pass,
			dirty: true,
		}
	}

	fn mark_dirty(&mut self) {
		self.dirty = true;
	}

	/// Emit a partial snapshot if anything changed since the last one.
	fn flush_partial(&mut self, ranking: &RankedResults) -> bool {
		if self.dirty {
			return self.emit(ranking, false);
		}
		true
	}

	fn finish(&mut self, ranking: &RankedResults) -> bool {
		self.emit(ranking, true)
	}

	fn emit(&mut self, ranking: &RankedResults, complete: bool) -> bool {
		self.dirty = false;
		self.tx
			.send(Message::Snapshot(PassSnapshot {
				session: self.session,
				pass: self.pass,
				results: ranking.snapshot(),
				complete,
			}))
			.is_ok()
	}
}
