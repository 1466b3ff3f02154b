//! Cancellation tokens handed to background tasks.
//!
//! A [`CancelSource`] is owned by whoever decides when work must stop; every
//! task it governs receives a cloned [`CancelToken`]. Tokens can be polled
//! between units of work or raced against blocking channel operations through
//! [`CancelToken::signal`], which becomes ready once the source fires.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded, never};

/// Owning side of a cancellation signal. Dropping the source cancels it.
#[derive(Debug)]
pub struct CancelSource {
	flag: Arc<AtomicBool>,
	trigger: Option<Sender<()>>,
	signal: Receiver<()>,
}

impl CancelSource {
	#[must_use]
	pub fn new() -> Self {
		let (trigger, signal) = bounded(0);
		Self {
			flag: Arc::new(AtomicBool::new(false)),
			trigger: Some(trigger),
			signal,
		}
	}

	/// Hand out a token observing this source.
	#[must_use]
	pub fn token(&self) -> CancelToken {
		CancelToken {
			flag: Some(Arc::clone(&self.flag)),
			signal: self.signal.clone(),
		}
	}

	/// Raise the signal. Idempotent.
	pub fn cancel(&mut self) {
		self.flag.store(true, Ordering::Release);
		// Dropping the only sender disconnects every cloned signal receiver.
		self.trigger.take();
	}
}

impl Default for CancelSource {
	fn default() -> Self {
		Self::new()
	}
}

impl Drop for CancelSource {
	fn drop(&mut self) {
		self.cancel();
	}
}

/// Observing side of a [`CancelSource`].
#[derive(Clone, Debug)]
pub struct CancelToken {
	flag: Option<Arc<AtomicBool>>,
	signal: Receiver<()>,
}

impl CancelToken {
	/// A token that is never cancelled.
	#[must_use]
	pub fn never() -> Self {
		Self {
			flag: None,
			signal: never(),
		}
	}

	#[must_use]
	pub fn is_cancelled(&self) -> bool {
		self.flag
			.as_ref()
			.is_some_and(|flag| flag.load(Ordering::Acquire))
	}

	/// Receiver that becomes ready (disconnected) once the source is cancelled.
	///
	/// Use it as a `recv` arm in `crossbeam_channel::select!` so blocking
	/// sends and receives abandon promptly when cancellation fires.
	#[must_use]
	pub fn signal(&self) -> &Receiver<()> {
		&self.signal
	}

	/// Block until cancelled or until `timeout` elapses; returns whether the
	/// token was cancelled.
	pub fn wait_timeout(&self, timeout: Duration) -> bool {
		match self.signal.recv_timeout(timeout) {
			Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
			Err(RecvTimeoutError::Timeout) => self.is_cancelled(),
		}
	}
}
