//! Worker thread hosting the [`SessionController`].
//!
//! Host events and filter-pass snapshots share one channel, so the
//! controller sees them in arrival order and never needs a lock of its own.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, unbounded};
use serde_json::Value;

use crate::event::Event;
use crate::notify::DisplaySink;
use crate::scorer::{FrizbeeScorer, Scorer};
use crate::session::{Message, SessionController};
use crate::settings::Settings;

/// Handle to a running finder.
///
/// Dropping the handle ends any live session without notifying the display
/// and joins the worker thread.
pub struct Finder {
	tx: Sender<Message>,
	worker: Option<JoinHandle<()>>,
}

impl Finder {
	/// Start a finder that scores with [`FrizbeeScorer`].
	pub fn spawn<S>(sink: S, settings: Settings) -> Self
	where
		S: DisplaySink + Send + 'static,
	{
		Self::with_scorer(sink, settings, || -> Box<dyn Scorer> {
			Box::new(FrizbeeScorer::default())
		})
	}

	/// Start a finder whose sessions score with scorers built by `factory`.
	pub fn with_scorer<S, F>(sink: S, settings: Settings, factory: F) -> Self
	where
		S: DisplaySink + Send + 'static,
		F: Fn() -> Box<dyn Scorer> + Send + 'static,
	{
		let (tx, rx) = unbounded();
		let controller = SessionController::new(settings, Box::new(factory), tx.clone());
		let worker = thread::spawn(move || worker_loop(controller, sink, rx));
		Self {
			tx,
			worker: Some(worker),
		}
	}

	/// Queue an event. Returns `false` once the worker has stopped.
	pub fn send(&self, event: Event) -> bool {
		self.tx.send(Message::Event(event)).is_ok()
	}

	/// Decode and queue a raw `[name, args...]` event. Malformed events are
	/// dropped and reported as `false`.
	pub fn dispatch(&self, args: &[Value]) -> bool {
		match Event::from_args(args) {
			Some(event) => self.send(event),
			None => false,
		}
	}

	/// Stop the worker and wait for it to exit.
	pub fn shutdown(mut self) {
		self.stop();
	}

	fn stop(&mut self) {
		let Some(worker) = self.worker.take() else {
			return;
		};
		let _ = self.tx.send(Message::Shutdown);
		if worker.join().is_err() {
			tracing::warn!("finder worker panicked");
		}
	}
}

impl Drop for Finder {
	fn drop(&mut self) {
		self.stop();
	}
}

fn worker_loop<S: DisplaySink>(mut controller: SessionController, mut sink: S, rx: Receiver<Message>) {
	while let Ok(message) = rx.recv() {
		if matches!(message, Message::Shutdown) {
			controller.shutdown();
			break;
		}
		for notification in controller.handle(message) {
			sink.notify(notification);
		}
	}
}
