//! The session controller: owns pattern, selection and window state, starts
//! candidate sources and filter passes, and turns every inbound message into
//! the notifications the display should receive.
//!
//! The controller is driven one [`Message`] at a time by a single owner (see
//! [`crate::runtime`]), so none of its state is shared. Background work only
//! talks back through [`Message::Snapshot`], tagged with the session and pass
//! ids; snapshots from a cancelled session or a superseded pass are dropped.

use std::sync::{Arc, Mutex};

use crossbeam_channel::Sender;

use crate::cancel::CancelSource;
use crate::candidate::ScoredCandidate;
use crate::event::{Event, RunOptions};
use crate::notify::Notification;
use crate::pass::{FilterPass, PassSnapshot, ScoringState};
use crate::pattern::Pattern;
use crate::scorer::Scorer;
use crate::settings::Settings;
use crate::source::spawn_source;
use crate::window::Window;

/// Input to the controller.
#[derive(Debug)]
pub enum Message {
	/// A host event.
	Event(Event),
	/// A ranking published by a filter pass.
	Snapshot(PassSnapshot),
	/// Stop the runtime loop.
	Shutdown,
}

/// Builds a scorer for each new session.
pub type ScorerFactory = Box<dyn Fn() -> Box<dyn Scorer> + Send>;

struct Session {
	id: u64,
	cancel: CancelSource,
	restart: CancelSource,
	pass: u64,
	pattern: Pattern,
	window: Window,
	results: Arc<[ScoredCandidate]>,
	scoring: Arc<Mutex<ScoringState>>,
}

impl Session {
	fn results_notification(&mut self) -> Notification {
		let total = self.results.len();
		self.window.fit(total);
		let visible = &self.results[self.window.range(total)];
		Notification::ResultsUpdated {
			items: visible.iter().map(|entry| entry.text().to_owned()).collect(),
			selected: self.window.relative_selection(),
			positions: visible
				.iter()
				.map(|entry| {
					entry
						.positions
						.as_deref()
						.map(<[usize]>::to_vec)
						.unwrap_or_default()
				})
				.collect(),
		}
	}

	fn pattern_notifications(&self) -> [Notification; 2] {
		[
			Notification::PatternChanged {
				text: self.pattern.text(),
			},
			Notification::CursorMoved {
				position: self.pattern.cursor(),
			},
		]
	}

	fn end(&mut self) {
		self.restart.cancel();
		self.cancel.cancel();
	}
}

/// Owns the state of the current finder session.
pub struct SessionController {
	settings: Settings,
	scorer_factory: ScorerFactory,
	tx: Sender<Message>,
	next_session: u64,
	active: Option<Session>,
}

impl SessionController {
	/// `tx` is the channel the controller's owner reads messages from; filter
	/// passes publish their snapshots through it.
	pub fn new(settings: Settings, scorer_factory: ScorerFactory, tx: Sender<Message>) -> Self {
		Self {
			settings,
			scorer_factory,
			tx,
			next_session: 0,
			active: None,
		}
	}

	#[must_use]
	pub fn is_active(&self) -> bool {
		self.active.is_some()
	}

	/// Handle one message and return the resulting notifications in order.
	pub fn handle(&mut self, message: Message) -> Vec<Notification> {
		match message {
			Message::Event(event) => self.handle_event(event),
			Message::Snapshot(snapshot) => self.apply_snapshot(snapshot),
			Message::Shutdown => {
				self.shutdown();
				Vec::new()
			}
		}
	}

	pub fn handle_event(&mut self, event: Event) -> Vec<Notification> {
		match event {
			Event::Run(options) => self.run(options),
			Event::InsertChar(ch) => self.insert_char(ch),
			Event::Backspace => self.backspace(),
			Event::CursorLeft => self.cursor_left(),
			Event::CursorRight => self.cursor_right(),
			Event::SelectNext => self.select_next(),
			Event::SelectPrevious => self.select_previous(),
			Event::Cancel => self.cancel(),
		}
	}

	/// End any previous session and start a new one.
	pub fn run(&mut self, options: RunOptions) -> Vec<Notification> {
		if let Some(mut previous) = self.active.take() {
			tracing::debug!(session = previous.id, "superseding finder session");
			previous.end();
		}

		self.next_session += 1;
		let id = self.next_session;
		let cancel = CancelSource::new();
		let live = spawn_source(
			options.source,
			&self.settings.shell,
			self.settings.channel_capacity,
			cancel.token(),
		);
		let max = options.max.unwrap_or(self.settings.page_size);
		tracing::debug!(session = id, max, "finder session started");

		let mut session = Session {
			id,
			cancel,
			restart: CancelSource::new(),
			pass: 0,
			pattern: Pattern::new(),
			window: Window::new(max),
			results: Arc::from(Vec::new()),
			scoring: Arc::new(Mutex::new(ScoringState::new((self.scorer_factory)(), live))),
		};

		let mut notifications = vec![Notification::Show];
		notifications.extend(session.pattern_notifications());
		self.start_pass(&mut session);
		self.active = Some(session);
		notifications
	}

	pub fn insert_char(&mut self, ch: char) -> Vec<Notification> {
		let Some(mut session) = self.active.take() else {
			return Vec::new();
		};
		session.pattern.insert(ch);
		let notifications = session.pattern_notifications().to_vec();
		self.start_pass(&mut session);
		self.active = Some(session);
		notifications
	}

	pub fn backspace(&mut self) -> Vec<Notification> {
		let Some(mut session) = self.active.take() else {
			return Vec::new();
		};
		let mut notifications = Vec::new();
		if session.pattern.backspace() {
			notifications.extend(session.pattern_notifications());
			self.start_pass(&mut session);
		}
		self.active = Some(session);
		notifications
	}

	pub fn cursor_left(&mut self) -> Vec<Notification> {
		self.move_cursor(Pattern::move_left)
	}

	pub fn cursor_right(&mut self) -> Vec<Notification> {
		self.move_cursor(Pattern::move_right)
	}

	fn move_cursor(&mut self, step: fn(&mut Pattern) -> bool) -> Vec<Notification> {
		let Some(session) = self.active.as_mut() else {
			return Vec::new();
		};
		step(&mut session.pattern);
		vec![Notification::CursorMoved {
			position: session.pattern.cursor(),
		}]
	}

	pub fn select_next(&mut self) -> Vec<Notification> {
		self.move_selection(Window::select_next)
	}

	pub fn select_previous(&mut self) -> Vec<Notification> {
		self.move_selection(Window::select_previous)
	}

	fn move_selection(&mut self, step: fn(&mut Window, usize) -> bool) -> Vec<Notification> {
		let Some(session) = self.active.as_mut() else {
			return Vec::new();
		};
		let mut notifications = Vec::new();
		if step(&mut session.window, session.results.len()) {
			notifications.push(session.results_notification());
		}
		notifications.push(Notification::SelectionMoved {
			selected: session.window.relative_selection(),
		});
		notifications
	}

	/// Hide the finder and end the session, stopping its source and passes.
	pub fn cancel(&mut self) -> Vec<Notification> {
		if let Some(mut session) = self.active.take() {
			tracing::debug!(session = session.id, "finder session cancelled");
			session.end();
		}
		vec![Notification::Hide]
	}

	/// End the active session without notifying the display.
	pub fn shutdown(&mut self) {
		if let Some(mut session) = self.active.take() {
			session.end();
		}
	}

	fn apply_snapshot(&mut self, snapshot: PassSnapshot) -> Vec<Notification> {
		let Some(session) = self.active.as_mut() else {
			return Vec::new();
		};
		if snapshot.session != session.id || snapshot.pass != session.pass {
			tracing::trace!(
				session = snapshot.session,
				pass = snapshot.pass,
				"dropping stale snapshot"
			);
			return Vec::new();
		}
		session.results = snapshot.results;
		vec![session.results_notification()]
	}

	fn start_pass(&self, session: &mut Session) {
		// Announce the newer pass before it queues for the scoring lock.
		session.restart.cancel();
		session.restart = CancelSource::new();
		session.pass += 1;

		let pass = FilterPass {
			session: session.id,
			id: session.pass,
			pattern: session.pattern.text(),
			throttle: self.settings.throttle(),
			session_cancel: session.cancel.token(),
			restart: session.restart.token(),
		};
		pass.spawn(Arc::clone(&session.scoring), self.tx.clone());
	}
}

impl Drop for SessionController {
	fn drop(&mut self) {
		self.shutdown();
	}
}
