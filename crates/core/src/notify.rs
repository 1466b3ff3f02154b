//! Outbound notifications consumed by the display layer.

use crossbeam_channel::Sender;
use serde::Serialize;

/// Update sent to whatever renders the finder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
	Show,
	Hide,
	#[serde(rename = "pattern")]
	PatternChanged { text: String },
	#[serde(rename = "cursor")]
	CursorMoved { position: usize },
	/// The visible page: item texts, the selected row within the page and the
	/// highlighted positions of every visible item (empty when unhighlighted).
	#[serde(rename = "results")]
	ResultsUpdated {
		items: Vec<String>,
		selected: usize,
		positions: Vec<Vec<usize>>,
	},
	#[serde(rename = "select")]
	SelectionMoved { selected: usize },
}

/// Consumer of [`Notification`]s.
pub trait DisplaySink {
	fn notify(&mut self, notification: Notification);
}

impl DisplaySink for Sender<Notification> {
	fn notify(&mut self, notification: Notification) {
		if self.send(notification).is_err() {
			tracing::trace!("display sink hung up");
		}
	}
}

impl DisplaySink for Vec<Notification> {
	fn notify(&mut self, notification: Notification) {
		self.push(notification);
	}
}

impl<S: DisplaySink + ?Sized> DisplaySink for Box<S> {
	fn notify(&mut self, notification: Notification) {
		(**self).notify(notification);
	}
}
