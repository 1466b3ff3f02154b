use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, unbounded};
use fzshim_core::{Event, Finder, Notification, RunOptions, Score, Scorer, Settings, SourceSpec};
use serde_json::json;

const PATIENCE: Duration = Duration::from_secs(5);

fn substring_scorer() -> Box<dyn Scorer> {
	Box::new(|text: &str, pattern: &str| match text.find(pattern) {
		Some(offset) => Score {
			value: 50 - offset as i64,
			positions: Some((offset..offset + pattern.len()).collect()),
		},
		None => Score::no_match(),
	})
}

fn finder(throttle_ms: u64) -> (Finder, Receiver<Notification>) {
	let (tx, rx) = unbounded();
	let settings = Settings {
		throttle_ms,
		..Settings::default()
	};
	(Finder::with_scorer(tx, settings, substring_scorer), rx)
}

fn run(finder: &Finder, source: SourceSpec, max: usize) {
	assert!(finder.send(Event::Run(RunOptions {
		source,
		max: Some(max),
	})));
}

fn list(items: &[&str]) -> SourceSpec {
	SourceSpec::List(items.iter().map(|item| (*item).to_string()).collect())
}

fn items(notification: &Notification) -> Option<Vec<String>> {
	match notification {
		Notification::ResultsUpdated { items, .. } => Some(items.clone()),
		_ => None,
	}
}

/// Collect notifications until `done` accepts one, failing after `PATIENCE`.
fn recv_until(
	rx: &Receiver<Notification>,
	mut done: impl FnMut(&Notification) -> bool,
) -> Vec<Notification> {
	let deadline = Instant::now() + PATIENCE;
	let mut seen = Vec::new();
	loop {
		let remaining = deadline.saturating_duration_since(Instant::now());
		match rx.recv_timeout(remaining) {
			Ok(notification) => {
				let stop = done(&notification);
				seen.push(notification);
				if stop {
					return seen;
				}
			}
			Err(RecvTimeoutError::Timeout) => panic!("timed out; saw {seen:?}"),
			Err(RecvTimeoutError::Disconnected) => panic!("finder stopped; saw {seen:?}"),
		}
	}
}

fn quiet_for(rx: &Receiver<Notification>, window: Duration) -> Vec<Notification> {
	let deadline = Instant::now() + window;
	let mut seen = Vec::new();
	while let Ok(notification) = rx.recv_deadline(deadline) {
		seen.push(notification);
	}
	seen
}

#[test]
fn matching_candidates_rank_in_discovery_order() {
	let (finder, rx) = finder(100);
	run(&finder, list(&["apple", "apply", "banana"]), 10);
	recv_until(&rx, |n| items(n).is_some_and(|items| items.len() == 3));

	finder.send(Event::InsertChar('a'));
	finder.send(Event::InsertChar('p'));

	// Once the "ap" pattern is announced, the next results belong to it alone.
	let mut pattern_seen = false;
	let seen = recv_until(&rx, |n| {
		if *n == (Notification::PatternChanged { text: "ap".into() }) {
			pattern_seen = true;
			return false;
		}
		pattern_seen && items(n).is_some()
	});
	let last = seen.last().unwrap();
	assert_eq!(items(last).unwrap(), vec!["apple", "apply"]);
	let Notification::ResultsUpdated { positions, selected, .. } = last else {
		unreachable!();
	};
	assert_eq!(*selected, 0);
	assert_eq!(positions, &vec![vec![0, 1], vec![0, 1]]);
}

#[test]
fn empty_pattern_lists_everything_unhighlighted() {
	let (finder, rx) = finder(100);
	run(&finder, list(&["zeta", "alpha", "mid"]), 10);

	let seen = recv_until(&rx, |n| items(n).is_some_and(|items| items.len() == 3));
	assert_eq!(seen[0], Notification::Show);
	let Notification::ResultsUpdated { items, positions, .. } = seen.last().unwrap() else {
		unreachable!();
	};
	assert_eq!(items, &vec!["zeta", "alpha", "mid"]);
	assert!(positions.iter().all(Vec::is_empty));
}

#[test]
fn streamed_lines_publish_a_final_snapshot_without_waiting_for_a_tick() {
	// A throttle far longer than the test proves the final snapshot is eager.
	let (finder, rx) = finder(60_000);
	run(&finder, SourceSpec::Command("printf 'one\\ntwo\\nthree\\n'".into()), 10);

	let started = Instant::now();
	let seen = recv_until(&rx, |n| items(n).is_some());
	assert!(started.elapsed() < PATIENCE);
	assert_eq!(items(seen.last().unwrap()).unwrap(), vec!["one", "two", "three"]);
	assert!(quiet_for(&rx, Duration::from_millis(200)).is_empty());
}

#[test]
fn unterminated_trailing_output_still_counts() {
	let (finder, rx) = finder(60_000);
	run(&finder, SourceSpec::Command("printf 'a\\nb'".into()), 10);
	let seen = recv_until(&rx, |n| items(n).is_some());
	assert_eq!(items(seen.last().unwrap()).unwrap(), vec!["a", "b"]);
}

#[test]
fn cancelling_a_live_stream_goes_silent() {
	let (finder, rx) = finder(20);
	run(
		&finder,
		SourceSpec::Command("while true; do echo tick; sleep 0.01; done".into()),
		5,
	);
	recv_until(&rx, |n| items(n).is_some_and(|items| !items.is_empty()));

	finder.send(Event::Cancel);
	recv_until(&rx, |n| *n == Notification::Hide);
	assert!(quiet_for(&rx, Duration::from_millis(300)).is_empty());

	// Edits without a session are ignored.
	finder.send(Event::InsertChar('t'));
	assert!(quiet_for(&rx, Duration::from_millis(100)).is_empty());
}

#[test]
fn selection_wraps_around_the_result_set() {
	let (finder, rx) = finder(100);
	run(&finder, list(&["a", "b", "c"]), 2);
	recv_until(&rx, |n| items(n).is_some_and(|items| items.len() == 2));

	finder.send(Event::SelectPrevious);
	let seen = recv_until(&rx, |n| matches!(n, Notification::SelectionMoved { .. }));
	assert_eq!(
		seen,
		vec![
			Notification::ResultsUpdated {
				items: vec!["b".into(), "c".into()],
				selected: 1,
				positions: vec![vec![], vec![]],
			},
			Notification::SelectionMoved { selected: 1 },
		]
	);

	finder.send(Event::SelectNext);
	let seen = recv_until(&rx, |n| matches!(n, Notification::SelectionMoved { .. }));
	assert_eq!(items(&seen[0]).unwrap(), vec!["a", "b"]);
	assert_eq!(seen[1], Notification::SelectionMoved { selected: 0 });
}

#[test]
fn raw_events_decode_and_malformed_ones_are_dropped() {
	let (finder, rx) = finder(100);
	assert!(!finder.dispatch(&[json!("char")]));
	assert!(!finder.dispatch(&[json!(3)]));
	assert!(quiet_for(&rx, Duration::from_millis(50)).is_empty());

	assert!(finder.dispatch(&[json!("run"), json!({"source": ["x", 1, "y"], "max": 4})]));
	let seen = recv_until(&rx, |n| items(n).is_some_and(|items| items.len() == 2));
	assert_eq!(items(seen.last().unwrap()).unwrap(), vec!["x", "y"]);

	assert!(finder.dispatch(&[json!("char"), json!("y")]));
	let seen = recv_until(&rx, |n| items(n).is_some());
	assert_eq!(items(seen.last().unwrap()).unwrap(), vec!["y"]);
}

#[test]
fn a_new_run_replaces_the_old_session() {
	let (finder, rx) = finder(20);
	run(&finder, SourceSpec::Command("while true; do echo old; sleep 0.01; done".into()), 5);
	recv_until(&rx, |n| items(n).is_some_and(|items| !items.is_empty()));

	run(&finder, list(&["fresh"]), 5);
	recv_until(&rx, |n| *n == Notification::Show);
	let seen = recv_until(&rx, |n| items(n).is_some());
	assert_eq!(items(seen.last().unwrap()).unwrap(), vec!["fresh"]);
	assert!(
		quiet_for(&rx, Duration::from_millis(200))
			.iter()
			.filter_map(items)
			.all(|items| items == vec!["fresh"])
	);
}

#[test]
fn shutdown_joins_with_a_live_session() {
	let (finder, rx) = finder(20);
	run(&finder, SourceSpec::Command("while true; do echo x; sleep 0.01; done".into()), 5);
	recv_until(&rx, |n| items(n).is_some());
	finder.shutdown();
	// Only notifications already queued before shutdown may remain.
	let leftovers = quiet_for(&rx, Duration::from_millis(100));
	assert!(!leftovers.contains(&Notification::Hide));
}
