//! Candidate sources: a fixed list or the stdout of a shell command.
//!
//! Both variants feed a bounded channel in discovery order and close it when
//! they run dry. Producers block while the channel is full, but every blocked
//! send also listens to the session's [`CancelToken`] so closing the finder
//! never waits on a slow consumer.

use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, Command, Stdio};
use std::thread;

use crossbeam_channel::{Receiver, Sender, bounded, select};
use thiserror::Error;

use crate::cancel::CancelToken;

/// Where a session's candidates come from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SourceSpec {
	/// No candidates at all.
	#[default]
	Empty,
	/// A finite, already known list.
	List(Vec<String>),
	/// A shell command whose stdout lines become candidates.
	Command(String),
}

/// Failures while starting a command source.
#[derive(Debug, Error)]
pub enum SourceError {
	#[error("no shell configured to run `{command}`")]
	EmptyShell { command: String },

	#[error("failed to spawn `{command}`")]
	Spawn {
		command: String,
		#[source]
		source: io::Error,
	},

	#[error("`{command}` was started without a stdout pipe")]
	MissingStdout { command: String },
}

/// Start producing candidates for `spec` and return the receiving end.
///
/// The receiver disconnects once the source is exhausted, fails, or is
/// cancelled. Failures to start a command are logged and behave like an
/// empty source.
pub fn spawn_source(
	spec: SourceSpec,
	shell: &[String],
	capacity: usize,
	cancel: CancelToken,
) -> Receiver<String> {
	let (tx, rx) = bounded(capacity.max(1));
	match spec {
		SourceSpec::Empty => {}
		SourceSpec::List(items) => {
			thread::spawn(move || {
				for item in items {
					if !emit(&tx, item, &cancel) {
						break;
					}
				}
			});
		}
		SourceSpec::Command(command) => {
			if let Err(err) = spawn_command(&command, shell, tx, cancel) {
				tracing::warn!(error = %err, "candidate source unavailable");
			}
		}
	}
	rx
}

/// Send one candidate, giving up if the session is cancelled first or the
/// consumer went away. Returns whether the producer should keep going.
fn emit(tx: &Sender<String>, candidate: String, cancel: &CancelToken) -> bool {
	if cancel.is_cancelled() {
		return false;
	}
	select! {
		send(tx, candidate) -> sent => sent.is_ok(),
		recv(cancel.signal()) -> _ => false,
	}
}

fn spawn_command(
	command: &str,
	shell: &[String],
	tx: Sender<String>,
	cancel: CancelToken,
) -> Result<(), SourceError> {
	let Some((program, args)) = shell.split_first() else {
		return Err(SourceError::EmptyShell {
			command: command.to_owned(),
		});
	};

	let mut child = Command::new(program)
		.args(args)
		.arg(command)
		.stdin(Stdio::null())
		.stdout(Stdio::piped())
		.stderr(Stdio::null())
		.spawn()
		.map_err(|source| SourceError::Spawn {
			command: command.to_owned(),
			source,
		})?;

	let Some(stdout) = child.stdout.take() else {
		reap(&mut child);
		return Err(SourceError::MissingStdout {
			command: command.to_owned(),
		});
	};
	tracing::debug!(command, pid = child.id(), "candidate command started");

	let (done_tx, done_rx) = bounded::<()>(0);
	let supervisor_cancel = cancel.clone();
	thread::spawn(move || {
		// The reader drops `done_tx` when it stops, which disconnects `done_rx`.
		select! {
			recv(supervisor_cancel.signal()) -> _ => {
				let _ = child.kill();
			}
			recv(done_rx) -> _ => {}
		}
		reap(&mut child);
	});

	thread::spawn(move || {
		let _done = done_tx;
		stream_lines(stdout, &tx, &cancel);
	});

	Ok(())
}

fn reap(child: &mut Child) {
	match child.wait() {
		Ok(status) => tracing::trace!(%status, "candidate command exited"),
		Err(err) => tracing::debug!(error = %err, "failed to reap candidate command"),
	}
}

/// Split `reader` on `\n` and emit every completed line as soon as it is
/// read. An unterminated final line is emitted on clean end of input and
/// dropped when the read fails.
pub fn stream_lines<R: Read>(reader: R, tx: &Sender<String>, cancel: &CancelToken) {
	let mut reader = BufReader::new(reader);
	let mut line = Vec::new();
	loop {
		line.clear();
		match reader.read_until(b'\n', &mut line) {
			Ok(0) => return,
			Ok(_) => {
				if line.last() == Some(&b'\n') {
					line.pop();
				}
				let candidate = String::from_utf8_lossy(&line).into_owned();
				if !emit(tx, candidate, cancel) {
					return;
				}
			}
			Err(err) => {
				tracing::debug!(error = %err, "candidate stream ended with a read error");
				return;
			}
		}
	}
}
