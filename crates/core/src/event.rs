//! Inbound finder events and their decoding from loosely typed RPC arguments.
//!
//! Hosts deliver events as `[name, args...]` arrays. Anything malformed
//! decodes to `None` and is dropped without touching session state.

use serde_json::{Map, Value};

use crate::source::SourceSpec;

/// Parameters of a `run` event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
	pub source: SourceSpec,
	/// Page capacity. `None` defers to the configured default.
	pub max: Option<usize>,
}

impl RunOptions {
	/// Decode run options from an options object. Returns `None` when the
	/// value is not an object.
	#[must_use]
	pub fn from_value(value: &Value) -> Option<Self> {
		let options = value.as_object()?;
		Some(Self {
			source: source_from_options(options),
			max: options
				.get("max")
				.and_then(Value::as_u64)
				.filter(|max| *max > 0)
				.and_then(|max| usize::try_from(max).ok()),
		})
	}
}

fn source_from_options(options: &Map<String, Value>) -> SourceSpec {
	match options.get("source") {
		None | Some(Value::Null) => SourceSpec::Empty,
		Some(Value::Array(items)) => SourceSpec::List(
			items
				.iter()
				.filter_map(Value::as_str)
				.map(str::to_owned)
				.collect(),
		),
		Some(Value::String(command)) => SourceSpec::Command(command.clone()),
		Some(other) => {
			tracing::warn!(kind = value_kind(other), "unsupported finder source, showing no candidates");
			SourceSpec::Empty
		}
	}
}

fn value_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "bool",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

/// Event delivered by the host editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
	Run(RunOptions),
	InsertChar(char),
	Backspace,
	CursorLeft,
	CursorRight,
	SelectNext,
	SelectPrevious,
	Cancel,
}

impl Event {
	/// Decode `[name, args...]`.
	///
	/// `char` carries a string argument of which only the first character
	/// is inserted.
	#[must_use]
	pub fn from_args(args: &[Value]) -> Option<Self> {
		let (name, rest) = args.split_first()?;
		let event = match name.as_str()? {
			"run" => Self::Run(RunOptions::from_value(rest.first()?)?),
			"char" => Self::InsertChar(rest.first()?.as_str()?.chars().next()?),
			"backspace" => Self::Backspace,
			"left" => Self::CursorLeft,
			"right" => Self::CursorRight,
			"down" => Self::SelectNext,
			"up" => Self::SelectPrevious,
			"cancel" => Self::Cancel,
			unknown => {
				tracing::debug!(event = unknown, "ignoring unhandled finder event");
				return None;
			}
		};
		Some(event)
	}
}
