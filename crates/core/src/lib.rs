//! Incremental fuzzy filtering for editor finder panes.
//!
//! A finder session ingests candidate lines from a list or a live subprocess,
//! re-ranks them on every keystroke and publishes a paginated window of the
//! best matches to a [`DisplaySink`]. Scoring happens on background threads:
//! each query edit cancels the pass in flight, and closing the finder cancels
//! the whole session including the candidate source.
//!
//! ```no_run
//! use crossbeam_channel::unbounded;
//! use fzshim_core::{Event, Finder, Notification, RunOptions, Settings, SourceSpec};
//!
//! let (tx, rx) = unbounded::<Notification>();
//! let finder = Finder::spawn(tx, Settings::default());
//! finder.send(Event::Run(RunOptions {
//! 	source: SourceSpec::Command("git ls-files".into()),
//! 	max: Some(10),
//! }));
//! finder.send(Event::InsertChar('r'));
//! for notification in rx.iter().take(4) {
//! 	println!("{notification:?}");
//! }
//! finder.shutdown();
//! ```

pub mod cancel;
pub mod candidate;
pub mod event;
pub mod notify;
pub mod pass;
pub mod pattern;
pub mod ranking;
pub mod runtime;
pub mod scorer;
pub mod session;
pub mod settings;
pub mod source;
pub mod window;

pub use cancel::{CancelSource, CancelToken};
pub use candidate::{Candidate, ScoredCandidate};
pub use event::{Event, RunOptions};
pub use notify::{DisplaySink, Notification};
pub use pass::{FilterPass, PassOutcome, PassSnapshot, ScoringState};
pub use pattern::Pattern;
pub use ranking::RankedResults;
pub use runtime::Finder;
pub use scorer::{FrizbeeScorer, NEUTRAL_SCORE, NO_MATCH, Score, Scorer};
pub use session::{Message, SessionController};
pub use settings::Settings;
pub use source::{SourceError, SourceSpec, spawn_source};
pub use window::Window;
