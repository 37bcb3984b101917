//! # Versecast Scheduler
//!
//! Decides, once per minute, which subscribers are due a passage and hands
//! each one to a notifier.
//!
//! ## Architecture
//! ```text
//! runner (tokio interval, minute-aligned)
//!   └── SchedulerEngine::tick(now)
//!         ├── PreferenceStore::snapshot()
//!         ├── due_preferences(mode, now, prefs)   ← pure, clock passed in
//!         ├── CorpusLibrary::select_random(translation)
//!         └── Notifier::deliver(destination, payload)  × N, concurrently
//! ```
//!
//! A failed delivery is logged and counted; it never stops the other
//! recipients of the same tick, and a bad tick never stops the runner.

pub mod engine;
pub mod notify;
pub mod schedule;
pub mod store;

pub use engine::{SchedulerEngine, TickReport};
pub use notify::{LogNotifier, PushRelayNotifier, create_notifier};
pub use schedule::{ScheduleMode, due_preferences};
pub use store::PreferenceStore;
