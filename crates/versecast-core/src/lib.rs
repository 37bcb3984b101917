//! # Versecast Core
//!
//! Shared building blocks for the Versecast crates: the corpus and
//! preference data model, the unified error type, the `Notifier` seam used
//! by the scheduler, and TOML configuration.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::VersecastConfig;
pub use error::{Result, VersecastError};
