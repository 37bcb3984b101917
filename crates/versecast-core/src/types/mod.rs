//! Core data types shared across Versecast crates.

pub mod corpus;
pub mod notification;
pub mod preference;

pub use corpus::{Book, Chapter, Corpus, Passage, Verse};
pub use notification::Notification;
pub use preference::{Contact, DeliveryChannel, Preference, PreferenceRequest, TimeOfDay};
