//! # Versecast Corpus
//!
//! Turns raw translation files into the shared corpus model and draws
//! random passages from it.
//!
//! - [`json`]: Format-A, a structured document validated and deserialized as is.
//! - [`text`]: Format-B, `### Book` headers followed by `[chapter:verse] text` lines.
//! - [`selector`]: book → chapter → verse sampling.
//! - [`library`]: the loaded translations, keyed by id or label.

pub mod json;
pub mod library;
pub mod selector;
pub mod text;

pub use json::load_json_corpus;
pub use library::{CorpusLibrary, LibraryEntry};
pub use selector::{select_random, select_random_with};
pub use text::{parse_text_bytes, parse_text_corpus};
