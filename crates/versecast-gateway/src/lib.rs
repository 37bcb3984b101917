//! # Versecast Gateway
//! HTTP surface: subscribers add preferences, clients query the corpus.

pub mod routes;
pub mod server;

pub use server::{AppState, router, serve};
