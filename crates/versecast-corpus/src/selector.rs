//! Random verse selection.
//!
//! Three independent uniform draws: a book, a chapter of that book, a verse
//! of that chapter. Short books and chapters are therefore picked more often
//! than a flat draw over all verses would pick them.

use rand::Rng;

use versecast_core::error::{Result, VersecastError};
use versecast_core::types::{Corpus, Passage};

/// Draw a passage using the thread-local RNG.
pub fn select_random(corpus: Option<&Corpus>) -> Result<Passage> {
    select_random_with(corpus, &mut rand::thread_rng())
}

pub fn select_random_with<R: Rng + ?Sized>(corpus: Option<&Corpus>, rng: &mut R) -> Result<Passage> {
    let corpus = corpus.ok_or_else(|| VersecastError::not_loaded("no corpus available"))?;
    if !corpus.is_usable() {
        return Err(VersecastError::not_loaded(format!("'{}' has no books", corpus.name)));
    }

    let book = &corpus.books[rng.gen_range(0..corpus.books.len())];
    if book.chapters.is_empty() {
        return Err(VersecastError::not_loaded(format!(
            "'{}' has no chapters in {}",
            corpus.name, book.name
        )));
    }

    let chapter = &book.chapters[rng.gen_range(0..book.chapters.len())];
    if chapter.verses.is_empty() {
        return Err(VersecastError::not_loaded(format!(
            "'{}' has no verses in {} {}",
            corpus.name, book.name, chapter.number
        )));
    }

    let verse = &chapter.verses[rng.gen_range(0..chapter.verses.len())];
    Ok(Passage::new(book, chapter, verse))
}
