//! Corpus model: Translation → Book → Chapter → Verse.
//!
//! Field names on the wire follow the data files the service ships with
//! (`translation`, `books`, `chapter`, `verse`), so a Format-A document
//! deserializes straight into these types.

use serde::{Deserialize, Serialize};

/// A single verse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Verse {
    #[serde(rename = "verse")]
    pub number: u32,
    pub text: String,
}

impl Verse {
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// A chapter, verses ascending by number once normalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chapter {
    #[serde(rename = "chapter")]
    pub number: u32,
    #[serde(default)]
    pub verses: Vec<Verse>,
}

impl Chapter {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            verses: Vec::new(),
        }
    }

    pub fn verse(&self, number: u32) -> Option<&Verse> {
        self.verses.iter().find(|v| v.number == number)
    }
}

/// A book, chapters ascending by number once normalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    pub name: String,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

impl Book {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chapters: Vec::new(),
        }
    }

    pub fn chapter(&self, number: u32) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.number == number)
    }

    /// Sort chapters and the verses inside them. Both sorts are stable, so
    /// duplicate verse numbers keep their source order.
    pub fn normalize(&mut self) {
        self.chapters.sort_by_key(|c| c.number);
        for chapter in &mut self.chapters {
            chapter.verses.sort_by_key(|v| v.number);
        }
    }

    pub fn verse_count(&self) -> usize {
        self.chapters.iter().map(|c| c.verses.len()).sum()
    }
}

/// One complete translation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Corpus {
    #[serde(rename = "translation", default)]
    pub name: String,
    pub books: Vec<Book>,
}

impl Corpus {
    pub fn new(name: impl Into<String>, books: Vec<Book>) -> Self {
        Self {
            name: name.into(),
            books,
        }
    }

    /// A corpus can be sampled only when it has at least one book.
    pub fn is_usable(&self) -> bool {
        !self.books.is_empty()
    }

    /// Find a book by name, ignoring ASCII case.
    pub fn book(&self, name: &str) -> Option<&Book> {
        self.books
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn lookup(&self, book: &str, chapter: u32, verse: u32) -> Option<&Verse> {
        self.book(book)?.chapter(chapter)?.verse(verse)
    }

    pub fn chapter_count(&self) -> usize {
        self.books.iter().map(|b| b.chapters.len()).sum()
    }

    pub fn verse_count(&self) -> usize {
        self.books.iter().map(Book::verse_count).sum()
    }
}

/// A drawn verse, ready to be shown to a subscriber.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Passage {
    pub reference: String,
    pub text: String,
}

impl Passage {
    pub fn new(book: &Book, chapter: &Chapter, verse: &Verse) -> Self {
        Self {
            reference: format!("{} {}:{}", book.name, chapter.number, verse.number),
            text: verse.text.clone(),
        }
    }
}
