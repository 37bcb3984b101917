//! Format-B parser: line-oriented annotated text.
//!
//! ```text
//! ### Genesis
//! [1:1] In the beginning...
//! [1:2] And the earth was without form...
//! ```
//!
//! Lines that fit neither shape are skipped; one bad line never fails the
//! whole corpus.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use versecast_core::types::{Book, Chapter, Corpus, Verse};

const BOOK_HEADER: &str = "### ";

static VERSE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(\d+):(\d+)\]\s(.+)$").expect("verse line pattern is valid")
});

/// Classification of one non-empty source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    BookHeader(&'a str),
    Verse {
        chapter: u32,
        verse: u32,
        text: &'a str,
    },
    Ignored,
}

/// Classify a single line. Header detection looks at the raw line, so an
/// indented `###` is not a header.
pub fn classify(line: &str) -> Line<'_> {
    if let Some(name) = line.strip_prefix(BOOK_HEADER) {
        let name = name.trim();
        return if name.is_empty() { Line::Ignored } else { Line::BookHeader(name) };
    }

    let Some(caps) = VERSE_LINE.captures(line) else {
        return Line::Ignored;
    };

    let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    let (Some(chapter), Some(verse)) = (number(1), number(2)) else {
        return Line::Ignored;
    };
    let text = caps.get(3).map_or("", |m| m.as_str().trim());

    if chapter == 0 || verse == 0 || text.is_empty() {
        return Line::Ignored;
    }
    Line::Verse { chapter, verse, text }
}

/// Counters collected while parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub books: usize,
    pub verses: usize,
    /// Lines that matched no shape.
    pub ignored: usize,
    /// Verse lines seen before any book header.
    pub orphaned: usize,
}

/// Parse the full text of a Format-B corpus.
pub fn parse_text_corpus(raw: &str, name: &str) -> Corpus {
    parse_with_stats(raw, name).0
}

/// Same as [`parse_text_corpus`], decoding the bytes as UTF-8 lossily.
pub fn parse_text_bytes(raw: &[u8], name: &str) -> Corpus {
    parse_text_corpus(&String::from_utf8_lossy(raw), name)
}

pub fn parse_with_stats(raw: &str, name: &str) -> (Corpus, ParseStats) {
    let mut parser = TextParser::default();
    for line in raw.lines().filter(|l| !l.trim().is_empty()) {
        parser.feed(line);
    }
    let (corpus, stats) = parser.finish(name);

    tracing::debug!(
        "Parsed '{}': {} books, {} verses, {} ignored, {} orphaned",
        corpus.name,
        stats.books,
        stats.verses,
        stats.ignored,
        stats.orphaned
    );
    (corpus, stats)
}

/// Scan state: the books so far and which one verse lines attach to.
#[derive(Default)]
struct TextParser {
    books: Vec<Book>,
    current: Option<usize>,
    /// Chapter number → position in the current book's chapter list.
    chapter_index: HashMap<u32, usize>,
    stats: ParseStats,
}

impl TextParser {
    fn feed(&mut self, line: &str) {
        match classify(line) {
            Line::BookHeader(name) => {
                self.books.push(Book::new(name));
                self.current = Some(self.books.len() - 1);
                self.chapter_index.clear();
                self.stats.books += 1;
            }
            Line::Verse { chapter, verse, text } => {
                let Some(current) = self.current else {
                    self.stats.orphaned += 1;
                    return;
                };
                let book = &mut self.books[current];
                let slot = *self.chapter_index.entry(chapter).or_insert_with(|| {
                    book.chapters.push(Chapter::new(chapter));
                    book.chapters.len() - 1
                });
                book.chapters[slot].verses.push(Verse::new(verse, text));
                self.stats.verses += 1;
            }
            Line::Ignored => self.stats.ignored += 1,
        }
    }

    fn finish(mut self, name: &str) -> (Corpus, ParseStats) {
        for book in &mut self.books {
            book.normalize();
        }
        (Corpus::new(name, self.books), self.stats)
    }
}
