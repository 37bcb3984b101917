//! Format-A loader: an already structured JSON document.
//!
//! Nothing is parsed by hand here; the document is checked for a non-empty
//! `books` array, deserialized into the corpus model, then checked and sorted
//! so it holds the same guarantees as a parsed text corpus.

use versecast_core::error::{Result, VersecastError};
use versecast_core::types::{Book, Corpus};

/// Load a Format-A document. `default_name` is used when the document has
/// no `translation` field.
pub fn load_json_corpus(raw: &[u8], default_name: &str) -> Result<Corpus> {
    let value: serde_json::Value = serde_json::from_slice(raw)
        .map_err(|e| VersecastError::validation(format!("not a JSON document: {e}")))?;

    match value.get("books") {
        None => return Err(VersecastError::validation("document has no 'books' field")),
        Some(serde_json::Value::Array(books)) if books.is_empty() => {
            return Err(VersecastError::validation("'books' is empty"));
        }
        Some(serde_json::Value::Array(_)) => {}
        Some(_) => return Err(VersecastError::validation("'books' is not an array")),
    }

    let mut corpus: Corpus = serde_json::from_value(value)
        .map_err(|e| VersecastError::validation(format!("unexpected corpus shape: {e}")))?;

    if corpus.name.trim().is_empty() {
        corpus.name = default_name.to_string();
    }
    for book in &mut corpus.books {
        check_book(book)?;
        book.normalize();
    }
    Ok(corpus)
}

/// Numbers start at 1, names and verse text carry something besides whitespace.
fn check_book(book: &Book) -> Result<()> {
    if book.name.trim().is_empty() {
        return Err(VersecastError::validation("book with an empty name"));
    }
    for chapter in &book.chapters {
        if chapter.number == 0 {
            return Err(VersecastError::validation(format!(
                "{}: chapter number 0",
                book.name
            )));
        }
        for verse in &chapter.verses {
            if verse.number == 0 {
                return Err(VersecastError::validation(format!(
                    "{} {}: verse number 0",
                    book.name, chapter.number
                )));
            }
            if verse.text.trim().is_empty() {
                return Err(VersecastError::validation(format!(
                    "{} {}:{}: empty verse text",
                    book.name, chapter.number, verse.number
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_valid_document() {
        let raw = br#"{
            "translation": "King James Version",
            "books": [
                {"name": "Genesis", "chapters": [
                    {"chapter": 1, "verses": [
                        {"verse": 1, "text": "In the beginning God created the heaven and the earth."}
                    ]}
                ]}
            ]
        }"#;
        let corpus = load_json_corpus(raw, "fallback").unwrap();
        assert_eq!(corpus.name, "King James Version");
        assert!(corpus.is_usable());
        assert_eq!(corpus.lookup("Genesis", 1, 1).unwrap().number, 1);
    }

    #[test]
    fn test_default_name_when_missing() {
        let raw = br#"{"books":[{"name":"Jude","chapters":[]}]}"#;
        let corpus = load_json_corpus(raw, "KJV").unwrap();
        assert_eq!(corpus.name, "KJV");
    }

    #[test]
    fn test_rejects_missing_books() {
        let err = load_json_corpus(br#"{"translation":"x"}"#, "x").unwrap_err();
        assert!(matches!(err, VersecastError::Validation(_)));
        assert!(err.to_string().contains("no 'books'"));
    }

    #[test]
    fn test_rejects_non_array_books() {
        let err = load_json_corpus(br#"{"books":{"name":"Genesis"}}"#, "x").unwrap_err();
        assert!(err.to_string().contains("not an array"));
    }

    #[test]
    fn test_rejects_empty_books() {
        let err = load_json_corpus(br#"{"books":[]}"#, "x").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_rejects_bad_shape_and_bad_json() {
        let err = load_json_corpus(br#"{"books":[{"title":"Genesis"}]}"#, "x").unwrap_err();
        assert!(matches!(err, VersecastError::Validation(_)));

        let err = load_json_corpus(b"not json", "x").unwrap_err();
        assert!(matches!(err, VersecastError::Validation(_)));
    }

    #[test]
    fn test_out_of_order_document_is_sorted() {
        let raw = br#"{"books":[{"name":"Genesis","chapters":[
            {"chapter":2,"verses":[{"verse":3,"text":"c"},{"verse":1,"text":"a"}]},
            {"chapter":1,"verses":[{"verse":2,"text":"y"},{"verse":1,"text":"x"}]}
        ]}]}"#;
        let corpus = load_json_corpus(raw, "KJV").unwrap();
        let genesis = &corpus.books[0];
        let chapters: Vec<u32> = genesis.chapters.iter().map(|c| c.number).collect();
        assert_eq!(chapters, vec![1, 2]);
        let verses: Vec<u32> = genesis.chapters[1].verses.iter().map(|v| v.number).collect();
        assert_eq!(verses, vec![1, 3]);
        assert_eq!(corpus.lookup("genesis", 1, 1).unwrap().text, "x");
    }

    #[test]
    fn test_rejects_degenerate_entries() {
        let cases: [(&[u8], &str); 4] = [
            (br#"{"books":[{"name":"  ","chapters":[]}]}"#, "empty name"),
            (
                br#"{"books":[{"name":"Jude","chapters":[{"chapter":0,"verses":[]}]}]}"#,
                "chapter number 0",
            ),
            (
                br#"{"books":[{"name":"Jude","chapters":[{"chapter":1,"verses":[{"verse":0,"text":"t"}]}]}]}"#,
                "verse number 0",
            ),
            (
                br#"{"books":[{"name":"Jude","chapters":[{"chapter":1,"verses":[{"verse":1,"text":""}]}]}]}"#,
                "empty verse text",
            ),
        ];
        for (raw, expected) in cases {
            let err = load_json_corpus(raw, "x").unwrap_err();
            assert!(matches!(err, VersecastError::Validation(_)), "{expected}");
            assert!(err.to_string().contains(expected), "{err}");
        }
    }
}
