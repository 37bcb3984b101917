//! Process-wide set of loaded translations.
//!
//! Built once at startup and shared behind `Arc`; nothing mutates a corpus
//! after it lands here.

use std::path::Path;
use std::sync::Arc;

use versecast_core::config::{CorpusFormat, TranslationConfig};
use versecast_core::error::{Result, VersecastError};
use versecast_core::types::{Corpus, Passage};

use crate::{json, selector, text};

/// One loaded translation.
#[derive(Debug, Clone)]
pub struct LibraryEntry {
    pub id: String,
    pub label: Option<String>,
    pub corpus: Arc<Corpus>,
}

impl LibraryEntry {
    fn matches(&self, key: &str) -> bool {
        let key = key.trim();
        self.id.eq_ignore_ascii_case(key) || self.label.as_deref() == Some(key)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CorpusLibrary {
    entries: Vec<LibraryEntry>,
}

impl CorpusLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a translation. A later entry with the same id replaces the earlier one.
    pub fn insert(&mut self, id: impl Into<String>, label: Option<String>, corpus: Corpus) {
        let id = id.into();
        self.entries.retain(|e| !e.id.eq_ignore_ascii_case(&id));
        self.entries.push(LibraryEntry {
            id,
            label,
            corpus: Arc::new(corpus),
        });
    }

    /// Look up by id (any case) or by exact label.
    pub fn get(&self, key: &str) -> Option<Arc<Corpus>> {
        self.entry(key).map(|e| Arc::clone(&e.corpus))
    }

    pub fn entry(&self, key: &str) -> Option<&LibraryEntry> {
        self.entries.iter().find(|e| e.matches(key))
    }

    pub fn entries(&self) -> &[LibraryEntry] {
        &self.entries
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Random passage from the named translation.
    pub fn select_random(&self, key: &str) -> Result<Passage> {
        let corpus = self
            .get(key)
            .ok_or_else(|| VersecastError::not_loaded(format!("unknown translation '{key}'")))?;
        selector::select_random(Some(&corpus))
    }

    /// Load every configured translation concurrently. Failures are logged and
    /// skipped so one broken file does not take the others down.
    pub async fn load_all(configs: &[TranslationConfig]) -> Self {
        let results = futures::future::join_all(configs.iter().map(load_translation)).await;

        let mut library = Self::new();
        for (config, result) in configs.iter().zip(results) {
            match result {
                Ok(corpus) => {
                    tracing::info!(
                        "📖 Loaded {} ({}): {} books, {} verses",
                        config.id,
                        corpus.name,
                        corpus.books.len(),
                        corpus.verse_count()
                    );
                    library.insert(config.id.clone(), config.label.clone(), corpus);
                }
                Err(e) => tracing::error!("Failed to load translation {}: {e}", config.id),
            }
        }
        library
    }
}

/// Read and decode one configured translation.
pub async fn load_translation(config: &TranslationConfig) -> Result<Corpus> {
    load_file(&config.resolved_path(), config.format, config.display_name()).await
}

pub async fn load_file(path: &Path, format: CorpusFormat, name: &str) -> Result<Corpus> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|e| VersecastError::load(format!("{}: {e}", path.display())))?;

    match format {
        CorpusFormat::Json => json::load_json_corpus(&raw, name),
        CorpusFormat::Text => Ok(text::parse_text_bytes(&raw, name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BBE: &str = "### Genesis\n[1:1] At the first God made the heaven and the earth.\n";
    const KJV: &str = r#"{"translation":"King James Version","books":[{"name":"Genesis","chapters":[{"chapter":1,"verses":[{"verse":1,"text":"In the beginning God created the heaven and the earth."}]}]}]}"#;

    fn translation(id: &str, format: CorpusFormat, path: &Path) -> TranslationConfig {
        TranslationConfig {
            id: id.into(),
            label: Some(format!("Label {id}")),
            format,
            path: path.display().to_string(),
            name: None,
        }
    }

    #[test]
    fn test_get_by_id_and_label() {
        let mut library = CorpusLibrary::new();
        library.insert("BBE", Some("Bible in Basic English (BBE)".into()), text::parse_text_corpus(BBE, "BBE"));

        assert!(library.get("bbe").is_some());
        assert!(library.get("Bible in Basic English (BBE)").is_some());
        assert!(library.get("KJV").is_none());
        assert_eq!(library.ids(), vec!["BBE"]);
    }

    #[test]
    fn test_insert_replaces_same_id() {
        let mut library = CorpusLibrary::new();
        library.insert("KJV", None, Corpus::new("old", vec![]));
        library.insert("kjv", None, text::parse_text_corpus(BBE, "new"));
        assert_eq!(library.len(), 1);
        assert_eq!(library.get("KJV").unwrap().name, "new");
    }

    #[test]
    fn test_select_random_unknown_translation() {
        let library = CorpusLibrary::new();
        let err = library.select_random("KJV").unwrap_err();
        assert!(matches!(err, VersecastError::NotLoaded(_)));
    }

    #[tokio::test]
    async fn test_load_all_skips_broken_translation() {
        let dir = tempfile::tempdir().unwrap();
        let kjv = dir.path().join("KJV.json");
        let bbe = dir.path().join("BBE.txt");
        std::fs::write(&kjv, KJV).unwrap();
        std::fs::write(&bbe, BBE).unwrap();

        let configs = vec![
            translation("KJV", CorpusFormat::Json, &kjv),
            translation("BBE", CorpusFormat::Text, &bbe),
            translation("ASV", CorpusFormat::Json, &dir.path().join("missing.json")),
        ];
        let library = CorpusLibrary::load_all(&configs).await;

        assert_eq!(library.ids(), vec!["KJV", "BBE"]);
        assert_eq!(library.get("KJV").unwrap().name, "King James Version");
        // Text corpora carry the configured display name.
        assert_eq!(library.get("BBE").unwrap().name, "Label BBE");
        let passage = library.select_random("BBE").unwrap();
        assert_eq!(passage.reference, "Genesis 1:1");
    }

    #[tokio::test]
    async fn test_load_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("nope.txt"), CorpusFormat::Text, "t").await.unwrap_err();
        assert!(matches!(err, VersecastError::Load(_)));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"books":[]}"#).unwrap();
        let err = load_file(&bad, CorpusFormat::Json, "t").await.unwrap_err();
        assert!(matches!(err, VersecastError::Validation(_)));
    }
}
