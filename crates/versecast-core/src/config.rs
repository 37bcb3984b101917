//! Configuration loaded from `~/.versecast/config.toml`.
//!
//! Every section has defaults, so a missing file yields a working
//! configuration that reads `public/data/KJV.json` and `public/data/BBE.txt`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{Result, VersecastError};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersecastConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_translations")]
    pub translations: Vec<TranslationConfig>,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
    #[serde(default)]
    pub push: PushConfig,
}

impl Default for VersecastConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            translations: default_translations(),
            schedule: ScheduleConfig::default(),
            notification: NotificationConfig::default(),
            push: PushConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Raw encoding of a translation file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CorpusFormat {
    /// Structured document (`{ translation, books: [...] }`).
    Json,
    /// Line-oriented `### Book` / `[c:v] text` annotations.
    Text,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Short key subscribers pick, e.g. `KJV`.
    pub id: String,
    /// Human label, also accepted as a key, e.g. `King James Version (KJV)`.
    #[serde(default)]
    pub label: Option<String>,
    pub format: CorpusFormat,
    pub path: String,
    /// Translation name for documents that do not carry one.
    #[serde(default)]
    pub name: Option<String>,
}

impl TranslationConfig {
    pub fn resolved_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.path).to_string())
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.label.as_deref())
            .unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleKind {
    #[default]
    EveryMinute,
    Daily,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub mode: ScheduleKind,
    /// Hour (0-23) the daily variant fires at.
    #[serde(default = "default_daily_hour")]
    pub daily_hour: u8,
    #[serde(default = "default_translation")]
    pub default_translation: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            mode: ScheduleKind::default(),
            daily_hour: default_daily_hour(),
            default_translation: default_translation(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    /// `badge = ""` turns the badge off.
    #[serde(default = "default_badge", with = "optional_path")]
    pub badge: Option<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            icon: default_icon(),
            badge: default_badge(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Relay that forwards payloads to the push service. Deliveries are only
    /// logged when unset.
    #[serde(default)]
    pub relay_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Contact URI announced to the relay (`mailto:` or `https:`).
    #[serde(default)]
    pub vapid_subject: Option<String>,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            relay_url: None,
            timeout_secs: default_timeout_secs(),
            vapid_subject: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 5000 }
fn default_daily_hour() -> u8 { 8 }
fn default_translation() -> String { "KJV".into() }
fn default_title() -> String { "🌿 Today's Spiritual Nourishment 🌿".into() }
fn default_icon() -> String { "/icon.png".into() }
fn default_badge() -> Option<String> { Some("/badge.png".into()) }
fn default_timeout_secs() -> u64 { 10 }

/// TOML has no null: an empty string stands for `None` in both directions.
mod optional_path {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.filter(|v| !v.trim().is_empty()))
    }
}

fn default_translations() -> Vec<TranslationConfig> {
    vec![
        TranslationConfig {
            id: "KJV".into(),
            label: Some("King James Version (KJV)".into()),
            format: CorpusFormat::Json,
            path: "public/data/KJV.json".into(),
            name: Some("King James Version".into()),
        },
        TranslationConfig {
            id: "BBE".into(),
            label: Some("Bible in Basic English (BBE)".into()),
            format: CorpusFormat::Text,
            path: "public/data/BBE.txt".into(),
            name: Some("Bible in Basic English".into()),
        },
    ]
}

impl VersecastConfig {
    /// Default config file path.
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".versecast").join("config.toml")
    }

    /// Load from the default path, falling back to defaults when absent.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            let mut config = Self::default();
            config.apply_env();
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            VersecastError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut config = Self::from_toml(&content)?;
        config.apply_env();
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| VersecastError::config(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| VersecastError::config(e.to_string()))
    }

    /// `PORT` overrides the configured server port.
    pub fn apply_env(&mut self) {
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.schedule.daily_hour > 23 {
            return Err(VersecastError::config(format!(
                "schedule.daily_hour must be 0-23, got {}",
                self.schedule.daily_hour
            )));
        }
        if self.translations.is_empty() {
            return Err(VersecastError::config("at least one translation is required"));
        }
        let mut seen = HashSet::new();
        for t in &self.translations {
            if t.id.trim().is_empty() {
                return Err(VersecastError::config("translation id must not be empty"));
            }
            if !seen.insert(t.id.to_ascii_lowercase()) {
                return Err(VersecastError::config(format!("duplicate translation id: {}", t.id)));
            }
        }
        Ok(())
    }

    pub fn translation(&self, key: &str) -> Option<&TranslationConfig> {
        self.translations.iter().find(|t| {
            t.id.eq_ignore_ascii_case(key) || t.label.as_deref() == Some(key)
        })
    }
}
