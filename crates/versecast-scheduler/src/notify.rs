//! Delivery collaborators.
//!
//! `PushRelayNotifier` forwards each payload to an HTTP relay that owns the
//! push protocol; `LogNotifier` only logs and is used when no relay is set.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use versecast_core::config::PushConfig;
use versecast_core::error::{Result, VersecastError};
use versecast_core::traits::Notifier;
use versecast_core::types::Notification;

/// Pick the notifier the configuration asks for.
pub fn create_notifier(config: &PushConfig) -> Result<Arc<dyn Notifier>> {
    match &config.relay_url {
        Some(url) if !url.trim().is_empty() => Ok(Arc::new(PushRelayNotifier::new(config)?)),
        _ => {
            tracing::warn!("No push relay configured, deliveries will only be logged");
            Ok(Arc::new(LogNotifier))
        }
    }
}

/// Posts `{ destination, payload }` to a push relay.
pub struct PushRelayNotifier {
    relay_url: String,
    subject: Option<String>,
    client: reqwest::Client,
}

impl PushRelayNotifier {
    pub fn new(config: &PushConfig) -> Result<Self> {
        let relay_url = config
            .relay_url
            .clone()
            .ok_or_else(|| VersecastError::config("push.relay_url is not set"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(concat!("Versecast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VersecastError::config(format!("push client: {e}")))?;

        Ok(Self {
            relay_url,
            subject: config.vapid_subject.clone(),
            client,
        })
    }

    fn body(destination: &str, notification: &Notification) -> serde_json::Value {
        serde_json::json!({
            "destination": destination,
            "payload": notification,
        })
    }
}

#[async_trait]
impl Notifier for PushRelayNotifier {
    fn name(&self) -> &str { "push-relay" }

    async fn deliver(&self, destination: &str, notification: &Notification) -> Result<()> {
        let mut request = self
            .client
            .post(&self.relay_url)
            .json(&Self::body(destination, notification));
        if let Some(subject) = &self.subject {
            request = request.header("X-Vapid-Subject", subject);
        }

        let response = request
            .send()
            .await
            .map_err(|e| VersecastError::delivery(format!("push relay unreachable: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(VersecastError::delivery(format!("push relay {status}: {text}")));
        }
        Ok(())
    }
}

/// Logs each notification instead of sending it.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str { "log" }

    async fn deliver(&self, destination: &str, notification: &Notification) -> Result<()> {
        tracing::info!(
            "🔔 [{}] {} → {}",
            destination,
            notification.title,
            notification.body.replace("\n\n", " — ")
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Notification {
        Notification {
            title: "Daily".into(),
            body: "Psalms 46:10\n\nBe still, and know that I am God".into(),
            icon: "/icon.png".into(),
            badge: Some("/badge.png".into()),
        }
    }

    #[test]
    fn test_relay_body() {
        let body = PushRelayNotifier::body("tok-1", &sample());
        assert_eq!(body["destination"], "tok-1");
        assert_eq!(body["payload"]["title"], "Daily");
        assert_eq!(body["payload"]["badge"], "/badge.png");
    }

    #[test]
    fn test_create_notifier_falls_back_to_log() {
        let notifier = create_notifier(&PushConfig::default()).unwrap();
        assert_eq!(notifier.name(), "log");

        let config = PushConfig {
            relay_url: Some("http://127.0.0.1:9/push".into()),
            ..PushConfig::default()
        };
        assert_eq!(create_notifier(&config).unwrap().name(), "push-relay");
    }

    #[tokio::test]
    async fn test_log_notifier_succeeds() {
        LogNotifier.deliver("tok-1", &sample()).await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_delivery_error() {
        let config = PushConfig {
            relay_url: Some("http://127.0.0.1:9/push".into()),
            timeout_secs: 2,
            vapid_subject: Some("mailto:ops@example.com".into()),
        };
        let notifier = PushRelayNotifier::new(&config).unwrap();
        let err = notifier.deliver("tok-1", &sample()).await.unwrap_err();
        assert!(matches!(err, VersecastError::Delivery(_)));
    }
}
