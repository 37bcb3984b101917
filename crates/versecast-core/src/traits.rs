//! Seams between the scheduling core and its collaborators.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Notification;

/// Delivery collaborator: sends one notification to one destination.
///
/// Implementations own their own timeouts; the scheduler never waits on a
/// delivery longer than the notifier allows.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    async fn deliver(&self, destination: &str, notification: &Notification) -> Result<()>;
}
