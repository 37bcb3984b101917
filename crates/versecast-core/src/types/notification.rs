//! Push payload handed to a delivery collaborator.

use serde::{Deserialize, Serialize};

use super::corpus::Passage;

/// Structured message delivered to one destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

impl Notification {
    /// Body is the reference, a blank line, then the verse text.
    pub fn for_passage(
        passage: &Passage,
        title: impl Into<String>,
        icon: impl Into<String>,
        badge: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: format!("{}\n\n{}", passage.reference, passage.text),
            icon: icon.into(),
            badge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_passage_body() {
        let passage = Passage {
            reference: "John 11:35".into(),
            text: "Jesus wept.".into(),
        };
        let n = Notification::for_passage(&passage, "Daily", "/icon.png", None);
        assert_eq!(n.body, "John 11:35\n\nJesus wept.");

        let json = serde_json::to_value(&n).unwrap();
        assert!(json.get("badge").is_none());
        assert_eq!(json["icon"], "/icon.png");
    }
}
