//! Delivery preferences: when, how, and from which translation a
//! subscriber receives a passage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, VersecastError};

/// Wall-clock time of day in 24-hour local time, written `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(VersecastError::validation(format!(
                "time of day out of range: {hour:02}:{minute:02}"
            )));
        }
        Ok(Self { hour, minute })
    }

    /// Truncate any chrono time value to its minute.
    pub fn of(time: &impl chrono::Timelike) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl FromStr for TimeOfDay {
    type Err = VersecastError;

    /// Strict `HH:MM`: two digits each side, nothing else.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || VersecastError::validation(format!("time must be HH:MM, got '{s}'"));

        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
        if !two_digits(h) || !two_digits(m) {
            return Err(invalid());
        }

        let hour = h.parse().map_err(|_| invalid())?;
        let minute = m.parse().map_err(|_| invalid())?;
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = VersecastError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Transport used to reach a subscriber.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryChannel {
    PushNotification,
    /// Accepted and stored, not dispatched yet.
    Email,
}

impl DeliveryChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryChannel::PushNotification => "push-notification",
            DeliveryChannel::Email => "email",
        }
    }
}

impl FromStr for DeliveryChannel {
    type Err = VersecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "push-notification" | "push" => Ok(DeliveryChannel::PushNotification),
            "email" => Ok(DeliveryChannel::Email),
            other => Err(VersecastError::validation(format!(
                "unknown delivery channel: '{other}'"
            ))),
        }
    }
}

impl fmt::Display for DeliveryChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional contact details a subscriber may leave alongside the token.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Unvalidated preference as it arrives from the outside.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceRequest {
    pub time_of_day: String,
    pub channel: String,
    pub translation: String,
    pub destination: String,
    #[serde(default)]
    pub contact: Option<Contact>,
}

impl PreferenceRequest {
    pub fn new(
        time_of_day: impl Into<String>,
        channel: impl Into<String>,
        translation: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            time_of_day: time_of_day.into(),
            channel: channel.into(),
            translation: translation.into(),
            destination: destination.into(),
            contact: None,
        }
    }
}

/// A stored, validated delivery preference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preference {
    pub id: uuid::Uuid,
    pub time_of_day: TimeOfDay,
    pub channel: DeliveryChannel,
    pub translation: String,
    pub destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<PreferenceRequest> for Preference {
    type Error = VersecastError;

    fn try_from(req: PreferenceRequest) -> Result<Self> {
        let time_of_day = req.time_of_day.trim().parse()?;
        let channel = req.channel.parse()?;

        let translation = req.translation.trim();
        if translation.is_empty() {
            return Err(VersecastError::validation("translation is required"));
        }
        let destination = req.destination.trim();
        if destination.is_empty() {
            return Err(VersecastError::validation("destination is required"));
        }

        Ok(Self {
            id: uuid::Uuid::new_v4(),
            time_of_day,
            channel,
            translation: translation.to_string(),
            destination: destination.to_string(),
            contact: req.contact,
            created_at: chrono::Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_of_day_parse() {
        let t: TimeOfDay = "08:00".parse().unwrap();
        assert_eq!((t.hour(), t.minute()), (8, 0));
        assert_eq!(t.to_string(), "08:00");

        let t: TimeOfDay = "23:59".parse().unwrap();
        assert_eq!(t.to_string(), "23:59");
    }

    #[test]
    fn test_time_of_day_rejects_bad_shapes() {
        for bad in ["8:00", "24:00", "12:60", "12-30", "1200", "ab:cd", "", "12:00:00", " 12:00"] {
            let err = bad.parse::<TimeOfDay>().unwrap_err();
            assert!(matches!(err, VersecastError::Validation(_)), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_time_of_day_from_chrono() {
        let time = chrono::NaiveTime::from_hms_opt(7, 45, 59).unwrap();
        assert_eq!(TimeOfDay::of(&time).to_string(), "07:45");
    }

    #[test]
    fn test_channel_parse() {
        assert_eq!(
            "push-notification".parse::<DeliveryChannel>().unwrap(),
            DeliveryChannel::PushNotification
        );
        assert_eq!("email".parse::<DeliveryChannel>().unwrap(), DeliveryChannel::Email);
        assert!("carrier-pigeon".parse::<DeliveryChannel>().is_err());
    }

    #[test]
    fn test_request_validation() {
        let req = PreferenceRequest::new("08:00", "push-notification", "KJV", "tok-1");
        let pref = Preference::try_from(req).unwrap();
        assert_eq!(pref.time_of_day.to_string(), "08:00");
        assert_eq!(pref.channel, DeliveryChannel::PushNotification);
        assert_eq!(pref.destination, "tok-1");

        let req = PreferenceRequest::new("08:00", "push-notification", "KJV", "  ");
        assert!(matches!(
            Preference::try_from(req),
            Err(VersecastError::Validation(_))
        ));

        let req = PreferenceRequest::new("8am", "push-notification", "KJV", "tok");
        assert!(Preference::try_from(req).is_err());
    }

    #[test]
    fn test_request_json_shape() {
        let json = r#"{"timeOfDay":"21:30","channel":"push-notification","translation":"BBE","destination":"https://push.example/abc","contact":{"name":"Ruth"}}"#;
        let req: PreferenceRequest = serde_json::from_str(json).unwrap();
        let pref = Preference::try_from(req).unwrap();
        assert_eq!(pref.translation, "BBE");
        assert_eq!(pref.contact.unwrap().name.as_deref(), Some("Ruth"));
    }

    #[test]
    fn test_preference_serializes_time_as_string() {
        let req = PreferenceRequest::new("06:05", "email", "KJV", "someone@example.com");
        let pref = Preference::try_from(req).unwrap();
        let json = serde_json::to_value(&pref).unwrap();
        assert_eq!(json["timeOfDay"], "06:05");
        assert_eq!(json["channel"], "email");
    }
}
