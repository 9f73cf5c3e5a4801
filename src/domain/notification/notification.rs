//! Notification entity and per-kind delivery preferences.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{NotificationId, Timestamp, UserId};

/// What a notification is about; also the key for delivery preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Session,
    Pairing,
    Feedback,
    Progress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Unread,
    Read,
}

/// One in-app notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: UserId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub content: String,
    pub status: NotificationStatus,
    pub created_at: Timestamp,
}

impl Notification {
    pub fn new(
        recipient_id: UserId,
        kind: NotificationKind,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            recipient_id,
            kind,
            title: title.into(),
            content: content.into(),
            status: NotificationStatus::Unread,
            created_at: Timestamp::now(),
        }
    }

    pub fn mark_read(&mut self) {
        self.status = NotificationStatus::Read;
    }
}

/// Delivery channel toggles for one notification kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelPrefs {
    pub in_app: bool,
    pub email: bool,
    pub sms: bool,
}

impl Default for ChannelPrefs {
    fn default() -> Self {
        Self {
            in_app: true,
            email: true,
            sms: false,
        }
    }
}

/// Per-kind delivery preferences stored on the user account.
///
/// Fields default individually so a partially stored object (or the
/// migration's empty `{}`) still decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    #[serde(default)]
    pub session: ChannelPrefs,
    #[serde(default)]
    pub pairing: ChannelPrefs,
    #[serde(default)]
    pub feedback: ChannelPrefs,
    #[serde(default)]
    pub progress: ChannelPrefs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_notification_is_unread() {
        let n = Notification::new(
            UserId::new("u-1").unwrap(),
            NotificationKind::Pairing,
            "New pairing request",
            "An Nguyen wants to pair with you",
        );
        assert_eq!(n.status, NotificationStatus::Unread);
    }

    #[test]
    fn mark_read_flips_status() {
        let mut n = Notification::new(
            UserId::new("u-1").unwrap(),
            NotificationKind::Session,
            "t",
            "c",
        );
        n.mark_read();
        assert_eq!(n.status, NotificationStatus::Read);
    }

    #[test]
    fn default_prefs_enable_in_app_and_email_only() {
        let prefs = ChannelPrefs::default();
        assert!(prefs.in_app);
        assert!(prefs.email);
        assert!(!prefs.sms);
    }

    #[test]
    fn kind_serializes_as_type_field() {
        let n = Notification::new(
            UserId::new("u-1").unwrap(),
            NotificationKind::Feedback,
            "t",
            "c",
        );
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "feedback");
    }
}
