//! Notification domain module - in-app notifications and delivery settings.

mod notification;

pub use notification::{
    ChannelPrefs, Notification, NotificationKind, NotificationSettings, NotificationStatus,
};
