// Messaging - user-facing notifications raised by editor operations

pub mod notification;

pub use notification::{Notification, NotificationCategory, NotificationLevel, NotificationQueue};
