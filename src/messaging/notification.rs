// Notification system for surfacing errors and milestones in the UI

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// Area of the application a notification comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationCategory {
    Editor,
    Playback,
    Session,
    Export,
    Config,
}

/// Notification with timestamp and metadata
#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub category: NotificationCategory,
    pub message: String,
    /// Unix timestamp in milliseconds
    pub timestamp: u64,
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

impl Notification {
    /// Creates a notification stamped with the current time
    pub fn new(
        level: NotificationLevel,
        category: NotificationCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            category,
            message: message.into(),
            timestamp: now_millis(),
        }
    }

    pub fn info(category: NotificationCategory, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, category, message)
    }

    pub fn warning(category: NotificationCategory, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, category, message)
    }

    pub fn error(category: NotificationCategory, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, category, message)
    }

    /// True if the notification is younger than `max_age_ms`
    pub fn is_recent(&self, max_age_ms: u64) -> bool {
        now_millis().saturating_sub(self.timestamp) < max_age_ms
    }
}

/// Bounded queue of notifications; the oldest is dropped when full
#[derive(Debug)]
pub struct NotificationQueue {
    queue: VecDeque<Notification>,
    capacity: usize,
}

impl NotificationQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, notification: Notification) {
        let category = notification.category;
        let message = &notification.message;
        match notification.level {
            NotificationLevel::Error => tracing::error!(?category, "{}", message),
            NotificationLevel::Warning => tracing::warn!(?category, "{}", message),
            NotificationLevel::Info => tracing::info!(?category, "{}", message),
        }

        self.queue.push_back(notification);
        while self.queue.len() > self.capacity {
            self.queue.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.queue.back()
    }

    /// Notifications younger than `max_age_ms`, oldest first
    pub fn recent(&self, max_age_ms: u64) -> Vec<&Notification> {
        self.queue
            .iter()
            .filter(|n| n.is_recent(max_age_ms))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(10)
    }
}
