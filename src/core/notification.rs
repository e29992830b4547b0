use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// Non-blocking user notice shown in the status bar
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: description.into(),
            created_at: Utc::now(),
        }
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, title, description)
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, title, description)
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, "Error", description)
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.created_at >= ttl
    }
}

/// FIFO of pending notifications; the front one is displayed
#[derive(Debug, Clone)]
pub struct Notifications {
    queue: VecDeque<Notification>,
    ttl: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(Duration::seconds(5))
    }
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            ttl,
        }
    }

    pub fn push(&mut self, notification: Notification) {
        self.queue.push_back(notification);
    }

    pub fn current(&self) -> Option<&Notification> {
        self.queue.front()
    }

    pub fn dismiss(&mut self) -> Option<Notification> {
        self.queue.pop_front()
    }

    /// Drop every notification older than the ttl
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.queue.retain(|n| !n.is_expired(now, ttl));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
