use chrono::{DateTime, Duration, Utc};
use nanoid::nanoid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

/// Transient toast shown in the top-right corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub level: Level,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Notifications {
    ttl: Duration,
    queue: Vec<Notification>,
}

impl Notifications {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            ttl: Duration::seconds(ttl_secs.max(0)),
            queue: Vec::new(),
        }
    }

    pub fn info(&mut self, title: impl Into<String>, message: impl Into<String>) -> &Notification {
        self.show(Level::Info, title.into(), message.into())
    }

    pub fn error(&mut self, title: impl Into<String>, message: impl Into<String>) -> &Notification {
        self.show(Level::Error, title.into(), message.into())
    }

    fn show(&mut self, level: Level, title: String, message: String) -> &Notification {
        let now = Utc::now();
        tracing::debug!(%title, ?level, "Notification shown");
        self.queue.push(Notification {
            id: nanoid!(),
            title,
            message,
            level,
            created_at: now,
            expires_at: now + self.ttl,
        });
        &self.queue[self.queue.len() - 1]
    }

    /// Notifications still visible at `now`; expired ones are dropped.
    pub fn visible(&mut self, now: DateTime<Utc>) -> &[Notification] {
        self.queue.retain(|n| n.expires_at > now);
        &self.queue
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.queue.last()
    }

    pub fn dismiss(&mut self, id: &str) {
        self.queue.retain(|n| n.id != id);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Remove and return everything queued.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.queue)
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_expire() {
        let mut notifications = Notifications::new(4);
        let created = notifications.info("Saved", "ok").created_at;

        assert_eq!(notifications.visible(created).len(), 1);
        assert!(notifications
            .visible(created + Duration::seconds(5))
            .is_empty());
    }

    #[test]
    fn test_dismiss_by_id() {
        let mut notifications = Notifications::default();
        let id = notifications.error("Oops", "failed").id.clone();
        notifications.info("Other", "still here");

        notifications.dismiss(&id);
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications.latest().unwrap().title, "Other");
    }
}
