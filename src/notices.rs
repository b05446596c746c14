use chrono::{
    DateTime,
    Duration,
    Utc,
};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// Transient, dismissible message shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: Uuid,
    pub kind: NoticeKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: NoticeKind, message: impl Into<String>) -> Uuid {
        let notice =
            Notice { id: Uuid::new_v4(), kind, message: message.into(), created_at: Utc::now() };
        let id = notice.id;
        self.notices.push(notice);
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> Uuid {
        self.push(NoticeKind::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> Uuid {
        self.push(NoticeKind::Error, message)
    }

    pub fn active(&self) -> &[Notice] {
        &self.notices
    }

    pub fn count(&self, kind: NoticeKind) -> usize {
        self.notices.iter().filter(|notice| notice.kind == kind).count()
    }

    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.notices.len();
        self.notices.retain(|notice| notice.id != id);
        self.notices.len() != before
    }

    /// Drops notices older than `ttl`, returning how many went away.
    pub fn expire_older_than(&mut self, ttl: Duration, now: DateTime<Utc>) -> usize {
        let before = self.notices.len();
        self.notices.retain(|notice| now - notice.created_at < ttl);
        before - self.notices.len()
    }

    pub fn clear(&mut self) {
        self.notices.clear();
    }
}
