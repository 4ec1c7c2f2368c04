use serde::{Deserialize, Serialize};

/// Notification severity, mirroring the four categories the UI surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Injected notification capability. The playlist core signals all of its
/// user-visible outcomes through this trait and never talks to the
/// presentation layer directly.
pub trait Notifier {
    fn success(&mut self, message: &str);
    fn info(&mut self, message: &str);
    fn warning(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// Collects notices in emission order for the operation response, mirroring
/// each one to the log facade.
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Vec<Notice>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn into_notices(self) -> Vec<Notice> {
        self.notices
    }

    fn push(&mut self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Success | NoticeLevel::Info => log::info!("{}", message),
            NoticeLevel::Warning => log::warn!("{}", message),
            NoticeLevel::Error => log::error!("{}", message),
        }
        self.notices.push(Notice {
            level,
            message: message.to_string(),
        });
    }
}

impl Notifier for NoticeLog {
    fn success(&mut self, message: &str) {
        self.push(NoticeLevel::Success, message);
    }

    fn info(&mut self, message: &str) {
        self.push(NoticeLevel::Info, message);
    }

    fn warning(&mut self, message: &str) {
        self.push(NoticeLevel::Warning, message);
    }

    fn error(&mut self, message: &str) {
        self.push(NoticeLevel::Error, message);
    }
}
