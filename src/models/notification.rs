use std::fmt;

/// 通知类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

/// 临时通知（标题 + 描述），不持久化，也不阻塞后续输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind: NotificationKind::Info,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind: NotificationKind::Error,
        }
    }

    /// 生成失败时的通知
    pub fn generation_failed(message: impl fmt::Display) -> Self {
        Self::error("错误", format!("生成 AI 回复失败: {}", message))
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = match self.kind {
            NotificationKind::Info => "ℹ️",
            NotificationKind::Error => "❌",
        };
        write!(f, "{} {}: {}", icon, self.title, self.description)
    }
}
