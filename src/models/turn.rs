use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// 发言方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Ai,
}

impl Speaker {
    /// 终端显示用的标签
    pub fn label(self) -> &'static str {
        match self {
            Speaker::User => "你",
            Speaker::Ai => "AI",
        }
    }
}

/// 一条发言，创建后不可变
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    text: String,
    speaker: Speaker,
    created_at: DateTime<Local>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Speaker::User)
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self::new(text, Speaker::Ai)
    }

    fn new(text: impl Into<String>, speaker: Speaker) -> Self {
        Self {
            text: text.into(),
            speaker,
            created_at: Local::now(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn is_user(&self) -> bool {
        self.speaker == Speaker::User
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }
}

/// 对话记录
///
/// 只能追加，顺序即时间顺序（最新的在最后）。
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}
