//! 辩论会话
//!
//! 进入辩论时创建，离开时丢弃，不做任何持久化。

use std::fmt::Display;

use crate::models::{DebateConfiguration, ResponseMode, Transcript, Turn};

/// 单场辩论的会话状态
#[derive(Debug, Clone)]
pub struct Session {
    configuration: DebateConfiguration,
    transcript: Transcript,
    /// 输入框中尚未发送的内容
    pending_input: String,
    /// 当前评委开关，只影响下一次调用
    judge_mode: bool,
}

impl Session {
    /// 用配置创建新会话，对话记录为空
    pub fn new(configuration: DebateConfiguration) -> Self {
        let judge_mode = configuration.judge_mode;
        Self {
            configuration,
            transcript: Transcript::new(),
            pending_input: String::new(),
            judge_mode,
        }
    }

    pub fn configuration(&self) -> &DebateConfiguration {
        &self.configuration
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    pub fn judge_mode(&self) -> bool {
        self.judge_mode
    }

    pub fn set_judge_mode(&mut self, enabled: bool) {
        self.judge_mode = enabled;
    }

    /// 当前开关对应的回复模式
    pub fn response_mode(&self) -> ResponseMode {
        ResponseMode::from_judge_flag(self.judge_mode)
    }

    pub(crate) fn append(&mut self, turn: Turn) {
        self.transcript.push(turn);
    }

    pub(crate) fn clear_pending_input(&mut self) {
        self.pending_input.clear();
    }
}

impl Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{} | {} | 评委模式: {}]",
            self.configuration.title(),
            self.configuration.description(),
            if self.judge_mode { "开" } else { "关" }
        )
    }
}
