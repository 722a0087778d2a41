//! 回合控制 - 流程层
//!
//! 核心职责：定义"一个回合"的完整流程
//!
//! 流程顺序：
//! 1. submit：校验输入 → 追加用户发言 → 进入等待状态
//! 2. resolve：在控制器之外等待外部调用（带超时和取消）
//! 3. complete：成功则追加 AI 发言，失败则产生错误通知 → 回到空闲状态

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::{AppResult, GenerationError, ValidationError};
use crate::models::{DebateConfiguration, Notification, ResponseMode, Turn};
use crate::services::{PromptAssembler, PromptInput};
use crate::utils::logging::truncate_text;
use crate::workflow::session::Session;

/// 控制器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// 等待用户输入
    Idle,
    /// 外部调用进行中
    AwaitingResponse,
}

/// 回合结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// 已追加 AI 发言
    Replied(String),
    /// 调用失败，未追加任何发言
    Failed(Notification),
    /// 结果不属于当前等待的回合，已丢弃
    Discarded,
}

/// 已提交、等待外部回复的回合
///
/// 创建时就确定了回复模式，之后切换评委开关不会影响它。
#[derive(Debug)]
#[must_use = "控制器会一直处于等待状态，直到回合被 complete 或 abandon"]
pub struct PendingTurn {
    seq: u64,
    mode: ResponseMode,
    input: PromptInput,
}

impl PendingTurn {
    pub fn mode(&self) -> ResponseMode {
        self.mode
    }

    pub fn input(&self) -> &PromptInput {
        &self.input
    }

    /// 调用提示词组装服务，受超时和取消令牌约束
    pub async fn resolve(
        self,
        assembler: &PromptAssembler,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> ResolvedTurn {
        let call = tokio::time::timeout(timeout, assembler.respond(self.mode, &self.input));

        let result: AppResult<String> = tokio::select! {
            _ = cancel.cancelled() => Err(GenerationError::Cancelled.into()),
            outcome = call => match outcome {
                Ok(result) => result,
                Err(_) => Err(GenerationError::Timeout { secs: timeout.as_secs() }.into()),
            },
        };

        ResolvedTurn {
            seq: self.seq,
            result,
        }
    }
}

/// 外部调用已经结束的回合
#[derive(Debug)]
pub struct ResolvedTurn {
    seq: u64,
    result: AppResult<String>,
}

impl ResolvedTurn {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// 回合控制器
///
/// - 独占一个会话，是对话记录唯一的写入者
/// - 同一时间最多只有一个外部调用
/// - 不持有生成服务，调用在控制器借用之外进行
#[derive(Debug)]
pub struct TurnController {
    session: Session,
    state: ControllerState,
    next_seq: u64,
    in_flight: Option<u64>,
}

impl TurnController {
    /// 用配置创建新会话，初始状态为空闲
    pub fn new(configuration: DebateConfiguration) -> Self {
        Self {
            session: Session::new(configuration),
            state: ControllerState::Idle,
            next_seq: 0,
            in_flight: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.session.set_pending_input(text);
    }

    /// 切换评委模式，任意状态下都可以调用，返回切换后的值
    pub fn toggle_judge_mode(&mut self) -> bool {
        let enabled = !self.session.judge_mode();
        self.session.set_judge_mode(enabled);
        info!("⚖️ 评委模式: {}", if enabled { "开" } else { "关" });
        enabled
    }

    pub fn set_judge_mode(&mut self, enabled: bool) {
        self.session.set_judge_mode(enabled);
    }

    /// 提交输入框中的内容
    pub fn submit_pending(&mut self) -> Result<PendingTurn, ValidationError> {
        let input = self.session.pending_input().to_string();
        self.submit(&input)
    }

    /// 提交一条用户输入
    ///
    /// 空白输入或已有调用在进行时被拒绝，且不修改任何状态。
    pub fn submit(&mut self, input: &str) -> Result<PendingTurn, ValidationError> {
        if input.trim().is_empty() {
            return Err(ValidationError::EmptyInput);
        }
        if self.state == ControllerState::AwaitingResponse {
            return Err(ValidationError::TurnInFlight);
        }

        let prompt_input = PromptInput::from_config(self.session.configuration(), input);
        prompt_input.validate()?;

        let mode = self.session.response_mode();
        let seq = self.next_seq;
        self.next_seq += 1;

        self.session.append(Turn::user(input));
        self.session.clear_pending_input();
        self.state = ControllerState::AwaitingResponse;
        self.in_flight = Some(seq);

        info!(
            "💬 用户发言 #{} ({:?}): {}",
            self.session.transcript().len(),
            mode,
            truncate_text(input, 80)
        );

        Ok(PendingTurn {
            seq,
            mode,
            input: prompt_input,
        })
    }

    /// 应用外部调用的结果并回到空闲状态
    pub fn complete(&mut self, resolved: ResolvedTurn) -> TurnOutcome {
        if self.in_flight != Some(resolved.seq) {
            warn!("⚠️ 收到不属于当前回合的结果 (#{}), 已丢弃", resolved.seq);
            return TurnOutcome::Discarded;
        }

        self.in_flight = None;
        self.state = ControllerState::Idle;

        match resolved.result {
            Ok(text) => {
                info!("🤖 AI 回复: {}", truncate_text(&text, 80));
                self.session.append(Turn::ai(text.clone()));
                TurnOutcome::Replied(text)
            }
            Err(e) => {
                error!("❌ 生成 AI 回复失败: {}", e);
                TurnOutcome::Failed(Notification::generation_failed(e))
            }
        }
    }

    /// 放弃尚未发出的回合：用户发言保留，不追加 AI 发言，回到空闲状态
    pub fn abandon(&mut self, pending: PendingTurn) {
        if self.in_flight == Some(pending.seq) {
            warn!("⚠️ 回合 #{} 已放弃", pending.seq);
            self.in_flight = None;
            self.state = ControllerState::Idle;
        }
    }

    /// 完整的一个回合：提交 → 等待 → 完成
    pub async fn send(
        &mut self,
        assembler: &PromptAssembler,
        input: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<TurnOutcome, ValidationError> {
        let pending = self.submit(input)?;
        let resolved = pending.resolve(assembler, timeout, cancel).await;
        Ok(self.complete(resolved))
    }
}
