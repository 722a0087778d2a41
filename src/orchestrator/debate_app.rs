//! 辩论应用 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：校验配置、创建 LLM 网关和提示词组装服务
//! 2. **交互循环**：逐行读取输入，处理命令，驱动回合控制器
//! 3. **中断**：空闲时按 Ctrl-C 退出，外部调用进行中按 Ctrl-C 只取消当前回合
//! 4. **展示**：输出会话标题、对话内容和通知
//!
//! 本层不做业务判断，只负责调度和展示。

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::ValidationError;
use crate::infrastructure::{OpenAiGateway, TextGenerator};
use crate::models::{Notification, Transcript, Turn};
use crate::services::PromptAssembler;
use crate::utils::logging;
use crate::workflow::{TurnController, TurnOutcome};

const HELP: &str = "命令: /judge 切换评委模式 | /transcript 查看对话记录 | /help 帮助 | /quit 退出";

/// 交互命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ToggleJudge,
    ShowTranscript,
    Help,
    Quit,
    /// 普通发言
    Say(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "/judge" => Command::ToggleJudge,
            "/transcript" => Command::ShowTranscript,
            "/help" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            _ => Command::Say(line.to_string()),
        }
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    assembler: PromptAssembler,
    controller: TurnController,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config, controller: TurnController) -> Result<Self> {
        config.validate()?;

        let gateway: Arc<dyn TextGenerator> = Arc::new(OpenAiGateway::new(&config));
        logging::log_session_start(controller.session().configuration(), gateway.model_name());

        Ok(Self::with_generator(config, controller, gateway))
    }

    /// 使用指定的生成服务创建应用
    pub fn with_generator(
        config: Config,
        controller: TurnController,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            config,
            assembler: PromptAssembler::new(generator),
            controller,
        }
    }

    pub fn controller(&self) -> &TurnController {
        &self.controller
    }

    /// 在标准输入输出上运行交互循环
    pub async fn run(&mut self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        let mut stderr = std::io::stderr();
        let interrupts = spawn_interrupt_listener();
        self.run_with(stdin, &mut stdout, &mut stderr, interrupts).await
    }

    /// 运行交互循环
    ///
    /// `out` 输出对话内容，`notify` 输出通知，`interrupts` 每收到一条消息代表一次 Ctrl-C。
    /// 输入结束、收到 /quit 或空闲时被中断都会返回。
    pub async fn run_with<R, W, E>(
        &mut self,
        input: R,
        out: &mut W,
        notify: &mut E,
        mut interrupts: mpsc::UnboundedReceiver<()>,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
        E: Write,
    {
        self.print_header(out)?;

        let mut lines = input.lines();
        loop {
            write!(out, "> ")?;
            out.flush()?;

            let line = tokio::select! {
                biased;
                line = lines.next_line() => line?,
                _ = next_interrupt(&mut interrupts) => {
                    writeln!(out)?;
                    info!("⏹️ 收到 Ctrl-C，退出会话");
                    break;
                }
            };
            let Some(line) = line else {
                break;
            };

            match Command::parse(&line) {
                Command::Quit => break,
                Command::Help => writeln!(out, "{}", HELP)?,
                Command::ToggleJudge => {
                    let enabled = self.controller.toggle_judge_mode();
                    writeln!(out, "评委模式已{}", if enabled { "开启" } else { "关闭" })?;
                }
                Command::ShowTranscript => {
                    render_transcript(self.controller.session().transcript(), out)?
                }
                Command::Say(text) => self.handle_say(text, out, notify, &mut interrupts).await?,
            }
        }

        logging::log_session_end(self.controller.session().transcript().len());
        Ok(())
    }

    async fn handle_say<W: Write, E: Write>(
        &mut self,
        text: String,
        out: &mut W,
        notify: &mut E,
        interrupts: &mut mpsc::UnboundedReceiver<()>,
    ) -> Result<()> {
        self.controller.set_pending_input(text);

        let pending = match self.controller.submit_pending() {
            Ok(pending) => pending,
            // 空输入直接忽略
            Err(ValidationError::EmptyInput) => return Ok(()),
            Err(e) => {
                print_notification(notify, &Notification::error("输入无效", e.to_string()))?;
                return Ok(());
            }
        };

        let cancel = CancellationToken::new();
        let timeout = self.config.request_timeout();
        let resolve = pending.resolve(&self.assembler, timeout, &cancel);
        tokio::pin!(resolve);

        let resolved = tokio::select! {
            biased;
            resolved = &mut resolve => resolved,
            _ = next_interrupt(interrupts) => {
                info!("⏹️ 正在取消本回合...");
                cancel.cancel();
                resolve.await
            }
        };

        match self.controller.complete(resolved) {
            TurnOutcome::Replied(reply) => render_turn(&Turn::ai(reply), out)?,
            TurnOutcome::Failed(notification) => print_notification(notify, &notification)?,
            TurnOutcome::Discarded => {}
        }

        Ok(())
    }

    fn print_header<W: Write>(&self, out: &mut W) -> Result<()> {
        let session = self.controller.session();
        writeln!(out, "{}", session.configuration().title())?;
        writeln!(out, "{}", session.configuration().description())?;
        writeln!(
            out,
            "评委模式: {}",
            if session.judge_mode() { "开" } else { "关" }
        )?;
        writeln!(out, "{}", HELP)?;
        Ok(())
    }
}

/// 把每次 Ctrl-C 转发到通道；无法监听时关闭通道，之后不再响应中断
fn spawn_interrupt_listener() -> mpsc::UnboundedReceiver<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("无法监听 Ctrl-C: {}", e);
                break;
            }
            if tx.send(()).is_err() {
                break;
            }
        }
    });
    rx
}

/// 等待下一次中断；通道关闭后永远挂起
async fn next_interrupt(interrupts: &mut mpsc::UnboundedReceiver<()>) {
    if interrupts.recv().await.is_none() {
        std::future::pending::<()>().await;
    }
}

fn render_turn<W: Write>(turn: &Turn, out: &mut W) -> Result<()> {
    writeln!(out, "{}: {}", turn.speaker().label(), turn.text())?;
    Ok(())
}

fn render_transcript<W: Write>(transcript: &Transcript, out: &mut W) -> Result<()> {
    if transcript.is_empty() {
        writeln!(out, "(暂无对话)")?;
        return Ok(());
    }
    for turn in transcript {
        writeln!(
            out,
            "[{}] {}: {}",
            turn.created_at().format("%H:%M:%S"),
            turn.speaker().label(),
            turn.text()
        )?;
    }
    Ok(())
}

fn print_notification<E: Write>(notify: &mut E, notification: &Notification) -> Result<()> {
    writeln!(notify, "{}", notification)?;
    Ok(())
}
