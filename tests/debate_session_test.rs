use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use debate_practice::error::{AppError, AppResult, GenerationError, ValidationError};
use debate_practice::infrastructure::{GenerationRequest, TextGenerator, ToolBox};
use debate_practice::models::{
    DebateConfiguration, Difficulty, ExpertiseLevel, ResponseMode, Speaker, Stance,
};
use debate_practice::services::judge_tools::{ASK_QUESTION, GIVE_FEEDBACK};
use debate_practice::workflow::{ControllerState, TurnController, TurnOutcome};
use debate_practice::{App, Config, PromptAssembler};
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tokio_test::{assert_err, assert_ok};
use tokio_util::sync::CancellationToken;

/// 脚本化的生成器：按顺序返回预设结果，并记录收到的请求
enum Step {
    Reply(&'static str),
    Fail(&'static str),
    Hang,
}

struct ScriptedGenerator {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest) -> AppResult<String> {
        self.requests.lock().unwrap().push(request.clone());
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Reply(text)) => Ok(text.to_string()),
            Some(Step::Fail(message)) => Err(AppError::llm_api_failed(
                "scripted",
                std::io::Error::new(std::io::ErrorKind::Other, message),
            )),
            Some(Step::Hang) => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok("too late".to_string())
            }
            None => Err(GenerationError::EmptyContent {
                model: "scripted".to_string(),
            }
            .into()),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

const TIMEOUT: Duration = Duration::from_secs(5);

fn nuclear_config(judge_mode: bool) -> DebateConfiguration {
    DebateConfiguration::new(
        "Nuclear energy",
        Stance::For,
        ExpertiseLevel::Undergraduate,
        Difficulty::Medium,
        judge_mode,
    )
}

#[tokio::test]
async fn test_user_turn_visible_before_reply_then_ai_turn_appended() {
    let generator = ScriptedGenerator::new(vec![Step::Reply("Coal is cheaper, though.")]);
    let assembler = PromptAssembler::new(generator.clone());
    let mut controller = TurnController::new(nuclear_config(false));
    let cancel = CancellationToken::new();

    let pending = assert_ok!(controller.submit("Nuclear energy is safer than coal."));

    // 外部调用完成前：n + 1
    assert_eq!(controller.session().transcript().len(), 1);
    assert_eq!(controller.state(), ControllerState::AwaitingResponse);
    let first = controller.session().transcript().last().unwrap();
    assert_eq!(first.speaker(), Speaker::User);
    assert_eq!(first.text(), "Nuclear energy is safer than coal.");

    let resolved = pending.resolve(&assembler, TIMEOUT, &cancel).await;
    let outcome = controller.complete(resolved);

    // 完成后：n + 2，回到空闲
    assert_eq!(outcome, TurnOutcome::Replied("Coal is cheaper, though.".to_string()));
    assert_eq!(controller.state(), ControllerState::Idle);
    let turns = controller.session().transcript().turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[1].speaker(), Speaker::Ai);
    assert!(!turns[1].text().is_empty());
}

#[tokio::test]
async fn test_failed_call_raises_notification_and_session_stays_usable() {
    let generator = ScriptedGenerator::new(vec![
        Step::Fail("quota exceeded"),
        Step::Reply("Let me push back on that."),
    ]);
    let assembler = PromptAssembler::new(generator.clone());
    let mut controller = TurnController::new(nuclear_config(false));
    let cancel = CancellationToken::new();

    let outcome = assert_ok!(controller.send(&assembler, "first try", TIMEOUT, &cancel).await);
    match outcome {
        TurnOutcome::Failed(notification) => {
            assert!(notification.is_error());
            assert!(notification.description.contains("quota exceeded"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(controller.session().transcript().len(), 1);
    assert_eq!(controller.state(), ControllerState::Idle);

    // 用户手动重发
    let outcome = assert_ok!(controller.send(&assembler, "second try", TIMEOUT, &cancel).await);
    assert!(matches!(outcome, TurnOutcome::Replied(_)));
    assert_eq!(controller.session().transcript().len(), 3);
}

#[tokio::test]
async fn test_blank_input_makes_no_call() {
    let generator = ScriptedGenerator::new(vec![Step::Reply("unused")]);
    let assembler = PromptAssembler::new(generator.clone());
    let mut controller = TurnController::new(nuclear_config(false));
    let cancel = CancellationToken::new();

    let err = assert_err!(controller.send(&assembler, "  \t ", TIMEOUT, &cancel).await);
    assert_eq!(err, ValidationError::EmptyInput);
    assert!(controller.session().transcript().is_empty());
    assert_eq!(controller.state(), ControllerState::Idle);
    assert!(generator.requests().is_empty());
}

#[tokio::test]
async fn test_judge_toggle_routes_per_call() {
    let generator = ScriptedGenerator::new(vec![Step::Reply("rebuttal"), Step::Reply("Why?")]);
    let assembler = PromptAssembler::new(generator.clone());
    let mut controller = TurnController::new(nuclear_config(false));
    let cancel = CancellationToken::new();

    assert_ok!(controller.send(&assembler, "Same words.", TIMEOUT, &cancel).await);
    controller.toggle_judge_mode();
    assert_ok!(controller.send(&assembler, "Same words.", TIMEOUT, &cancel).await);

    let requests = generator.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].user_message.starts_with("You are an AI debate partner"));
    assert!(requests[0].toolbox.is_none());
    assert!(requests[1].user_message.starts_with("You are acting as a judge"));
    assert!(requests[1].toolbox.is_some());
}

#[tokio::test]
async fn test_prompt_never_contains_earlier_turns() {
    let generator = ScriptedGenerator::new(vec![Step::Reply("Waste is stored safely."), Step::Reply("two")]);
    let assembler = PromptAssembler::new(generator.clone());
    let mut controller = TurnController::new(nuclear_config(false));
    let cancel = CancellationToken::new();

    assert_ok!(controller.send(&assembler, "Opening argument about waste.", TIMEOUT, &cancel).await);
    assert_ok!(controller.send(&assembler, "Follow-up about cost.", TIMEOUT, &cancel).await);

    let requests = generator.requests();
    let second = &requests[1];
    assert!(second.user_message.contains("Follow-up about cost."));
    assert!(!second.user_message.contains("Opening argument about waste."));
    assert!(!second.user_message.contains("Waste is stored safely."));
}

#[tokio::test]
async fn test_timeout_takes_failure_path() {
    let generator = ScriptedGenerator::new(vec![Step::Hang]);
    let assembler = PromptAssembler::new(generator.clone());
    let mut controller = TurnController::new(nuclear_config(false));
    let cancel = CancellationToken::new();

    let outcome = assert_ok!(
        controller
            .send(&assembler, "Anyone there?", Duration::from_millis(50), &cancel)
            .await
    );

    assert!(matches!(outcome, TurnOutcome::Failed(_)));
    assert_eq!(controller.session().transcript().len(), 1);
    assert_eq!(controller.state(), ControllerState::Idle);
}

#[tokio::test]
async fn test_cancellation_takes_failure_path() {
    let generator = ScriptedGenerator::new(vec![Step::Hang]);
    let assembler = PromptAssembler::new(generator.clone());
    let mut controller = TurnController::new(nuclear_config(false));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = assert_ok!(controller.send(&assembler, "Never mind.", TIMEOUT, &cancel).await);

    match outcome {
        TurnOutcome::Failed(notification) => assert!(notification.description.contains("取消")),
        other => panic!("expected cancellation, got {:?}", other),
    }
    assert_eq!(controller.session().transcript().len(), 1);
}

#[tokio::test]
async fn test_judge_request_offers_both_tools() {
    let generator = ScriptedGenerator::new(vec![Step::Reply("What evidence supports that?")]);
    let assembler = PromptAssembler::new(generator.clone());
    let mut controller = TurnController::new(nuclear_config(true));
    let cancel = CancellationToken::new();

    let pending = assert_ok!(controller.submit("It is clean."));
    assert_eq!(pending.mode(), ResponseMode::Judge);
    let outcome = controller.complete(pending.resolve(&assembler, TIMEOUT, &cancel).await);

    // 回复只来自模型的最终消息
    assert_eq!(
        outcome,
        TurnOutcome::Replied("What evidence supports that?".to_string())
    );

    let requests = generator.requests();
    let toolbox = requests[0].toolbox.as_ref().unwrap();
    let names: Vec<String> = toolbox.definitions().into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec![ASK_QUESTION.to_string(), GIVE_FEEDBACK.to_string()]);
}

#[tokio::test]
async fn test_app_loop_over_scripted_input() {
    let generator = ScriptedGenerator::new(vec![
        Step::Reply("Counterpoint."),
        Step::Fail("rate limited"),
    ]);
    let mut app = App::with_generator(
        Config::default(),
        TurnController::new(nuclear_config(false)),
        generator.clone(),
    );

    let input: &[u8] = b"Nuclear energy is safer than coal.\n\n/judge\nSecond point.\n/transcript\n/quit\nignored\n";
    let mut out = Vec::new();
    let mut notify = Vec::new();

    let (_interrupt, interrupts) = mpsc::unbounded_channel();
    assert_ok!(app.run_with(input, &mut out, &mut notify, interrupts).await);

    let out = String::from_utf8(out).unwrap();
    let notify = String::from_utf8(notify).unwrap();

    assert!(out.starts_with("辩题: Nuclear energy\n"));
    assert!(out.contains("AI: Counterpoint."));
    assert!(out.contains("评委模式已开启"));
    assert!(notify.contains("rate limited"));

    // 空行不产生调用；/quit 之后的输入不再处理
    assert_eq!(generator.requests().len(), 2);
    assert_eq!(app.controller().session().transcript().len(), 3);
    assert!(app.controller().session().judge_mode());
}

#[tokio::test]
async fn test_interrupt_while_idle_exits() {
    let generator = ScriptedGenerator::new(vec![]);
    let mut app = App::with_generator(
        Config::default(),
        TurnController::new(nuclear_config(false)),
        generator.clone(),
    );

    // 输入端保持打开但没有数据，循环停在提示符处
    let (_keyboard, reader) = tokio::io::duplex(64);
    let (interrupt, interrupts) = mpsc::unbounded_channel();
    interrupt.send(()).unwrap();

    let mut out = Vec::new();
    let mut notify = Vec::new();
    let run = app.run_with(BufReader::new(reader), &mut out, &mut notify, interrupts);
    assert_ok!(tokio::time::timeout(TIMEOUT, run).await.expect("interrupt ends the loop"));

    assert!(generator.requests().is_empty());
    assert!(app.controller().session().transcript().is_empty());
}

#[tokio::test]
async fn test_interrupt_during_call_cancels_turn_only() {
    let generator = ScriptedGenerator::new(vec![Step::Hang]);
    let mut app = App::with_generator(
        Config::default(),
        TurnController::new(nuclear_config(false)),
        generator.clone(),
    );

    let input: &[u8] = b"Nuclear energy is safer than coal.\n/judge\n";
    let (interrupt, interrupts) = mpsc::unbounded_channel();
    interrupt.send(()).unwrap();

    let mut out = Vec::new();
    let mut notify = Vec::new();
    let run = app.run_with(input, &mut out, &mut notify, interrupts);
    assert_ok!(tokio::time::timeout(TIMEOUT, run).await.expect("cancelled turn returns"));

    let out = String::from_utf8(out).unwrap();
    let notify = String::from_utf8(notify).unwrap();

    assert!(notify.contains("本回合已取消"));
    // 取消后会话继续，后面的命令照常处理
    assert!(out.contains("评委模式已开启"));
    assert_eq!(app.controller().session().transcript().len(), 1);
    assert_eq!(app.controller().state(), ControllerState::Idle);
}
