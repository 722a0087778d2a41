//! 辩论设置表单
//!
//! 收集四个配置字段和评委开关，校验后创建新的会话。

use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use crate::error::ValidationError;
use crate::models::{DebateConfiguration, Difficulty, ExpertiseLevel, Notification, Stance};
use crate::workflow::turn_controller::TurnController;

/// 辩题最少字符数
pub const MIN_TOPIC_CHARS: usize = 2;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// 设置表单（原始字符串，提交时才校验）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupForm {
    pub topic: String,
    pub stance: String,
    pub expertise_level: String,
    pub difficulty: String,
    pub judge_mode: bool,
}

impl Default for SetupForm {
    fn default() -> Self {
        Self {
            topic: String::new(),
            stance: Stance::default().name().to_string(),
            expertise_level: ExpertiseLevel::default().name().to_string(),
            difficulty: Difficulty::default().name().to_string(),
            judge_mode: false,
        }
    }
}

impl SetupForm {
    /// 校验并生成辩论配置
    pub fn validate(&self) -> Result<DebateConfiguration, ValidationError> {
        let topic = normalize_topic(&self.topic);
        if topic.chars().count() < MIN_TOPIC_CHARS {
            return Err(ValidationError::TopicTooShort {
                min: MIN_TOPIC_CHARS,
            });
        }

        Ok(DebateConfiguration::new(
            topic,
            self.stance.parse()?,
            self.expertise_level.parse()?,
            self.difficulty.parse()?,
            self.judge_mode,
        ))
    }

    /// 提交表单：返回新会话的控制器和一条设置完成的通知
    pub fn submit(&self) -> Result<(TurnController, Notification), ValidationError> {
        let configuration = self.validate()?;
        info!("📝 辩论设置完成: {}", configuration.title());

        let notification = Notification::info("辩论设置", "正在使用所填信息创建辩论");
        Ok((TurnController::new(configuration), notification))
    }
}

fn normalize_topic(topic: &str) -> String {
    WHITESPACE.replace_all(topic.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::turn_controller::ControllerState;

    fn form(topic: &str) -> SetupForm {
        SetupForm {
            topic: topic.to_string(),
            ..SetupForm::default()
        }
    }

    #[test]
    fn test_defaults() {
        let form = SetupForm::default();
        assert_eq!(form.stance, "for");
        assert_eq!(form.expertise_level, "school");
        assert_eq!(form.difficulty, "easy");
        assert!(!form.judge_mode);
    }

    #[test]
    fn test_topic_is_normalized_and_length_checked() {
        assert_eq!(
            form(" x ").validate().unwrap_err(),
            ValidationError::TopicTooShort { min: MIN_TOPIC_CHARS }
        );

        let config = form("  Nuclear \n  energy ").validate().unwrap();
        assert_eq!(config.topic, "Nuclear energy");
    }

    #[test]
    fn test_closed_enums_are_enforced() {
        let mut bad = form("Nuclear energy");
        bad.difficulty = "nightmare".to_string();
        assert!(matches!(
            bad.validate(),
            Err(ValidationError::InvalidDifficulty { .. })
        ));
    }

    #[test]
    fn test_submit_starts_empty_idle_session() {
        let mut input = form("Nuclear energy");
        input.judge_mode = true;

        let (controller, notification) = input.submit().unwrap();

        assert_eq!(notification.title, "辩论设置");
        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(controller.session().transcript().is_empty());
        assert!(controller.session().judge_mode());
    }
}
