//! 提示词模板
//!
//! 两种模式共用同一组五个字段：辩题、立场、专业水平、难度、用户输入。

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::DebateConfiguration;

/// 提示词输入
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptInput {
    pub topic: String,
    pub stance: String,
    pub expertise_level: String,
    pub difficulty: String,
    pub user_input: String,
}

impl PromptInput {
    /// 用会话配置和本回合的用户输入构建
    pub fn from_config(config: &DebateConfiguration, user_input: impl Into<String>) -> Self {
        Self {
            topic: config.topic.clone(),
            stance: config.stance.name().to_string(),
            expertise_level: config.expertise_level.name().to_string(),
            difficulty: config.difficulty.name().to_string(),
            user_input: user_input.into(),
        }
    }

    /// 五个字段都必须非空
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("topic", &self.topic),
            ("stance", &self.stance),
            ("expertiseLevel", &self.expertise_level),
            ("difficulty", &self.difficulty),
            ("userInput", &self.user_input),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyField { field });
            }
        }
        Ok(())
    }
}

pub const DEBATE_SYSTEM_MESSAGE: &str = "You are an AI debate partner.";

pub const JUDGE_SYSTEM_MESSAGE: &str = "You are acting as a judge in a debate.";

/// 构建辩论对手模式的提示词
pub fn build_debate_prompt(input: &PromptInput) -> String {
    format!(
        r#"You are an AI debate partner. You will generate a debate response based on the user's input.

Topic: {}
Stance: {}
Expertise Level: {}
Difficulty: {}

User Input: {}

Generate a response that is appropriate for the given topic, stance, expertise level, and difficulty. Be persuasive and provide evidence to support your claims."#,
        input.topic, input.stance, input.expertise_level, input.difficulty, input.user_input
    )
}

/// 构建评委模式的提示词
pub fn build_judge_prompt(input: &PromptInput) -> String {
    format!(
        "You are acting as a judge in a debate. The user will provide their input, and you will either ask a question to challenge their argument or provide constructive feedback to help them improve. You can use the askQuestion and giveFeedback tools as needed, or respond directly with no tools. Debate Topic: {}, User Stance: {}, User Expertise Level: {}, Debate Difficulty: {}, User Input: {}",
        input.topic, input.stance, input.expertise_level, input.difficulty, input.user_input
    )
}
