//! 评委工具
//!
//! 评委模式下模型可以选择调用的两个工具。两者都只是格式化函数，
//! 不读写会话，也不保证一定会被调用。

use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::infrastructure::{ToolBox, ToolDefinition};
use crate::services::prompts::PromptInput;

pub const ASK_QUESTION: &str = "askQuestion";
pub const GIVE_FEEDBACK: &str = "giveFeedback";

/// 向用户提出一个挑战性问题
pub fn ask_question(input: &PromptInput) -> String {
    format!(
        "What are your thoughts on this user input: {} for debate with topic {}, stance {}, expertise level {} and difficulty {}?",
        input.user_input, input.topic, input.stance, input.expertise_level, input.difficulty
    )
}

/// 给出建设性反馈
pub fn give_feedback(input: &PromptInput) -> String {
    format!(
        "Feedback on user input: {} for debate with topic {}, stance {}, expertise level {} and difficulty {}.",
        input.user_input, input.topic, input.stance, input.expertise_level, input.difficulty
    )
}

/// 评委工具集
#[derive(Debug, Default, Clone, Copy)]
pub struct JudgeToolbox;

impl JudgeToolbox {
    fn parameters_schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "topic": { "type": "string", "description": "The topic for debate." },
                "stance": { "type": "string", "description": "The stance of the user (for/against)." },
                "expertiseLevel": { "type": "string", "description": "The expertise level of the user." },
                "difficulty": { "type": "string", "description": "The difficulty of the debate." },
                "userInput": { "type": "string", "description": "The user input in the debate." }
            },
            "required": ["topic", "stance", "expertiseLevel", "difficulty", "userInput"]
        })
    }
}

impl ToolBox for JudgeToolbox {
    fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: ASK_QUESTION.to_string(),
                description: "Asks a question to the user based on their input, topic, and stance in the debate.".to_string(),
                parameters: Self::parameters_schema(),
            },
            ToolDefinition {
                name: GIVE_FEEDBACK.to_string(),
                description: "Provides constructive feedback to the user based on their input, topic, and stance in the debate.".to_string(),
                parameters: Self::parameters_schema(),
            },
        ]
    }

    fn invoke(&self, name: &str, arguments: &str) -> AppResult<String> {
        let input: PromptInput = serde_json::from_str(arguments)
            .map_err(|e| AppError::tool_call_failed(name, format!("参数解析失败: {}", e)))?;

        match name {
            ASK_QUESTION => Ok(ask_question(&input)),
            GIVE_FEEDBACK => Ok(give_feedback(&input)),
            other => Err(AppError::tool_call_failed(other, "未知工具")),
        }
    }
}
