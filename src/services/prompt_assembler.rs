//! 提示词组装服务 - 业务能力层
//!
//! 只负责"把五个字段变成一次 LLM 调用"的能力，不关心回合流程。

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppResult;
use crate::infrastructure::{GenerationRequest, TextGenerator};
use crate::models::ResponseMode;
use crate::services::judge_tools::JudgeToolbox;
use crate::services::prompts::{self, PromptInput};

/// 辩论对手模式的输出
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateResponse {
    pub response: String,
}

/// 评委模式的输出
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeResponse {
    pub judge_response: String,
}

/// 提示词组装服务
///
/// 职责：
/// - 按模式选择模板并调用生成服务
/// - 每次调用都是无状态的：只发送当前配置和本回合输入
/// - 不持有对话记录
#[derive(Clone)]
pub struct PromptAssembler {
    generator: Arc<dyn TextGenerator>,
}

impl PromptAssembler {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// 按模式生成回复文本
    pub async fn respond(&self, mode: ResponseMode, input: &PromptInput) -> AppResult<String> {
        match mode {
            ResponseMode::Debate => Ok(self.generate_debate_response(input).await?.response),
            ResponseMode::Judge => Ok(self.ai_judge_mode(input).await?.judge_response),
        }
    }

    /// 作为辩论对手生成有说服力的回复
    pub async fn generate_debate_response(&self, input: &PromptInput) -> AppResult<DebateResponse> {
        input.validate()?;
        debug!("生成辩论回复，模型: {}", self.generator.model_name());

        let request = GenerationRequest::new(prompts::build_debate_prompt(input))
            .with_system(prompts::DEBATE_SYSTEM_MESSAGE);
        let response = self.generator.generate(request).await?;

        Ok(DebateResponse { response })
    }

    /// 作为评委提问或给出反馈，模型可以调用评委工具
    pub async fn ai_judge_mode(&self, input: &PromptInput) -> AppResult<JudgeResponse> {
        input.validate()?;
        debug!("生成评委反馈，模型: {}", self.generator.model_name());

        let request = GenerationRequest::new(prompts::build_judge_prompt(input))
            .with_system(prompts::JUDGE_SYSTEM_MESSAGE)
            .with_toolbox(Arc::new(JudgeToolbox));
        let judge_response = self.generator.generate(request).await?;

        Ok(JudgeResponse { judge_response })
    }
}
