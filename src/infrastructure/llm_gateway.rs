//! LLM 网关 - 基础设施层
//!
//! 持有 OpenAI 兼容客户端，只暴露"给我一段提示词，还你一段文本"的能力。
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 支持模型在回复前调用本地工具（评委模式的提问 / 反馈工具）

use std::sync::Arc;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionMessageToolCalls, ChatCompletionRequestAssistantMessageArgs,
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
        ChatCompletionTool, ChatCompletionTools, CreateChatCompletionRequestArgs,
        FunctionObjectArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, GenerationError};

/// 暴露给模型的工具描述
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema 形式的参数描述
    pub parameters: serde_json::Value,
}

/// 一组可被模型调用的本地工具
///
/// 工具必须是纯函数：只根据参数产出文本，不修改任何会话状态。
pub trait ToolBox: Send + Sync {
    fn definitions(&self) -> Vec<ToolDefinition>;

    /// 执行工具，`arguments` 是模型给出的 JSON 字符串
    fn invoke(&self, name: &str, arguments: &str) -> AppResult<String>;
}

/// 单次生成请求
///
/// 只包含当前这一条提示词，不携带任何历史对话。
#[derive(Clone)]
pub struct GenerationRequest {
    pub system_message: Option<String>,
    pub user_message: String,
    pub toolbox: Option<Arc<dyn ToolBox>>,
}

impl GenerationRequest {
    pub fn new(user_message: impl Into<String>) -> Self {
        Self {
            system_message: None,
            user_message: user_message.into(),
            toolbox: None,
        }
    }

    pub fn with_system(mut self, system_message: impl Into<String>) -> Self {
        self.system_message = Some(system_message.into());
        self
    }

    pub fn with_toolbox(mut self, toolbox: Arc<dyn ToolBox>) -> Self {
        self.toolbox = Some(toolbox);
        self
    }
}

impl std::fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("system_message", &self.system_message)
            .field("user_message", &self.user_message)
            .field("has_toolbox", &self.toolbox.is_some())
            .finish()
    }
}

/// 外部文本生成服务
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// 发送请求并返回去掉首尾空白的回复文本
    async fn generate(&self, request: GenerationRequest) -> AppResult<String>;

    fn model_name(&self) -> &str;
}

/// 基于 async-openai 的 OpenAI 兼容网关
pub struct OpenAiGateway {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
    max_tool_rounds: usize,
}

impl OpenAiGateway {
    /// 创建新的 LLM 网关
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
            max_tool_rounds: config.max_tool_rounds,
        }
    }

    fn initial_messages(
        &self,
        request: &GenerationRequest,
    ) -> AppResult<Vec<ChatCompletionRequestMessage>> {
        let mut messages = Vec::new();

        // 添加系统消息（如果提供）
        if let Some(sys_msg) = &request.system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg.as_str())
                .build()
                .map_err(AppError::llm_request_failed)?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(request.user_message.as_str())
            .build()
            .map_err(AppError::llm_request_failed)?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        Ok(messages)
    }

    /// 执行模型请求的工具调用，并把调用与结果追加到消息列表
    fn run_tool_calls(
        toolbox: &dyn ToolBox,
        calls: Vec<ChatCompletionMessageToolCalls>,
        messages: &mut Vec<ChatCompletionRequestMessage>,
    ) -> AppResult<()> {
        let assistant_msg = ChatCompletionRequestAssistantMessageArgs::default()
            .tool_calls(calls.clone())
            .build()
            .map_err(AppError::llm_request_failed)?;
        messages.push(ChatCompletionRequestMessage::Assistant(assistant_msg));

        for call in calls {
            let (call_id, output) = match call {
                ChatCompletionMessageToolCalls::Function(call) => {
                    debug!("模型调用工具: {}", call.function.name);
                    let output = toolbox.invoke(&call.function.name, &call.function.arguments)?;
                    (call.id, output)
                }
                #[allow(unreachable_patterns)]
                _ => return Err(AppError::tool_call_failed("custom", "只支持函数工具")),
            };

            let tool_msg = ChatCompletionRequestToolMessageArgs::default()
                .content(output)
                .tool_call_id(call_id)
                .build()
                .map_err(AppError::llm_request_failed)?;
            messages.push(ChatCompletionRequestMessage::Tool(tool_msg));
        }

        Ok(())
    }
}

/// 把工具描述转换为 OpenAI 的 tools 参数
pub fn build_tools(definitions: Vec<ToolDefinition>) -> AppResult<Vec<ChatCompletionTools>> {
    definitions
        .into_iter()
        .map(|def| {
            let function = FunctionObjectArgs::default()
                .name(def.name)
                .description(def.description)
                .parameters(def.parameters)
                .build()
                .map_err(AppError::llm_request_failed)?;
            Ok(ChatCompletionTools::Function(ChatCompletionTool { function }))
        })
        .collect()
}

#[async_trait]
impl TextGenerator for OpenAiGateway {
    async fn generate(&self, request: GenerationRequest) -> AppResult<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", request.user_message.len());

        let mut messages = self.initial_messages(&request)?;
        let tools = match &request.toolbox {
            Some(toolbox) => Some(build_tools(toolbox.definitions())?),
            None => None,
        };

        for round in 0..=self.max_tool_rounds {
            let mut args = CreateChatCompletionRequestArgs::default();
            args.model(&self.model_name)
                .messages(messages.clone())
                .temperature(self.temperature)
                .max_tokens(self.max_tokens);

            // 最后一轮不再提供工具，强制模型直接回复
            if let Some(tools) = tools.as_ref().filter(|_| round < self.max_tool_rounds) {
                args.tools(tools.clone());
            }

            let chat_request = args.build().map_err(AppError::llm_request_failed)?;

            let response = self.client.chat().create(chat_request).await.map_err(|e| {
                warn!("LLM API 调用失败: {}", e);
                AppError::llm_api_failed(&self.model_name, e)
            })?;

            let message = response
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message)
                .ok_or_else(|| GenerationError::EmptyContent {
                    model: self.model_name.clone(),
                })?;

            if let (Some(calls), Some(toolbox)) = (message.tool_calls, request.toolbox.as_deref()) {
                if !calls.is_empty() {
                    debug!("第 {} 轮: 模型请求 {} 个工具调用", round + 1, calls.len());
                    Self::run_tool_calls(toolbox, calls, &mut messages)?;
                    continue;
                }
            }

            debug!("LLM API 调用成功");

            let content = message
                .content
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .ok_or_else(|| GenerationError::EmptyContent {
                    model: self.model_name.clone(),
                })?;

            return Ok(content);
        }

        warn!("模型在 {} 轮工具调用后仍未给出回复", self.max_tool_rounds);
        Err(GenerationError::EmptyContent {
            model: self.model_name.clone(),
        }
        .into())
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
