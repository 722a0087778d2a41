use thiserror::Error;

/// 应用程序错误类型
///
/// 每一种失败都只作用于单个回合（或单次配置操作），不会让整个程序退出。
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入或配置校验失败，不会修改任何状态
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 外部生成服务调用失败
    #[error("生成失败: {0}")]
    Generation(#[from] GenerationError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// IO 错误（终端读写等）
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 校验错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// 用户输入为空或只有空白
    #[error("输入不能为空")]
    EmptyInput,
    /// 上一回合还在等待回复
    #[error("上一条消息仍在等待 AI 回复")]
    TurnInFlight,
    /// 提示词字段为空
    #[error("字段 {field} 不能为空")]
    EmptyField { field: &'static str },
    /// 辩题太短
    #[error("辩题至少需要 {min} 个字符")]
    TopicTooShort { min: usize },
    /// 无法识别的立场
    #[error("无法识别的立场: {value} (可选: for, against)")]
    InvalidStance { value: String },
    /// 无法识别的专业水平
    #[error("无法识别的专业水平: {value} (可选: school, undergraduate, graduate, phd)")]
    InvalidExpertiseLevel { value: String },
    /// 无法识别的难度
    #[error("无法识别的难度: {value} (可选: easy, medium, hard)")]
    InvalidDifficulty { value: String },
    /// 查询参数格式错误
    #[error("查询参数格式错误: {reason}")]
    InvalidQuery { reason: String },
}

/// 生成服务错误
#[derive(Debug, Error)]
pub enum GenerationError {
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 请求构建失败
    #[error("LLM 请求构建失败: {source}")]
    RequestBuildFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 工具调用失败
    #[error("工具 {tool} 调用失败: {reason}")]
    ToolCallFailed { tool: String, reason: String },
    /// 超时
    #[error("等待 AI 回复超时 ({secs} 秒)")]
    Timeout { secs: u64 },
    /// 被用户取消
    #[error("本回合已取消")]
    Cancelled,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 缺少 API 密钥
    #[error("缺少 LLM API 密钥，请设置环境变量 LLM_API_KEY 或在配置文件中填写 llm_api_key")]
    MissingApiKey,
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 配置值超出范围
    #[error("配置项 {field} 无效: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建LLM API调用错误
    pub fn llm_api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Generation(GenerationError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }

    /// 创建LLM请求构建错误
    pub fn llm_request_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Generation(GenerationError::RequestBuildFailed {
            source: Box::new(source),
        })
    }

    /// 创建工具调用错误
    pub fn tool_call_failed(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Generation(GenerationError::ToolCallFailed {
            tool: tool.into(),
            reason: reason.into(),
        })
    }

    /// 是否为校验错误（校验错误不会弹出通知，只拒绝本次操作）
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
