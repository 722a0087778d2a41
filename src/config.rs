use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppResult, ConfigError};

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 采样温度
    pub llm_temperature: f32,
    /// 单次回复的最大 token 数
    pub llm_max_tokens: u32,
    /// 单回合等待 AI 回复的超时时间（秒）
    pub request_timeout_secs: u64,
    /// 评委模式下模型最多可以连续调用工具的轮数
    pub max_tool_rounds: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_temperature: 0.7,
            llm_max_tokens: 1024,
            request_timeout_secs: 60,
            max_tool_rounds: 3,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 只从环境变量加载（未设置的字段使用默认值）
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 加载配置：先读取 TOML 文件（可选），再用环境变量覆盖
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文件加载配置
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
                path: path.display().to_string(),
                source,
            })?;
        let config = Self::from_toml_str(&content).map_err(|source| {
            ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            }
        })?;
        Ok(config)
    }

    /// 从 TOML 字符串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 校验配置是否足以发起 LLM 调用
    pub fn validate(&self) -> AppResult<()> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey.into());
        }
        if !(0.0..=2.0).contains(&self.llm_temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm_temperature",
                reason: format!("{} 不在 0.0 到 2.0 之间", self.llm_temperature),
            }
            .into());
        }
        if self.llm_max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm_max_tokens",
                reason: "必须大于 0".to_string(),
            }
            .into());
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs",
                reason: "必须大于 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// 单回合超时
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn with_env_overrides(self) -> Self {
        let base = self;
        Self {
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(base.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(base.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(base.llm_model_name),
            llm_temperature: std::env::var("LLM_TEMPERATURE").ok().and_then(|v| v.parse().ok()).unwrap_or(base.llm_temperature),
            llm_max_tokens: std::env::var("LLM_MAX_TOKENS").ok().and_then(|v| v.parse().ok()).unwrap_or(base.llm_max_tokens),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(base.request_timeout_secs),
            max_tool_rounds: std::env::var("MAX_TOOL_ROUNDS").ok().and_then(|v| v.parse().ok()).unwrap_or(base.max_tool_rounds),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(base.verbose_logging),
        }
    }
}
