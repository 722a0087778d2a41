//! 查询参数形式的配置传递
//!
//! 格式：`topic=..&stance=..&expertiseLevel=..&difficulty=..&isJudgeMode=true`
//! 缺失或空白的参数使用默认值；存在但无法识别的枚举值视为校验错误。

use reqwest::Url;

use crate::error::ValidationError;
use crate::models::debate::{DebateConfiguration, Difficulty, ExpertiseLevel, Stance};

/// 未提供辩题时使用的默认辩题
pub const DEFAULT_TOPIC: &str = "Default Topic";

const KEY_TOPIC: &str = "topic";
const KEY_STANCE: &str = "stance";
const KEY_EXPERTISE: &str = "expertiseLevel";
const KEY_DIFFICULTY: &str = "difficulty";
const KEY_JUDGE: &str = "isJudgeMode";

/// 从查询字符串（或完整 URL）解析辩论配置
pub fn parse_query(query: &str) -> Result<DebateConfiguration, ValidationError> {
    let url = to_url(query)?;

    let mut topic = None;
    let mut stance = None;
    let mut expertise = None;
    let mut difficulty = None;
    let mut judge_mode = false;

    for (key, value) in url.query_pairs() {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.as_ref() {
            KEY_TOPIC => topic = Some(value.to_string()),
            KEY_STANCE => stance = Some(value.parse::<Stance>()?),
            KEY_EXPERTISE => expertise = Some(value.parse::<ExpertiseLevel>()?),
            KEY_DIFFICULTY => difficulty = Some(value.parse::<Difficulty>()?),
            KEY_JUDGE => judge_mode = value.eq_ignore_ascii_case("true"),
            other => tracing::debug!("忽略未知查询参数: {}", other),
        }
    }

    Ok(DebateConfiguration::new(
        topic.unwrap_or_else(|| DEFAULT_TOPIC.to_string()),
        stance.unwrap_or_default(),
        expertise.unwrap_or_default(),
        difficulty.unwrap_or_default(),
        judge_mode,
    ))
}

/// 把辩论配置编码为查询字符串（已做百分号编码）
pub fn to_query_string(config: &DebateConfiguration) -> String {
    let mut url = base_url();
    url.query_pairs_mut()
        .append_pair(KEY_TOPIC, &config.topic)
        .append_pair(KEY_STANCE, config.stance.name())
        .append_pair(KEY_EXPERTISE, config.expertise_level.name())
        .append_pair(KEY_DIFFICULTY, config.difficulty.name())
        .append_pair(KEY_JUDGE, if config.judge_mode { "true" } else { "false" });
    url.query().unwrap_or_default().to_string()
}

fn to_url(query: &str) -> Result<Url, ValidationError> {
    let query = query.trim();
    if has_url_scheme(query) {
        return Url::parse(query).map_err(|e| ValidationError::InvalidQuery {
            reason: e.to_string(),
        });
    }

    let mut url = base_url();
    url.set_query(Some(query.trim_start_matches('?')));
    Ok(url)
}

/// `://` 之前是合法 scheme 时才按完整 URL 处理，参数值里出现的链接不算
fn has_url_scheme(text: &str) -> bool {
    let Some((scheme, _)) = text.split_once("://") else {
        return false;
    };
    scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn base_url() -> Url {
    // 常量 URL，解析不会失败
    Url::parse("debate://session/").expect("static base url")
}
