use crate::models::debate::DebateConfiguration;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 TOML 预设文件加载辩论配置
///
/// ```toml
/// topic = "Nuclear energy"
/// stance = "for"
/// expertise_level = "undergraduate"
/// difficulty = "medium"
/// judge_mode = false
/// ```
pub async fn load_preset(preset_path: &Path) -> Result<DebateConfiguration> {
    let content = fs::read_to_string(preset_path)
        .await
        .with_context(|| format!("无法读取预设文件: {}", preset_path.display()))?;

    let config = parse_preset(&content)
        .with_context(|| format!("无法解析预设文件: {}", preset_path.display()))?;

    tracing::info!("已加载辩论预设: {}", config.topic);

    Ok(config)
}

/// 解析 TOML 格式的辩论预设
pub fn parse_preset(content: &str) -> Result<DebateConfiguration> {
    let config: DebateConfiguration = toml::from_str(content)?;
    Ok(config)
}
