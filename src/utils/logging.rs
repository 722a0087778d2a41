/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::DebateConfiguration;

/// 初始化全局日志
///
/// 优先使用 `RUST_LOG`；未设置时根据 `verbose` 选择 debug 或 info 级别。
/// 重复调用不会报错（测试中常见）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 记录会话启动信息
pub fn log_session_start(config: &DebateConfiguration, model_name: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 辩论练习启动 - {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("📋 {}", config.title());
    info!("📊 {}", config.description());
    info!("🤖 模型: {}", model_name);
    info!("{}", "=".repeat(60));
}

/// 记录会话结束信息
pub fn log_session_end(turns: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 会话结束: 共 {} 条发言（对话记录不会保存）", turns);
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
