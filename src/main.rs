use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use debate_practice::models::{load_preset, parse_query};
use debate_practice::utils::logging;
use debate_practice::{App, Config, SetupForm, TurnController};

/// 辩论练习：与 AI 对手辩论，或让 AI 评委点评你的论证
#[derive(Debug, Parser)]
#[command(name = "debate-practice", version)]
struct Cli {
    /// 辩题（未提供时在终端中询问）
    #[arg(long)]
    topic: Option<String>,
    /// 立场: for / against
    #[arg(long, default_value = "for")]
    stance: String,
    /// 专业水平: school / undergraduate / graduate / phd
    #[arg(long, default_value = "school")]
    expertise: String,
    /// 难度: easy / medium / hard
    #[arg(long, default_value = "easy")]
    difficulty: String,
    /// 以评委模式开始
    #[arg(long)]
    judge: bool,
    /// 查询参数形式的设置，如 "topic=UBI&stance=against&isJudgeMode=true"
    #[arg(
        long,
        conflicts_with_all = ["topic", "preset", "stance", "expertise", "difficulty", "judge"]
    )]
    query: Option<String>,
    /// TOML 格式的辩论预设文件（可与 --judge 同用）
    #[arg(long, conflicts_with_all = ["topic", "stance", "expertise", "difficulty"])]
    preset: Option<PathBuf>,
    /// 程序配置文件（TOML）
    #[arg(long)]
    config: Option<PathBuf>,
    /// 显示详细日志
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::load(cli.config.as_deref())?;
    config.verbose_logging |= cli.verbose;

    // 初始化日志
    logging::init(config.verbose_logging);

    let controller = start_session(&cli).await?;

    // 初始化并运行应用
    let mut app = App::initialize(config, controller)?;
    app.run().await?;

    Ok(())
}

/// 按 查询参数 → 预设文件 → 命令行表单 的顺序确定辩论配置并创建会话
async fn start_session(cli: &Cli) -> Result<TurnController> {
    if let Some(query) = &cli.query {
        return Ok(TurnController::new(parse_query(query)?));
    }

    let form = match &cli.preset {
        Some(path) => {
            let preset = load_preset(path).await?;
            SetupForm {
                topic: preset.topic,
                stance: preset.stance.name().to_string(),
                expertise_level: preset.expertise_level.name().to_string(),
                difficulty: preset.difficulty.name().to_string(),
                judge_mode: preset.judge_mode || cli.judge,
            }
        }
        None => SetupForm {
            topic: match &cli.topic {
                Some(topic) => topic.clone(),
                None => prompt_topic()?,
            },
            stance: cli.stance.clone(),
            expertise_level: cli.expertise.clone(),
            difficulty: cli.difficulty.clone(),
            judge_mode: cli.judge,
        },
    };

    let (controller, notification) = form.submit()?;
    eprintln!("{}", notification);

    Ok(controller)
}

fn prompt_topic() -> Result<String> {
    print!("请输入辩题: ");
    std::io::stdout().flush()?;
    let mut topic = String::new();
    std::io::stdin().read_line(&mut topic)?;
    Ok(topic.trim().to_string())
}
