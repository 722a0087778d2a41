//! # Debate Practice
//!
//! 一个用于辩论练习的 Rust 应用程序：设置辩题、立场、专业水平和难度，
//! 然后与 AI 对手交替发言，或让 AI 评委对论证提问、给出反馈。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有 LLM 客户端，只暴露"生成文本"能力
//! - `OpenAiGateway` - OpenAI 兼容网关，支持工具调用
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每次调用都是无状态的
//! - `PromptAssembler` - 辩论回复 / 评委反馈两种模板
//! - `JudgeToolbox` - 评委可调用的提问 / 反馈格式化工具
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个回合"的完整流程
//! - `SetupForm` - 校验设置并创建会话
//! - `Session` - 会话状态（配置 + 对话记录 + 评委开关）
//! - `TurnController` - 空闲 / 等待回复 两状态的回合控制
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 终端交互循环、取消和展示
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{OpenAiGateway, TextGenerator};
pub use models::{DebateConfiguration, Difficulty, ExpertiseLevel, Stance, Transcript, Turn};
pub use orchestrator::App;
pub use services::PromptAssembler;
pub use workflow::{SetupForm, TurnController, TurnOutcome};
