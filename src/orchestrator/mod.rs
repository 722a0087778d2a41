//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (交互循环、取消、展示)
//!     ↓
//! workflow::TurnController (单个回合：提交 → 等待 → 完成)
//!     ↓
//! services::PromptAssembler (能力层：辩论回复 / 评委反馈)
//!     ↓
//! infrastructure::OpenAiGateway (基础设施：LLM 调用)
//! ```
//!
//! ## 设计原则
//!
//! 1. **向下依赖**：编排层 → workflow → services → infrastructure
//! 2. **单一写入者**：对话记录只由回合控制器修改
//! 3. **无业务逻辑**：只做调度和展示

pub mod debate_app;

pub use debate_app::{App, Command};
