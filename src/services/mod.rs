pub mod judge_tools;
pub mod prompt_assembler;
pub mod prompts;

pub use judge_tools::JudgeToolbox;
pub use prompt_assembler::{DebateResponse, JudgeResponse, PromptAssembler};
pub use prompts::PromptInput;
