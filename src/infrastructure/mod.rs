pub mod llm_gateway;

pub use llm_gateway::{GenerationRequest, OpenAiGateway, TextGenerator, ToolBox, ToolDefinition};
