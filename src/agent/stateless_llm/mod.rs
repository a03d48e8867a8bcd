pub mod claude_llm;
pub mod openai_compatible_llm;
pub mod stateless_llm_interface;

pub use claude_llm::ClaudeLLM;
pub use openai_compatible_llm::OpenAICompatibleLLM;
pub use stateless_llm_interface::*;
