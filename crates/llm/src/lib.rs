//! ReviewLens LLM Integration
//!
//! Chat-completion client and review theme extraction

mod client;
mod llm_trait;
mod prompts;
mod themes;
mod types;

pub use client::{classify_status, parse_completion, OpenAiClient};
pub use llm_trait::ChatCompletion;
pub use prompts::{theme_prompt, THEME_INSTRUCTIONS};
pub use themes::ThemeExtractor;
pub use types::{
    ChatMessage, ChatRequest, ChatResponse, CompletionError, LlmConfig, ThemeSummary,
    THEME_MAX_TOKENS, THEME_TEMPERATURE,
};
