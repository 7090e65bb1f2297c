//! Reply-generation runtime: catalog matching plus optional LLM-augmented
//! composition behind the `CompletionClient` boundary.

pub mod llm;
pub mod openai;
pub mod prompt;
pub mod runtime;

pub use llm::{CompletionClient, CompletionError, FailingCompletionClient, FixedCompletionClient};
pub use openai::OpenAiChatClient;
pub use prompt::DEFAULT_PERSONA;
pub use runtime::BotRuntime;
