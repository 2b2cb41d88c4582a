//! # assistant-runtime
//!
//! Completion backends for the research assistant.
//!
//! ## Backends
//!
//! - **OpenAI-compatible** (default): chat-completions endpoint with native
//!   tool calling. Works against OpenAI itself or any server speaking the
//!   same wire format.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use assistant_runtime::OpenAiGateway;
//!
//! let gateway = OpenAiGateway::from_env()?;
//! let dispatcher = research_assistant::build_dispatcher(Arc::new(gateway));
//! ```

pub mod openai;

pub use openai::{OpenAiConfig, OpenAiGateway};

// Re-export core types for convenience
pub use assistant_core::{
    AssistantError, CompletionOutcome, Dispatcher, Message, ModelGateway, Result, Role,
};
