//! # research-assistant
//!
//! GenAI research assistant built on `assistant-core`: three role-bound
//! agents (research, theory testing, suggestion), each with its own isolated
//! conversation history, sharing one tool registry and one model gateway.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use assistant_runtime::OpenAiGateway;
//! use research_assistant::build_dispatcher;
//!
//! let gateway = Arc::new(OpenAiGateway::from_env()?);
//! let dispatcher = build_dispatcher(gateway)?;
//!
//! let findings = dispatcher.handle("research", "marine biodiversity").await?;
//! let verdict = dispatcher
//!     .handle("theory_testing", "Warmer seas raise fish mortality.")
//!     .await?;
//! ```

pub mod roles;
pub mod tools;

use std::sync::Arc;

use assistant_core::{
    Agent, ConversationStore, Dispatcher, ModelGateway, Result, ToolExecutor,
};

pub use roles::builtin_roles;
pub use tools::{research_tool_specs, ResearchToolExecutor};

/// Wire up a dispatcher with the built-in roles, the research tool
/// declarations, a fresh conversation store, and the stub tool executor.
pub fn build_dispatcher(gateway: Arc<dyn ModelGateway>) -> Result<Dispatcher> {
    build_dispatcher_with(
        gateway,
        Arc::new(ResearchToolExecutor::new()),
        Arc::new(ConversationStore::new()),
    )
}

/// Wire up a dispatcher with an explicit executor and store.
///
/// The store is shared by all agents but histories stay keyed per role;
/// passing your own `Arc` lets callers inspect histories from outside.
pub fn build_dispatcher_with(
    gateway: Arc<dyn ModelGateway>,
    executor: Arc<dyn ToolExecutor>,
    store: Arc<ConversationStore>,
) -> Result<Dispatcher> {
    let tools = Arc::new(tools::research_tool_registry()?);

    let mut dispatcher = Dispatcher::new();
    for role in builtin_roles() {
        dispatcher.register(Agent::new(
            role,
            store.clone(),
            tools.clone(),
            gateway.clone(),
            executor.clone(),
        ))?;
    }

    tracing::debug!(
        agent_types = ?dispatcher.agent_types(),
        tools = tools.len(),
        "research assistant wired"
    );
    Ok(dispatcher)
}
