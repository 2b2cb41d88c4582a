//! Dispatcher
//!
//! Maps an external `agent_type` identifier to the agent bound to that role
//! and forwards the task payload. This is the sole externally callable
//! surface of the core.

use crate::agent::Agent;
use crate::error::{AssistantError, Result};

/// Static role-name → agent mapping
///
/// Registration order is kept so the valid set reads the same way it was
/// configured when reported back on an invalid request.
#[derive(Default)]
pub struct Dispatcher {
    agents: Vec<Agent>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent under its role name.
    pub fn register(&mut self, agent: Agent) -> Result<()> {
        let name = &agent.role().name;
        if self.agents.iter().any(|a| &a.role().name == name) {
            return Err(AssistantError::Config(format!(
                "agent type '{name}' already registered"
            )));
        }
        self.agents.push(agent);
        Ok(())
    }

    /// The valid agent types, in registration order.
    pub fn agent_types(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.role().name.as_str()).collect()
    }

    /// Route `input` to the agent registered for `agent_type`.
    ///
    /// Unknown types fail with [`AssistantError::InvalidAgentType`]
    /// enumerating the valid set; there is no silent default. A valid type
    /// forwards to the agent and returns its result or error unchanged, so
    /// error provenance is preserved.
    pub async fn handle(&self, agent_type: &str, input: &str) -> Result<String> {
        let agent = self
            .agents
            .iter()
            .find(|a| a.role().name == agent_type)
            .ok_or_else(|| AssistantError::InvalidAgentType {
                requested: agent_type.to_string(),
                valid: self
                    .agent_types()
                    .into_iter()
                    .map(String::from)
                    .collect(),
            })?;

        tracing::debug!(agent_type, "dispatching task");
        agent.perform_task(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::RoleConfig;
    use crate::gateway::{CompletionOutcome, ModelGateway};
    use crate::history::ConversationStore;
    use crate::message::Message;
    use crate::tool::{ToolExecutor, ToolRegistry, ToolSpec};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Gateway that answers with the role-agnostic text "ok".
    struct FixedGateway;

    #[async_trait]
    impl ModelGateway for FixedGateway {
        async fn complete(
            &self,
            _messages: &[Message],
            _tools: &[ToolSpec],
        ) -> Result<CompletionOutcome> {
            Ok(CompletionOutcome::Answer { text: "ok".into() })
        }
    }

    struct NoopExecutor;

    #[async_trait]
    impl ToolExecutor for NoopExecutor {
        async fn execute(
            &self,
            _name: &str,
            _arguments: &HashMap<String, serde_json::Value>,
        ) -> Result<String> {
            Ok(String::new())
        }
    }

    fn build_dispatcher(store: Arc<ConversationStore>) -> Dispatcher {
        let tools = Arc::new(ToolRegistry::new());
        let gateway: Arc<dyn ModelGateway> = Arc::new(FixedGateway);
        let executor: Arc<dyn ToolExecutor> = Arc::new(NoopExecutor);

        let mut dispatcher = Dispatcher::new();
        for (name, goal) in [
            ("research", "research goal"),
            ("theory_testing", "theory goal"),
        ] {
            dispatcher
                .register(Agent::new(
                    RoleConfig::new(name, goal, "{input}"),
                    store.clone(),
                    tools.clone(),
                    gateway.clone(),
                    executor.clone(),
                ))
                .unwrap();
        }
        dispatcher
    }

    #[tokio::test]
    async fn test_routes_to_registered_agent() {
        let store = Arc::new(ConversationStore::new());
        let dispatcher = build_dispatcher(store.clone());

        let result = dispatcher.handle("research", "kelp forests").await.unwrap();
        assert_eq!(result, "ok");
        assert_eq!(store.len("research").unwrap(), 3);
        assert!(!store.contains("theory_testing"));
    }

    #[tokio::test]
    async fn test_invalid_agent_type() {
        let store = Arc::new(ConversationStore::new());
        let dispatcher = build_dispatcher(store.clone());

        let err = dispatcher.handle("oracle", "x").await.unwrap_err();
        match err {
            AssistantError::InvalidAgentType { requested, valid } => {
                assert_eq!(requested, "oracle");
                assert_eq!(valid, vec!["research", "theory_testing"]);
            }
            other => panic!("unexpected error: {other}"),
        }

        // No history was touched.
        assert!(!store.contains("research"));
        assert!(!store.contains("oracle"));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let store = Arc::new(ConversationStore::new());
        let mut dispatcher = build_dispatcher(store.clone());

        let err = dispatcher
            .register(Agent::new(
                RoleConfig::new("research", "another goal", "{input}"),
                store,
                Arc::new(ToolRegistry::new()),
                Arc::new(FixedGateway),
                Arc::new(NoopExecutor),
            ))
            .unwrap_err();
        assert!(matches!(err, AssistantError::Config(_)));
    }
}
