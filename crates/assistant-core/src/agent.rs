//! Agent Abstraction
//!
//! One `Agent` type parameterized by role configuration. A role is data
//! (name, goal, task template), so adding an agent type never means adding a
//! subclass. The agent drives the turn state machine:
//!
//! ```text
//! Idle → AwaitingCompletion → { Completed
//!                             | ToolCallPending → AwaitingCompletion
//!                             | Failed }
//! ```
//!
//! A turn's messages (user instruction, tool round trips, final answer) are
//! buffered and committed to the conversation store atomically when the turn
//! completes. A failed or cancelled turn commits nothing, so only completed
//! turns contribute to history.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{AssistantError, Result};
use crate::gateway::{CompletionOutcome, ModelGateway, ToolCallRequest};
use crate::history::ConversationStore;
use crate::message::{Message, MessageMetadata};
use crate::tool::{ToolExecutor, ToolRegistry};

/// Default bound on tool round trips within one turn
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 5;

/// Placeholder substituted with the raw task input
const INPUT_PLACEHOLDER: &str = "{input}";

/// Immutable identity of an agent role
///
/// Created at startup from static configuration, never mutated. The `goal`
/// becomes the role's system message; `task_template` turns a raw task
/// string into the user-facing instruction.
#[derive(Clone, Debug)]
pub struct RoleConfig {
    /// Unique role key, e.g. "research"
    pub name: String,

    /// Free-text goal, injected as the system message
    pub goal: String,

    /// Instruction template containing `{input}`
    pub task_template: String,
}

impl RoleConfig {
    pub fn new(
        name: impl Into<String>,
        goal: impl Into<String>,
        task_template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            goal: goal.into(),
            task_template: task_template.into(),
        }
    }

    /// Render the raw task input into the user-facing instruction.
    ///
    /// Templates without the placeholder get the input appended, so a
    /// misconfigured role still carries the task to the model.
    pub fn render_task(&self, input: &str) -> String {
        if self.task_template.contains(INPUT_PLACEHOLDER) {
            self.task_template.replace(INPUT_PLACEHOLDER, input)
        } else {
            format!("{} {}", self.task_template, input)
        }
    }
}

/// A role-bound conversational agent
pub struct Agent {
    role: RoleConfig,
    store: Arc<ConversationStore>,
    tools: Arc<ToolRegistry>,
    gateway: Arc<dyn ModelGateway>,
    executor: Arc<dyn ToolExecutor>,
    max_tool_rounds: usize,
}

impl Agent {
    pub fn new(
        role: RoleConfig,
        store: Arc<ConversationStore>,
        tools: Arc<ToolRegistry>,
        gateway: Arc<dyn ModelGateway>,
        executor: Arc<dyn ToolExecutor>,
    ) -> Self {
        Self {
            role,
            store,
            tools,
            gateway,
            executor,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    pub fn with_max_tool_rounds(mut self, max: usize) -> Self {
        self.max_tool_rounds = max;
        self
    }

    /// Role this agent is bound to
    pub fn role(&self) -> &RoleConfig {
        &self.role
    }

    /// Run one turn: render the task, drive the gateway (including tool
    /// round trips), and commit the completed turn to the role's history.
    pub async fn perform_task(&self, input: &str) -> Result<String> {
        let instruction = self.role.render_task(input);
        self.store.get_or_create(&self.role.name, &self.role.goal);

        let base = self.store.snapshot(&self.role.name)?;
        let mut pending = vec![Message::user(instruction)];
        let mut rounds = 0;

        loop {
            let mut request = base.clone();
            request.extend(pending.iter().cloned());

            match self.gateway.complete(&request, self.tools.all()).await? {
                CompletionOutcome::Answer { text } => {
                    pending.push(Message::assistant(&text));
                    self.store.append_all(&self.role.name, pending)?;
                    return Ok(text);
                }
                CompletionOutcome::ToolCall(call) => {
                    rounds += 1;
                    if rounds > self.max_tool_rounds {
                        return Err(AssistantError::ToolLoopExceeded(self.max_tool_rounds));
                    }
                    pending.push(self.run_tool(&call).await);
                }
            }
        }
    }

    /// Like [`perform_task`](Self::perform_task) but bounded by `limit`.
    ///
    /// On expiry the turn resolves to [`AssistantError::Cancelled`] with
    /// nothing committed: history commits happen only at turn completion, so
    /// cancellation can never leave a half-applied turn behind.
    pub async fn perform_task_with_timeout(
        &self,
        input: &str,
        limit: Duration,
    ) -> Result<String> {
        match tokio::time::timeout(limit, self.perform_task(input)).await {
            Ok(result) => result,
            Err(_) => Err(AssistantError::Cancelled),
        }
    }

    /// Execute one requested tool call and shape the outcome as a tool
    /// message. Execution failures are recorded as an error payload so the
    /// model can react; they do not abort the turn.
    async fn run_tool(&self, call: &ToolCallRequest) -> Message {
        tracing::debug!(role = %self.role.name, tool = %call.name, "executing tool");

        let output = if self.tools.get(&call.name).is_none() {
            tracing::warn!(tool = %call.name, "model requested an undeclared tool");
            format!("Error: tool '{}' is not declared", call.name)
        } else {
            match self.executor.execute(&call.name, &call.arguments).await {
                Ok(output) => output,
                Err(e) => {
                    tracing::warn!(tool = %call.name, error = %e, "tool execution failed");
                    format!("Error: {e}")
                }
            }
        };

        Message::tool(
            output,
            MessageMetadata {
                tool_call_id: Some(call.id_or_default()),
                tool_name: Some(call.name.clone()),
                tool_arguments: Some(call.arguments.clone()),
                ..Default::default()
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;
    use crate::tool::{ParameterSpec, ToolSpec};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Gateway that replays a scripted sequence of outcomes.
    struct ScriptedGateway {
        script: Mutex<Vec<Result<CompletionOutcome>>>,
    }

    impl ScriptedGateway {
        fn new(script: Vec<Result<CompletionOutcome>>) -> Self {
            Self {
                script: Mutex::new(script),
            }
        }
    }

    #[async_trait]
    impl ModelGateway for ScriptedGateway {
        async fn complete(
            &self,
            _messages: &[Message],
            _tools: &[ToolSpec],
        ) -> Result<CompletionOutcome> {
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                // Past the script: keep asking for the same tool.
                return Ok(CompletionOutcome::ToolCall(tool_call("research_papers")));
            }
            script.remove(0)
        }
    }

    /// Executor that echoes the call it received.
    struct EchoExecutor;

    #[async_trait]
    impl ToolExecutor for EchoExecutor {
        async fn execute(
            &self,
            name: &str,
            arguments: &HashMap<String, serde_json::Value>,
        ) -> Result<String> {
            let call = arguments
                .get("call")
                .and_then(|v| v.as_str())
                .unwrap_or("");
            Ok(format!("{name} executed for '{call}'"))
        }
    }

    struct FailingExecutor;

    #[async_trait]
    impl ToolExecutor for FailingExecutor {
        async fn execute(
            &self,
            _name: &str,
            _arguments: &HashMap<String, serde_json::Value>,
        ) -> Result<String> {
            Err(AssistantError::ToolExecution("backend offline".into()))
        }
    }

    fn tool_call(name: &str) -> ToolCallRequest {
        let mut arguments = HashMap::new();
        arguments.insert("call".to_string(), serde_json::json!("X"));
        ToolCallRequest {
            name: name.into(),
            arguments,
            id: Some("call_1".into()),
        }
    }

    fn answer(text: &str) -> Result<CompletionOutcome> {
        Ok(CompletionOutcome::Answer { text: text.into() })
    }

    fn research_role() -> RoleConfig {
        RoleConfig::new(
            "research",
            "Fetch relevant research papers and information based on the query.",
            "Find research papers and studies on {input}. Provide relevant findings and insights.",
        )
    }

    fn build_agent(
        gateway: Arc<dyn ModelGateway>,
        executor: Arc<dyn ToolExecutor>,
    ) -> (Agent, Arc<ConversationStore>) {
        let store = Arc::new(ConversationStore::new());
        let mut tools = ToolRegistry::new();
        tools
            .register(
                ToolSpec::new("research_papers", "Retrieve relevant research papers.")
                    .with_parameter(ParameterSpec::required_string("call", "the topic")),
            )
            .unwrap();
        let agent = Agent::new(
            research_role(),
            store.clone(),
            Arc::new(tools),
            gateway,
            executor,
        );
        (agent, store)
    }

    #[test]
    fn test_render_task() {
        let role = research_role();
        assert_eq!(
            role.render_task("marine biodiversity"),
            "Find research papers and studies on marine biodiversity. \
             Provide relevant findings and insights."
        );
    }

    #[test]
    fn test_render_task_without_placeholder() {
        let role = RoleConfig::new("research", "goal", "Investigate:");
        assert_eq!(role.render_task("kelp forests"), "Investigate: kelp forests");
    }

    #[tokio::test]
    async fn test_plain_turn_appends_user_and_assistant() {
        let gateway = Arc::new(ScriptedGateway::new(vec![answer("answer")]));
        let (agent, store) = build_agent(gateway, Arc::new(EchoExecutor));

        let result = agent.perform_task("marine biodiversity").await.unwrap();
        assert_eq!(result, "answer");

        let history = store.snapshot("research").unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].role, Role::System);
        assert_eq!(history[1].role, Role::User);
        assert!(history[1].content.contains("marine biodiversity"));
        assert_eq!(history[2].role, Role::Assistant);
        assert_eq!(history[2].content, "answer");
    }

    #[tokio::test]
    async fn test_tool_round_trip_grows_history_by_three() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Ok(CompletionOutcome::ToolCall(tool_call("research_papers"))),
            answer("final"),
        ]));
        let (agent, store) = build_agent(gateway, Arc::new(EchoExecutor));

        let result = agent.perform_task("marine biodiversity").await.unwrap();
        assert_eq!(result, "final");

        let history = store.snapshot("research").unwrap();
        assert_eq!(history.len(), 4); // system + user + tool + assistant
        assert_eq!(history[2].role, Role::Tool);
        assert!(history[2].content.contains("research_papers executed for 'X'"));
        let meta = history[2].metadata.as_ref().unwrap();
        assert_eq!(meta.tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(history[3].content, "final");
    }

    #[tokio::test]
    async fn test_tool_failure_feeds_back_into_conversation() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Ok(CompletionOutcome::ToolCall(tool_call("research_papers"))),
            answer("recovered"),
        ]));
        let (agent, store) = build_agent(gateway, Arc::new(FailingExecutor));

        let result = agent.perform_task("marine biodiversity").await.unwrap();
        assert_eq!(result, "recovered");

        let history = store.snapshot("research").unwrap();
        assert!(history[2].content.contains("Error:"));
        assert!(history[2].content.contains("backend offline"));
    }

    #[tokio::test]
    async fn test_undeclared_tool_recorded_as_error_payload() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Ok(CompletionOutcome::ToolCall(tool_call("crystal_ball"))),
            answer("ok"),
        ]));
        let (agent, store) = build_agent(gateway, Arc::new(EchoExecutor));

        agent.perform_task("anything").await.unwrap();
        let history = store.snapshot("research").unwrap();
        assert!(history[2].content.contains("'crystal_ball' is not declared"));
    }

    #[tokio::test]
    async fn test_gateway_failure_commits_nothing() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Err(
            AssistantError::RateLimited("try later".into()),
        )]));
        let (agent, store) = build_agent(gateway, Arc::new(EchoExecutor));

        let err = agent.perform_task("marine biodiversity").await.unwrap_err();
        assert!(matches!(err, AssistantError::RateLimited(_)));

        // Seed only: the failed turn added zero messages.
        assert_eq!(store.len("research").unwrap(), 1);
    }

    #[tokio::test]
    async fn test_tool_loop_bound() {
        // Empty script: the gateway asks for a tool forever.
        let gateway = Arc::new(ScriptedGateway::new(Vec::new()));
        let (agent, store) = build_agent(gateway, Arc::new(EchoExecutor));
        let agent = agent.with_max_tool_rounds(3);

        let err = agent.perform_task("marine biodiversity").await.unwrap_err();
        assert!(matches!(err, AssistantError::ToolLoopExceeded(3)));
        assert_eq!(store.len("research").unwrap(), 1);
    }

    #[tokio::test]
    async fn test_timeout_resolves_to_cancelled() {
        struct StallingGateway;

        #[async_trait]
        impl ModelGateway for StallingGateway {
            async fn complete(
                &self,
                _messages: &[Message],
                _tools: &[ToolSpec],
            ) -> Result<CompletionOutcome> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(CompletionOutcome::Answer { text: "late".into() })
            }
        }

        let (agent, store) = build_agent(Arc::new(StallingGateway), Arc::new(EchoExecutor));
        let err = agent
            .perform_task_with_timeout("marine biodiversity", Duration::from_millis(20))
            .await
            .unwrap_err();

        assert!(matches!(err, AssistantError::Cancelled));
        assert_eq!(store.len("research").unwrap(), 1);
    }
}
