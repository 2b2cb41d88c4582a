//! OpenAI-Compatible Gateway
//!
//! Implementation of `ModelGateway` for chat-completions endpoints speaking
//! the OpenAI wire format, including native `tools`/`tool_calls`.
//!
//! All provider faults are classified here (transport, auth, rate limit,
//! malformed body) so callers above only ever see `AssistantError` kinds.

use std::collections::HashMap;

use assistant_core::{
    error::{AssistantError, Result},
    gateway::{CompletionOutcome, ModelGateway, ToolCallRequest},
    message::{Message, Role},
    tool::ToolSpec,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// OpenAI gateway configuration
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    /// API key (bearer credential)
    pub api_key: String,

    /// Endpoint base URL
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".into(),
            model: "gpt-4o-mini".into(),
            temperature: 0.7,
            max_tokens: 1000,
            timeout_secs: 120,
        }
    }

    /// Read configuration from the environment.
    ///
    /// `OPENAI_API_KEY` is required; `OPENAI_BASE_URL` and `OPENAI_MODEL`
    /// override the defaults.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AssistantError::Config("OPENAI_API_KEY is not set".into()))?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            config.model = model;
        }
        Ok(config)
    }
}

/// OpenAI-compatible completion gateway
pub struct OpenAiGateway {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiGateway {
    /// Create a gateway from configuration.
    pub fn from_config(config: OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AssistantError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a gateway from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_config(OpenAiConfig::from_env()?)
    }

    /// Convert conversation messages to the wire format.
    ///
    /// A tool message carries its originating call in metadata; the wire
    /// format wants the assistant's `tool_calls` turn replayed before the
    /// tool result, so that turn is reconstructed here rather than stored in
    /// the conversation history.
    fn convert_messages(messages: &[Message]) -> Vec<WireMessage> {
        let mut wire = Vec::with_capacity(messages.len());

        for message in messages {
            match message.role {
                Role::System => wire.push(WireMessage::plain("system", &message.content)),
                Role::User => wire.push(WireMessage::plain("user", &message.content)),
                Role::Assistant => wire.push(WireMessage::plain("assistant", &message.content)),
                Role::Tool => {
                    let meta = message.metadata.clone().unwrap_or_default();
                    let call_id = meta.tool_call_id.unwrap_or_default();

                    if let Some(name) = meta.tool_name {
                        let arguments = meta.tool_arguments.unwrap_or_default();
                        wire.push(WireMessage {
                            role: "assistant".into(),
                            content: None,
                            tool_call_id: None,
                            tool_calls: Some(vec![WireToolCall {
                                id: call_id.clone(),
                                call_type: "function".into(),
                                function: WireFunctionCall {
                                    name,
                                    arguments: serde_json::to_string(&arguments)
                                        .unwrap_or_else(|_| "{}".into()),
                                },
                            }]),
                        });
                    }

                    wire.push(WireMessage {
                        role: "tool".into(),
                        content: Some(message.content.clone()),
                        tool_call_id: Some(call_id),
                        tool_calls: None,
                    });
                }
            }
        }

        wire
    }

    /// Convert tool declarations to the wire format, preserving order.
    fn convert_tools(tools: &[ToolSpec]) -> Vec<WireTool> {
        tools
            .iter()
            .map(|spec| WireTool {
                tool_type: "function".into(),
                function: WireFunction {
                    name: spec.name.clone(),
                    description: spec.description.clone(),
                    parameters: spec.parameters_schema(),
                },
            })
            .collect()
    }

    /// Map a non-success HTTP status to an error kind.
    fn classify_status(status: StatusCode, body: &str) -> AssistantError {
        let detail = format!("{status}: {}", snippet(body));
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AssistantError::Auth(detail),
            StatusCode::TOO_MANY_REQUESTS => AssistantError::RateLimited(detail),
            _ => AssistantError::Transport(detail),
        }
    }

    /// Decode the first choice into a normalized outcome.
    fn decode_choice(choice: ChoiceMessage) -> Result<CompletionOutcome> {
        if let Some(call) = choice.tool_calls.and_then(|mut calls| {
            if calls.is_empty() {
                None
            } else {
                Some(calls.remove(0))
            }
        }) {
            let arguments: HashMap<String, serde_json::Value> =
                serde_json::from_str(&call.function.arguments).map_err(|e| {
                    AssistantError::MalformedResponse(format!(
                        "undecodable tool arguments for '{}': {e}",
                        call.function.name
                    ))
                })?;

            return Ok(CompletionOutcome::ToolCall(ToolCallRequest {
                name: call.function.name,
                arguments,
                id: Some(call.id),
            }));
        }

        match choice.content {
            Some(text) => Ok(CompletionOutcome::Answer {
                text: text.trim().to_string(),
            }),
            None => Err(AssistantError::MalformedResponse(
                "choice has neither content nor tool calls".into(),
            )),
        }
    }
}

#[async_trait]
impl ModelGateway for OpenAiGateway {
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<CompletionOutcome> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: Self::convert_messages(messages),
            tools: Self::convert_tools(tools),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistantError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AssistantError::Transport(e.to_string()))?;

        if !status.is_success() {
            let err = Self::classify_status(status, &body);
            tracing::warn!(%status, error = %err, "completion request rejected");
            return Err(err);
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| AssistantError::MalformedResponse(format!("{e}: {}", snippet(&body))))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AssistantError::MalformedResponse("response has no choices".into()))?;

        Self::decode_choice(choice.message)
    }
}

fn snippet(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map_or(body.len(), |(idx, _)| idx);
    &body[..end]
}

// Wire types -----------------------------------------------------------------

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct WireMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
}

impl WireMessage {
    fn plain(role: &str, content: &str) -> Self {
        Self {
            role: role.into(),
            content: Some(content.into()),
            tool_call_id: None,
            tool_calls: None,
        }
    }
}

#[derive(Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    tool_type: String,
    function: WireFunction,
}

#[derive(Serialize)]
struct WireFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    call_type: String,
    function: WireFunctionCall,
}

#[derive(Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}
