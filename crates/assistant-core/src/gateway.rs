//! Model Gateway
//!
//! The single choke point between the assistant and the external completion
//! endpoint. A backend implements [`ModelGateway`]; everything above it
//! consumes normalized [`CompletionOutcome`] values. Raw provider responses
//! and raw transport faults never cross this boundary; they are decoded and
//! classified exactly once, here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;
use crate::message::Message;
use crate::tool::ToolSpec;

/// A tool invocation requested by the model
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Name of a declared tool
    pub name: String,

    /// Arguments as key-value pairs, conforming to the tool's schema
    pub arguments: HashMap<String, serde_json::Value>,

    /// Backend-assigned call ID, if any
    #[serde(default)]
    pub id: Option<String>,
}

impl ToolCallRequest {
    /// Call ID, minting one if the backend supplied none.
    pub fn id_or_default(&self) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
    }
}

/// Normalized outcome of one completion call
#[derive(Clone, Debug)]
pub enum CompletionOutcome {
    /// Final textual answer, surrounding whitespace trimmed
    Answer { text: String },

    /// The model wants a tool executed before it will answer
    ToolCall(ToolCallRequest),
}

/// Strategy trait for completion backends
///
/// Send the full ordered history plus the declared tool set; get back a
/// normalized outcome or a classified error (`Transport`, `Auth`,
/// `RateLimited`, `MalformedResponse`). Callers must never see an unhandled
/// fault from this boundary.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<CompletionOutcome>;
}
