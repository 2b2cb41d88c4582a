//! Research Tool Declarations
//!
//! The three functions the model may request: paper retrieval, theory
//! validation, and research suggestions. Declarations are real and go out
//! on the wire in registration order, while execution is a stub at the
//! collaborator boundary: the actual database/search backends plug in behind
//! `ToolExecutor`.

use std::collections::HashMap;

use assistant_core::{
    AssistantError, ParameterSpec, Result, ToolExecutor, ToolRegistry, ToolSpec,
};
use async_trait::async_trait;

/// Tool name: retrieve published papers for a topic
pub const RESEARCH_PAPERS: &str = "research_papers";

/// Tool name: validate a proposed theory
pub const THEORY_TEST: &str = "theory_test";

/// Tool name: recommend research directions
pub const SUGGESTIONS: &str = "suggestions";

/// Declarations for the research tools, in dispatch order.
pub fn research_tool_specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec::new(
            RESEARCH_PAPERS,
            "Retrieve relevant research papers and studies related to the \
             given research topic. Call this function whenever a researcher \
             requests information on previously published work, including \
             papers, studies, or related resources.",
        )
        .with_parameter(ParameterSpec::required_string(
            "call",
            "The research topic or field for which relevant papers and \
             studies are needed.",
        )),
        ToolSpec::new(
            THEORY_TEST,
            "Analyze and test a proposed theory to validate its soundness. \
             Call this function when a researcher needs to test or verify a \
             specific theory and receive conclusions or insights from \
             previous research.",
        )
        .with_parameter(ParameterSpec::required_string(
            "call",
            "The theory that needs to be analyzed or tested for its validity \
             and soundness.",
        )),
        ToolSpec::new(
            SUGGESTIONS,
            "Provide research suggestions and recommendations based on the \
             current research topic. Call this function when a researcher \
             needs ideas for expanding or improving their work, including \
             suggestions for new directions or focus areas.",
        )
        .with_parameter(ParameterSpec::required_string(
            "call",
            "The current research topic for which suggestions and \
             recommendations are required.",
        )),
    ]
}

/// Build a registry holding the research tool declarations.
pub fn research_tool_registry() -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    for spec in research_tool_specs() {
        registry.register(spec)?;
    }
    Ok(registry)
}

/// Stub executor for the research tools
///
/// Acknowledges each call with a placeholder result; the real lookups
/// (paper databases, validation pipelines) are an external collaborator's
/// concern. Unknown tool names are an execution error so they feed back into
/// the conversation as an error payload.
#[derive(Default)]
pub struct ResearchToolExecutor;

impl ResearchToolExecutor {
    pub fn new() -> Self {
        Self
    }

    fn call_argument(arguments: &HashMap<String, serde_json::Value>) -> &str {
        arguments
            .get("call")
            .and_then(|v| v.as_str())
            .unwrap_or("(unspecified)")
    }
}

#[async_trait]
impl ToolExecutor for ResearchToolExecutor {
    async fn execute(
        &self,
        name: &str,
        arguments: &HashMap<String, serde_json::Value>,
    ) -> Result<String> {
        let call = Self::call_argument(arguments);
        tracing::debug!(tool = name, call, "executing research tool stub");

        match name {
            RESEARCH_PAPERS => Ok(format!(
                "No paper database is connected. Recorded a retrieval request \
                 for: {call}"
            )),
            THEORY_TEST => Ok(format!(
                "No validation backend is connected. Recorded a theory test \
                 request for: {call}"
            )),
            SUGGESTIONS => Ok(format!(
                "No recommendation backend is connected. Recorded a \
                 suggestion request for: {call}"
            )),
            other => Err(AssistantError::ToolExecution(format!(
                "no executor for tool '{other}'"
            ))),
        }
    }
}
