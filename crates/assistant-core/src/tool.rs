//! Tool Declarations
//!
//! Schemas for the functions the model may request to invoke, plus the
//! execution boundary. Declarations are pure data loaded once at startup and
//! shared read-only across all agents; actual tool logic lives behind the
//! `ToolExecutor` collaborator trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{AssistantError, Result};

/// Parameter definition for a tool schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Parameter name
    pub name: String,

    /// JSON Schema type (string, number, boolean, object, array)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description (shown to the model)
    pub description: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,
}

impl ParameterSpec {
    /// A required string parameter, the common case.
    pub fn required_string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: "string".into(),
            description: description.into(),
            required: true,
        }
    }
}

/// Tool declaration (for LLM function calling)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to the model)
    pub description: String,

    /// Parameter definitions
    pub parameters: Vec<ParameterSpec>,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// JSON-schema object for the wire format's `parameters` field.
    pub fn parameters_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &self.parameters {
            properties.insert(
                param.name.clone(),
                serde_json::json!({
                    "type": param.param_type,
                    "description": param.description,
                }),
            );
            if param.required {
                required.push(serde_json::Value::String(param.name.clone()));
            }
        }

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Registry of declared tools
///
/// Declarations are kept in registration order; some backends use that order
/// as a tie-break for ambiguous matches, so it is part of the contract.
#[derive(Default)]
pub struct ToolRegistry {
    specs: Vec<ToolSpec>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool declaration. Names must be unique.
    pub fn register(&mut self, spec: ToolSpec) -> Result<()> {
        if self.specs.iter().any(|s| s.name == spec.name) {
            return Err(AssistantError::DuplicateTool(spec.name));
        }
        self.specs.push(spec);
        Ok(())
    }

    /// All declarations, in registration order.
    pub fn all(&self) -> &[ToolSpec] {
        &self.specs
    }

    /// Look up a declaration by name.
    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    /// Registered tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.specs.iter().map(|s| s.name.as_str()).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Execution boundary for declared tools
///
/// The internal logic behind each tool (database lookups, search, ...) is an
/// external collaborator's concern; the core only depends on this
/// call/return contract. Failures surface as
/// [`AssistantError::ToolExecution`] and are fed back into the conversation
/// rather than aborting the turn.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(
        &self,
        name: &str,
        arguments: &HashMap<String, serde_json::Value>,
    ) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str) -> ToolSpec {
        ToolSpec::new(name, format!("{name} description"))
            .with_parameter(ParameterSpec::required_string("call", "the query"))
    }

    #[test]
    fn test_registration_order_preserved() {
        let mut registry = ToolRegistry::new();
        registry.register(spec("research_papers")).unwrap();
        registry.register(spec("theory_test")).unwrap();
        registry.register(spec("suggestions")).unwrap();

        assert_eq!(
            registry.names(),
            vec!["research_papers", "theory_test", "suggestions"]
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(spec("research_papers")).unwrap();
        let err = registry.register(spec("research_papers")).unwrap_err();
        assert!(matches!(err, AssistantError::DuplicateTool(n) if n == "research_papers"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_parameters_schema_shape() {
        let schema = spec("research_papers").parameters_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["call"]["type"], "string");
        assert_eq!(schema["required"][0], "call");
    }
}
