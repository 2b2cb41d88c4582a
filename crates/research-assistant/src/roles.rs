//! Built-in Agent Roles
//!
//! Each role is pure configuration: a unique name, a goal that becomes the
//! role's system message, and a task template with an `{input}` slot. Adding
//! a role means adding an entry here (or passing your own `RoleConfig`s to
//! the wiring), never touching agent or dispatcher logic.

use assistant_core::RoleConfig;

/// Agent type key for the research role
pub const RESEARCH: &str = "research";

/// Agent type key for the theory-testing role
pub const THEORY_TESTING: &str = "theory_testing";

/// Agent type key for the suggestion role
pub const SUGGESTION: &str = "suggestion";

/// Research Assistant: fetches relevant papers and findings for a topic.
pub fn research_role() -> RoleConfig {
    RoleConfig::new(
        RESEARCH,
        "You are a Research Assistant. Fetch relevant research papers and \
         information based on the query.",
        "Find research papers and studies on {input}. Provide relevant \
         findings and insights.",
    )
}

/// Theory Tester: analyzes a proposed theory and reports conclusions.
pub fn theory_testing_role() -> RoleConfig {
    RoleConfig::new(
        THEORY_TESTING,
        "You are a Theory Tester. Test the given theory and provide insights.",
        "Analyze and test the following theory: {input}. Provide insights \
         and conclusions.",
    )
}

/// Research Advisor: suggests improvements and new research directions.
pub fn suggestion_role() -> RoleConfig {
    RoleConfig::new(
        SUGGESTION,
        "You are a Research Advisor. Suggest improvements or new directions \
         based on existing research.",
        "Provide suggestions and improvements for research on {input}. \
         Recommend new directions or areas of focus.",
    )
}

/// All built-in roles, in dispatch order.
pub fn builtin_roles() -> Vec<RoleConfig> {
    vec![research_role(), theory_testing_role(), suggestion_role()]
}
