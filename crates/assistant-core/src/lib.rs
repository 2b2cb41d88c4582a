//! # assistant-core
//!
//! Agent dispatch, per-role conversation state, and the tool-call contract
//! for the research assistant.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Dispatcher                             │
//! │  ┌───────────┐  ┌──────────────────┐  ┌──────────────────┐  │
//! │  │   Agent   │──│ ConversationStore│  │   ModelGateway   │  │
//! │  │ (per role)│  │  (per-role hist) │  │   (Strategy)     │  │
//! │  └───────────┘  └──────────────────┘  └──────────────────┘  │
//! │        │        ┌──────────────────┐  ┌──────────────────┐  │
//! │        └────────│   ToolRegistry   │──│   ToolExecutor   │  │
//! │                 └──────────────────┘  └──────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `ModelGateway` trait is the single choke point into the external
//! completion endpoint; everything above it works with normalized
//! `CompletionOutcome` values, never raw provider responses. Roles are pure
//! configuration (`RoleConfig`), so adding an agent type means adding data,
//! not code.

pub mod agent;
pub mod dispatch;
pub mod error;
pub mod gateway;
pub mod history;
pub mod message;
pub mod tool;

pub use agent::{Agent, RoleConfig};
pub use dispatch::Dispatcher;
pub use error::{AssistantError, Result};
pub use gateway::{CompletionOutcome, ModelGateway, ToolCallRequest};
pub use history::ConversationStore;
pub use message::{Message, Role};
pub use tool::{ParameterSpec, ToolExecutor, ToolRegistry, ToolSpec};
