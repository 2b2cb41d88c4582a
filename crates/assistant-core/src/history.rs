//! Conversation Store
//!
//! Owns one ordered message history per agent role. Histories are seeded
//! with a single system message, append-only, and fully isolated from each
//! other. Synchronization is per role: two agents working different roles
//! never contend on the same lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::error::{AssistantError, Result};
use crate::message::Message;

type History = Arc<Mutex<Vec<Message>>>;

/// Per-role conversation histories
///
/// The store is the exclusive owner of all histories; callers only ever see
/// owned snapshots, never live references, so an in-flight completion request
/// cannot be mutated underneath by a concurrent append.
#[derive(Default)]
pub struct ConversationStore {
    histories: RwLock<HashMap<String, History>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the history for `role`, seeding it with a system message.
    ///
    /// Idempotent on the seed: a second call with a different `system_prompt`
    /// leaves the stored system message untouched (first write wins).
    pub fn get_or_create(&self, role: &str, system_prompt: &str) {
        {
            let histories = self.histories.read().unwrap();
            if histories.contains_key(role) {
                return;
            }
        }

        let mut histories = self.histories.write().unwrap();
        histories
            .entry(role.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(vec![Message::system(system_prompt)])));
    }

    /// Append one message to the end of `role`'s history.
    pub fn append(&self, role: &str, message: Message) -> Result<()> {
        let history = self.history(role)?;
        history.lock().unwrap().push(message);
        Ok(())
    }

    /// Append a batch of messages atomically under the role's lock.
    ///
    /// A completed turn (user, any tool messages, assistant) lands as one
    /// unit, so concurrent turns on the same role can never interleave a
    /// user message away from its outcome.
    pub fn append_all(&self, role: &str, messages: Vec<Message>) -> Result<()> {
        let history = self.history(role)?;
        history.lock().unwrap().extend(messages);
        Ok(())
    }

    /// Owned copy of the current ordered history for `role`.
    pub fn snapshot(&self, role: &str) -> Result<Vec<Message>> {
        let history = self.history(role)?;
        let messages = history.lock().unwrap().clone();
        Ok(messages)
    }

    /// Number of messages currently recorded for `role`.
    pub fn len(&self, role: &str) -> Result<usize> {
        let history = self.history(role)?;
        let len = history.lock().unwrap().len();
        Ok(len)
    }

    /// Whether `role` has been seeded.
    pub fn contains(&self, role: &str) -> bool {
        self.histories.read().unwrap().contains_key(role)
    }

    fn history(&self, role: &str) -> Result<History> {
        let histories = self.histories.read().unwrap();
        histories
            .get(role)
            .cloned()
            .ok_or_else(|| AssistantError::UnknownRole(role.to_string()))
    }
}
