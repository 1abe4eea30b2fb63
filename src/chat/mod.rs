//! Chat session state: the remote thread handle and the local transcript.
//!
//! A [`ChatSession`] is created once at startup — it creates a fresh remote
//! thread, so concurrent sessions never interleave on a shared conversation.
//! The [`SessionLog`] mirrors the thread for rendering; it lives only as
//! long as the process and is appended to by the caller after every turn.

pub mod driver;

use serde::Serialize;

use crate::assistant::{ApiError, AssistantApi, MessageRole};

use driver::{PollPolicy, TurnOutcome, send_turn_or_fallback};

// ---------------------------------------------------------------------------
// Session log
// ---------------------------------------------------------------------------

/// One transcript entry, user or assistant.
#[derive(Debug, Clone, Serialize)]
pub struct ChatEntry {
    pub role: MessageRole,
    pub content: String,
}

impl ChatEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Session-scoped ordered transcript. Not persisted, not shared.
#[derive(Debug, Default)]
pub struct SessionLog {
    entries: Vec<ChatEntry>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: ChatEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }
}

// ---------------------------------------------------------------------------
// Chat session
// ---------------------------------------------------------------------------

/// Handle to the session's remote conversation thread.
#[derive(Debug)]
pub struct ChatSession {
    thread_id: String,
    assistant_id: String,
    policy: PollPolicy,
}

impl ChatSession {
    /// Create the remote thread and bind the session to it.
    pub fn start(
        api: &dyn AssistantApi,
        assistant_id: impl Into<String>,
        policy: PollPolicy,
    ) -> Result<Self, ApiError> {
        let thread_id = api.create_thread()?;
        Ok(Self {
            thread_id,
            assistant_id: assistant_id.into(),
            policy,
        })
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    /// Drive one turn against this session's thread, with fallback.
    pub fn send(&self, api: &dyn AssistantApi, user_text: &str) -> TurnOutcome {
        send_turn_or_fallback(
            api,
            &self.policy,
            &self.thread_id,
            &self.assistant_id,
            user_text,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_preserves_append_order() {
        let mut log = SessionLog::new();
        log.append(ChatEntry::user("Is this data balanced?"));
        log.append(ChatEntry::assistant("It is imbalanced."));

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].role, MessageRole::User);
        assert_eq!(entries[1].role, MessageRole::Assistant);
    }

    #[test]
    fn entries_serialize_for_the_transcript_endpoint() {
        let entry = ChatEntry::assistant("hello");
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hello"}"#);
    }
}
