//! Remote assistant API surface.
//!
//! The dashboard delegates all natural-language reasoning to a hosted
//! assistant service with a threads-and-runs conversation model:
//!
//! - an **assistant** holds standing instructions,
//! - a **thread** holds an ordered conversation,
//! - a **run** is an asynchronous job that processes pending thread
//!   messages and produces a reply.
//!
//! [`AssistantApi`] is the seam between the conversation driver and the
//! transport: [`client::AssistantClient`] implements it over HTTP, and the
//! tests implement it with a scripted mock. Any compliant implementation
//! (including a local model shim) satisfies the contract.

pub mod client;
pub mod configure;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Message author role within a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message as returned by the thread listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub role: MessageRole,
    pub content: String,
    /// Creation time, seconds since the epoch. Used to pick the newest
    /// reply instead of trusting list position.
    pub created_at: i64,
}

/// Lifecycle status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
    Cancelling,
    Cancelled,
    Expired,
    RequiresAction,
    Incomplete,
}

impl RunStatus {
    /// Whether the remote service will make no further progress on the run.
    ///
    /// `requires_action` is terminal for this client: it expects a tool
    /// response we never send, so waiting on it would spin forever.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Queued | Self::InProgress | Self::Cancelling)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelling => "cancelling",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
            Self::RequiresAction => "requires_action",
            Self::Incomplete => "incomplete",
        };
        f.write_str(s)
    }
}

/// Identifier and initial status returned by run creation.
#[derive(Debug, Clone)]
pub struct RunHandle {
    pub id: String,
    pub status: RunStatus,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A remote call failure: transport-level or a response the client could
/// not interpret. The two are reported the same way to the user.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Protocol(String),
}

// ---------------------------------------------------------------------------
// API trait
// ---------------------------------------------------------------------------

/// The remote API surface consumed by the configurator and the driver.
pub trait AssistantApi {
    /// Overwrite the assistant's standing instructions (full overwrite,
    /// not a merge).
    fn update_assistant_instructions(
        &self,
        assistant_id: &str,
        instructions: &str,
    ) -> Result<(), ApiError>;

    /// Create a fresh conversation thread; returns its id.
    fn create_thread(&self) -> Result<String, ApiError>;

    /// Append a message to a thread; returns the message id.
    fn append_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<String, ApiError>;

    /// Start an asynchronous run of the assistant over the thread.
    fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<RunHandle, ApiError>;

    /// Fetch the current status of a run.
    fn run_status(&self, thread_id: &str, run_id: &str) -> Result<RunStatus, ApiError>;

    /// List the thread's messages (newest first by remote convention —
    /// callers should verify rather than assume).
    fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, ApiError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(!RunStatus::Queued.is_terminal());
        assert!(!RunStatus::InProgress.is_terminal());
        assert!(!RunStatus::Cancelling.is_terminal());
        assert!(RunStatus::Completed.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
        assert!(RunStatus::Cancelled.is_terminal());
        assert!(RunStatus::Expired.is_terminal());
        assert!(RunStatus::RequiresAction.is_terminal());
        assert!(RunStatus::Incomplete.is_terminal());
    }

    #[test]
    fn run_status_deserializes_from_snake_case() {
        let status: RunStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, RunStatus::InProgress);
        let status: RunStatus = serde_json::from_str("\"requires_action\"").unwrap();
        assert_eq!(status, RunStatus::RequiresAction);
    }

    #[test]
    fn message_role_round_trips() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let role: MessageRole = serde_json::from_str(&json).unwrap();
        assert_eq!(role, MessageRole::Assistant);
    }
}
