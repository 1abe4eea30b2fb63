//! The conversation driver — one user turn against the remote assistant.
//!
//! A turn walks a fixed protocol sequence:
//!
//! 1. Append the user message to the thread. The remote protocol requires
//!    this to complete before a run starts — a run cannot process messages
//!    not yet appended.
//! 2. Create a run bound to the assistant. Creation returns immediately
//!    with a run id and a non-terminal status.
//! 3. Poll the run status until it reaches a terminal state. The poll is
//!    bounded: exponential backoff between checks and a maximum total wait.
//!    Terminal non-success statuses (`failed`, `cancelled`, `expired`, ...)
//!    and exhausting the wait budget are distinct errors — the loop never
//!    spins on a run that will not complete.
//! 4. Fetch the thread messages and extract the newest assistant reply,
//!    selected by role and `created_at` rather than list position.
//!
//! Any failure aborts the turn with a [`DriverError`]. The caller-facing
//! wrapper [`send_turn_or_fallback`] converts that into the fixed fallback
//! reply so the transcript stays consistent while the error is still
//! surfaced.

use std::thread;
use std::time::{Duration, Instant};

use crate::assistant::{ApiError, AssistantApi, MessageRole, RunStatus};
use crate::config::schema::ChatConfig;

/// Reply shown in place of an assistant answer when a turn fails.
pub const FALLBACK_REPLY: &str =
    "I'm sorry, but an error occurred while processing your request.";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A failed conversation turn, tagged with the protocol step that failed.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("failed to append user message: {0}")]
    Append(#[source] ApiError),
    #[error("failed to start run: {0}")]
    CreateRun(#[source] ApiError),
    #[error("failed to fetch run status: {0}")]
    PollStatus(#[source] ApiError),
    #[error("run ended without completing (status: {0})")]
    RunEnded(RunStatus),
    #[error("run did not complete within {0:?}")]
    Timeout(Duration),
    #[error("failed to list thread messages: {0}")]
    ListMessages(#[source] ApiError),
    #[error("no assistant reply found in thread")]
    MissingReply,
}

// ---------------------------------------------------------------------------
// Poll policy
// ---------------------------------------------------------------------------

/// Bounds for the run status poll.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Delay before the first status check.
    pub initial_interval: Duration,
    /// Multiplier applied to the interval after each check.
    pub backoff: f64,
    /// Ceiling for the per-check interval.
    pub max_interval: Duration,
    /// Total wait budget for one turn.
    pub max_wait: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(1000),
            backoff: 1.5,
            max_interval: Duration::from_millis(5000),
            max_wait: Duration::from_millis(120_000),
        }
    }
}

impl PollPolicy {
    pub fn from_config(config: &ChatConfig) -> Self {
        Self {
            initial_interval: Duration::from_millis(config.poll_initial_ms),
            backoff: config.poll_backoff,
            max_interval: Duration::from_millis(config.poll_max_interval_ms),
            max_wait: Duration::from_millis(config.poll_max_wait_ms),
        }
    }
}

// ---------------------------------------------------------------------------
// Turn execution
// ---------------------------------------------------------------------------

/// Drive one full turn; returns the assistant's reply text.
pub fn send_turn(
    api: &dyn AssistantApi,
    policy: &PollPolicy,
    thread_id: &str,
    assistant_id: &str,
    user_text: &str,
) -> Result<String, DriverError> {
    api.append_message(thread_id, MessageRole::User, user_text)
        .map_err(DriverError::Append)?;

    let run = api
        .create_run(thread_id, assistant_id)
        .map_err(DriverError::CreateRun)?;

    wait_for_completion(api, policy, thread_id, &run.id, run.status)?;

    extract_reply(api, thread_id)
}

/// Outcome of a turn after fallback handling: always carries a displayable
/// reply; `error` is set when the reply is the fallback.
#[derive(Debug)]
pub struct TurnOutcome {
    pub reply: String,
    pub error: Option<DriverError>,
}

impl TurnOutcome {
    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// Drive one turn, substituting [`FALLBACK_REPLY`] on failure.
pub fn send_turn_or_fallback(
    api: &dyn AssistantApi,
    policy: &PollPolicy,
    thread_id: &str,
    assistant_id: &str,
    user_text: &str,
) -> TurnOutcome {
    match send_turn(api, policy, thread_id, assistant_id, user_text) {
        Ok(reply) => TurnOutcome { reply, error: None },
        Err(e) => TurnOutcome {
            reply: FALLBACK_REPLY.to_string(),
            error: Some(e),
        },
    }
}

/// Poll until the run completes, a terminal non-success status appears, or
/// the wait budget runs out.
fn wait_for_completion(
    api: &dyn AssistantApi,
    policy: &PollPolicy,
    thread_id: &str,
    run_id: &str,
    initial_status: RunStatus,
) -> Result<(), DriverError> {
    let start = Instant::now();
    let mut interval = policy.initial_interval;
    let mut status = initial_status;

    loop {
        match status {
            RunStatus::Completed => return Ok(()),
            s if s.is_terminal() => return Err(DriverError::RunEnded(s)),
            _ => {}
        }

        if start.elapsed() >= policy.max_wait {
            return Err(DriverError::Timeout(policy.max_wait));
        }

        thread::sleep(interval);
        interval = next_interval(interval, policy);

        status = api
            .run_status(thread_id, run_id)
            .map_err(DriverError::PollStatus)?;
    }
}

fn next_interval(current: Duration, policy: &PollPolicy) -> Duration {
    current.mul_f64(policy.backoff).min(policy.max_interval)
}

/// Pick the newest assistant message from the thread.
///
/// The listing is reverse-chronological by remote convention, but the
/// selection does not depend on it: the winner is the assistant-role
/// message with the greatest `created_at`, earliest list position breaking
/// ties (which under the convention is the more recent one).
fn extract_reply(api: &dyn AssistantApi, thread_id: &str) -> Result<String, DriverError> {
    let messages = api
        .list_messages(thread_id)
        .map_err(DriverError::ListMessages)?;

    messages
        .into_iter()
        .filter(|m| m.role == MessageRole::Assistant)
        .reduce(|best, m| if m.created_at > best.created_at { m } else { best })
        .map(|m| m.content)
        .ok_or(DriverError::MissingReply)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_reference_cadence() {
        let policy = PollPolicy::default();
        assert_eq!(policy.initial_interval, Duration::from_millis(1000));
        assert_eq!(policy.max_wait, Duration::from_millis(120_000));
    }

    #[test]
    fn interval_backs_off_to_the_cap() {
        let policy = PollPolicy {
            initial_interval: Duration::from_millis(1000),
            backoff: 2.0,
            max_interval: Duration::from_millis(3000),
            max_wait: Duration::from_millis(60_000),
        };
        let second = next_interval(policy.initial_interval, &policy);
        assert_eq!(second, Duration::from_millis(2000));
        let third = next_interval(second, &policy);
        assert_eq!(third, Duration::from_millis(3000));
        let fourth = next_interval(third, &policy);
        assert_eq!(fourth, Duration::from_millis(3000));
    }

    #[test]
    fn policy_from_config_uses_configured_bounds() {
        let config = ChatConfig {
            poll_initial_ms: 250,
            poll_backoff: 2.0,
            poll_max_interval_ms: 1000,
            poll_max_wait_ms: 5000,
        };
        let policy = PollPolicy::from_config(&config);
        assert_eq!(policy.initial_interval, Duration::from_millis(250));
        assert_eq!(policy.max_wait, Duration::from_millis(5000));
    }
}
