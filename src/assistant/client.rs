//! HTTP implementation of the assistant API.
//!
//! Talks to the hosted service with the synchronous `ureq` client, one
//! request per protocol operation, Bearer-authenticated with the API key
//! from configuration. Created once at startup and reused for the lifetime
//! of the session.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::schema::ApiConfig;

use super::{ApiError, AssistantApi, MessageRole, RunHandle, RunStatus, ThreadMessage};

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct UpdateAssistantRequest<'a> {
    instructions: &'a str,
}

#[derive(Debug, Deserialize)]
struct ThreadResponse {
    id: String,
}

#[derive(Debug, Serialize)]
struct AppendMessageRequest<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessageCreatedResponse {
    id: String,
}

#[derive(Debug, Serialize)]
struct CreateRunRequest<'a> {
    assistant_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct RunResponse {
    id: String,
    status: RunStatus,
}

#[derive(Debug, Deserialize)]
struct MessageListResponse {
    data: Vec<WireMessage>,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    role: MessageRole,
    content: String,
    created_at: i64,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous HTTP client for the assistant service.
#[derive(Debug, Clone)]
pub struct AssistantClient {
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl AssistantClient {
    /// Build a client from the resolved config.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    /// Check whether the service is reachable with the configured key.
    ///
    /// Uses the model listing endpoint with a short timeout so health
    /// checks don't stall when the service is down.
    pub fn is_healthy(&self) -> bool {
        let url = format!("{}/models", self.base_url);
        ureq::get(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .timeout(Duration::from_secs(5))
            .call()
            .is_ok()
    }

    fn post_json<B: Serialize, T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = ureq::post(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .timeout(self.timeout)
            .send_json(body)
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        resp.into_json()
            .map_err(|e| ApiError::Protocol(e.to_string()))
    }

    fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = ureq::get(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .timeout(self.timeout)
            .call()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        resp.into_json()
            .map_err(|e| ApiError::Protocol(e.to_string()))
    }
}

impl AssistantApi for AssistantClient {
    fn update_assistant_instructions(
        &self,
        assistant_id: &str,
        instructions: &str,
    ) -> Result<(), ApiError> {
        // The service echoes the updated assistant object; only success
        // matters here.
        let _: serde_json::Value = self.post_json(
            &format!("/assistants/{assistant_id}"),
            &UpdateAssistantRequest { instructions },
        )?;
        Ok(())
    }

    fn create_thread(&self) -> Result<String, ApiError> {
        let resp: ThreadResponse = self.post_json("/threads", &serde_json::json!({}))?;
        Ok(resp.id)
    }

    fn append_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<String, ApiError> {
        let resp: MessageCreatedResponse = self.post_json(
            &format!("/threads/{thread_id}/messages"),
            &AppendMessageRequest {
                role: role.as_str(),
                content,
            },
        )?;
        Ok(resp.id)
    }

    fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<RunHandle, ApiError> {
        let resp: RunResponse = self.post_json(
            &format!("/threads/{thread_id}/runs"),
            &CreateRunRequest { assistant_id },
        )?;
        Ok(RunHandle {
            id: resp.id,
            status: resp.status,
        })
    }

    fn run_status(&self, thread_id: &str, run_id: &str) -> Result<RunStatus, ApiError> {
        let resp: RunResponse = self.get_json(&format!("/threads/{thread_id}/runs/{run_id}"))?;
        Ok(resp.status)
    }

    fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, ApiError> {
        let resp: MessageListResponse =
            self.get_json(&format!("/threads/{thread_id}/messages"))?;
        Ok(resp
            .data
            .into_iter()
            .map(|m| ThreadMessage {
                role: m.role,
                content: m.content,
                created_at: m.created_at,
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_default_config() {
        let config = ApiConfig::default();
        let client = AssistantClient::from_config(&config);
        assert_eq!(client.base_url, "https://api.openai.com/v1");
        assert_eq!(client.timeout, Duration::from_millis(30_000));
    }

    #[test]
    fn client_strips_trailing_slash() {
        let config = ApiConfig {
            base_url: "https://api.openai.com/v1/".to_string(),
            ..ApiConfig::default()
        };
        let client = AssistantClient::from_config(&config);
        assert_eq!(client.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn run_response_parses_wire_shape() {
        let json = r#"{"id": "run_123", "status": "queued"}"#;
        let resp: RunResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.id, "run_123");
        assert_eq!(resp.status, RunStatus::Queued);
    }

    #[test]
    fn message_list_parses_wire_shape() {
        let json = r#"{"data": [
            {"role": "assistant", "content": "hi", "created_at": 20},
            {"role": "user", "content": "hello", "created_at": 10}
        ]}"#;
        let resp: MessageListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.data.len(), 2);
        assert_eq!(resp.data[0].role, MessageRole::Assistant);
        assert_eq!(resp.data[1].created_at, 10);
    }
}
