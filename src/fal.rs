//! Client for a fal.ai-style hosted inference queue.
//!
//! Requests are submitted to `{queue_url}/{model}`, the returned status URL is
//! polled (with logs enabled) until the queue reports a terminal state, and
//! the result payload is fetched from the response URL. Provider log lines are
//! forwarded to tracing only; they carry no control-flow significance.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Model performing 4x image upscaling.
pub const AURA_SR_MODEL: &str = "fal-ai/aura-sr";
/// Model performing text-to-video generation.
pub const LUMA_DREAM_MACHINE_MODEL: &str = "fal-ai/luma-dream-machine";

const MAX_POLL_ATTEMPTS: u32 = 300;

#[derive(Debug, Error)]
pub enum FalError {
    #[error("request to provider failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("provider reported failure: {0}")]
    Failed(String),
    #[error("timed out waiting for provider result")]
    TimedOut,
}

/// Input for [`AURA_SR_MODEL`]. The factor, tiling, and checkpoint are fixed.
#[derive(Debug, Serialize)]
pub struct UpscaleInput {
    pub image_url: String,
    pub upscaling_factor: u32,
    pub overlapping_tiles: bool,
    pub checkpoint: &'static str,
}

impl UpscaleInput {
    pub fn new(image_url: String) -> Self {
        Self {
            image_url,
            upscaling_factor: 4,
            overlapping_tiles: true,
            checkpoint: "v2",
        }
    }
}

/// Input for [`LUMA_DREAM_MACHINE_MODEL`].
#[derive(Debug, Serialize)]
pub struct Text2VideoInput {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
struct QueueSubmitResponse {
    request_id: String,
    status_url: String,
    response_url: String,
}

#[derive(Debug, Deserialize)]
struct QueueStatus {
    status: String,
    #[serde(default)]
    logs: Vec<QueueLogEntry>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueueLogEntry {
    message: String,
}

/// Queue client holding an explicitly supplied credential.
///
/// The credential is a constructor argument rather than an ambient
/// environment lookup so callers decide where it comes from.
pub struct FalClient {
    http: reqwest::Client,
    credential: String,
    queue_url: String,
    poll_interval: Duration,
}

impl FalClient {
    pub fn new(
        credential: String,
        queue_url: String,
        poll_interval: Duration,
        request_timeout: Duration,
    ) -> Result<Self, FalError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            http,
            credential,
            queue_url: queue_url.trim_end_matches('/').to_string(),
            poll_interval,
        })
    }

    /// Submit `input` to `model` and wait for the result payload.
    pub async fn subscribe<T: Serialize>(&self, model: &str, input: &T) -> Result<Value, FalError> {
        let submitted = self.submit(model, input).await?;
        info!(
            model,
            request_id = %submitted.request_id,
            "Provider request queued"
        );

        self.wait_until_complete(&submitted).await?;
        self.fetch_response(&submitted.response_url).await
    }

    async fn submit<T: Serialize>(
        &self,
        model: &str,
        input: &T,
    ) -> Result<QueueSubmitResponse, FalError> {
        let url = format!("{}/{model}", self.queue_url);
        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Key {}", self.credential))
            .json(input)
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    async fn wait_until_complete(&self, submitted: &QueueSubmitResponse) -> Result<(), FalError> {
        // Provider log lines accumulate across polls; only forward new ones
        let mut forwarded_logs = 0;

        for attempt in 0..MAX_POLL_ATTEMPTS {
            let status = self.poll_status(&submitted.status_url).await?;

            for entry in status.logs.iter().skip(forwarded_logs) {
                info!(request_id = %submitted.request_id, "{}", entry.message);
            }
            forwarded_logs = forwarded_logs.max(status.logs.len());

            match status.status.as_str() {
                "COMPLETED" => {
                    debug!(
                        request_id = %submitted.request_id,
                        attempts = attempt + 1,
                        "Provider request completed"
                    );
                    return Ok(());
                }
                "FAILED" | "ERROR" => {
                    let message = status
                        .error
                        .unwrap_or_else(|| "Unknown provider error".to_string());
                    return Err(FalError::Failed(message));
                }
                "IN_QUEUE" | "IN_PROGRESS" => {
                    sleep(self.poll_interval).await;
                }
                other => {
                    warn!(
                        request_id = %submitted.request_id,
                        status = other,
                        "Unknown queue status"
                    );
                    sleep(self.poll_interval).await;
                }
            }
        }

        Err(FalError::TimedOut)
    }

    async fn poll_status(&self, status_url: &str) -> Result<QueueStatus, FalError> {
        let response = self
            .http
            .get(status_url)
            .query(&[("logs", "1")])
            .header("Authorization", format!("Key {}", self.credential))
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    async fn fetch_response(&self, response_url: &str) -> Result<Value, FalError> {
        let response = self
            .http
            .get(response_url)
            .header("Authorization", format!("Key {}", self.credential))
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    /// Turn non-success statuses into [`FalError::Api`] with the body attached.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, FalError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(FalError::Api { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upscale_input_carries_fixed_parameters() {
        let input = UpscaleInput::new("data:image/png;base64,AAAA".to_string());
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(
            value,
            json!({
                "image_url": "data:image/png;base64,AAAA",
                "upscaling_factor": 4,
                "overlapping_tiles": true,
                "checkpoint": "v2",
            })
        );
    }

    #[test]
    fn queue_status_tolerates_missing_logs_and_error() {
        let status: QueueStatus = serde_json::from_str(r#"{"status":"IN_QUEUE"}"#).unwrap();
        assert_eq!(status.status, "IN_QUEUE");
        assert!(status.logs.is_empty());
        assert!(status.error.is_none());
    }

    #[test]
    fn queue_url_trailing_slash_is_normalized() {
        let client = FalClient::new(
            "key".to_string(),
            "https://queue.fal.run/".to_string(),
            Duration::from_millis(10),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(client.queue_url, "https://queue.fal.run");
    }
}
