//! Client for the Google generative-language API.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const GENERATIVE_LANGUAGE_BASE: &str = "https://generativelanguage.googleapis.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report request failed: {0}")]
    Transport(String),

    #[error("report service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("report response contained no text")]
    Empty,
}

/// Narrow interface to the text-generation collaborator: one opaque prompt
/// in, opaque prose out.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ReportError>;

    /// Degrading wrapper: any failure becomes a placeholder string rendered
    /// in place of the report, never a surfaced error.
    async fn generate_or_placeholder(&self, prompt: &str) -> String {
        match self.generate(prompt).await {
            Ok(text) => text,
            Err(e) => format!("Report could not be generated. (Error: {e})"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Result<Self, ReportError> {
        Self::with_base_url(GENERATIVE_LANGUAGE_BASE.to_string(), api_key, model)
    }

    /// Point at a different host; used by tests.
    pub fn with_base_url(
        base_url: String,
        api_key: String,
        model: String,
    ) -> Result<Self, ReportError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ReportError::Transport(e.to_string()))?;

        Ok(Self { http, base_url, api_key, model })
    }
}

#[async_trait]
impl ReportGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ReportError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        debug!(model = %self.model, prompt_chars = prompt.len(), "requesting report");

        let body = serde_json::json!({
            "contents": [{"parts": [{"text": prompt}]}]
        });

        let res = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ReportError::Transport(e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| ReportError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ReportError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| ReportError::Transport(e.to_string()))?;

        parsed["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_owned)
            .ok_or(ReportError::Empty)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingGenerator;

    #[async_trait]
    impl ReportGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, ReportError> {
            Err(ReportError::Status { status: 429, body: "quota exceeded".to_string() })
        }
    }

    struct EchoGenerator;

    #[async_trait]
    impl ReportGenerator for EchoGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, ReportError> {
            Ok(format!("report for: {prompt}"))
        }
    }

    #[tokio::test]
    async fn failures_degrade_to_a_placeholder() {
        let text = FailingGenerator.generate_or_placeholder("stats").await;

        assert!(text.starts_with("Report could not be generated."));
        assert!(text.contains("429"));
        assert!(text.contains("quota exceeded"));
    }

    #[tokio::test]
    async fn successes_pass_through() {
        let text = EchoGenerator.generate_or_placeholder("stats").await;
        assert_eq!(text, "report for: stats");
    }

    #[test]
    fn extracts_candidate_text() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Seasonal analysis follows."}], "role": "model"}}
            ]
        }"#;

        let parsed: serde_json::Value = serde_json::from_str(raw).unwrap();
        let text = parsed["candidates"][0]["content"]["parts"][0]["text"].as_str();
        assert_eq!(text, Some("Seasonal analysis follows."));
    }
}
