//! Gemini `generateContent` integration.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::advisor::TextGenerator;
use crate::config::Settings;
use crate::error::AppError;

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        let api_key = settings.require_gemini_key()?;
        Self::new(
            api_key,
            settings.gemini_model.clone(),
            settings.gemini_base_url.clone(),
            settings.request_timeout,
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, AppError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        tracing::info!(model = %self.model, prompt_chars = prompt.len(), "requesting diagnosis");

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                let kind = if e.is_timeout() { "timed out" } else { "failed" };
                tracing::warn!(error = %e, "advisor request {kind}");
                AppError::runtime(format!("Advisor request {kind}: {e}"))
            })?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!("advisor quota exceeded");
            return Err(AppError::runtime(
                "Advisor quota exceeded (HTTP 429). Wait a moment and try again.",
            ));
        }
        if !status.is_success() {
            let detail = resp
                .json::<ErrorEnvelope>()
                .ok()
                .map(|env| env.error.message)
                .unwrap_or_default();
            tracing::warn!(%status, %detail, "advisor request rejected");
            let suffix = if detail.is_empty() {
                String::new()
            } else {
                format!(": {detail}")
            };
            return Err(AppError::runtime(format!(
                "Advisor request failed with status {status}{suffix}"
            )));
        }

        let body: GenerateResponse = resp
            .json()
            .map_err(|e| AppError::runtime(format!("Failed to parse advisor response: {e}")))?;

        let text = reply_text(&body).ok_or_else(|| {
            let reason = body
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map(|r| format!(" (blocked: {r})"))
                .unwrap_or_default();
            AppError::runtime(format!("Advisor returned no text{reason}."))
        })?;

        tracing::info!(reply_chars = text.len(), "diagnosis received");
        Ok(text)
    }
}

/// Concatenate the text parts of the first candidate.
fn reply_text(body: &GenerateResponse) -> Option<String> {
    let candidate = body.candidates.first()?;
    let parts = &candidate.content.as_ref()?.parts;
    let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
    if text.is_empty() { None } else { Some(text) }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_text_joins_parts_of_first_candidate() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[
                {"content":{"parts":[{"text":"Seeds look "},{"text":"damaged."}]}},
                {"content":{"parts":[{"text":"ignored"}]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(reply_text(&body).as_deref(), Some("Seeds look damaged."));
    }

    #[test]
    fn reply_text_is_none_without_candidates() {
        let body: GenerateResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert_eq!(reply_text(&body), None);
        assert_eq!(
            body.prompt_feedback.unwrap().block_reason.as_deref(),
            Some("SAFETY")
        );
    }

    #[test]
    fn endpoint_uses_model_path() {
        let client = GeminiClient::new("k", "gemini-1.5-flash", "http://x/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://x/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
