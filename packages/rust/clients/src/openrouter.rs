//! Use case generation through OpenRouter's OpenAI-compatible chat API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use scout_shared::{ApiKey, Result, ScoutError};

use crate::parser::parse_use_cases;
use crate::{
    GenerationClient, GenerationResponse, GenerationStatus, build_client, check_base_url, trim_base,
};

const SERVICE: &str = "openrouter";

const SYSTEM_PROMPT: &str = "You are an AI strategy consultant. Answer with a JSON array of \
objects with \"title\" and \"description\" string fields and nothing else.";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Default, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// OpenRouter-backed [`GenerationClient`].
#[derive(Debug, Clone)]
pub struct OpenRouterGenerator {
    client: Client,
    base_url: String,
    api_key: ApiKey,
    model: String,
}

impl OpenRouterGenerator {
    pub fn new(
        base_url: impl Into<String>,
        api_key: ApiKey,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: build_client(SERVICE, timeout)?,
            base_url: check_base_url(SERVICE, base_url.into())?,
            api_key,
            model: model.into(),
        })
    }
}

#[async_trait]
impl GenerationClient for OpenRouterGenerator {
    #[instrument(skip_all, fields(service = SERVICE, max_tokens = max_tokens))]
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<GenerationResponse> {
        let url = format!("{}/chat/completions", trim_base(&self.base_url));
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens,
            temperature: 0.2,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| ScoutError::network(SERVICE, e.to_string()))?;

        // A refused request is a reported status, not a transport error.
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(200).collect();
            warn!(%status, "generation request rejected");
            return Ok(GenerationResponse::failure(format!("HTTP {status}: {excerpt}")));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ScoutError::malformed(SERVICE, e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();

        let use_cases = parse_use_cases(&content);
        debug!(parsed = use_cases.len(), "generation complete");

        if use_cases.is_empty() {
            return Ok(GenerationResponse {
                status: GenerationStatus::Success,
                use_cases: None,
            });
        }

        Ok(GenerationResponse::success(use_cases))
    }
}
