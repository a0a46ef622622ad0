//! Ollama-backed clue generator.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ai::prompt::build_prompt;
use crate::ai::{AiError, ClueGenerator, ClueRequest, GeneratorStatus, RawSuggestion};

pub const DEFAULT_MODEL: &str = "llama3";

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

pub struct OllamaClueGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClueGenerator {
    pub const NAME: &'static str = "ollama";

    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, AiError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| AiError::Internal(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn classify(err: reqwest::Error) -> AiError {
        if err.is_timeout() {
            AiError::Timeout
        } else if err.is_connect() || err.is_request() {
            AiError::Unavailable(err.to_string())
        } else if err.is_decode() {
            AiError::Internal(format!("undecodable response: {err}"))
        } else {
            AiError::Unavailable(err.to_string())
        }
    }
}

#[async_trait]
impl ClueGenerator for OllamaClueGenerator {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn suggest(&self, request: &ClueRequest) -> Result<RawSuggestion, AiError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt: build_prompt(request),
            stream: false,
            options: GenerateOptions {
                temperature: 0.7,
                top_p: 0.9,
            },
        };

        debug!(model = %self.model, team = %request.team, "requesting clue from ollama");
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(Self::classify)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "ollama returned an error status");
            return Err(AiError::Unavailable(format!("ollama error: {status}")));
        }

        let data: GenerateResponse = response.json().await.map_err(Self::classify)?;
        Ok(RawSuggestion::Text(data.response.trim().to_string()))
    }

    async fn status(&self) -> GeneratorStatus {
        let unavailable = GeneratorStatus {
            name: Self::NAME,
            available: false,
            has_model: None,
            models: Vec::new(),
        };

        let response = match self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => resp,
            _ => return unavailable,
        };

        match response.json::<TagsResponse>().await {
            Ok(tags) => {
                let models: Vec<String> = tags.models.into_iter().map(|m| m.name).collect();
                let has_model = models.iter().any(|name| name.contains(&self.model));
                GeneratorStatus {
                    name: Self::NAME,
                    available: true,
                    has_model: Some(has_model),
                    models,
                }
            }
            Err(_) => unavailable,
        }
    }
}
