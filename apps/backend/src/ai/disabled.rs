//! Generator used when no model endpoint is configured.

use async_trait::async_trait;

use crate::ai::{AiError, ClueGenerator, ClueRequest, GeneratorStatus, RawSuggestion};

/// Always unavailable; games still get the fallback clue.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledClueGenerator;

impl DisabledClueGenerator {
    pub const NAME: &'static str = "disabled";
}

#[async_trait]
impl ClueGenerator for DisabledClueGenerator {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn suggest(&self, _request: &ClueRequest) -> Result<RawSuggestion, AiError> {
        Err(AiError::Unavailable("no clue generator configured".into()))
    }

    async fn status(&self) -> GeneratorStatus {
        GeneratorStatus {
            name: Self::NAME,
            available: false,
            has_model: None,
            models: Vec::new(),
        }
    }
}
