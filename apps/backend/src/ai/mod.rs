//! Clue generator module - the automated spymaster.
//!
//! This module provides:
//! - `ClueGenerator` trait and its request/response types
//! - `OllamaClueGenerator`: prompts a local language model over HTTP
//! - `DisabledClueGenerator`: used when no model endpoint is configured
//! - `create_generator`: picks an implementation from configuration

mod disabled;
pub mod ollama;
pub mod prompt;
mod trait_def;

use std::sync::Arc;
use std::time::Duration;

pub use disabled::DisabledClueGenerator;
pub use ollama::OllamaClueGenerator;
pub use trait_def::{AiError, ClueGenerator, ClueRequest, GeneratorStatus, RawSuggestion};

/// Build the configured generator.
///
/// Falls back to `DisabledClueGenerator` when no URL is given or the HTTP
/// client cannot be built.
pub fn create_generator(
    ollama_url: Option<&str>,
    model: &str,
    request_timeout: Duration,
) -> Arc<dyn ClueGenerator> {
    match ollama_url {
        Some(url) => match OllamaClueGenerator::new(url, model, request_timeout) {
            Ok(generator) => Arc::new(generator),
            Err(e) => {
                tracing::warn!(error = %e, "ollama generator unavailable; clues will use the fallback");
                Arc::new(DisabledClueGenerator)
            }
        },
        None => Arc::new(DisabledClueGenerator),
    }
}
