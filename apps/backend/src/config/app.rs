use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::words::DEFAULT_WORDS;
use crate::error::AppError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";
pub const DEFAULT_CLUE_TIMEOUT_MS: u64 = 30_000;

/// Runtime configuration read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Unset means games live in the in-memory store.
    pub database_url: Option<String>,
    /// Unset disables the clue generator; games fall back to default clues.
    pub ollama_url: Option<String>,
    pub ollama_model: String,
    pub clue_timeout: Duration,
    pub board_seed: Option<u64>,
    pub word_pool_file: Option<PathBuf>,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: None,
            ollama_url: None,
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            clue_timeout: Duration::from_millis(DEFAULT_CLUE_TIMEOUT_MS),
            board_seed: None,
            word_pool_file: None,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();
        Ok(Self {
            host: opt_var("BACKEND_HOST").unwrap_or(defaults.host),
            port: parsed_var("BACKEND_PORT")?.unwrap_or(defaults.port),
            database_url: opt_var("DATABASE_URL"),
            ollama_url: opt_var("OLLAMA_URL").map(|url| url.trim_end_matches('/').to_string()),
            ollama_model: opt_var("OLLAMA_MODEL").unwrap_or(defaults.ollama_model),
            clue_timeout: parsed_var::<u64>("CLUE_TIMEOUT_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.clue_timeout),
            board_seed: parsed_var("BOARD_SEED")?,
            word_pool_file: opt_var("WORD_POOL_FILE").map(PathBuf::from),
            cors_allowed_origins: opt_var("CORS_ALLOWED_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_default(),
        })
    }

    /// Words boards are drawn from: the configured file (one word per line,
    /// `#` starts a comment) or the built-in list.
    pub fn load_word_pool(&self) -> Result<Vec<String>, AppError> {
        let Some(path) = &self.word_pool_file else {
            return Ok(DEFAULT_WORDS.iter().map(|w| w.to_string()).collect());
        };
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::config(format!(
                "Cannot read WORD_POOL_FILE '{}': {e}",
                path.display()
            ))
        })?;
        Ok(parse_word_pool(&contents))
    }
}

pub fn parse_word_pool(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Comma separated origins; blanks, `null` and non-http entries are dropped.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect()
}

fn opt_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, AppError> {
    opt_var(name)
        .map(|raw| {
            raw.parse::<T>().map_err(|_| {
                AppError::config(format!("Environment variable '{name}' has invalid value '{raw}'"))
            })
        })
        .transpose()
}
