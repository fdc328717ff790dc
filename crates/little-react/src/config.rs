use std::env;
use std::fmt::{self, Debug};
use std::str::FromStr;
use std::time::Duration;

use little_react_core::DEFAULT_MAX_ITERATIONS;
use thiserror::Error;

const API_KEY_VAR: &str = "GROQ_API_KEY";
const BASE_URL_VAR: &str = "GROQ_BASE_URL";
const MODEL_VAR: &str = "GROQ_MODEL";
const MAX_ITERATIONS_VAR: &str = "LITTLE_REACT_MAX_ITERATIONS";
const TIMEOUT_SECS_VAR: &str = "LITTLE_REACT_TIMEOUT_SECS";
const RETRIES_VAR: &str = "LITTLE_REACT_RETRIES";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GROQ_API_KEY environment variable is not set")]
    MissingApiKey,
    #[error("invalid value for {name}: {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Runtime settings read from the environment.
///
/// A `.env` file in the working directory is loaded first, if present.
pub struct Settings {
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub max_iterations: usize,
    pub request_timeout: Option<Duration>,
    pub max_retries: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                warn!("failed to load .env: {err}");
            }
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty =
            |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key =
            non_empty(API_KEY_VAR).ok_or(ConfigError::MissingApiKey)?;
        let max_iterations =
            parse_var(MAX_ITERATIONS_VAR, non_empty(MAX_ITERATIONS_VAR))?
                .unwrap_or(DEFAULT_MAX_ITERATIONS);
        let request_timeout =
            parse_var::<u64>(TIMEOUT_SECS_VAR, non_empty(TIMEOUT_SECS_VAR))?
                .map(Duration::from_secs);
        let max_retries =
            parse_var(RETRIES_VAR, non_empty(RETRIES_VAR))?.unwrap_or(0);

        Ok(Self {
            api_key,
            base_url: non_empty(BASE_URL_VAR),
            model: non_empty(MODEL_VAR),
            max_iterations,
            request_timeout,
            max_retries,
        })
    }
}

impl Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<deducted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_iterations", &self.max_iterations)
            .field("request_timeout", &self.request_timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

fn parse_var<T: FromStr>(
    name: &'static str,
    value: Option<String>,
) -> Result<Option<T>, ConfigError> {
    value
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { name, value })
        })
        .transpose()
}
