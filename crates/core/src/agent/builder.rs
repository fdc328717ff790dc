use std::time::Duration;

use little_react_model::ModelProvider;

use super::Agent;
use crate::model_client::ModelClient;

/// [`Agent`] builder.
pub struct AgentBuilder {
    pub(crate) model_client: ModelClient,
    pub(crate) system_prompt: Option<String>,
    pub(crate) request_timeout: Option<Duration>,
    pub(crate) max_retries: u32,
}

impl AgentBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            system_prompt: None,
            request_timeout: None,
            max_retries: 0,
        }
    }

    /// Sets the system prompt, which leads the transcript.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Bounds the time of each model request. Unbounded by default.
    #[inline]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets how many times a retryable model error is retried. Defaults to
    /// zero.
    #[inline]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Builds the agent.
    #[inline]
    pub fn build(self) -> Agent {
        Agent::from_builder(self)
    }
}
