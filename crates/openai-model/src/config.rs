use std::fmt::Debug;

/// Default endpoint, Groq's OpenAI-compatible API.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";

/// Builder for [`OpenAIConfig`].
#[derive(Clone, PartialEq)]
pub struct OpenAIConfigBuilder {
    api_key: String,
    model: Option<String>,
    base_url: Option<String>,
    temperature: Option<f32>,
    top_p: Option<f32>,
    max_completion_tokens: Option<u32>,
    reasoning_effort: Option<String>,
}

impl OpenAIConfigBuilder {
    /// Creates a builder with the given API key.
    #[inline]
    pub fn with_api_key<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            model: None,
            base_url: None,
            temperature: None,
            top_p: None,
            max_completion_tokens: None,
            reasoning_effort: None,
        }
    }

    /// Sets the model to use.
    #[inline]
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets a custom base URL.
    ///
    /// A trailing slash is ignored.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the sampling temperature.
    #[inline]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the nucleus sampling probability mass.
    #[inline]
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Sets the upper bound of generated tokens per request.
    #[inline]
    pub fn with_max_completion_tokens(mut self, max_tokens: u32) -> Self {
        self.max_completion_tokens = Some(max_tokens);
        self
    }

    /// Sets the reasoning effort hint (`low`, `medium` or `high`).
    #[inline]
    pub fn with_reasoning_effort<S: Into<String>>(mut self, effort: S) -> Self {
        self.reasoning_effort = Some(effort.into());
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> OpenAIConfig {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        OpenAIConfig {
            api_key: self.api_key,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url.trim_end_matches('/').to_string(),
            temperature: self.temperature.unwrap_or(1.0),
            top_p: self.top_p.unwrap_or(1.0),
            max_completion_tokens: self.max_completion_tokens.unwrap_or(8192),
            reasoning_effort: Some(
                self.reasoning_effort
                    .unwrap_or_else(|| "medium".to_string()),
            ),
        }
    }
}

impl Debug for OpenAIConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIConfigBuilder")
            .field("api_key", &"<deducted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("max_completion_tokens", &self.max_completion_tokens)
            .field("reasoning_effort", &self.reasoning_effort)
            .finish()
    }
}

/// Configuration for the OpenAI-compatible provider.
#[derive(Clone, PartialEq)]
pub struct OpenAIConfig {
    pub(crate) api_key: String,
    pub(crate) model: String,
    pub(crate) base_url: String,
    pub(crate) temperature: f32,
    pub(crate) top_p: f32,
    pub(crate) max_completion_tokens: u32,
    pub(crate) reasoning_effort: Option<String>,
}

impl OpenAIConfig {
    /// Returns the model identifier sent with every request.
    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the API base URL, without a trailing slash.
    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Debug for OpenAIConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("api_key", &"<deducted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("max_completion_tokens", &self.max_completion_tokens)
            .field("reasoning_effort", &self.reasoning_effort)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OpenAIConfigBuilder::with_api_key("gsk_secret").build();
        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.temperature, 1.0);
        assert_eq!(config.top_p, 1.0);
        assert_eq!(config.max_completion_tokens, 8192);
        assert_eq!(config.reasoning_effort.as_deref(), Some("medium"));
    }

    #[test]
    fn test_overrides() {
        let config = OpenAIConfigBuilder::with_api_key("k")
            .with_model("llama-3.3-70b-versatile")
            .with_base_url("http://localhost:8080/v1/")
            .with_temperature(0.2)
            .with_max_completion_tokens(256)
            .with_reasoning_effort("low")
            .build();
        assert_eq!(config.model(), "llama-3.3-70b-versatile");
        assert_eq!(config.base_url(), "http://localhost:8080/v1");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_completion_tokens, 256);
        assert_eq!(config.reasoning_effort.as_deref(), Some("low"));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let builder = OpenAIConfigBuilder::with_api_key("gsk_secret");
        assert!(!format!("{builder:?}").contains("gsk_secret"));
        let config = builder.build();
        assert!(!format!("{config:?}").contains("gsk_secret"));
    }
}
