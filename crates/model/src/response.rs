use serde::{Deserialize, Serialize};

/// A complete, non-streamed response from the model provider.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelResponse {
    /// The assistant message text, if the model produced any.
    pub content: Option<String>,
    /// The reason why the model stopped generating.
    pub finish_reason: Option<ModelFinishReason>,
    /// Token accounting reported by the provider.
    pub usage: Option<TokenUsage>,
}

impl ModelResponse {
    /// Creates a response that only carries text content.
    #[inline]
    pub fn with_content<S: Into<String>>(content: S) -> Self {
        Self {
            content: Some(content.into()),
            finish_reason: Some(ModelFinishReason::Stop),
            usage: None,
        }
    }
}

/// The reason why a model response has finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFinishReason {
    /// The model has finished generating text.
    Stop,
    /// The output token limit was reached.
    Length,
    /// The output was withheld by a content filter.
    ContentFilter,
    /// Any reason this protocol doesn't model.
    Other,
}

/// Token accounting for a single request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the input messages.
    pub prompt_tokens: u32,
    /// Tokens generated by the model.
    pub completion_tokens: u32,
    /// Sum of prompt and completion tokens.
    pub total_tokens: u32,
}
