use serde::{Deserialize, Serialize};

/// The preset response for an assistant turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// Message content of this response. `None` mimics a provider that
    /// answers without any content.
    pub content: Option<String>,
    /// The request will fail with a rate limit error in the first
    /// `failures` attempts.
    #[serde(default)]
    pub failures: u64,
}

impl PresetResponse {
    /// Creates a `PresetResponse` with the specified content.
    #[inline]
    pub fn with_content<S: Into<String>>(content: S) -> Self {
        Self {
            content: Some(content.into()),
            failures: 0,
        }
    }

    /// Creates a `PresetResponse` without content.
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sets failure times before a successful response.
    #[inline]
    pub fn with_failures(mut self, failures: u64) -> Self {
        self.failures = failures;
        self
    }
}
