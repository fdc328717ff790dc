//! A model provider for OpenAI-compatible chat-completion APIs.
//!
//! Groq is the default endpoint, but any server speaking the
//! `/chat/completions` protocol works.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use little_react_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
};
use reqwest::{Client, StatusCode, header};

pub use config::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAIConfig, OpenAIConfigBuilder,
};
use proto::{ChatCompletion, ErrorEnvelope};

/// Error type for [`OpenAIProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else {
            err.status().map(kind_for_status).unwrap_or(ErrorKind::Other)
        };
        Self::new(format!("{err}"), kind)
    }
}

#[inline]
fn kind_for_status(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ErrorKind::Authentication
        }
        StatusCode::TOO_MANY_REQUESTS => ErrorKind::RateLimitExceeded,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ErrorKind::Timeout
        }
        _ => ErrorKind::Other,
    }
}

/// Extracts a readable message from an error body, falling back to the raw
/// text when it isn't the usual `{"error": {"message": ...}}` envelope.
fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => format!("{status}: {}", envelope.error.message),
        Err(_) if body.trim().is_empty() => format!("{status}"),
        Err(_) => format!("{status}: {}", body.trim()),
    }
}

/// OpenAI-compatible model provider.
#[derive(Clone, Debug)]
pub struct OpenAIProvider {
    client: Client,
    config: Arc<OpenAIConfig>,
}

impl OpenAIProvider {
    /// Creates a new `OpenAIProvider` with the given configuration.
    #[inline]
    pub fn new(config: OpenAIConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    /// Returns the configuration of this provider.
    #[inline]
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }
}

impl ModelProvider for OpenAIProvider {
    type Error = Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        let openai_req = proto::create_request(req, &self.config);
        let resp_fut = self
            .client
            .post(format!("{}{}", self.config.base_url, "/chat/completions"))
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.api_key),
            )
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .json(&openai_req)
            .send();

        async move {
            let resp = resp_fut.await?;
            let status = resp.status();
            let body = resp.text().await?;
            if !status.is_success() {
                let message = error_message(status, &body);
                error!("request rejected: {message}");
                return Err(Error::new(message, kind_for_status(status)));
            }

            let completion = serde_json::from_str::<ChatCompletion>(&body)
                .map_err(|err| {
                    Error::new(
                        format!("malformed completion: {err}"),
                        ErrorKind::Other,
                    )
                })?;
            trace!("got completion {:?}", completion.id);

            proto::into_model_response(completion).ok_or_else(|| {
                Error::new("completion has no choices", ErrorKind::EmptyResponse)
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_for_status() {
        assert_eq!(
            kind_for_status(StatusCode::UNAUTHORIZED),
            ErrorKind::Authentication
        );
        assert_eq!(
            kind_for_status(StatusCode::TOO_MANY_REQUESTS),
            ErrorKind::RateLimitExceeded
        );
        assert_eq!(
            kind_for_status(StatusCode::GATEWAY_TIMEOUT),
            ErrorKind::Timeout
        );
        assert_eq!(
            kind_for_status(StatusCode::INTERNAL_SERVER_ERROR),
            ErrorKind::Other
        );
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error"}}"#;
        assert_eq!(
            error_message(StatusCode::UNAUTHORIZED, body),
            "401 Unauthorized: Invalid API Key"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "  upstream down \n"),
            "502 Bad Gateway: upstream down"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, ""),
            "502 Bad Gateway"
        );
    }

    #[tokio::test]
    async fn test_connection_error_is_reported() {
        // Nothing listens on port 9 (discard) on a test machine.
        let config = OpenAIConfigBuilder::with_api_key("k")
            .with_base_url("http://127.0.0.1:9/v1")
            .build();
        let provider = OpenAIProvider::new(config);
        let req = ModelRequest { messages: vec![] };
        let err = provider.send_request(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert!(!err.message().is_empty());
    }
}
