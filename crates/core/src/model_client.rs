use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use backoff::ExponentialBackoffBuilder;
use backoff::future::retry;
use little_react_model::{
    ErrorKind, ModelFinishReason, ModelProvider, ModelProviderError,
    ModelRequest, ModelResponse,
};
use tokio::time::timeout;
use tracing::Instrument;

use crate::Error;

type SendRequestResult = Result<ModelResponse, Box<dyn ModelProviderError>>;
type BoxedSendRequestFuture =
    Pin<Box<dyn Future<Output = SendRequestResult> + Send>>;
type HandlerFn =
    Arc<dyn Fn(ModelRequest) -> BoxedSendRequestFuture + Send + Sync>;

const INITIAL_RETRY_INTERVAL: Duration = Duration::from_millis(500);
const MAX_RETRY_INTERVAL: Duration = Duration::from_secs(8);

/// A wrapper around a model provider that provides a type-erased interface
/// for the other modules, and applies the request timeout and retry policy.
#[derive(Clone)]
pub struct ModelClient {
    handler_fn: HandlerFn,
    request_timeout: Option<Duration>,
    max_retries: u32,
}

impl ModelClient {
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `ModelClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            let fut = provider.send_request(&req);
            Box::pin(
                async move {
                    trace!("got a request: {:?}", req);
                    fut.await.map_err(|err| {
                        error!("got an error: {err:?}");
                        Box::new(err) as Box<dyn ModelProviderError>
                    })
                }
                .instrument(trace_span!("model client req")),
            )
        });
        Self {
            handler_fn,
            request_timeout: None,
            max_retries: 0,
        }
    }

    #[inline]
    pub fn set_request_timeout(&mut self, request_timeout: Option<Duration>) {
        self.request_timeout = request_timeout;
    }

    #[inline]
    pub fn set_max_retries(&mut self, max_retries: u32) {
        self.max_retries = max_retries;
    }

    /// Sends a request and returns the assistant text.
    ///
    /// Only errors whose kind is retryable are retried, with exponential
    /// backoff, at most `max_retries` times.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe. Dropping the future abandons the
    /// in-flight request.
    pub async fn send_request(
        &self,
        req: ModelRequest,
    ) -> Result<String, Error> {
        if self.max_retries == 0 {
            return self.send_once(req).await;
        }

        let max_retries = self.max_retries;
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(INITIAL_RETRY_INTERVAL)
            .with_max_interval(MAX_RETRY_INTERVAL)
            .with_max_elapsed_time(None)
            .build();
        let mut attempt = 0u32;
        retry(policy, || {
            attempt += 1;
            let attempt = attempt;
            let fut = self.send_once(req.clone());
            async move {
                fut.await.map_err(|err| {
                    let retryable = err
                        .model_error_kind()
                        .is_some_and(ErrorKind::is_retryable);
                    if retryable && attempt <= max_retries {
                        warn!("attempt {attempt} failed, retrying: {err}");
                        backoff::Error::transient(err)
                    } else {
                        backoff::Error::permanent(err)
                    }
                })
            }
        })
        .await
    }

    async fn send_once(&self, req: ModelRequest) -> Result<String, Error> {
        let fut = (self.handler_fn)(req);
        let result = match self.request_timeout {
            Some(limit) => match timeout(limit, fut).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(Error::model(
                        ErrorKind::Timeout,
                        format!("no response within {limit:?}"),
                    ));
                }
            },
            None => fut.await,
        };
        let resp =
            result.map_err(|err| Error::model(err.kind(), err.to_string()))?;

        if let Some(usage) = resp.usage {
            debug!(
                "token usage: prompt={}, completion={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }
        if resp.finish_reason == Some(ModelFinishReason::Length) {
            warn!("response was truncated by the output token limit");
        }

        match resp.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(Error::model(
                ErrorKind::EmptyResponse,
                "the model returned no content",
            )),
        }
    }
}
