//! A local fake model for testing purpose.

mod preset;

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use little_react_model::{
    ErrorKind, ModelFinishReason, ModelProvider, ModelProviderError,
    ModelRequest, ModelResponse,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Clone)]
enum ConversationStep {
    UserTurn,
    AssistantTurn(PresetResponse),
}

#[derive(Default)]
struct SharedState {
    requests: Vec<ModelRequest>,
    // Failed attempts so far, keyed by step index.
    attempts: HashMap<usize, u64>,
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to setup the conversation script, which
/// is how the model should respond to a request. The step answering a
/// request is selected by the number of non-system messages in it, so a
/// script normally alternates [`add_user_turn`] and [`add_assistant_turn`].
/// If there are no enough steps in the script, an error will be returned.
///
/// Clones share the recorded requests and failure counters.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
///
/// [`add_user_turn`]: TestModelProvider::add_user_turn
/// [`add_assistant_turn`]: TestModelProvider::add_assistant_turn
#[derive(Clone, Default)]
pub struct TestModelProvider {
    conversation_script: Vec<ConversationStep>,
    delay: Option<Duration>,
    state: Arc<Mutex<SharedState>>,
}

impl TestModelProvider {
    #[inline]
    pub fn add_assistant_turn(&mut self, preset: PresetResponse) {
        self.conversation_script
            .push(ConversationStep::AssistantTurn(preset));
    }

    #[inline]
    pub fn add_user_turn(&mut self) {
        self.conversation_script.push(ConversationStep::UserTurn);
    }

    /// Appends a user turn followed by an assistant turn answering it.
    #[inline]
    pub fn add_exchange(&mut self, preset: PresetResponse) {
        self.add_user_turn();
        self.add_assistant_turn(preset);
    }

    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns every request received so far, in order.
    pub fn recorded_requests(&self) -> Vec<ModelRequest> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .requests
            .clone()
    }

    fn respond(&self, req: &ModelRequest) -> Result<ModelResponse, Error> {
        let mut state =
            self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.requests.push(req.clone());

        let step_idx = req.messages.iter().filter(|m| !m.is_system()).count();
        let Some(step) = self.conversation_script.get(step_idx) else {
            return Err(Error {
                message: "no enough steps",
                kind: ErrorKind::Other,
            });
        };
        let preset = match step {
            ConversationStep::UserTurn => {
                return Err(Error {
                    message: "not an assistant turn",
                    kind: ErrorKind::Other,
                });
            }
            ConversationStep::AssistantTurn(preset) => preset,
        };

        let attempts = state.attempts.entry(step_idx).or_default();
        if *attempts < preset.failures {
            *attempts += 1;
            return Err(Error {
                message: "preset failure",
                kind: ErrorKind::RateLimitExceeded,
            });
        }

        Ok(ModelResponse {
            content: preset.content.clone(),
            finish_reason: Some(ModelFinishReason::Stop),
            usage: None,
        })
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        let result = self.respond(req);
        let delay = self.delay.unwrap_or(Duration::from_millis(1));
        async move {
            sleep(delay).await;
            result
        }
    }
}
