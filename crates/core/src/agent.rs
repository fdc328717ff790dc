mod builder;

use crate::Error;
use crate::conversation::Transcript;
use crate::model_client::ModelClient;
pub use builder::AgentBuilder;

/// An agent instance, which owns a transcript and a model client.
///
/// Each invocation is one full round trip: the user text is appended, the
/// whole transcript is sent to the model, and the reply is appended.
pub struct Agent {
    model_client: ModelClient,
    transcript: Transcript,
}

impl Agent {
    fn from_builder(builder: AgentBuilder) -> Self {
        let AgentBuilder {
            mut model_client,
            system_prompt,
            request_timeout,
            max_retries,
        } = builder;
        model_client.set_request_timeout(request_timeout);
        model_client.set_max_retries(max_retries);

        Self {
            model_client,
            transcript: Transcript::new(system_prompt),
        }
    }

    /// Sends `user_text` to the model and returns its reply.
    ///
    /// On failure the transcript is left as it was before the call.
    pub async fn invoke(&mut self, user_text: &str) -> Result<String, Error> {
        if user_text.is_empty() {
            return Err(Error::EmptyInput);
        }

        // A cancelled invocation leaves its user turn behind.
        if self.transcript.pop_pending_user().is_some() {
            debug!("dropped the user turn of a cancelled invocation");
        }
        if let Err(err) = self.transcript.push_user(user_text) {
            error!("transcript is out of order: {err}");
        }

        let req = self.transcript.to_request();
        trace!("invoking model with {} messages", req.messages.len());
        let reply = match self.model_client.send_request(req).await {
            Ok(reply) => reply,
            Err(err) => {
                self.transcript.pop_pending_user();
                return Err(err);
            }
        };

        if let Err(err) = self.transcript.push_assistant(reply.as_str()) {
            error!("transcript is out of order: {err}");
        }
        Ok(reply)
    }

    /// Returns the transcript accumulated so far.
    #[inline]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}
