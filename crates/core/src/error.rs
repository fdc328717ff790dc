use little_react_model::ErrorKind;
use thiserror::Error;

/// Fatal errors of the agent and the control loop.
///
/// Tool failures, unknown tools and malformed actions are not listed here:
/// the loop turns them into observations so the model can recover.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The model could not be reached, rejected the request, or answered
    /// without content.
    #[error("model invocation failed ({kind:?}): {message}")]
    ModelInvocation {
        /// What went wrong, as classified by the provider.
        kind: ErrorKind,
        /// Human-readable details.
        message: String,
    },
    /// An invocation was attempted without any user text.
    #[error("user input must not be empty")]
    EmptyInput,
}

impl Error {
    #[inline]
    pub(crate) fn model<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self::ModelInvocation {
            kind,
            message: message.into(),
        }
    }

    /// Returns the provider error kind of a model invocation failure.
    #[inline]
    pub fn model_error_kind(&self) -> Option<ErrorKind> {
        match self {
            Error::ModelInvocation { kind, .. } => Some(*kind),
            Error::EmptyInput => None,
        }
    }
}
