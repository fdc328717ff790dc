/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The credentials were rejected by the provider.
    Authentication,
    /// The content is moderated.
    Moderated,
    /// The model provider is rate limited.
    RateLimitExceeded,
    /// The provider did not answer in time.
    Timeout,
    /// The provider answered without any message content.
    EmptyResponse,
    /// Any other errors.
    Other,
}

impl ErrorKind {
    /// Returns `true` if sending the same request again may succeed.
    #[inline]
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::RateLimitExceeded | ErrorKind::Timeout)
    }
}
