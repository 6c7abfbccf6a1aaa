/// Coarse classification of use case failures, for callers that only need
/// to decide between "tell the user", "retry" and "report upstream outage".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input, rejected before any persistence call.
    Input,
    /// The request conflicts with stored state (email taken, token used).
    Conflict,
    /// Login failed. Deliberately carries no detail.
    Unauthorized,
    /// The account exists but the activation message was not delivered.
    NotifyFailed,
    /// Store, signer or hasher unavailable.
    Upstream,
    Timeout,
}

impl ErrorKind {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::NotifyFailed | ErrorKind::Upstream | ErrorKind::Timeout
        )
    }
}
