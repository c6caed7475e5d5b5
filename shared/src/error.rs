/// Reasons the Session Store refuses a transition. A refused transition leaves
/// the session untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("a detection request is already in flight")]
    Busy,
    #[error("no image is staged")]
    NoImage,
    #[error("this image has already been analyzed")]
    AlreadyDetected,
    #[error("response belongs to a superseded session")]
    Stale,
    #[error("no detection is available to ask about")]
    NotReady,
    #[error("still waiting for the previous answer")]
    AwaitingAnswer,
    #[error("question is empty")]
    EmptyQuestion,
}

/// Failures reported by the backend-facing request layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("Detection failed: {0}")]
    DetectionFailure(String),
    #[error("Chat request failed: {0}")]
    ChatFailure(String),
    #[error("Authentication required")]
    AuthRequired,
    #[error("{0}")]
    Request(String),
}

impl ClientError {
    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::AuthRequired)
    }
}
