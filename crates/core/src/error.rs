use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("candidate list is empty")]
    EmptyRoster,
    #[error("draw count must be a positive number")]
    InvalidCount,
    #[error("a draw is already rolling")]
    AlreadyRolling,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CopyError {
    #[error("nothing to copy")]
    Empty,
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard write failed: {0}")]
    Failed(String),
}
