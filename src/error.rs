use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeskwatchError {
    #[error("{0}")]
    Error(String),

    #[error("No display available")]
    NoDisplay,

    #[error("Window system error: {0}")]
    Platform(String),

    #[error("handler {name} failed to initialize: {reason}")]
    HandlerInit { name: &'static str, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DeskwatchError {
    pub fn new<S: ToString>(err: S) -> Self {
        DeskwatchError::Error(err.to_string())
    }
}

pub type DeskwatchResult<T> = Result<T, DeskwatchError>;
