use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid action '{action}': {reason}")]
    InvalidAction {
        action: &'static str,
        reason: String,
    },

    #[error("Unknown action '{name}'")]
    UnknownAction { name: String },

    #[error("Invalid tick size: {hours} hours (expected 1, 24 or 168)")]
    InvalidTickSize { hours: u64 },
}

impl SimError {
    pub fn invalid(action: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidAction { action, reason: reason.into() }
    }
}

pub type SimResult<T> = Result<T, SimError>;
