use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WashdeskError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown capability: {0}")]
    UnknownCapability(String),
}
