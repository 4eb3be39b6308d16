use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),

    /// Username or email is taken.
    #[error("User already exists: {0}")]
    AlreadyExists(String),

    #[error("User validation error: {0}")]
    ValidationError(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
