//! Error types for the profile collection.

use thiserror::Error;

/// Errors that can occur during profile operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProfileError {
    /// The requested profile was not found.
    #[error("Profile not found: {0}")]
    NotFound(String),

    /// A profile is already stored under this identity id.
    #[error("Profile already exists: {0}")]
    AlreadyExists(String),

    /// The unique index already holds this phone number.
    #[error("Phone number already registered: {0}")]
    DuplicatePhone(String),

    /// An error occurred while communicating with the document store.
    #[error("Document store unavailable: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for ProfileError {
    fn from(msg: String) -> Self {
        ProfileError::ActorCommunicationError(msg)
    }
}
