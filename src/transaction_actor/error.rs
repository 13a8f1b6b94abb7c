//! Error types for the transaction collection.

use thiserror::Error;

/// Errors that can occur during transaction operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransactionError {
    /// Amounts are stored unsigned; the kind carries the direction.
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    /// An error occurred while communicating with the document store.
    #[error("Document store unavailable: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for TransactionError {
    fn from(msg: String) -> Self {
        TransactionError::ActorCommunicationError(msg)
    }
}
