//! Error types for the identity service.

use thiserror::Error;

/// Errors reported by the identity service.
///
/// Each variant carries the provider code it is known by ([`IdentityError::code`]),
/// which callers map to user-facing messages.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum IdentityError {
    /// Another identity already uses this email address.
    #[error("Email already in use: {0}")]
    EmailAlreadyInUse(String),

    /// The email address is not well formed.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// The password is shorter than the provider accepts.
    #[error("Password should be at least {0} characters")]
    WeakPassword(usize),

    /// No identity is registered under this email.
    #[error("No identity for email: {0}")]
    UserNotFound(String),

    /// Email and password do not match.
    #[error("Invalid credential")]
    InvalidCredential,

    /// The identity has been disabled.
    #[error("Identity disabled")]
    UserDisabled,

    /// Sign-in is locked after repeated failures.
    #[error("Too many failed sign-in attempts")]
    TooManyRequests,

    /// The verification token does not match the one last sent.
    #[error("Invalid or expired verification token")]
    InvalidVerificationToken,

    /// The requested identity id does not exist.
    #[error("Identity not found: {0}")]
    NotFound(String),

    /// The password could not be hashed.
    #[error("Password hashing failed: {0}")]
    PasswordHashing(String),

    /// An error occurred while communicating with the identity service.
    #[error("Identity service unavailable: {0}")]
    ActorCommunicationError(String),
}

impl IdentityError {
    /// Provider error code, in the `auth/...` namespace.
    pub fn code(&self) -> &'static str {
        match self {
            IdentityError::EmailAlreadyInUse(_) => "auth/email-already-in-use",
            IdentityError::InvalidEmail(_) => "auth/invalid-email",
            IdentityError::WeakPassword(_) => "auth/weak-password",
            IdentityError::UserNotFound(_) => "auth/user-not-found",
            IdentityError::InvalidCredential => "auth/invalid-credential",
            IdentityError::UserDisabled => "auth/user-disabled",
            IdentityError::TooManyRequests => "auth/too-many-requests",
            IdentityError::InvalidVerificationToken => "auth/invalid-action-code",
            IdentityError::NotFound(_) => "auth/user-not-found",
            IdentityError::PasswordHashing(_) => "auth/internal-error",
            IdentityError::ActorCommunicationError(_) => "auth/network-request-failed",
        }
    }

    /// Failure of the transport rather than a verdict of the service.
    pub fn is_transient(&self) -> bool {
        matches!(self, IdentityError::ActorCommunicationError(_))
    }
}

impl From<String> for IdentityError {
    fn from(msg: String) -> Self {
        IdentityError::ActorCommunicationError(msg)
    }
}
