//! Custom actions for the identity service.
//!
//! These go beyond CRUD: mailing a verification link, confirming it, and
//! checking a password. They are handled by
//! [`ActorEntity::handle_action`](crate::framework::ActorEntity::handle_action).

use crate::model::{Credential, VerificationEmail};
use std::fmt;

/// Custom actions for identities.
#[derive(Clone)]
pub enum IdentityAction {
    /// Issues a fresh verification token and "mails" it to the identity's address.
    SendVerificationEmail,
    /// Marks the email verified if the token matches the last one sent.
    ConfirmEmail(String),
    /// Checks the password and issues a session token.
    ///
    /// # Errors
    /// Fails when the identity is disabled, locked, or the password is wrong.
    SignIn { password: String },
}

impl fmt::Debug for IdentityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityAction::SendVerificationEmail => f.write_str("SendVerificationEmail"),
            IdentityAction::ConfirmEmail(_) => f.write_str("ConfirmEmail(<token>)"),
            IdentityAction::SignIn { .. } => f.write_str("SignIn { password: <redacted> }"),
        }
    }
}

/// Results from IdentityActions - variants match 1:1 with IdentityAction
#[derive(Debug, Clone)]
pub enum IdentityActionResult {
    VerificationSent(VerificationEmail),
    EmailConfirmed,
    SignedIn(Credential),
}
