//! [`ActorEntity`] implementation for [`Identity`].
//!
//! The identity collection runs with a unique index on the lower-cased email, which
//! is how a second registration with the same address is rejected.

use super::{IdentityAction, IdentityActionResult, IdentityError};
use crate::framework::ActorEntity;
use crate::model::{
    Credential, Identity, IdentityCreate, IdentityFilter, IdentityId, IdentityUpdate,
    VerificationEmail,
};
use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

/// Shortest password the service accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Consecutive wrong passwords after which sign-in is refused.
pub const MAX_FAILED_SIGN_INS: u32 = 5;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"))
}

#[async_trait]
impl ActorEntity for Identity {
    type Id = IdentityId;
    type Create = IdentityCreate;
    type Update = IdentityUpdate;
    type Action = IdentityAction;
    type ActionResult = IdentityActionResult;
    type Filter = IdentityFilter;
    type Context = ();
    type Error = IdentityError;

    /// Validates the email shape and password length, then hashes the password.
    fn from_create_params(id: IdentityId, params: IdentityCreate) -> Result<Self, Self::Error> {
        if !email_pattern().is_match(&params.email) {
            return Err(IdentityError::InvalidEmail(params.email));
        }
        if params.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityError::WeakPassword(MIN_PASSWORD_LEN));
        }
        Identity::new(id, params.email, &params.password)
            .map_err(|e| IdentityError::PasswordHashing(e.to_string()))
    }

    fn matches(&self, filter: &IdentityFilter) -> bool {
        match filter {
            IdentityFilter::Email(email) => self.email.eq_ignore_ascii_case(email),
        }
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.email.to_ascii_lowercase())
    }

    async fn on_update(&mut self, update: IdentityUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(display_name) = update.display_name {
            self.display_name = Some(display_name);
        }
        if let Some(disabled) = update.disabled {
            self.disabled = disabled;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: IdentityAction,
        _ctx: &(),
    ) -> Result<IdentityActionResult, Self::Error> {
        match action {
            IdentityAction::SendVerificationEmail => {
                let token = Uuid::new_v4().simple().to_string();
                self.pending_verification = Some(token.clone());
                Ok(IdentityActionResult::VerificationSent(VerificationEmail {
                    to: self.email.clone(),
                    token,
                }))
            }
            IdentityAction::ConfirmEmail(token) => {
                if self.pending_verification.as_deref() != Some(token.as_str()) {
                    return Err(IdentityError::InvalidVerificationToken);
                }
                self.pending_verification = None;
                self.email_verified = true;
                Ok(IdentityActionResult::EmailConfirmed)
            }
            IdentityAction::SignIn { password } => {
                if self.disabled {
                    return Err(IdentityError::UserDisabled);
                }
                if self.failed_sign_ins >= MAX_FAILED_SIGN_INS {
                    return Err(IdentityError::TooManyRequests);
                }
                if !self.password_matches(&password) {
                    self.failed_sign_ins += 1;
                    return Err(IdentityError::InvalidCredential);
                }
                self.failed_sign_ins = 0;
                Ok(IdentityActionResult::SignedIn(Credential {
                    identity: self.clone(),
                    token: Uuid::new_v4().to_string(),
                }))
            }
        }
    }
}
