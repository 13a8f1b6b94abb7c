//! # Login
//!
//! Account number and password in, [`Session`] out. The account number locates the
//! profile, whose email is what the identity service signs in with.

use crate::clients::{IdentityClient, ProfileClient};
use crate::identity_actor::IdentityError;
use crate::profile_actor::ProfileError;
use crate::session::{CacheError, Session, SessionStore};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{info, instrument, warn};

fn account_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{9}$").expect("valid account number pattern"))
}

#[derive(Clone, Default)]
pub struct LoginForm {
    pub account_number: String,
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("account_number", &self.account_number)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("account number or password missing")]
    MissingFields,

    #[error("account number is not nine digits")]
    InvalidAccountNumber,

    #[error("no profile with account number {0}")]
    AccountNotFound(String),

    #[error("sign-in refused: {0}")]
    SignIn(#[from] IdentityError),

    #[error("email address not verified")]
    EmailNotVerified,

    #[error("profile lookup failed: {0}")]
    Store(#[from] ProfileError),

    #[error("session could not be saved: {0}")]
    Session(#[from] CacheError),
}

impl LoginError {
    pub fn user_message(&self) -> String {
        match self {
            LoginError::MissingFields => "Please fill all the fields".to_string(),
            LoginError::InvalidAccountNumber => {
                "Please enter a valid 9 digit account number".to_string()
            }
            LoginError::AccountNotFound(_) => "No user found with this account number".to_string(),
            LoginError::SignIn(e) => match e {
                IdentityError::InvalidCredential => "Invalid password".to_string(),
                IdentityError::UserDisabled => "Your account has been disabled".to_string(),
                IdentityError::TooManyRequests => {
                    "Your account has been temporarily disabled. Too many login attempts"
                        .to_string()
                }
                other => other.to_string(),
            },
            LoginError::EmailNotVerified => {
                "Email not verified. Please check your inbox.".to_string()
            }
            LoginError::Store(e) => e.to_string(),
            LoginError::Session(e) => e.to_string(),
        }
    }
}

/// Signs users in and persists their session.
#[derive(Clone)]
pub struct LoginService {
    identities: IdentityClient,
    profiles: ProfileClient,
    sessions: SessionStore,
}

impl LoginService {
    pub fn new(
        identities: IdentityClient,
        profiles: ProfileClient,
        sessions: SessionStore,
    ) -> Self {
        Self {
            identities,
            profiles,
            sessions,
        }
    }

    #[instrument(name = "login", skip(self, form), fields(account_number = %form.account_number))]
    pub async fn login(&self, form: LoginForm) -> Result<Session, LoginError> {
        if form.account_number.is_empty() || form.password.is_empty() {
            return Err(LoginError::MissingFields);
        }
        if !account_number_pattern().is_match(&form.account_number) {
            return Err(LoginError::InvalidAccountNumber);
        }

        let profile = self
            .profiles
            .find_by_account_number(&form.account_number)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LoginError::AccountNotFound(form.account_number.clone()))?;

        let credential = self
            .identities
            .sign_in(&profile.email, &form.password)
            .await
            .inspect_err(|e| warn!(code = e.code(), "Sign-in refused"))?;
        if !credential.identity.email_verified {
            info!(uid = %credential.identity.id, "Email not verified");
            return Err(LoginError::EmailNotVerified);
        }

        let session = Session::new(credential, &profile);
        self.sessions.persist(&session).await?;
        info!(uid = %session.uid, "Signed in");
        Ok(session)
    }

    /// Forgets the persisted session.
    pub async fn logout(&self) -> Result<(), LoginError> {
        self.sessions.clear().await?;
        Ok(())
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockClient;
    use crate::model::{Identity, UserProfile};

    fn service(
        identities: &MockClient<Identity>,
        profiles: &MockClient<UserProfile>,
    ) -> LoginService {
        LoginService::new(
            IdentityClient::new(identities.client()),
            ProfileClient::new(profiles.client()),
            SessionStore::in_memory(),
        )
    }

    fn form(account_number: &str, password: &str) -> LoginForm {
        LoginForm {
            account_number: account_number.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_form_checks_make_no_calls() {
        let identities = MockClient::<Identity>::new();
        let profiles = MockClient::<UserProfile>::new();
        let svc = service(&identities, &profiles);

        let err = svc.login(form("", "pw")).await.unwrap_err();
        assert_eq!(err.user_message(), "Please fill all the fields");
        let err = svc.login(form("12345678", "pw")).await.unwrap_err();
        assert_eq!(err.user_message(), "Please enter a valid 9 digit account number");
        let err = svc.login(form("12345678a", "pw")).await.unwrap_err();
        assert!(matches!(err, LoginError::InvalidAccountNumber));
        // Arabic-Indic digits are not account digits
        let err = svc.login(form("٢٤١٢٣٤٥٦٧", "pw")).await.unwrap_err();
        assert!(matches!(err, LoginError::InvalidAccountNumber));

        identities.verify();
        profiles.verify();
    }

    #[tokio::test]
    async fn test_unknown_account_number() {
        let identities = MockClient::<Identity>::new();
        let mut profiles = MockClient::<UserProfile>::new();
        profiles.expect_query().return_ok(vec![]);
        let svc = service(&identities, &profiles);

        let err = svc.login(form("241234567", "pw")).await.unwrap_err();
        assert_eq!(err.user_message(), "No user found with this account number");
        identities.verify();
        profiles.verify();
    }

    #[test]
    fn test_sign_in_messages() {
        let msg = |e: IdentityError| LoginError::from(e).user_message();
        assert_eq!(msg(IdentityError::InvalidCredential), "Invalid password");
        assert_eq!(msg(IdentityError::UserDisabled), "Your account has been disabled");
        assert_eq!(
            msg(IdentityError::TooManyRequests),
            "Your account has been temporarily disabled. Too many login attempts"
        );
        assert_eq!(
            msg(IdentityError::UserNotFound("a@b.co".into())),
            "No identity for email: a@b.co"
        );
    }
}
