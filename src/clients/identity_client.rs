//! # Identity Client
//!
//! The operations consumed from the identity service: create an identity, set its
//! display name, mail and confirm a verification link, sign in.
use crate::clients::actor_client::ActorClient;
use crate::framework::{FrameworkError, ResourceClient};
use crate::identity_actor::{IdentityAction, IdentityActionResult, IdentityError};
use crate::model::{
    Credential, Identity, IdentityCreate, IdentityFilter, IdentityId, IdentityUpdate,
    VerificationEmail,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the identity actor.
#[derive(Clone)]
pub struct IdentityClient {
    inner: ResourceClient<Identity>,
}

impl IdentityClient {
    pub fn new(inner: ResourceClient<Identity>) -> Self {
        Self { inner }
    }
}

/// Typed entity errors pass through; index and lookup failures get their provider meaning.
fn map_identity_error(e: FrameworkError) -> IdentityError {
    match e.downcast_entity::<IdentityError>() {
        Ok(err) => err,
        Err(FrameworkError::UniqueViolation(email)) => IdentityError::EmailAlreadyInUse(email),
        Err(FrameworkError::NotFound(id)) => IdentityError::NotFound(id),
        Err(other) => IdentityError::ActorCommunicationError(other.to_string()),
    }
}

#[async_trait]
impl ActorClient<Identity> for IdentityClient {
    type Error = IdentityError;

    fn inner(&self) -> &ResourceClient<Identity> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        map_identity_error(e)
    }
}

impl IdentityClient {
    /// Creates an identity bound to `(email, password)` and returns its opaque id.
    ///
    /// Rejects an email already in use with [`IdentityError::EmailAlreadyInUse`].
    #[instrument(skip(self, password))]
    pub async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentityId, IdentityError> {
        debug!("Sending request");
        let params = IdentityCreate {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.inner.create(params).await.map_err(map_identity_error)
    }

    #[instrument(skip(self))]
    pub async fn update_display_name(
        &self,
        id: IdentityId,
        display_name: String,
    ) -> Result<Identity, IdentityError> {
        debug!("Sending request");
        let update = IdentityUpdate {
            display_name: Some(display_name),
            ..Default::default()
        };
        self.inner.update(id, update).await.map_err(map_identity_error)
    }

    #[instrument(skip(self))]
    pub async fn set_disabled(
        &self,
        id: IdentityId,
        disabled: bool,
    ) -> Result<Identity, IdentityError> {
        debug!("Sending request");
        let update = IdentityUpdate {
            disabled: Some(disabled),
            ..Default::default()
        };
        self.inner.update(id, update).await.map_err(map_identity_error)
    }

    /// Mails a fresh verification link; the returned value is what was sent.
    #[instrument(skip(self))]
    pub async fn send_verification_email(
        &self,
        id: IdentityId,
    ) -> Result<VerificationEmail, IdentityError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, IdentityAction::SendVerificationEmail)
            .await
        {
            Ok(IdentityActionResult::VerificationSent(email)) => Ok(email),
            Ok(_) => {
                unreachable!("SendVerificationEmail action must return VerificationSent result")
            }
            Err(e) => Err(map_identity_error(e)),
        }
    }

    #[instrument(skip(self, token))]
    pub async fn confirm_email(&self, id: IdentityId, token: String) -> Result<(), IdentityError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, IdentityAction::ConfirmEmail(token))
            .await
        {
            Ok(IdentityActionResult::EmailConfirmed) => Ok(()),
            Ok(_) => unreachable!("ConfirmEmail action must return EmailConfirmed result"),
            Err(e) => Err(map_identity_error(e)),
        }
    }

    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, IdentityError> {
        debug!("Sending request");
        let mut hits = self
            .inner
            .query(IdentityFilter::Email(email.to_string()))
            .await
            .map_err(map_identity_error)?;
        Ok(hits.pop())
    }

    /// Signs in with email and password.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Credential, IdentityError> {
        let identity = self
            .find_by_email(email)
            .await?
            .ok_or_else(|| IdentityError::UserNotFound(email.to_string()))?;
        debug!(identity_id = %identity.id, "Checking password");
        let action = IdentityAction::SignIn {
            password: password.to_string(),
        };
        match self.inner.perform_action(identity.id, action).await {
            Ok(IdentityActionResult::SignedIn(credential)) => Ok(credential),
            Ok(_) => unreachable!("SignIn action must return SignedIn result"),
            Err(e) => Err(map_identity_error(e)),
        }
    }
}
