//! The provisioning workflow itself.
//!
//! Steps run strictly one after another. The identity is created before the
//! profile document is written, so the only partial state this can leave behind is
//! an identity without a profile; [`ProvisioningPolicy::compensate`] decides whether
//! that identity is deleted again.

use super::error::RegistrationError;
use super::form::RegistrationForm;
use super::phone::AccountNumberPolicy;
use crate::clients::{ActorClient, IdentityClient, ProfileClient};
use crate::identity_actor::IdentityError;
use crate::model::{
    IdentityId, ProfileCreate, UserProfile, VerificationEmail, INITIAL_ACCOUNT_BALANCE,
};
use crate::profile_actor::ProfileError;
use tracing::{debug, error, info, instrument, warn};

/// Knobs that change how accounts are provisioned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProvisioningPolicy {
    pub account_numbers: AccountNumberPolicy,
    /// Delete the identity again when its profile cannot be written.
    pub compensate: bool,
    pub initial_balance: f64,
}

impl Default for ProvisioningPolicy {
    fn default() -> Self {
        Self {
            account_numbers: AccountNumberPolicy::FixedOffset,
            compensate: true,
            initial_balance: INITIAL_ACCOUNT_BALANCE,
        }
    }
}

/// Outcome of the verification mail request. Never fails the registration.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationDispatch {
    Sent(VerificationEmail),
    Failed(String),
    /// Nothing was sent because the registration was a replay.
    Skipped,
}

/// Where the caller should send the user next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    VerifyEmail,
}

/// A provisioned account.
#[derive(Debug, Clone)]
pub struct Provisioned {
    pub profile: UserProfile,
    pub verification: VerificationDispatch,
    pub next_step: NextStep,
    /// The same `request_id` had already provisioned this profile.
    pub replayed: bool,
}

/// Runs registrations against the identity service and the profile collection.
#[derive(Clone)]
pub struct RegistrationService {
    identities: IdentityClient,
    profiles: ProfileClient,
    policy: ProvisioningPolicy,
}

fn store_unavailable(e: ProfileError) -> RegistrationError {
    RegistrationError::Transient(e.to_string())
}

impl RegistrationService {
    pub fn new(
        identities: IdentityClient,
        profiles: ProfileClient,
        policy: ProvisioningPolicy,
    ) -> Self {
        Self {
            identities,
            profiles,
            policy,
        }
    }

    pub fn policy(&self) -> &ProvisioningPolicy {
        &self.policy
    }

    /// Provisions an account for `form`.
    ///
    /// On success the identity exists, the profile document is stored under the
    /// identity id, and a verification mail has been requested.
    #[instrument(name = "register", skip(self, form), fields(phone = %form.phone))]
    pub async fn register(&self, form: RegistrationForm) -> Result<Provisioned, RegistrationError> {
        debug!(?form, "register called");
        form.validate()?;
        let account_number = self.policy.account_numbers.derive(&form.phone)?;

        let existing = self
            .profiles
            .find_by_phone(&form.phone)
            .await
            .map_err(store_unavailable)?;
        if let Some(profile) = existing.into_iter().next() {
            if form.request_id.is_some() && profile.request_id == form.request_id {
                info!(identity_id = %profile.identity_id, "Replayed registration");
                return Ok(Provisioned {
                    profile,
                    verification: VerificationDispatch::Skipped,
                    next_step: NextStep::VerifyEmail,
                    replayed: true,
                });
            }
            info!("Phone number already registered");
            return Err(RegistrationError::DuplicatePhone(form.phone));
        }

        let identity_id = self
            .identities
            .create_identity(&form.email, &form.password)
            .await
            .map_err(|source| {
                if source.is_transient() {
                    RegistrationError::Transient(source.to_string())
                } else {
                    RegistrationError::IdentityCreation { source }
                }
            })?;
        info!(%identity_id, "Identity created");

        if let Err(e) = self
            .identities
            .update_display_name(identity_id.clone(), form.phone.clone())
            .await
        {
            warn!(%identity_id, error = %e, "Display name not set");
        }

        let params = ProfileCreate {
            display_phone: form.phone.clone(),
            email: form.email.clone(),
            first_name: form.first_name,
            last_name: form.last_name,
            account_number,
            date_of_birth: form.date_of_birth,
            account_balance: self.policy.initial_balance,
            request_id: form.request_id,
        };
        if let Err(source) = self
            .profiles
            .create_profile(identity_id.clone(), params.clone())
            .await
        {
            return Err(self.profile_write_failed(identity_id, form.phone, source).await);
        }
        let profile = UserProfile::new(identity_id.clone(), params);
        info!(%identity_id, account_number = %profile.account_number, "Profile written");

        let verification = match self
            .identities
            .send_verification_email(identity_id.clone())
            .await
        {
            Ok(email) => VerificationDispatch::Sent(email),
            Err(e) => {
                warn!(%identity_id, error = %e, "Verification email not sent");
                VerificationDispatch::Failed(e.to_string())
            }
        };

        Ok(Provisioned {
            profile,
            verification,
            next_step: NextStep::VerifyEmail,
            replayed: false,
        })
    }

    /// Reports a failed profile write, deleting the identity first when compensating.
    async fn profile_write_failed(
        &self,
        identity_id: IdentityId,
        phone: String,
        source: ProfileError,
    ) -> RegistrationError {
        if !self.policy.compensate {
            warn!(
                %identity_id,
                error = %source,
                "Profile write failed, identity left without profile"
            );
            return RegistrationError::ProfileWrite {
                identity_id,
                compensated: false,
                source,
            };
        }

        match self.identities.delete(identity_id.clone()).await {
            Ok(()) => {
                info!(%identity_id, error = %source, "Profile write failed, identity deleted");
                if matches!(source, ProfileError::DuplicatePhone(_)) {
                    return RegistrationError::DuplicatePhone(phone);
                }
                RegistrationError::ProfileWrite {
                    identity_id,
                    compensated: true,
                    source,
                }
            }
            Err(e) => {
                error!(
                    %identity_id,
                    error = %e,
                    "Could not delete identity after failed profile write"
                );
                RegistrationError::ProfileWrite {
                    identity_id,
                    compensated: false,
                    source,
                }
            }
        }
    }
}

/// `true` when the identity error is the "email already used" condition.
pub fn is_email_in_use(err: &RegistrationError) -> bool {
    matches!(
        err,
        RegistrationError::IdentityCreation {
            source: IdentityError::EmailAlreadyInUse(_)
        }
    )
}
