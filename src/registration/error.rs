//! Error types for account provisioning.

use crate::identity_actor::IdentityError;
use crate::model::IdentityId;
use crate::profile_actor::ProfileError;
use thiserror::Error;

/// Generic message for failures that have no specific wording.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Input rejected before any external call is made.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("one or more required fields are empty")]
    MissingFields,

    #[error("phone number does not match +<country code><number>")]
    InvalidPhone,

    #[error("no known country code at the start of {0}")]
    UnknownCountryCode(String),

    #[error("national number for {region} has unexpected length {actual}")]
    NationalNumberLength { region: String, actual: usize },
}

impl ValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::MissingFields => "Please fill in all fields".to_string(),
            ValidationError::InvalidPhone
            | ValidationError::UnknownCountryCode(_)
            | ValidationError::NationalNumberLength { .. } => {
                "Please enter a valid phone number including the country code".to_string()
            }
        }
    }
}

/// Why a registration did not produce a provisioned account.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A profile already holds this phone number.
    #[error("phone number already registered: {0}")]
    DuplicatePhone(String),

    /// The identity service refused to create the identity. Nothing was written.
    #[error("identity creation failed ({}): {source}", .source.code())]
    IdentityCreation {
        #[source]
        source: IdentityError,
    },

    /// The identity exists but its profile document could not be written.
    ///
    /// `compensated` tells whether the identity was deleted again afterwards.
    #[error(
        "profile write failed for identity {identity_id} (compensated: {compensated}): {source}"
    )]
    ProfileWrite {
        identity_id: IdentityId,
        compensated: bool,
        #[source]
        source: ProfileError,
    },

    /// A collaborator could not be reached.
    #[error("service unavailable: {0}")]
    Transient(String),
}

impl RegistrationError {
    /// The one message shown to the person registering.
    pub fn user_message(&self) -> String {
        match self {
            RegistrationError::Validation(e) => e.user_message(),
            RegistrationError::DuplicatePhone(_) => "Phone number already exists".to_string(),
            RegistrationError::IdentityCreation { source } => match source {
                IdentityError::EmailAlreadyInUse(_) => "Email already used".to_string(),
                IdentityError::InvalidEmail(_) => "Please enter a valid email address".to_string(),
                IdentityError::WeakPassword(min) => {
                    format!("Password should be at least {} characters", min)
                }
                _ => GENERIC_FAILURE_MESSAGE.to_string(),
            },
            RegistrationError::ProfileWrite { .. } | RegistrationError::Transient(_) => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        }
    }

    /// Provider code of an identity-creation failure.
    pub fn provider_code(&self) -> Option<&'static str> {
        match self {
            RegistrationError::IdentityCreation { source } => Some(source.code()),
            _ => None,
        }
    }
}
