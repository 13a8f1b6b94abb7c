use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use uuid::Uuid;

/// Opaque identifier issued by the identity service.
///
/// Profiles are keyed by the same value, so it doubles as the profile id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityId(pub String);

impl IdentityId {
    /// Issues a fresh opaque id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IdentityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A credential record held by the identity service.
///
/// See [`impl ActorEntity for Identity`](#impl-ActorEntity-for-Identity) for the
/// lifecycle rules (email validation, password strength, sign-in lockout).
#[derive(Clone)]
pub struct Identity {
    pub id: IdentityId,
    pub email: String,
    pub display_name: Option<String>,
    pub email_verified: bool,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
    /// Argon2 hash in PHC string form.
    pub(crate) password_hash: String,
    pub(crate) failed_sign_ins: u32,
    pub(crate) pending_verification: Option<String>,
}

impl Identity {
    /// Builds a new, unverified identity, hashing the password with a fresh salt.
    pub fn new(
        id: IdentityId,
        email: impl Into<String>,
        password: &str,
    ) -> Result<Self, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)?
            .to_string();
        Ok(Self {
            id,
            email: email.into(),
            display_name: None,
            email_verified: false,
            disabled: false,
            created_at: Utc::now(),
            password_hash,
            failed_sign_ins: 0,
            pending_verification: None,
        })
    }

    /// An unreadable stored hash never matches.
    pub fn password_matches(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .field("email_verified", &self.email_verified)
            .field("disabled", &self.disabled)
            .field("created_at", &self.created_at)
            .field("password_hash", &"<redacted>")
            .field("failed_sign_ins", &self.failed_sign_ins)
            .field(
                "pending_verification",
                &self.pending_verification.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Payload for creating an identity.
#[derive(Clone)]
pub struct IdentityCreate {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for IdentityCreate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityCreate")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Payload for updating an identity's profile fields.
#[derive(Debug, Clone, Default)]
pub struct IdentityUpdate {
    pub display_name: Option<String>,
    pub disabled: Option<bool>,
}

/// Lookups supported by the identity collection.
#[derive(Debug, Clone)]
pub enum IdentityFilter {
    /// Case-insensitive email match.
    Email(String),
}

/// What the identity service mails out to confirm an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationEmail {
    pub to: String,
    pub token: String,
}

/// Proof of a successful sign-in.
#[derive(Debug, Clone)]
pub struct Credential {
    pub identity: Identity,
    pub token: String,
}
