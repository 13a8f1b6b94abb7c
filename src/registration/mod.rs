//! # Account Provisioning
//!
//! Turns a [`RegistrationForm`] into an identity, a profile document and a pending
//! email verification.
//!
//! ## Steps
//!
//! 1. Every field present ([`ValidationError::MissingFields`])
//! 2. Phone matches `^\+[1-9]\d{1,3}\d{8,14}$` ([`ValidationError::InvalidPhone`])
//! 3. Account number derived per [`AccountNumberPolicy`]
//! 4. No profile holds the phone yet ([`RegistrationError::DuplicatePhone`])
//! 5. Identity created ([`RegistrationError::IdentityCreation`])
//! 6. Display name set, profile written ([`RegistrationError::ProfileWrite`])
//! 7. Verification mail requested, failures only logged
//! 8. [`NextStep::VerifyEmail`]
//!
//! Steps 1 to 3 make no external call.

pub mod error;
pub mod form;
pub mod phone;
pub mod workflow;

pub use error::*;
pub use form::RegistrationForm;
pub use phone::{is_valid_phone, parse_phone, AccountNumberPolicy, ParsedPhone};
pub use workflow::*;
