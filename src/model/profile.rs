use crate::model::IdentityId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Balance every new account starts with.
pub const INITIAL_ACCOUNT_BALANCE: f64 = 1000.0;

/// The per-user document held in the `users` collection.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](crate::framework::ResourceActor).
/// Documents are written under the id the identity service issued, never a generated one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub identity_id: IdentityId,
    /// Stored as `displayName`, the same value the identity carries as its display name.
    #[serde(rename = "displayName")]
    pub display_phone: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub account_number: String,
    pub date_of_birth: String,
    pub account_balance: f64,
    pub transactions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
}

impl UserProfile {
    /// Builds the document stored for `identity_id`. `transactions` always starts empty.
    pub fn new(identity_id: IdentityId, params: ProfileCreate) -> Self {
        Self {
            identity_id,
            display_phone: params.display_phone,
            email: params.email,
            first_name: params.first_name,
            last_name: params.last_name,
            account_number: params.account_number,
            date_of_birth: params.date_of_birth,
            account_balance: params.account_balance,
            transactions: Vec::new(),
            request_id: params.request_id,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Payload for writing a new profile document.
#[derive(Debug, Clone)]
pub struct ProfileCreate {
    pub display_phone: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub account_number: String,
    pub date_of_birth: String,
    pub account_balance: f64,
    pub request_id: Option<Uuid>,
}

/// Display fields a profile owner may change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Field filters the profile collection answers.
#[derive(Debug, Clone)]
pub enum ProfileFilter {
    DisplayPhone(String),
    AccountNumber(String),
}

/// Profiles expose no custom actions.
#[derive(Debug)]
pub enum ProfileAction {}
