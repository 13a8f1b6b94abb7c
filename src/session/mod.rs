//! # Session
//!
//! The signed-in user as an explicit value. Whatever needs the current user takes a
//! [`Session`] argument; [`SessionStore`] keeps it across restarts.

pub mod cache;

pub use cache::{CacheError, FileCache, KeyValueCache, MemoryCache};

use crate::model::{Credential, IdentityId, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Cache key the session is stored under.
pub const SESSION_KEY: &str = "userAuth";

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub uid: IdentityId,
    pub email: String,
    pub display_name: Option<String>,
    pub email_verified: bool,
    pub first_name: String,
    pub last_name: String,
    pub account_number: String,
    /// Balance on the profile when the session was opened.
    #[serde(default)]
    pub account_balance: f64,
    pub access_token: String,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(credential: Credential, profile: &UserProfile) -> Self {
        Self {
            uid: credential.identity.id,
            email: credential.identity.email,
            display_name: credential.identity.display_name,
            email_verified: credential.identity.email_verified,
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            account_number: profile.account_number.clone(),
            account_balance: profile.account_balance,
            access_token: credential.token,
            signed_in_at: Utc::now(),
        }
    }
}

/// Persists the [`Session`] as JSON under [`SESSION_KEY`].
#[derive(Clone)]
pub struct SessionStore {
    cache: Arc<dyn KeyValueCache>,
}

impl SessionStore {
    pub fn new(cache: Arc<dyn KeyValueCache>) -> Self {
        Self { cache }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCache::new()))
    }

    #[instrument(skip(self, session), fields(uid = %session.uid))]
    pub async fn persist(&self, session: &Session) -> Result<(), CacheError> {
        let json = serde_json::to_string(session)?;
        self.cache.set(SESSION_KEY, json).await?;
        debug!("Session persisted");
        Ok(())
    }

    /// The stored session, if any. An unreadable entry is discarded.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> Result<Option<Session>, CacheError> {
        let Some(json) = self.cache.get(SESSION_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&json) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable session");
                self.cache.remove(SESSION_KEY).await?;
                Ok(None)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), CacheError> {
        self.cache.remove(SESSION_KEY).await
    }
}
