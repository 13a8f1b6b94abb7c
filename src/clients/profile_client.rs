//! # Profile Client
//!
//! Queries and keyed writes against the `users` collection.
use crate::clients::actor_client::ActorClient;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{IdentityId, ProfileCreate, ProfileFilter, UserProfile};
use crate::profile_actor::ProfileError;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the profile actor.
#[derive(Clone)]
pub struct ProfileClient {
    inner: ResourceClient<UserProfile>,
}

impl ProfileClient {
    pub fn new(inner: ResourceClient<UserProfile>) -> Self {
        Self { inner }
    }
}

fn map_profile_error(e: FrameworkError) -> ProfileError {
    match e.downcast_entity::<ProfileError>() {
        Ok(err) => err,
        Err(FrameworkError::UniqueViolation(phone)) => ProfileError::DuplicatePhone(phone),
        Err(FrameworkError::AlreadyExists(id)) => ProfileError::AlreadyExists(id),
        Err(FrameworkError::NotFound(id)) => ProfileError::NotFound(id),
        Err(other) => ProfileError::ActorCommunicationError(other.to_string()),
    }
}

#[async_trait]
impl ActorClient<UserProfile> for ProfileClient {
    type Error = ProfileError;

    fn inner(&self) -> &ResourceClient<UserProfile> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        map_profile_error(e)
    }
}

impl ProfileClient {
    /// Every profile whose `display_phone` equals `phone`.
    #[instrument(skip(self))]
    pub async fn find_by_phone(&self, phone: &str) -> Result<Vec<UserProfile>, ProfileError> {
        debug!("Sending request");
        self.inner
            .query(ProfileFilter::DisplayPhone(phone.to_string()))
            .await
            .map_err(map_profile_error)
    }

    /// Every profile holding `account_number`.
    #[instrument(skip(self))]
    pub async fn find_by_account_number(
        &self,
        account_number: &str,
    ) -> Result<Vec<UserProfile>, ProfileError> {
        debug!("Sending request");
        self.inner
            .query(ProfileFilter::AccountNumber(account_number.to_string()))
            .await
            .map_err(map_profile_error)
    }

    /// Writes the profile document under `identity_id`.
    #[instrument(skip(self, params), fields(phone = %params.display_phone))]
    pub async fn create_profile(
        &self,
        identity_id: IdentityId,
        params: ProfileCreate,
    ) -> Result<IdentityId, ProfileError> {
        debug!("Sending request");
        self.inner
            .insert(identity_id, params)
            .await
            .map_err(map_profile_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockClient;

    fn params() -> ProfileCreate {
        ProfileCreate {
            display_phone: "+233241234567".into(),
            email: "yaw@example.com".into(),
            first_name: "Yaw".into(),
            last_name: "Boateng".into(),
            account_number: "241234567".into(),
            date_of_birth: "1/2/1988".into(),
            account_balance: 1000.0,
            request_id: None,
        }
    }

    #[tokio::test]
    async fn test_index_violation_maps_to_duplicate_phone() {
        let mut mock = MockClient::<UserProfile>::new();
        mock.expect_insert(IdentityId::from("uid_1"))
            .return_err(FrameworkError::UniqueViolation("+233241234567".into()));
        let client = ProfileClient::new(mock.client());

        let err = client
            .create_profile(IdentityId::from("uid_1"), params())
            .await
            .unwrap_err();
        assert_eq!(err, ProfileError::DuplicatePhone("+233241234567".into()));
        mock.verify();
    }

    #[tokio::test]
    async fn test_dropped_reply_is_communication_error() {
        let mut mock = MockClient::<UserProfile>::new();
        mock.expect_query().return_err(FrameworkError::ActorDropped);
        let client = ProfileClient::new(mock.client());

        let err = client.find_by_phone("+233241234567").await.unwrap_err();
        assert!(matches!(err, ProfileError::ActorCommunicationError(_)));
        mock.verify();
    }
}
