//! [`ActorEntity`] implementation for [`UserProfile`].

use super::ProfileError;
use crate::framework::ActorEntity;
use crate::model::{
    IdentityId, ProfileAction, ProfileCreate, ProfileFilter, ProfileUpdate, UserProfile,
};
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for UserProfile {
    type Id = IdentityId;
    type Create = ProfileCreate;
    type Update = ProfileUpdate;
    type Action = ProfileAction;
    type ActionResult = ();
    type Filter = ProfileFilter;
    type Context = ();
    type Error = ProfileError;

    fn from_create_params(id: IdentityId, params: ProfileCreate) -> Result<Self, Self::Error> {
        Ok(UserProfile::new(id, params))
    }

    fn matches(&self, filter: &ProfileFilter) -> bool {
        match filter {
            ProfileFilter::DisplayPhone(phone) => &self.display_phone == phone,
            ProfileFilter::AccountNumber(number) => &self.account_number == number,
        }
    }

    /// The phone number is the uniqueness key of the collection.
    fn unique_key(&self) -> Option<String> {
        Some(self.display_phone.clone())
    }

    async fn on_update(&mut self, update: ProfileUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: ProfileAction, _ctx: &()) -> Result<(), Self::Error> {
        match action {}
    }
}
