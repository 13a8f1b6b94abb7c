//! Profile documents (the `users` collection) of the in-process document store.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::ProfileClient;
use crate::framework::ResourceActor;
use crate::model::{IdentityId, UserProfile};

/// Creates a new profile actor and its client.
///
/// With `unique_phone` the store itself refuses a second profile for the same
/// phone number; without it uniqueness rests on the caller's pre-check alone.
pub fn new(buffer_size: usize, unique_phone: bool) -> (ResourceActor<UserProfile>, ProfileClient) {
    // Profiles are always written under the identity id; generated ids are a fallback
    let (actor, generic_client) = ResourceActor::new(buffer_size, IdentityId::generate);
    let client = ProfileClient::new(generic_client);

    let actor = if unique_phone { actor.with_unique_index() } else { actor };
    (actor, client)
}
