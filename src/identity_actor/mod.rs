//! # Identity Service
//!
//! In-process stand-in for the managed identity provider: one actor owning every
//! [`Identity`] record.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`Identity`]
//! - [`actions`] - verification and sign-in actions
//! - [`error`] - [`IdentityError`] with provider codes
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Usage
//!
//! ```rust
//! use bankify::identity_actor;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, client) = identity_actor::new(32);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client.create_identity("ama@example.com", "s3cret-pass").await?;
//!     let email = client.send_verification_email(id.clone()).await?;
//!     client.confirm_email(id, email.token).await?;
//!     Ok(())
//! }
//! ```

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::IdentityClient;
use crate::framework::ResourceActor;
use crate::model::{Identity, IdentityId};

/// Creates a new identity actor and its client.
///
/// Emails are unique across identities, so the unique index is always on.
pub fn new(buffer_size: usize) -> (ResourceActor<Identity>, IdentityClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size, IdentityId::generate);
    let client = IdentityClient::new(generic_client);

    (actor.with_unique_index(), client)
}
