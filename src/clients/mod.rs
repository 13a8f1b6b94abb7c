//! Type-safe wrappers around [`ResourceClient`](crate::framework::ResourceClient).
//!
//! These are the operations the workflows consume from the identity service and the
//! document store; nothing above this layer sends raw requests.

pub mod actor_client;
pub mod identity_client;
pub mod profile_client;
pub mod transaction_client;

pub use actor_client::ActorClient;
pub use identity_client::*;
pub use profile_client::*;
pub use transaction_client::*;
