//! Pure data structures (documents and DTOs) implementing the
//! [`ActorEntity`](crate::framework::ActorEntity) trait.

pub mod identity;
pub mod profile;
pub mod transaction;

pub use identity::*;
pub use profile::*;
pub use transaction::*;
