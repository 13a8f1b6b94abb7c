//! Generic actor framework backing the in-process identity service and document store.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait that stored documents implement to be managed by actors
//! - [`ResourceActor`] - Generic actor that owns one collection
//! - [`ResourceClient`] - Typed handle used to talk to a collection
//! - [`FrameworkError`] - Common error types
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test clients without spawning full actors.

pub mod core;
pub mod mock;

// Re-export core types for convenience
pub use core::*;
