//! # Bankify
//!
//! Account services for a mobile bank: provisioning new accounts, signing users in,
//! and the data behind the home screen.
//!
//! ## Design
//!
//! The identity provider and the document store are collaborators reached through
//! narrow clients. This crate runs them in-process as resource actors, one Tokio task
//! per collection, each owning its records and serving requests over an `mpsc`
//! channel with `oneshot` replies.
//!
//! ### 1. Type-Safe Error Handling
//! Each collection defines its own error type (`IdentityError`, `ProfileError`,
//! `TransactionError`). Entity errors travel boxed through the framework and are
//! downcast back by the clients. Each workflow has one error enum with a
//! `user_message()`.
//!
//! ### 2. Atomic uniqueness
//! A mailbox is processed one message at a time, so a collection created with
//! [`ResourceActor::with_unique_index`](framework::ResourceActor::with_unique_index)
//! checks and writes its unique key in one step. Profiles use it for phone numbers,
//! identities for email addresses.
//!
//! ### 3. Observability
//! `tracing` everywhere; see [`lifecycle::tracing`].
//!
//! ## Module Tour
//!
//! - [`framework`]: the generic `ResourceActor<T>`, its client and the test mock
//! - [`identity_actor`], [`profile_actor`], [`transaction_actor`]: the collections
//! - [`clients`]: typed clients over each collection
//! - [`registration`]: the account provisioning workflow
//! - [`login`], [`session`], [`dashboard`]: everything after registration
//! - [`lifecycle`]: [`BankSystem`](lifecycle::BankSystem) and tracing setup
//! - [`config`]: `BANKIFY_*` environment configuration
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=info cargo run
//! cargo test
//! ```

pub mod clients;
pub mod config;
pub mod dashboard;
pub mod framework;
pub mod identity_actor;
pub mod lifecycle;
pub mod login;
pub mod model;
pub mod profile_actor;
pub mod registration;
pub mod session;
pub mod transaction_actor;
