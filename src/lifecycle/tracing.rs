//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Actor Lifecycle**: startup, shutdown and final store size
//! - **Store Operations**: create, insert, get, update, delete, query and actions, with
//!   the `entity_type` and id as structured fields
//! - **Workflows**: `register` and `login` spans wrapping every client call they make;
//!   actor events are logged from the actor's own task, outside those spans
//! - **Partial failures**: identities left without a profile, and whether they were deleted
//!
//! ## Usage Examples
//!
//! ```bash
//! # Workflow outcomes only
//! RUST_LOG=info cargo run
//!
//! # Every request sent to an actor
//! RUST_LOG=debug cargo run
//!
//! # Only the store
//! RUST_LOG=bankify::framework=debug cargo run
//! ```
//!
//! ## Workflow Trace Example
//!
//! **With `RUST_LOG=info`**:
//!
//! ```text
//! INFO Created entity_type="Identity" id=3f0c... size=1
//! INFO register: Identity created phone="+233241234567" identity_id=3f0c...
//! INFO Inserted entity_type="UserProfile" id=3f0c... size=1
//! INFO register: Profile written identity_id=3f0c... account_number="241234567"
//! INFO Action ok entity_type="Identity" id=3f0c...
//! ```
//!
//! Passwords never reach the logs: the form and payload types redact them in their
//! `Debug` output and the client spans skip them.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Don't show module paths - we use entity_type instead
        .compact() // Compact format shows spans inline (e.g., "register")
        .init();
}
