//! Starting, wiring and stopping the actors.

pub mod bank_system;
pub mod tracing;

pub use bank_system::BankSystem;
pub use self::tracing::setup_tracing;
