//! Transaction documents of the in-process document store.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::TransactionClient;
use crate::framework::ResourceActor;
use crate::model::Transaction;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Creates a new transaction actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Transaction>, TransactionClient) {
    let txn_id_counter = Arc::new(AtomicU64::new(1));
    let next_txn_id = move || {
        let id = txn_id_counter.fetch_add(1, Ordering::SeqCst);
        format!("txn_{}", id)
    };

    let (actor, generic_client) = ResourceActor::new(buffer_size, next_txn_id);
    let client = TransactionClient::new(generic_client);

    (actor, client)
}
