//! # Transaction Client
use crate::clients::actor_client::ActorClient;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{IdentityId, Transaction, TransactionCreate, TransactionFilter};
use crate::transaction_actor::TransactionError;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the transaction actor.
#[derive(Clone)]
pub struct TransactionClient {
    inner: ResourceClient<Transaction>,
}

impl TransactionClient {
    pub fn new(inner: ResourceClient<Transaction>) -> Self {
        Self { inner }
    }
}

fn map_transaction_error(e: FrameworkError) -> TransactionError {
    match e.downcast_entity::<TransactionError>() {
        Ok(err) => err,
        Err(other) => TransactionError::ActorCommunicationError(other.to_string()),
    }
}

#[async_trait]
impl ActorClient<Transaction> for TransactionClient {
    type Error = TransactionError;

    fn inner(&self) -> &ResourceClient<Transaction> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        map_transaction_error(e)
    }
}

impl TransactionClient {
    #[instrument(skip(self))]
    pub async fn record(&self, params: TransactionCreate) -> Result<String, TransactionError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(map_transaction_error)
    }

    /// The user's newest `limit` transactions, newest first.
    #[instrument(skip(self))]
    pub async fn recent_for_user(
        &self,
        user_id: IdentityId,
        limit: usize,
    ) -> Result<Vec<Transaction>, TransactionError> {
        debug!("Sending request");
        let mut transactions = self
            .inner
            .query(TransactionFilter::User(user_id))
            .await
            .map_err(map_transaction_error)?;
        transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        transactions.truncate(limit);
        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransactionKind;
    use crate::transaction_actor;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_recent_for_user_orders_and_limits() {
        let (actor, client) = transaction_actor::new(16);
        tokio::spawn(actor.run(()));

        let owner = IdentityId::from("uid_owner");
        let base = Utc::now();
        for minutes in [5, 1, 4, 2, 3, 6] {
            client
                .record(TransactionCreate::new(
                    owner.clone(),
                    TransactionKind::Deposit,
                    minutes as f64,
                    base - Duration::minutes(minutes),
                ))
                .await
                .unwrap();
        }
        client
            .record(TransactionCreate::new(
                IdentityId::from("uid_other"),
                TransactionKind::Withdraw,
                99.0,
                base,
            ))
            .await
            .unwrap();

        let recent = client.recent_for_user(owner, 4).await.unwrap();
        let amounts: Vec<f64> = recent.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[tokio::test]
    async fn test_negative_amount_is_rejected() {
        let (actor, client) = transaction_actor::new(4);
        tokio::spawn(actor.run(()));

        let err = client
            .record(TransactionCreate::new(
                IdentityId::from("uid"),
                TransactionKind::Transfer,
                -5.0,
                Utc::now(),
            ))
            .await
            .unwrap_err();
        assert_eq!(err, TransactionError::InvalidAmount(-5.0));
    }
}
