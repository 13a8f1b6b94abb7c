//! [`ActorEntity`] implementation for [`Transaction`].

use super::TransactionError;
use crate::framework::ActorEntity;
use crate::model::{
    Transaction, TransactionAction, TransactionCreate, TransactionFilter, TransactionUpdate,
};
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for Transaction {
    type Id = String;
    type Create = TransactionCreate;
    type Update = TransactionUpdate;
    type Action = TransactionAction;
    type ActionResult = ();
    type Filter = TransactionFilter;
    type Context = ();
    type Error = TransactionError;

    fn from_create_params(id: String, params: TransactionCreate) -> Result<Self, Self::Error> {
        if !params.amount.is_finite() || params.amount < 0.0 {
            return Err(TransactionError::InvalidAmount(params.amount));
        }
        Ok(Transaction::new(id, params))
    }

    fn matches(&self, filter: &TransactionFilter) -> bool {
        match filter {
            TransactionFilter::User(user_id) => &self.user_id == user_id,
        }
    }

    async fn on_update(&mut self, update: TransactionUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(category) = update.category {
            self.category = Some(category);
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: TransactionAction,
        _ctx: &(),
    ) -> Result<(), Self::Error> {
        match action {}
    }
}
