use crate::model::IdentityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of money movement, as stored in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Transfer,
    Receive,
    Deposit,
    Withdraw,
    BillPayment,
    Airtime,
    #[serde(other)]
    Other,
}

impl TransactionKind {
    /// Money coming into the account.
    pub fn is_credit(self) -> bool {
        matches!(self, TransactionKind::Receive | TransactionKind::Deposit)
    }
}

/// A document in the `transactions` collection.
///
/// Written by payment flows; this crate only reads them back for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: IdentityId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
    pub recipient_name: Option<String>,
    pub sender_name: Option<String>,
    pub bill_type: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl Transaction {
    pub fn new(id: String, params: TransactionCreate) -> Self {
        Self {
            id,
            user_id: params.user_id,
            kind: params.kind,
            amount: params.amount,
            created_at: params.created_at,
            recipient_name: params.recipient_name,
            sender_name: params.sender_name,
            bill_type: params.bill_type,
            description: params.description,
            category: params.category,
        }
    }

    /// Headline shown in transaction lists.
    pub fn title(&self) -> String {
        match self.kind {
            TransactionKind::Transfer => format!(
                "Transfer to {}",
                self.recipient_name.as_deref().unwrap_or("Account")
            ),
            TransactionKind::Receive => format!(
                "Received from {}",
                self.sender_name.as_deref().unwrap_or("Account")
            ),
            TransactionKind::Deposit => "Account Deposit".to_string(),
            TransactionKind::Withdraw => "Cash Withdrawal".to_string(),
            TransactionKind::BillPayment => {
                format!("{} Payment", self.bill_type.as_deref().unwrap_or("Bill"))
            }
            TransactionKind::Airtime => "Airtime Purchase".to_string(),
            TransactionKind::Other => self
                .description
                .clone()
                .unwrap_or_else(|| "Transaction".to_string()),
        }
    }

    /// Category when set, otherwise the creation date as `M/D/YYYY`.
    pub fn subtitle(&self) -> String {
        match &self.category {
            Some(category) => category.clone(),
            None => self.created_at.format("%-m/%-d/%Y").to_string(),
        }
    }

    /// Amount with direction sign and two decimals, e.g. `+$25.00`.
    pub fn signed_amount(&self) -> String {
        let sign = if self.kind.is_credit() { '+' } else { '-' };
        format!("{}${:.2}", sign, self.amount)
    }
}

/// Payload for recording a transaction.
#[derive(Debug, Clone)]
pub struct TransactionCreate {
    pub user_id: IdentityId,
    pub kind: TransactionKind,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
    pub recipient_name: Option<String>,
    pub sender_name: Option<String>,
    pub bill_type: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl TransactionCreate {
    /// A transaction of `kind` for `user_id` with every optional field empty.
    pub fn new(
        user_id: IdentityId,
        kind: TransactionKind,
        amount: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            kind,
            amount,
            created_at,
            recipient_name: None,
            sender_name: None,
            bill_type: None,
            description: None,
            category: None,
        }
    }
}

/// Annotations that may be attached after the fact.
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub category: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub enum TransactionFilter {
    User(IdentityId),
}

/// Transactions expose no custom actions.
#[derive(Debug)]
pub enum TransactionAction {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn txn(kind: TransactionKind) -> Transaction {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 10, 30, 0).unwrap();
        let params = TransactionCreate::new(IdentityId::from("uid"), kind, 25.0, at);
        Transaction::new("txn_1".into(), params)
    }

    #[test]
    fn test_titles_fall_back_when_names_are_missing() {
        assert_eq!(txn(TransactionKind::Transfer).title(), "Transfer to Account");
        assert_eq!(txn(TransactionKind::Receive).title(), "Received from Account");
        assert_eq!(txn(TransactionKind::BillPayment).title(), "Bill Payment");
        assert_eq!(txn(TransactionKind::Other).title(), "Transaction");

        let mut transfer = txn(TransactionKind::Transfer);
        transfer.recipient_name = Some("Kwame".into());
        assert_eq!(transfer.title(), "Transfer to Kwame");

        let mut bill = txn(TransactionKind::BillPayment);
        bill.bill_type = Some("Electricity".into());
        assert_eq!(bill.title(), "Electricity Payment");
    }

    #[test]
    fn test_credit_and_debit_signs() {
        assert_eq!(txn(TransactionKind::Deposit).signed_amount(), "+$25.00");
        assert_eq!(txn(TransactionKind::Receive).signed_amount(), "+$25.00");
        assert_eq!(txn(TransactionKind::Withdraw).signed_amount(), "-$25.00");
        assert_eq!(txn(TransactionKind::Airtime).signed_amount(), "-$25.00");
    }

    #[test]
    fn test_subtitle_prefers_category_over_date() {
        let mut t = txn(TransactionKind::Deposit);
        assert_eq!(t.subtitle(), "3/9/2024");
        t.category = Some("Savings".into());
        assert_eq!(t.subtitle(), "Savings");
    }

    #[test]
    fn test_unknown_kind_deserializes_as_other() {
        let kind: TransactionKind = serde_json::from_str("\"loan_repayment\"").unwrap();
        assert_eq!(kind, TransactionKind::Other);
        let kind: TransactionKind = serde_json::from_str("\"bill_payment\"").unwrap();
        assert_eq!(kind, TransactionKind::BillPayment);
    }
}
