//! Home screen data for a signed-in user.

use crate::clients::TransactionClient;
use crate::model::Transaction;
use crate::session::Session;
use crate::transaction_actor::TransactionError;
use chrono::Timelike;
use tracing::instrument;

/// Transactions listed on the home screen.
pub const RECENT_TRANSACTION_LIMIT: usize = 4;

/// Greeting for the hour of day (0-23).
pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good morning"
    } else if hour < 16 {
        "Good Afternoon"
    } else {
        "Good Evening"
    }
}

/// `241234567` becomes `241 234 567`.
pub fn format_account_number(account_number: &str) -> String {
    let chars: Vec<char> = account_number.chars().collect();
    chars
        .chunks(3)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Two decimals behind a dollar sign. Anything non-finite shows as `$0.00`.
pub fn format_balance(balance: f64) -> String {
    if balance.is_finite() {
        format!("${:.2}", balance)
    } else {
        "$0.00".to_string()
    }
}

/// One row of the recent transactions list.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionLine {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub amount: String,
    pub is_credit: bool,
}

impl From<&Transaction> for TransactionLine {
    fn from(t: &Transaction) -> Self {
        Self {
            id: t.id.clone(),
            title: t.title(),
            subtitle: t.subtitle(),
            amount: t.signed_amount(),
            is_credit: t.kind.is_credit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub greeting: &'static str,
    pub first_name: String,
    pub full_name: String,
    pub account_number: String,
    pub available_balance: String,
    pub recent: Vec<TransactionLine>,
}

/// Builds the home screen for `session` at local time `now`.
#[instrument(skip(transactions, session, now), fields(uid = %session.uid))]
pub async fn load_dashboard<Tz: chrono::TimeZone>(
    transactions: &TransactionClient,
    session: &Session,
    now: chrono::DateTime<Tz>,
) -> Result<DashboardView, TransactionError> {
    let recent = transactions
        .recent_for_user(session.uid.clone(), RECENT_TRANSACTION_LIMIT)
        .await?;
    Ok(DashboardView {
        greeting: greeting(now.hour()),
        first_name: session.first_name.clone(),
        full_name: format!("{} {}", session.first_name, session.last_name),
        account_number: format_account_number(&session.account_number),
        available_balance: format_balance(session.account_balance),
        recent: recent.iter().map(TransactionLine::from).collect(),
    })
}
