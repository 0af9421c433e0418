use axum::{Extension, Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{AccountId, Direction, JobId, Role, Transaction, TransactionId, format_rupees};
use crate::server::error::ApiResult;
use crate::server::middleware::Caller;
use crate::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: AccountId,
    pub email: String,
    pub role: Role,
    pub balance: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub id: TransactionId,
    pub sequence: i64,
    #[serde(rename = "type")]
    pub direction: Direction,
    pub amount: String,
    pub timestamp: DateTime<Utc>,
    pub job_id: Option<JobId>,
}

impl From<Transaction> for TransactionView {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            sequence: t.sequence,
            direction: t.direction,
            amount: format_rupees(t.amount),
            timestamp: t.timestamp,
            job_id: t.job,
        }
    }
}

/// GET /account
pub async fn me(
    State(state): State<AppState>,
    Extension(Caller(caller)): Extension<Caller>,
) -> ApiResult<AccountResponse> {
    let account = state.board.get_account(caller).await?;
    Ok(Json(AccountResponse {
        id: account.id,
        email: account.email,
        role: account.role,
        balance: format_rupees(account.balance),
    }))
}

/// GET /account/transactions
pub async fn transactions(
    State(state): State<AppState>,
    Extension(Caller(caller)): Extension<Caller>,
) -> ApiResult<Vec<TransactionView>> {
    let transactions = state.board.list_transactions(caller).await?;
    Ok(Json(
        transactions.into_iter().map(TransactionView::from).collect(),
    ))
}
