use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AccountId, JobId, Paise};

pub type TransactionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Debit,
    Credit,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Debit => "debit",
            Direction::Credit => "credit",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "debit" => Some(Direction::Debit),
            "credit" => Some(Direction::Credit),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single debit or credit against an account.
/// Transactions are append-only: they are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    /// Monotonically increasing sequence number for ordering
    pub sequence: i64,
    pub account: AccountId,
    pub direction: Direction,
    /// Amount in paise (always positive)
    pub amount: Paise,
    pub timestamp: DateTime<Utc>,
    /// Job the money moved for; absent for top-ups
    pub job: Option<JobId>,
}

impl Transaction {
    /// Create a new transaction. Sequence number must be assigned by the repository.
    pub fn new(account: AccountId, direction: Direction, amount: Paise) -> Self {
        assert!(amount > 0, "Transaction amount must be positive");
        Self {
            id: Uuid::new_v4(),
            sequence: 0,
            account,
            direction,
            amount,
            timestamp: Utc::now(),
            job: None,
        }
    }

    pub fn debit(account: AccountId, amount: Paise) -> Self {
        Self::new(account, Direction::Debit, amount)
    }

    pub fn credit(account: AccountId, amount: Paise) -> Self {
        Self::new(account, Direction::Credit, amount)
    }

    pub fn for_job(mut self, job: JobId) -> Self {
        self.job = Some(job);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debit_and_credit() {
        let account = Uuid::new_v4();
        let job = Uuid::new_v4();

        let debit = Transaction::debit(account, 2400).for_job(job);
        assert_eq!(debit.direction, Direction::Debit);
        assert_eq!(debit.amount, 2400);
        assert_eq!(debit.job, Some(job));

        let credit = Transaction::credit(account, 1200);
        assert_eq!(credit.direction, Direction::Credit);
        assert_eq!(credit.job, None);
    }

    #[test]
    fn test_direction_roundtrip() {
        for direction in [Direction::Debit, Direction::Credit] {
            assert_eq!(Direction::from_str(direction.as_str()), Some(direction));
        }
        assert_eq!(Direction::from_str("refund"), None);
    }

    #[test]
    #[should_panic(expected = "Transaction amount must be positive")]
    fn test_transaction_requires_positive_amount() {
        Transaction::debit(Uuid::new_v4(), 0);
    }
}
