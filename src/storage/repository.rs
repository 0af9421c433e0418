use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::domain::{
    Account, AccountId, Direction, Job, JobId, JobListing, Paise, Role, Transaction,
};

use super::MIGRATION_001_INITIAL;

const ACCOUNT_COLUMNS: &str = "id, email, password_hash, role, balance, created_at";
const JOB_COLUMNS: &str = "id, company_id, title, min_salary, max_salary, location, created_at";
const TRANSACTION_COLUMNS: &str = "id, sequence, account_id, direction, amount, timestamp, job_id";

/// Repository for persisting and querying accounts, jobs and transactions.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

/// A single database transaction covering every write of one balance
/// movement. Dropping it without `commit` rolls all of them back.
pub struct UnitOfWork {
    tx: sqlx::Transaction<'static, Sqlite>,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations. Safe to run against an existing database.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a unit of work.
    pub async fn begin(&self) -> Result<UnitOfWork> {
        let tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin database transaction")?;
        Ok(UnitOfWork { tx })
    }

    // ========================
    // Account operations
    // ========================

    /// Insert a new account. Returns false if the email is already taken.
    pub async fn save_account(&self, account: &Account) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (id, email, password_hash, role, balance, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(email) DO NOTHING
            "#,
        )
        .bind(account.id.to_string())
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(account.balance)
        .bind(account.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save account")?;

        Ok(result.rows_affected() == 1)
    }

    /// Get an account by ID.
    pub async fn get_account(&self, id: AccountId) -> Result<Option<Account>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM accounts WHERE id = ?",
            ACCOUNT_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch account")?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    /// Get an account by email.
    pub async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM accounts WHERE email = ?",
            ACCOUNT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch account by email")?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    /// List all accounts, ordered by email.
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM accounts ORDER BY email",
            ACCOUNT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list accounts")?;

        rows.iter().map(Self::row_to_account).collect()
    }

    fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Result<Account> {
        let id_str: String = row.get("id");
        let role_str: String = row.get("role");
        let created_at_str: String = row.get("created_at");

        Ok(Account {
            id: Uuid::parse_str(&id_str).context("Invalid account ID")?,
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            role: role_str
                .parse::<Role>()
                .map_err(|e| anyhow::anyhow!("Invalid role: {}", e))?,
            balance: row.get("balance"),
            created_at: parse_timestamp(&created_at_str).context("Invalid created_at")?,
        })
    }

    // ========================
    // Job operations
    // ========================

    /// Get a job by ID.
    pub async fn get_job(&self, id: JobId) -> Result<Option<Job>> {
        let row = sqlx::query(&format!("SELECT {} FROM jobs WHERE id = ?", JOB_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch job")?;

        row.as_ref().map(Self::row_to_job).transpose()
    }

    /// List jobs, newest first, optionally only those of one company.
    pub async fn list_jobs(&self, company: Option<AccountId>) -> Result<Vec<Job>> {
        let rows = match company {
            Some(company) => {
                sqlx::query(&format!(
                    "SELECT {} FROM jobs WHERE company_id = ? ORDER BY created_at DESC",
                    JOB_COLUMNS
                ))
                .bind(company.to_string())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {} FROM jobs ORDER BY created_at DESC",
                    JOB_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .context("Failed to list jobs")?;

        rows.iter().map(Self::row_to_job).collect()
    }

    fn row_to_job(row: &sqlx::sqlite::SqliteRow) -> Result<Job> {
        let id_str: String = row.get("id");
        let company_str: String = row.get("company_id");
        let created_at_str: String = row.get("created_at");

        Ok(Job {
            id: Uuid::parse_str(&id_str).context("Invalid job ID")?,
            company: Uuid::parse_str(&company_str).context("Invalid company ID")?,
            listing: JobListing {
                title: row.get("title"),
                min_salary: u64::try_from(row.get::<i64, _>("min_salary"))
                    .context("Negative min_salary")?,
                max_salary: u64::try_from(row.get::<i64, _>("max_salary"))
                    .context("Negative max_salary")?,
                location: row.get("location"),
            },
            created_at: parse_timestamp(&created_at_str).context("Invalid created_at")?,
        })
    }

    // ========================
    // Transaction operations
    // ========================

    /// List all transactions, ordered by sequence number.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM transactions ORDER BY sequence",
            TRANSACTION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// List transactions of one account, ordered by sequence number.
    pub async fn list_transactions_for_account(
        &self,
        account: AccountId,
    ) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM transactions WHERE account_id = ? ORDER BY sequence",
            TRANSACTION_COLUMNS
        ))
        .bind(account.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions for account")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let id_str: String = row.get("id");
        let account_str: String = row.get("account_id");
        let direction_str: String = row.get("direction");
        let timestamp_str: String = row.get("timestamp");
        let job_str: Option<String> = row.get("job_id");

        Ok(Transaction {
            id: Uuid::parse_str(&id_str).context("Invalid transaction ID")?,
            sequence: row.get("sequence"),
            account: Uuid::parse_str(&account_str).context("Invalid account ID")?,
            direction: Direction::from_str(&direction_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid direction: {}", direction_str))?,
            amount: row.get("amount"),
            timestamp: parse_timestamp(&timestamp_str).context("Invalid timestamp")?,
            job: job_str
                .map(|s| Uuid::parse_str(&s))
                .transpose()
                .context("Invalid job ID")?,
        })
    }
}

impl UnitOfWork {
    /// Current balance of an account, as seen inside this unit of work.
    pub async fn balance_of(&mut self, account: AccountId) -> Result<Option<Paise>> {
        let row = sqlx::query("SELECT balance FROM accounts WHERE id = ?")
            .bind(account.to_string())
            .fetch_optional(&mut *self.tx)
            .await
            .context("Failed to read balance")?;

        Ok(row.map(|row| row.get("balance")))
    }

    /// Debit an account only if its balance covers the amount.
    /// Returns the new balance, or None if the account is missing or short.
    pub async fn debit_if_sufficient(
        &mut self,
        account: AccountId,
        amount: Paise,
    ) -> Result<Option<Paise>> {
        let row = sqlx::query(
            r#"
            UPDATE accounts
            SET balance = balance - ?
            WHERE id = ? AND balance >= ?
            RETURNING balance
            "#,
        )
        .bind(amount)
        .bind(account.to_string())
        .bind(amount)
        .fetch_optional(&mut *self.tx)
        .await
        .context("Failed to debit account")?;

        Ok(row.map(|row| row.get("balance")))
    }

    /// Credit an account. Returns the new balance, or None if the account is missing.
    pub async fn credit(&mut self, account: AccountId, amount: Paise) -> Result<Option<Paise>> {
        let row = sqlx::query(
            r#"
            UPDATE accounts
            SET balance = balance + ?
            WHERE id = ?
            RETURNING balance
            "#,
        )
        .bind(amount)
        .bind(account.to_string())
        .fetch_optional(&mut *self.tx)
        .await
        .context("Failed to credit account")?;

        Ok(row.map(|row| row.get("balance")))
    }

    /// Insert a new job.
    pub async fn insert_job(&mut self, job: &Job) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO jobs (id, company_id, title, min_salary, max_salary, location, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(job.id.to_string())
        .bind(job.company.to_string())
        .bind(&job.listing.title)
        .bind(i64::try_from(job.listing.min_salary).context("min_salary out of range")?)
        .bind(i64::try_from(job.listing.max_salary).context("max_salary out of range")?)
        .bind(&job.listing.location)
        .bind(job.created_at.to_rfc3339())
        .execute(&mut *self.tx)
        .await
        .context("Failed to save job")?;
        Ok(())
    }

    /// Append a transaction to the log.
    /// Assigns the next sequence number.
    pub async fn append_transaction(&mut self, transaction: &mut Transaction) -> Result<()> {
        transaction.sequence = self.next_sequence().await?;

        sqlx::query(
            r#"
            INSERT INTO transactions (id, sequence, account_id, direction, amount, timestamp, job_id)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.id.to_string())
        .bind(transaction.sequence)
        .bind(transaction.account.to_string())
        .bind(transaction.direction.as_str())
        .bind(transaction.amount)
        .bind(transaction.timestamp.to_rfc3339())
        .bind(transaction.job.map(|id| id.to_string()))
        .execute(&mut *self.tx)
        .await
        .context("Failed to save transaction")?;

        Ok(())
    }

    async fn next_sequence(&mut self) -> Result<i64> {
        let row = sqlx::query(
            r#"
            UPDATE sequence_counter
            SET value = value + 1
            WHERE name = 'transaction_sequence'
            RETURNING value
            "#,
        )
        .fetch_one(&mut *self.tx)
        .await
        .context("Failed to get next sequence number")?;

        Ok(row.get("value"))
    }

    pub async fn commit(self) -> Result<()> {
        self.tx
            .commit()
            .await
            .context("Failed to commit database transaction")
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}
