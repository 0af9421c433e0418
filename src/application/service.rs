use anyhow::anyhow;
use std::collections::HashMap;

use crate::domain::{
    Account, AccountId, Job, JobId, JobListing, MAX_SALARY, Paise, Priced, Role, Transaction,
    format_rupees,
};
use crate::storage::Repository;

use super::{AppError, hash_password};

/// Application service providing the job board operations.
/// This is the primary interface for any client (CLI, HTTP).
#[derive(Clone)]
pub struct BoardService {
    repo: Repository,
}

/// Result of posting a job
#[derive(Debug)]
pub struct PostingResult {
    pub job: Job,
    pub price: Paise,
    /// Company balance after the posting fee
    pub balance: Paise,
}

/// Result of applying to a job
#[derive(Debug)]
pub struct ApplicationResult {
    pub job: Job,
    pub price: Paise,
    pub company_share: Paise,
    /// Student balance after the application fee
    pub balance: Paise,
    pub debit: Transaction,
    pub credit: Transaction,
}

/// Result of an administrative top-up
#[derive(Debug)]
pub struct TopUpResult {
    pub account: Account,
    pub balance: Paise,
    pub transaction: Transaction,
}

impl BoardService {
    /// Create a new board service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Open the database at the given path, creating and migrating it if needed.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    // ========================
    // Account operations
    // ========================

    /// Register a new account with a zero balance.
    pub async fn register(
        &self,
        email: String,
        password: &str,
        role: Role,
    ) -> Result<Account, AppError> {
        if email.trim().is_empty() {
            return Err(AppError::InvalidInput("email is required".to_string()));
        }
        if password.is_empty() {
            return Err(AppError::InvalidInput("password is required".to_string()));
        }

        if self.repo.get_account_by_email(&email).await?.is_some() {
            return Err(AppError::AlreadyExists(email));
        }

        let account = Account::new(email, hash_password(password)?, role);

        // A concurrent registration may have won the unique constraint
        if !self.repo.save_account(&account).await? {
            return Err(AppError::AlreadyExists(account.email));
        }

        tracing::info!(account = %account.id, role = %account.role, "account registered");
        Ok(account)
    }

    /// Get an account by ID.
    pub async fn get_account(&self, id: AccountId) -> Result<Account, AppError> {
        self.repo
            .get_account(id)
            .await?
            .ok_or_else(|| AppError::AccountNotFound(id.to_string()))
    }

    /// Get an account by email.
    pub async fn get_account_by_email(&self, email: &str) -> Result<Account, AppError> {
        self.repo
            .get_account_by_email(email)
            .await?
            .ok_or_else(|| AppError::AccountNotFound(email.to_string()))
    }

    /// List all accounts.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        Ok(self.repo.list_accounts().await?)
    }

    /// Credit an account from outside the board (admin top-up).
    pub async fn top_up(&self, email: &str, amount: Paise) -> Result<TopUpResult, AppError> {
        if amount <= 0 {
            return Err(AppError::InvalidAmount(
                "Amount must be positive".to_string(),
            ));
        }

        let account = self.get_account_by_email(email).await?;
        let mut transaction = Transaction::credit(account.id, amount);

        let mut uow = self.repo.begin().await?;
        let balance = uow
            .credit(account.id, amount)
            .await?
            .ok_or_else(|| AppError::AccountNotFound(email.to_string()))?;
        uow.append_transaction(&mut transaction).await?;
        uow.commit().await?;

        tracing::info!(
            account = %account.id,
            amount = %format_rupees(amount),
            "account topped up"
        );

        Ok(TopUpResult {
            account,
            balance,
            transaction,
        })
    }

    // ========================
    // Job operations
    // ========================

    /// Post a job on behalf of a company, charging the listing price.
    /// No transaction record is written for postings.
    pub async fn post_job(
        &self,
        caller: AccountId,
        listing: JobListing,
    ) -> Result<PostingResult, AppError> {
        let account = self
            .repo
            .get_account(caller)
            .await?
            .filter(|account| account.role.can_post_jobs())
            .ok_or(AppError::Unauthorized)?;

        if listing.max_salary > MAX_SALARY || listing.min_salary > MAX_SALARY {
            return Err(AppError::InvalidInput(format!(
                "Salary must not exceed {}",
                MAX_SALARY
            )));
        }

        let price = listing.price();
        let job = Job::new(account.id, listing);

        let mut uow = self.repo.begin().await?;
        let debited = uow.debit_if_sufficient(account.id, price).await?;
        let Some(balance) = debited else {
            let balance = uow.balance_of(account.id).await?.unwrap_or(account.balance);
            tracing::warn!(
                account = %account.id,
                balance = %format_rupees(balance),
                price = %format_rupees(price),
                "posting rejected: insufficient balance"
            );
            return Err(AppError::InsufficientBalance {
                balance,
                required: price,
            });
        };
        uow.insert_job(&job).await?;
        uow.commit().await?;

        tracing::info!(
            job = %job.id,
            company = %account.id,
            price = %format_rupees(price),
            "job posted"
        );

        Ok(PostingResult {
            job,
            price,
            balance,
        })
    }

    /// Apply to a job on behalf of a student. The student pays the job's
    /// price and the posting company is credited half of it.
    pub async fn apply_to_job(
        &self,
        caller: AccountId,
        job_id: JobId,
    ) -> Result<ApplicationResult, AppError> {
        let account = self
            .repo
            .get_account(caller)
            .await?
            .filter(|account| account.role.can_apply())
            .ok_or(AppError::Unauthorized)?;

        let job = self
            .repo
            .get_job(job_id)
            .await?
            .ok_or_else(|| AppError::JobNotFound(job_id.to_string()))?;

        let price = job.price();
        let company_share = job.company_share();

        let mut uow = self.repo.begin().await?;
        let debited = uow.debit_if_sufficient(account.id, price).await?;
        let Some(balance) = debited else {
            let balance = uow.balance_of(account.id).await?.unwrap_or(account.balance);
            tracing::warn!(
                account = %account.id,
                job = %job.id,
                balance = %format_rupees(balance),
                price = %format_rupees(price),
                "application rejected: insufficient balance"
            );
            return Err(AppError::InsufficientBalance {
                balance,
                required: price,
            });
        };

        uow.credit(job.company, company_share)
            .await?
            .ok_or_else(|| anyhow!("Owning company {} of job {} is missing", job.company, job.id))?;

        let mut debit = Transaction::debit(account.id, price).for_job(job.id);
        let mut credit = Transaction::credit(job.company, company_share).for_job(job.id);
        uow.append_transaction(&mut debit).await?;
        uow.append_transaction(&mut credit).await?;
        uow.commit().await?;

        tracing::info!(
            job = %job.id,
            student = %account.id,
            company = %job.company,
            price = %format_rupees(price),
            "job application recorded"
        );

        Ok(ApplicationResult {
            job,
            price,
            company_share,
            balance,
            debit,
            credit,
        })
    }

    /// Get a job by ID.
    pub async fn get_job(&self, id: JobId) -> Result<Job, AppError> {
        self.repo
            .get_job(id)
            .await?
            .ok_or_else(|| AppError::JobNotFound(id.to_string()))
    }

    /// List jobs, newest first, optionally only those posted by one company.
    pub async fn list_jobs(&self, company: Option<AccountId>) -> Result<Vec<Job>, AppError> {
        Ok(self.repo.list_jobs(company).await?)
    }

    // ========================
    // Transaction log
    // ========================

    /// List the transactions of one account.
    pub async fn list_transactions(&self, account: AccountId) -> Result<Vec<Transaction>, AppError> {
        Ok(self.repo.list_transactions_for_account(account).await?)
    }

    /// List every transaction in the log.
    pub async fn list_all_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        Ok(self.repo.list_transactions().await?)
    }

    /// Get a map of account IDs to emails (useful for display).
    pub async fn get_account_emails(&self) -> Result<HashMap<AccountId, String>, AppError> {
        let accounts = self.repo.list_accounts().await?;
        Ok(accounts.into_iter().map(|a| (a.id, a.email)).collect())
    }
}
