use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::application::BoardService;
use crate::domain::{Account, Job, Transaction, format_rupees};

/// Database snapshot for full export (password hashes are never included)
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub accounts: Vec<Account>,
    pub jobs: Vec<Job>,
    pub transactions: Vec<Transaction>,
}

/// Exporter for converting board data to audit-friendly formats
pub struct Exporter<'a> {
    service: &'a BoardService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a BoardService) -> Self {
        Self { service }
    }

    /// Export the transaction log to CSV format
    pub async fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let transactions = self.service.list_all_transactions().await?;
        let emails = self.service.get_account_emails().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "sequence",
            "timestamp",
            "account",
            "type",
            "amount",
            "job_id",
        ])?;

        for t in &transactions {
            csv_writer.write_record([
                t.id.to_string(),
                t.sequence.to_string(),
                t.timestamp.to_rfc3339(),
                emails.get(&t.account).cloned().unwrap_or_else(|| t.account.to_string()),
                t.direction.as_str().to_string(),
                format_rupees(t.amount),
                t.job.map(|id| id.to_string()).unwrap_or_default(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(transactions.len())
    }

    /// Export the transaction log as a JSON array
    pub async fn export_transactions_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let transactions = self.service.list_all_transactions().await?;
        let json = serde_json::to_string_pretty(&transactions)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;
        Ok(transactions.len())
    }

    /// Export account balances to CSV format
    pub async fn export_balances_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let accounts = self.service.list_accounts().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["email", "role", "balance"])?;

        for account in &accounts {
            csv_writer.write_record([
                account.email.as_str(),
                account.role.as_str(),
                format_rupees(account.balance).as_str(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(accounts.len())
    }

    /// Export full database as JSON snapshot. Returns the number of records written.
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let snapshot = DatabaseSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            accounts: self.service.list_accounts().await?,
            jobs: self.service.list_jobs(None).await?,
            transactions: self.service.list_all_transactions().await?,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot.accounts.len() + snapshot.jobs.len() + snapshot.transactions.len())
    }
}
