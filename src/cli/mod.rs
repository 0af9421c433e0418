use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use crate::application::{AuthService, BoardService};
use crate::config::ServeConfig;
use crate::domain::{Priced, Role, format_rupees, parse_rupees};
use crate::logging::init_logging;
use crate::server::{self, AppState};

/// Jobboard - companies pay to post jobs, students pay to apply
#[derive(Parser)]
#[command(name = "jobboard")]
#[command(about = "A job board backend with a balance-funded posting and application ledger")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "JOBBOARD_DATABASE", default_value = "jobboard.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true, env = "JOBBOARD_LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Run the HTTP server
    Serve(ServeConfig),

    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// List posted jobs
    Jobs {
        /// Only jobs posted by this company (email)
        #[arg(long)]
        company: Option<String>,
    },

    /// List the transaction log
    Transactions {
        /// Only transactions of this account (email)
        #[arg(long)]
        account: Option<String>,
    },

    /// Export data to CSV or JSON
    Export {
        /// What to export: transactions, balances, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv, json (default: csv for transactions/balances, json for full)
        #[arg(short, long)]
        format: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Account email (must be unique)
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Account role: company, student
        #[arg(short, long)]
        role: String,
    },

    /// List all accounts
    List,

    /// Show account details
    Show {
        /// Account email
        email: String,
    },

    /// Credit an account (e.g., "100" or "12.50")
    Fund {
        /// Account email
        email: String,

        /// Amount in rupees
        amount: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let level = if self.verbose {
            "debug"
        } else {
            self.log_level.as_str()
        };
        init_logging(level, self.log_json);

        match self.command {
            Commands::Init => {
                BoardService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Serve(config) => {
                config.validate()?;
                let board = BoardService::init(&self.database).await?;
                let auth = AuthService::new(
                    board.repository().clone(),
                    config.jwt_secret.clone(),
                    config.token_ttl(),
                );
                let listener = TcpListener::bind(&config.bind)
                    .await
                    .with_context(|| format!("Failed to bind {}", config.bind))?;
                server::serve(listener, AppState::new(board, auth)).await?;
            }

            Commands::Account(account_cmd) => {
                let service = BoardService::connect(&self.database).await?;
                run_account_command(&service, account_cmd).await?;
            }

            Commands::Jobs { company } => {
                let service = BoardService::connect(&self.database).await?;
                run_jobs_command(&service, company.as_deref()).await?;
            }

            Commands::Transactions { account } => {
                let service = BoardService::connect(&self.database).await?;
                run_transactions_command(&service, account.as_deref()).await?;
            }

            Commands::Export {
                export_type,
                output,
                format,
            } => {
                let service = BoardService::connect(&self.database).await?;
                run_export_command(&service, &export_type, output.as_deref(), format.as_deref())
                    .await?;
            }
        }

        Ok(())
    }
}

async fn run_account_command(service: &BoardService, cmd: AccountCommands) -> Result<()> {
    match cmd {
        AccountCommands::Create {
            email,
            password,
            role,
        } => {
            let role: Role = role.parse().map_err(|e| {
                anyhow::anyhow!(
                    "Invalid role '{}'. Valid roles: company, student. Error: {}",
                    role,
                    e
                )
            })?;

            let account = service.register(email, &password, role).await?;
            println!("Created account: {} ({})", account.email, account.role);
        }

        AccountCommands::List => {
            let accounts = service.list_accounts().await?;
            if accounts.is_empty() {
                println!("No accounts found.");
            } else {
                println!("{:<30} {:<8} {:>12}", "EMAIL", "ROLE", "BALANCE");
                println!("{}", "-".repeat(52));
                for account in accounts {
                    println!(
                        "{:<30} {:<8} {:>12}",
                        truncate(&account.email, 30),
                        account.role,
                        format_rupees(account.balance)
                    );
                }
            }
        }

        AccountCommands::Show { email } => {
            let account = service.get_account_by_email(&email).await?;
            let transactions = service.list_transactions(account.id).await?;

            println!("Account: {}", account.email);
            println!("  ID:           {}", account.id);
            println!("  Role:         {}", account.role);
            println!("  Balance:      {}", format_rupees(account.balance));
            println!(
                "  Created:      {}",
                account.created_at.format("%Y-%m-%d %H:%M:%S")
            );
            println!("  Transactions: {}", transactions.len());
            if let Some(last) = transactions.last() {
                println!("  Last activity: {}", last.timestamp.format("%Y-%m-%d %H:%M:%S"));
            }
        }

        AccountCommands::Fund { email, amount } => {
            let amount = parse_rupees(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
            let result = service.top_up(&email, amount).await?;
            println!(
                "Credited {} to {} (balance {})",
                format_rupees(amount),
                result.account.email,
                format_rupees(result.balance)
            );
        }
    }
    Ok(())
}

async fn run_jobs_command(service: &BoardService, company: Option<&str>) -> Result<()> {
    let company_id = match company {
        Some(email) => Some(service.get_account_by_email(email).await?.id),
        None => None,
    };
    let jobs = service.list_jobs(company_id).await?;

    if jobs.is_empty() {
        println!("No jobs found.");
        return Ok(());
    }

    let emails = service.get_account_emails().await?;
    println!(
        "{:<36} {:<20} {:<15} {:>15} {:>8} COMPANY",
        "ID", "TITLE", "LOCATION", "SALARY", "PRICE"
    );
    println!("{}", "-".repeat(110));
    for job in jobs {
        let salary = format!("{}-{}", job.listing.min_salary, job.listing.max_salary);
        println!(
            "{:<36} {:<20} {:<15} {:>15} {:>8} {}",
            job.id,
            truncate(&job.listing.title, 20),
            truncate(&job.listing.location, 15),
            salary,
            format_rupees(job.price()),
            emails.get(&job.company).map(|s| s.as_str()).unwrap_or("?")
        );
    }
    Ok(())
}

async fn run_transactions_command(service: &BoardService, account: Option<&str>) -> Result<()> {
    let transactions = match account {
        Some(email) => {
            let account = service.get_account_by_email(email).await?;
            service.list_transactions(account.id).await?
        }
        None => service.list_all_transactions().await?,
    };

    if transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    let emails = service.get_account_emails().await?;
    println!(
        "{:>6} {:<20} {:<30} {:<7} {:>10} JOB",
        "SEQ", "TIMESTAMP", "ACCOUNT", "TYPE", "AMOUNT"
    );
    println!("{}", "-".repeat(110));
    for t in transactions {
        println!(
            "{:>6} {:<20} {:<30} {:<7} {:>10} {}",
            t.sequence,
            t.timestamp.format("%Y-%m-%d %H:%M:%S"),
            truncate(emails.get(&t.account).map(|s| s.as_str()).unwrap_or("?"), 30),
            t.direction,
            format_rupees(t.amount),
            t.job.map(|id| id.to_string()).unwrap_or_default()
        );
    }
    Ok(())
}

async fn run_export_command(
    service: &BoardService,
    export_type: &str,
    output: Option<&str>,
    format: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create output file: {}", path))?,
        ),
        None => Box::new(stdout()),
    };

    let count = match (export_type, format.unwrap_or("")) {
        ("transactions", "" | "csv") => exporter.export_transactions_csv(writer).await?,
        ("transactions", "json") => exporter.export_transactions_json(writer).await?,
        ("balances", "" | "csv") => exporter.export_balances_csv(writer).await?,
        ("full", "" | "json") => exporter.export_full_json(writer).await?,
        (kind, fmt) => anyhow::bail!(
            "Unsupported export '{}' in format '{}'. Use: transactions [csv|json], balances [csv], full [json]",
            kind,
            fmt
        ),
    };

    if let Some(path) = output {
        eprintln!("Exported {} record(s) to {}", count, path);
    }
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
