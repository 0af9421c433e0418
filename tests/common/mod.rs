// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::Duration;
use jobboard::application::{AuthService, BoardService};
use jobboard::domain::{Account, JobListing, Role, rupees};
use jobboard::server::{self, AppState};
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const TEST_SECRET: &str = "test-secret";

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(BoardService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = BoardService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Auth service sharing the board's database
pub fn auth_service(service: &BoardService) -> AuthService {
    AuthService::new(
        service.repository().clone(),
        TEST_SECRET,
        Duration::hours(1),
    )
}

/// The listing used throughout the examples: priced at 24 rupees
pub fn engineer_listing() -> JobListing {
    JobListing::new("Engineer", 50000, 80000, "Remote")
}

/// Test fixture: a company and a student with balances in rupees
pub struct StandardAccounts {
    pub company: Account,
    pub student: Account,
}

impl StandardAccounts {
    pub const PASSWORD: &'static str = "password123";

    pub async fn create(
        service: &BoardService,
        company_rupees: i64,
        student_rupees: i64,
    ) -> Result<Self> {
        let company = Self::account(service, "hr@acme.test", Role::Company, company_rupees).await?;
        let student =
            Self::account(service, "sam@uni.test", Role::Student, student_rupees).await?;
        Ok(Self { company, student })
    }

    /// Register an account and fund it with a top-up
    pub async fn account(
        service: &BoardService,
        email: &str,
        role: Role,
        balance_rupees: i64,
    ) -> Result<Account> {
        service
            .register(email.to_string(), Self::PASSWORD, role)
            .await?;
        if balance_rupees > 0 {
            service.top_up(email, rupees(balance_rupees)).await?;
        }
        Ok(service.get_account_by_email(email).await?)
    }
}

/// Serve the router on an ephemeral port. Returns the base URL.
pub async fn spawn_server(service: &BoardService) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = AppState::new(service.clone(), auth_service(service));

    tokio::spawn(async move {
        axum::serve(listener, server::router(state)).await.ok();
    });

    Ok(format!("http://{}", addr))
}
