mod common;

use anyhow::Result;
use common::{StandardAccounts, engineer_listing, test_service};
use jobboard::application::AppError;
use jobboard::domain::{JobListing, rupees};
use uuid::Uuid;

#[tokio::test]
async fn test_posting_debits_exact_price() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let accounts = StandardAccounts::create(&service, 100, 0).await?;

    let result = service
        .post_job(accounts.company.id, engineer_listing())
        .await?;

    assert_eq!(result.price, rupees(24));
    assert_eq!(result.balance, rupees(76));

    let company = service.get_account(accounts.company.id).await?;
    assert_eq!(company.balance, rupees(76));

    // Job is persisted and owned by the caller
    let job = service.get_job(result.job.id).await?;
    assert_eq!(job.company, accounts.company.id);
    assert_eq!(job.listing, engineer_listing());

    Ok(())
}

#[tokio::test]
async fn test_posting_with_insufficient_balance_changes_nothing() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let accounts = StandardAccounts::create(&service, 5, 0).await?;

    let result = service
        .post_job(accounts.company.id, engineer_listing())
        .await;

    match result {
        Err(AppError::InsufficientBalance { balance, required }) => {
            assert_eq!(balance, rupees(5));
            assert_eq!(required, rupees(24));
        }
        other => panic!("expected InsufficientBalance, got {:?}", other),
    }

    let company = service.get_account(accounts.company.id).await?;
    assert_eq!(company.balance, rupees(5), "Balance must be unchanged");
    assert!(service.list_jobs(None).await?.is_empty(), "No job created");

    Ok(())
}

#[tokio::test]
async fn test_posting_with_exact_balance_empties_account() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let accounts = StandardAccounts::create(&service, 24, 0).await?;

    let result = service
        .post_job(accounts.company.id, engineer_listing())
        .await?;
    assert_eq!(result.balance, 0);

    // Nothing left for a second posting
    let second = service
        .post_job(accounts.company.id, engineer_listing())
        .await;
    assert!(matches!(second, Err(AppError::InsufficientBalance { .. })));
    assert_eq!(service.list_jobs(None).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_only_companies_can_post() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let accounts = StandardAccounts::create(&service, 100, 100).await?;

    let by_student = service
        .post_job(accounts.student.id, engineer_listing())
        .await;
    assert!(matches!(by_student, Err(AppError::Unauthorized)));

    let by_nobody = service.post_job(Uuid::new_v4(), engineer_listing()).await;
    assert!(matches!(by_nobody, Err(AppError::Unauthorized)));

    let student = service.get_account(accounts.student.id).await?;
    assert_eq!(student.balance, rupees(100));
    assert!(service.list_jobs(None).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_posting_writes_no_transaction() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let accounts = StandardAccounts::create(&service, 100, 0).await?;
    let before = service.list_transactions(accounts.company.id).await?.len();

    service
        .post_job(accounts.company.id, engineer_listing())
        .await?;

    // Only the funding top-up is on record
    let after = service.list_transactions(accounts.company.id).await?;
    assert_eq!(after.len(), before);
    assert_eq!(after.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_list_jobs_by_company() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let accounts = StandardAccounts::create(&service, 100, 0).await?;
    let other = StandardAccounts::account(
        &service,
        "jobs@globex.test",
        jobboard::domain::Role::Company,
        100,
    )
    .await?;

    service
        .post_job(accounts.company.id, engineer_listing())
        .await?;
    service
        .post_job(other.id, JobListing::new("Designer", 30000, 45000, "Pune"))
        .await?;

    assert_eq!(service.list_jobs(None).await?.len(), 2);

    let globex_jobs = service.list_jobs(Some(other.id)).await?;
    assert_eq!(globex_jobs.len(), 1);
    assert_eq!(globex_jobs[0].listing.title, "Designer");

    Ok(())
}

#[tokio::test]
async fn test_out_of_range_salary_is_invalid_input() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let accounts = StandardAccounts::create(&service, 100, 0).await?;

    let listing = JobListing::new("Engineer", 1, u64::MAX, "Remote");
    let result = service.post_job(accounts.company.id, listing).await;
    assert!(matches!(result, Err(AppError::InvalidInput(_))));

    let company = service.get_account(accounts.company.id).await?;
    assert_eq!(company.balance, rupees(100));
    assert!(service.list_jobs(None).await?.is_empty());

    Ok(())
}
