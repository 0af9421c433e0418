mod common;

use anyhow::Result;
use chrono::Duration;
use common::{StandardAccounts, TEST_SECRET, auth_service, test_service};
use jobboard::application::{AppError, AuthService};
use jobboard::domain::{Direction, Role, rupees};

#[tokio::test]
async fn test_register_is_idempotent_per_email() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let account = service
        .register("a@b.test".to_string(), "pw", Role::Student)
        .await?;
    assert_eq!(account.balance, 0);
    assert_ne!(account.password_hash, "pw");

    for role in [Role::Student, Role::Company] {
        let again = service.register("a@b.test".to_string(), "other", role).await;
        assert!(matches!(again, Err(AppError::AlreadyExists(_))));
    }

    let accounts = service.list_accounts().await?;
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].role, Role::Student);

    Ok(())
}

#[tokio::test]
async fn test_register_requires_email_and_password() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let no_email = service.register("  ".to_string(), "pw", Role::Student).await;
    assert!(matches!(no_email, Err(AppError::InvalidInput(_))));

    let no_password = service.register("a@b.test".to_string(), "", Role::Student).await;
    assert!(matches!(no_password, Err(AppError::InvalidInput(_))));

    assert!(service.list_accounts().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_login_issues_token_for_account() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let accounts = StandardAccounts::create(&service, 0, 0).await?;
    let auth = auth_service(&service);

    let token = auth
        .login(&accounts.student.email, StandardAccounts::PASSWORD)
        .await?;
    assert_eq!(auth.authenticate(&token)?, accounts.student.id);

    Ok(())
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let accounts = StandardAccounts::create(&service, 0, 0).await?;
    let auth = auth_service(&service);

    let wrong_password = auth.login(&accounts.company.email, "nope").await;
    assert!(matches!(wrong_password, Err(AppError::InvalidCredentials)));

    let unknown = auth.login("ghost@nowhere.test", "password123").await;
    assert!(matches!(unknown, Err(AppError::InvalidCredentials)));

    Ok(())
}

#[tokio::test]
async fn test_tokens_are_bound_to_secret_and_lifetime() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let accounts = StandardAccounts::create(&service, 0, 0).await?;
    let auth = auth_service(&service);

    let other_secret = AuthService::new(
        service.repository().clone(),
        format!("{}-rotated", TEST_SECRET),
        Duration::hours(1),
    );
    let foreign = other_secret.issue_token(accounts.student.id)?;
    assert!(matches!(
        auth.authenticate(&foreign),
        Err(AppError::InvalidToken)
    ));

    let expired_issuer = AuthService::new(
        service.repository().clone(),
        TEST_SECRET,
        Duration::minutes(-5),
    );
    let expired = expired_issuer.issue_token(accounts.student.id)?;
    assert!(matches!(
        auth.authenticate(&expired),
        Err(AppError::InvalidToken)
    ));

    assert!(matches!(
        auth.authenticate("not.a.token"),
        Err(AppError::InvalidToken)
    ));

    Ok(())
}

#[tokio::test]
async fn test_top_up_credits_and_logs() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let accounts = StandardAccounts::create(&service, 0, 0).await?;

    let result = service.top_up(&accounts.student.email, 1250).await?;
    assert_eq!(result.balance, 1250);
    assert_eq!(result.transaction.direction, Direction::Credit);
    assert_eq!(result.transaction.job, None);

    let log = service.list_transactions(accounts.student.id).await?;
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].amount, 1250);

    let zero = service.top_up(&accounts.student.email, 0).await;
    assert!(matches!(zero, Err(AppError::InvalidAmount(_))));

    let unknown = service.top_up("ghost@nowhere.test", rupees(5)).await;
    assert!(matches!(unknown, Err(AppError::AccountNotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_token_for_unknown_account_cannot_act() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let auth = auth_service(&service);

    let ghost = uuid::Uuid::new_v4();
    let token = auth.issue_token(ghost)?;
    let caller = auth.authenticate(&token)?;
    assert_eq!(caller, ghost);

    let result = service
        .post_job(caller, common::engineer_listing())
        .await;
    assert!(matches!(result, Err(AppError::Unauthorized)));

    let result = service.get_account(caller).await;
    assert!(matches!(result, Err(AppError::AccountNotFound(_))));

    Ok(())
}
