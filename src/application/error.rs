use thiserror::Error;

use crate::domain::{Paise, format_rupees};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("User already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    /// Caller is missing or its role does not allow the operation
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error(
        "Insufficient balance: balance {}, required {}",
        format_rupees(*balance),
        format_rupees(*required)
    )]
    InsufficientBalance { balance: Paise, required: Paise },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
