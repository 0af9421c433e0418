use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::Paise;

pub type AccountId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Posts jobs and receives half of every application fee
    Company,
    /// Applies to jobs and pays the application fee
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Company => "company",
            Role::Student => "student",
        }
    }

    pub fn can_post_jobs(&self) -> bool {
        matches!(self, Role::Company)
    }

    pub fn can_apply(&self) -> bool {
        matches!(self, Role::Student)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "company" => Ok(Role::Company),
            "student" => Ok(Role::Student),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    /// Never negative: debits only apply when the balance covers them
    pub balance: Paise,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(email: String, password_hash: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            role,
            balance: 0,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("company".parse::<Role>(), Ok(Role::Company));
        assert_eq!("Student".parse::<Role>(), Ok(Role::Student));
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_capabilities() {
        assert!(Role::Company.can_post_jobs());
        assert!(!Role::Company.can_apply());
        assert!(Role::Student.can_apply());
        assert!(!Role::Student.can_post_jobs());
    }

    #[test]
    fn test_new_account_starts_empty() {
        let account = Account::new("a@b.c".into(), "hash".into(), Role::Student);
        assert_eq!(account.balance, 0);
        assert_eq!(account.role, Role::Student);
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let account = Account::new("a@b.c".into(), "secret-hash".into(), Role::Company);
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("\"role\":\"company\""));
    }
}
