use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AccountId, Priced};

pub type JobId = Uuid;

/// Largest salary bound that fits the INTEGER column it is stored in.
pub const MAX_SALARY: u64 = i64::MAX as u64;

/// The fields a company submits when posting a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub title: String,
    #[serde(deserialize_with = "salary::deserialize")]
    pub min_salary: u64,
    #[serde(deserialize_with = "salary::deserialize")]
    pub max_salary: u64,
    pub location: String,
}

/// Salaries arrive either as JSON numbers or as strings of digits.
mod salary {
    use serde::de::{self, Deserializer, Unexpected, Visitor};
    use std::fmt;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(SalaryVisitor)
    }

    struct SalaryVisitor;

    impl Visitor<'_> for SalaryVisitor {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or a string of digits")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<u64, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<u64, E> {
            u64::try_from(value).map_err(|_| E::invalid_value(Unexpected::Signed(value), &self))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<u64, E> {
            if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
                return Err(E::invalid_value(Unexpected::Str(value), &self));
            }
            value
                .parse()
                .map_err(|_| E::invalid_value(Unexpected::Str(value), &self))
        }
    }
}

impl JobListing {
    pub fn new(
        title: impl Into<String>,
        min_salary: u64,
        max_salary: u64,
        location: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            min_salary,
            max_salary,
            location: location.into(),
        }
    }
}

impl Priced for JobListing {
    fn title(&self) -> &str {
        &self.title
    }

    fn min_salary(&self) -> u64 {
        self.min_salary
    }

    fn max_salary(&self) -> u64 {
        self.max_salary
    }

    fn location(&self) -> &str {
        &self.location
    }
}

/// A posted job. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    /// Account of the company that paid for the posting
    pub company: AccountId,
    #[serde(flatten)]
    pub listing: JobListing,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn new(company: AccountId, listing: JobListing) -> Self {
        Self {
            id: Uuid::new_v4(),
            company,
            listing,
            created_at: Utc::now(),
        }
    }
}

impl Priced for Job {
    fn title(&self) -> &str {
        &self.listing.title
    }

    fn min_salary(&self) -> u64 {
        self.listing.min_salary
    }

    fn max_salary(&self) -> u64 {
        self.listing.max_salary
    }

    fn location(&self) -> &str {
        &self.listing.location
    }
}
