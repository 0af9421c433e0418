use anyhow::{Result, bail};
use chrono::Duration;
use clap::Args;

/// Settings for the HTTP server. Every flag can also come from the environment.
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    /// Address to listen on
    #[arg(long, env = "JOBBOARD_BIND", default_value = "127.0.0.1:3000")]
    pub bind: String,

    /// Secret used to sign login tokens
    #[arg(long, env = "JOBBOARD_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Lifetime of login tokens, in seconds
    #[arg(long, env = "JOBBOARD_TOKEN_TTL", default_value_t = 3600)]
    pub token_ttl: i64,
}

impl ServeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.is_empty() {
            bail!("JWT secret must not be empty");
        }
        if self.token_ttl <= 0 {
            bail!("Token TTL must be positive, got {}", self.token_ttl);
        }
        Ok(())
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::seconds(self.token_ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str, ttl: i64) -> ServeConfig {
        ServeConfig {
            bind: "127.0.0.1:0".into(),
            jwt_secret: secret.into(),
            token_ttl: ttl,
        }
    }

    #[test]
    fn test_validate() {
        assert!(config("s3cret", 3600).validate().is_ok());
        assert!(config("", 3600).validate().is_err());
        assert!(config("s3cret", 0).validate().is_err());
    }

    #[test]
    fn test_token_ttl_in_seconds() {
        assert_eq!(config("s", 90).token_ttl(), Duration::seconds(90));
    }
}
