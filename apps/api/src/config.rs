use std::str::FromStr;

use anyhow::{Context, Result};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_LLM_MODEL: &str = "gpt-4o";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub llm_model: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 10)?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: env_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL.to_string())?,
            llm_model: env_or("LLM_MODEL", DEFAULT_LLM_MODEL.to_string())?,
            port: env_or("PORT", 8000)?,
            rust_log: env_or("RUST_LOG", "info".to_string())?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads and parses `key`, falling back to `default` when unset.
fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_defaults_and_parses() {
        assert_eq!(env_or("SKILLMATRIX_TEST_UNSET_PORT", 8000u16).unwrap(), 8000);

        std::env::set_var("SKILLMATRIX_TEST_POOL_SIZE", " 25 ");
        assert_eq!(env_or("SKILLMATRIX_TEST_POOL_SIZE", 10u32).unwrap(), 25);

        std::env::set_var("SKILLMATRIX_TEST_BAD_PORT", "eighty");
        assert!(env_or("SKILLMATRIX_TEST_BAD_PORT", 8000u16).is_err());
    }

    #[test]
    fn test_require_env_names_missing_key() {
        let err = require_env("SKILLMATRIX_TEST_MISSING_KEY").unwrap_err();
        assert!(err.to_string().contains("SKILLMATRIX_TEST_MISSING_KEY"));
    }
}
