use std::str::FromStr;

use anyhow::{Context, Result};

use crate::matching::scorer::MatchSettings;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub matching: MatchSettings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            matching: match_settings_from_env()?,
        })
    }
}

fn match_settings_from_env() -> Result<MatchSettings> {
    let defaults = MatchSettings::default();
    let settings = MatchSettings {
        language_bonus: env_or("MATCH_LANGUAGE_BONUS", defaults.language_bonus)?,
        location_bonus: env_or("MATCH_LOCATION_BONUS", defaults.location_bonus)?,
        min_score: env_or("MATCH_MIN_SCORE", defaults.min_score)?,
        limit: env_or("MATCH_LIMIT", defaults.limit)?,
    };
    validate_match_settings(&settings)?;
    Ok(settings)
}

fn validate_match_settings(settings: &MatchSettings) -> Result<()> {
    anyhow::ensure!(
        settings.min_score <= 100,
        "MATCH_MIN_SCORE must be between 0 and 100"
    );
    anyhow::ensure!(
        (1..=100).contains(&settings.limit),
        "MATCH_LIMIT must be between 1 and 100"
    );
    Ok(())
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
