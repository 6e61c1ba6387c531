use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Candidate pool size for per-user matching.
    pub match_candidate_limit: i64,
    /// Candidate pool size for matching straight after a resume upload.
    pub resume_candidate_limit: i64,
    pub max_resume_bytes: usize,
    pub request_timeout_secs: u64,
    /// Compare skills by whole-token equality instead of substring containment.
    pub strict_skill_match: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            match_candidate_limit: parse_env("MATCH_CANDIDATE_LIMIT", 500)?,
            resume_candidate_limit: parse_env("RESUME_CANDIDATE_LIMIT", 200)?,
            max_resume_bytes: parse_env("MAX_RESUME_BYTES", 10 * 1024 * 1024)?,
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 30)?,
            strict_skill_match: parse_env("STRICT_SKILL_MATCH", false)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            port: 8080,
            rust_log: "info".to_string(),
            match_candidate_limit: 500,
            resume_candidate_limit: 200,
            max_resume_bytes: 10 * 1024 * 1024,
            request_timeout_secs: 30,
            strict_skill_match: false,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
