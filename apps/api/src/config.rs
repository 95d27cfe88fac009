use anyhow::{Context, Result};

use crate::judge::vetting::UnjudgedPolicy;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// When false, suggestions are returned unvetted and no quality metrics are recorded.
    pub judge_enabled: bool,
    pub unjudged_policy: UnjudgedPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            judge_enabled: parse_bool(
                "JUDGE_ENABLED",
                &std::env::var("JUDGE_ENABLED").unwrap_or_else(|_| "true".to_string()),
            )?,
            unjudged_policy: std::env::var("UNJUDGED_POLICY")
                .unwrap_or_else(|_| "withhold".to_string())
                .parse::<UnjudgedPolicy>()
                .map_err(anyhow::Error::msg)
                .context("UNJUDGED_POLICY is invalid")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{key} must be a boolean, got '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_accepts_common_spellings() {
        assert!(parse_bool("X", "TRUE").unwrap());
        assert!(parse_bool("X", " on ").unwrap());
        assert!(!parse_bool("X", "0").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }
}
