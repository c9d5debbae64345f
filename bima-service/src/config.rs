use anyhow::{Context, Result};
use bima_core::RetryPolicy;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub elevenlabs_api_key: Option<String>,
    pub database_url: Option<String>,
    pub supabase: Option<SupabaseConfig>,
    pub port: u16,
    pub adapter_timeout: Duration,
    pub store_timeout: Duration,
    pub store_retry_backoff: Duration,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        // A missing .env file is the normal case in production.
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let supabase = match (get("SUPABASE_URL"), get("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => Some(SupabaseConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key,
            }),
            _ => None,
        };

        Ok(Self {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            elevenlabs_api_key: get("ELEVENLABS_API_KEY"),
            database_url: get("DATABASE_URL"),
            supabase,
            port: parse_or(get("PORT"), "PORT", DEFAULT_PORT)?,
            adapter_timeout: Duration::from_secs(parse_or(
                get("ADAPTER_TIMEOUT_SECS"),
                "ADAPTER_TIMEOUT_SECS",
                30,
            )?),
            store_timeout: Duration::from_secs(parse_or(
                get("STORE_TIMEOUT_SECS"),
                "STORE_TIMEOUT_SECS",
                5,
            )?),
            store_retry_backoff: Duration::from_millis(parse_or(
                get("STORE_RETRY_BACKOFF_MS"),
                "STORE_RETRY_BACKOFF_MS",
                250,
            )?),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            timeout: self.store_timeout,
            retries: 1,
            backoff: self.store_retry_backoff,
        }
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .parse()
            .with_context(|| format!("{key} must be a number, got {value:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServiceConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.openai_model, "gpt-4o");
        assert_eq!(cfg.openai_api_key, None);
        assert_eq!(cfg.supabase, None);
        assert_eq!(cfg.adapter_timeout, Duration::from_secs(30));
        assert_eq!(cfg.retry_policy().timeout, Duration::from_secs(5));
        assert_eq!(cfg.retry_policy().backoff, Duration::from_millis(250));
        assert_eq!(cfg.retry_policy().retries, 1);
    }

    #[test]
    fn test_supabase_needs_both_values() {
        let cfg = config(&[("SUPABASE_URL", "https://x.supabase.co/")]).unwrap();
        assert_eq!(cfg.supabase, None);

        let cfg = config(&[
            ("SUPABASE_URL", "https://x.supabase.co/"),
            ("SUPABASE_ANON_KEY", "anon"),
        ])
        .unwrap();
        assert_eq!(
            cfg.supabase,
            Some(SupabaseConfig {
                url: "https://x.supabase.co".to_string(),
                anon_key: "anon".to_string(),
            })
        );
    }

    #[test]
    fn test_blank_values_are_unset() {
        let cfg = config(&[("OPENAI_API_KEY", "  "), ("PORT", "")]).unwrap();
        assert_eq!(cfg.openai_api_key, None);
        assert_eq!(cfg.port, 3000);
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let err = config(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
