use anyhow::{anyhow, Context, Result};
use std::env;
use std::time::Duration;

pub const API_KEY_VAR: &str = "API_KEY";
pub const ORG_ID_VAR: &str = "ORG_ID";
pub const API_URL_VAR: &str = "PULSE_API_URL";
pub const OUTPUT_FILE_VAR: &str = "PULSE_OUTPUT_FILE";
pub const REQUEST_DELAY_MS_VAR: &str = "PULSE_REQUEST_DELAY_MS";
pub const RATE_LIMIT_BACKOFF_SECS_VAR: &str = "PULSE_RATE_LIMIT_BACKOFF_SECS";

const DEFAULT_OUTPUT_FILE: &str = "neat_device_enrollment_codes.csv";
const DEFAULT_REQUEST_DELAY_MS: u64 = 1000;
const DEFAULT_RATE_LIMIT_BACKOFF_SECS: u64 = 5;

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub org_id: String,
    pub api_url: String,
    pub output_file: String,
    pub request_delay: Duration,
    pub rate_limit_backoff: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("org_id", &self.org_id)
            .field("api_url", &self.api_url)
            .field("output_file", &self.output_file)
            .field("request_delay", &self.request_delay)
            .field("rate_limit_backoff", &self.rate_limit_backoff)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Reads the config from the process environment, after loading a `.env`
    /// file from the working directory if there is one.
    pub fn from_env() -> Result<Config> {
        // a missing .env is fine, real env vars always win over it
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }

        return Config::from_lookup(|key| env::var(key).ok());
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
                _ => Err(anyhow!(
                    "{} and {} must be set (in the environment or a .env file), {} is missing",
                    API_KEY_VAR,
                    ORG_ID_VAR,
                    key
                )),
            }
        };
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = required(API_KEY_VAR)?;
        let org_id = required(ORG_ID_VAR)?;

        let request_delay_ms = match optional(REQUEST_DELAY_MS_VAR) {
            Some(value) => parse_u64(REQUEST_DELAY_MS_VAR, &value)?,
            None => DEFAULT_REQUEST_DELAY_MS,
        };
        let rate_limit_backoff_secs = match optional(RATE_LIMIT_BACKOFF_SECS_VAR) {
            Some(value) => parse_u64(RATE_LIMIT_BACKOFF_SECS_VAR, &value)?,
            None => DEFAULT_RATE_LIMIT_BACKOFF_SECS,
        };

        Ok(Config {
            api_key,
            org_id,
            api_url: optional(API_URL_VAR).unwrap_or(pulse::DEFAULT_BASE_URL.to_string()),
            output_file: optional(OUTPUT_FILE_VAR).unwrap_or(DEFAULT_OUTPUT_FILE.to_string()),
            request_delay: Duration::from_millis(request_delay_ms),
            rate_limit_backoff: Duration::from_secs(rate_limit_backoff_secs),
        })
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .with_context(|| format!("{} must be a whole number, got {:?}", key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("API_KEY", "key"), ("ORG_ID", "org")])).unwrap();

        assert_eq!(config.api_key, "key");
        assert_eq!(config.org_id, "org");
        assert_eq!(config.api_url, "https://api.pulse.neat.no/v1");
        assert_eq!(config.output_file, "neat_device_enrollment_codes.csv");
        assert_eq!(config.request_delay, Duration::from_secs(1));
        assert_eq!(config.rate_limit_backoff, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("API_KEY", "key"),
            ("ORG_ID", "org"),
            ("PULSE_API_URL", "http://localhost:9000/v1"),
            ("PULSE_OUTPUT_FILE", "codes.csv"),
            ("PULSE_REQUEST_DELAY_MS", "250"),
            ("PULSE_RATE_LIMIT_BACKOFF_SECS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "http://localhost:9000/v1");
        assert_eq!(config.output_file, "codes.csv");
        assert_eq!(config.request_delay, Duration::from_millis(250));
        assert_eq!(config.rate_limit_backoff, Duration::ZERO);
    }

    #[test]
    fn test_missing_or_blank_required_values() {
        let err = Config::from_lookup(lookup(&[("ORG_ID", "org")])).unwrap_err();
        assert!(err.to_string().contains("API_KEY is missing"));

        let err = Config::from_lookup(lookup(&[("API_KEY", "key"), ("ORG_ID", "  ")])).unwrap_err();
        assert!(err.to_string().contains("ORG_ID is missing"));
    }

    #[test]
    fn test_invalid_delay() {
        let err = Config::from_lookup(lookup(&[
            ("API_KEY", "key"),
            ("ORG_ID", "org"),
            ("PULSE_REQUEST_DELAY_MS", "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PULSE_REQUEST_DELAY_MS"));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config =
            Config::from_lookup(lookup(&[("API_KEY", "super-secret"), ("ORG_ID", "org")])).unwrap();
        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
