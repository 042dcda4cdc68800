use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub uploads_dir: String,
    pub body_limit_bytes: usize,
    pub request_timeout: Duration,
    pub apply_rps: u32,
    pub cors_origins: Vec<String>,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "0.0.0.0:8000".to_string(),
            database_url: None,
            database_max_connections: 10,
            uploads_dir: "uploads/resumes".to_string(),
            body_limit_bytes: 16 * 1024 * 1024,
            request_timeout: Duration::from_secs(30),
            apply_rps: 20,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Self::default();

        let log_format = match env::var("LOG_FORMAT").ok().as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(Error::Config(format!(
                    "Invalid value for LOG_FORMAT: {}",
                    other
                )))
            }
        };

        let cors_origins = match get_env_opt("CORS_ORIGINS") {
            Some(raw) => split_list(&raw),
            None => defaults.cors_origins,
        };

        Ok(Self {
            server_address: get_env_opt("SERVER_ADDRESS").unwrap_or(defaults.server_address),
            database_url: get_env_opt("DATABASE_URL"),
            database_max_connections: get_env_parse_or(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            uploads_dir: get_env_opt("UPLOADS_DIR").unwrap_or(defaults.uploads_dir),
            body_limit_bytes: get_env_parse_or("BODY_LIMIT_BYTES", defaults.body_limit_bytes)?,
            request_timeout: Duration::from_secs(get_env_parse_or(
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            apply_rps: get_env_parse_or("APPLY_RPS", defaults.apply_rps)?,
            cors_origins,
            log_format,
        })
    }
}

fn get_env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get_env_opt(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_origin_lists() {
        assert_eq!(
            split_list(" http://a.test , ,http://b.test"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn default_body_limit_admits_resume_cap() {
        let config = Config::default();
        assert!(config.body_limit_bytes > crate::services::intake_service::MAX_RESUME_BYTES);
    }
}
