use crate::errors::AppError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub run_migrations: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub server_port: u16,
    pub rust_log: String,
    pub log_format: LogFormat,
    pub database: DatabaseConfig,
    pub service_timeout: Duration,
    pub enable_api_docs: bool,
}

/// Outcome of loading the optional env file. Reported once logging is up.
#[derive(Debug)]
pub enum EnvFile {
    Loaded(PathBuf),
    /// No `CONFIG_FILE` set and no `.env` found.
    Absent,
    /// `CONFIG_FILE` could not be read; the process environment is used alone.
    Unreadable { path: String, error: String },
}

/// Loads the env file named by `CONFIG_FILE`, or `.env` when unset.
///
/// Never fails: an unreadable file falls back to the process environment.
pub fn load_env_file() -> EnvFile {
    load_env_file_from(env::var("CONFIG_FILE").ok().as_deref())
}

pub fn load_env_file_from(path: Option<&str>) -> EnvFile {
    match path {
        Some(path) => match dotenvy::from_filename(path) {
            Ok(loaded) => EnvFile::Loaded(loaded),
            Err(e) => EnvFile::Unreadable {
                path: path.to_string(),
                error: e.to_string(),
            },
        },
        None => match dotenvy::dotenv() {
            Ok(loaded) => EnvFile::Loaded(loaded),
            Err(_) => EnvFile::Absent,
        },
    }
}

impl Config {
    /// Reads the process environment. Call [`load_env_file`] first to pick up file values.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let server_port = parse_or(&lookup, "SERVER_PORT", 8080u16)?;
        let rust_log = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "LOG_FORMAT '{}' must be 'pretty' or 'json'",
                    other
                )));
            }
        };

        let database = DatabaseConfig {
            url: lookup("DATABASE_URL").unwrap_or_else(|| "sqlite:./tasks.db".to_string()),
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5u32)?,
            run_migrations: parse_or(&lookup, "DATABASE_MIGRATE", true)?,
        };

        let timeout_secs: u64 = parse_or(&lookup, "SERVICE_TIMEOUT_SECS", 5)?;
        if timeout_secs == 0 {
            return Err(AppError::Config(
                "SERVICE_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Config {
            host,
            server_port,
            rust_log,
            log_format,
            database,
            service_timeout: Duration::from_secs(timeout_secs),
            enable_api_docs: parse_or(&lookup, "ENABLE_API_DOCS", false)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::Config(format!("{} '{}' is not a valid value", key, raw))),
        None => Ok(default),
    }
}
