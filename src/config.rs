//! Runtime settings for the kanban CLI
//!
//! Every setting resolves as: command-line flag, then environment variable
//! (ignored when empty), then built-in default.

use std::path::PathBuf;
use std::time::Duration;

use kanban_core::{User, UserRole};

use crate::error::{CliError, CliResult};

/// Environment variable naming the issue data file
pub const KANBAN_DATA_ENV: &str = "KANBAN_DATA";
/// Environment variable naming the acting role
pub const KANBAN_ROLE_ENV: &str = "KANBAN_ROLE";
/// Environment variable naming the acting user
pub const KANBAN_USER_ENV: &str = "KANBAN_USER";
/// Environment variable with the simulated latency in milliseconds
pub const KANBAN_LATENCY_ENV: &str = "KANBAN_LATENCY_MS";

pub const DEFAULT_USER_NAME: &str = "Alice";
pub const DEFAULT_ROLE: UserRole = UserRole::Admin;

/// Seed issues compiled into the binary
pub const EMBEDDED_ISSUES: &str = include_str!("../data/issues.json");

/// Where the issue set comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Embedded,
    File(PathBuf),
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data: DataSource,
    pub user: User,
    pub latency: Duration,
    pub fail_updates: bool,
}

/// Flag values as parsed from the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data: Option<PathBuf>,
    pub role: Option<String>,
    pub user: Option<String>,
    pub latency_ms: Option<u64>,
    pub fail_updates: bool,
}

impl Settings {
    /// Resolve every setting from `overrides`, the environment and defaults.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidSetting` if a role or latency does not parse.
    pub fn resolve(overrides: Overrides) -> CliResult<Self> {
        let role = resolve_role(overrides.role)?;
        let name = resolve_user_name(overrides.user);
        Ok(Self {
            data: resolve_data_source(overrides.data),
            user: User::new(name, role),
            latency: resolve_latency(overrides.latency_ms)?,
            fail_updates: overrides.fail_updates,
        })
    }
}

/// Value of `name` if it is set and non-empty
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Get the data source from command line, environment variable, or default.
///
/// Priority:
/// 1. Command line --data argument
/// 2. KANBAN_DATA environment variable (if non-empty)
/// 3. Issues embedded in the binary
pub fn resolve_data_source(cli_data: Option<PathBuf>) -> DataSource {
    if let Some(path) = cli_data {
        return DataSource::File(path);
    }

    match env_value(KANBAN_DATA_ENV) {
        Some(path) => DataSource::File(PathBuf::from(path)),
        None => DataSource::Embedded,
    }
}

pub fn resolve_role(cli_role: Option<String>) -> CliResult<UserRole> {
    let Some(raw) = cli_role.or_else(|| env_value(KANBAN_ROLE_ENV)) else {
        return Ok(DEFAULT_ROLE);
    };
    raw.parse::<UserRole>()
        .map_err(|reason| CliError::InvalidSetting {
            name: "role",
            value: raw.clone(),
            reason,
        })
}

pub fn resolve_user_name(cli_user: Option<String>) -> String {
    cli_user
        .or_else(|| env_value(KANBAN_USER_ENV))
        .unwrap_or_else(|| DEFAULT_USER_NAME.to_string())
}

/// Simulated repository latency; zero unless asked for.
pub fn resolve_latency(cli_latency_ms: Option<u64>) -> CliResult<Duration> {
    if let Some(ms) = cli_latency_ms {
        return Ok(Duration::from_millis(ms));
    }

    match env_value(KANBAN_LATENCY_ENV) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| CliError::InvalidSetting {
                name: "latency",
                value: raw.clone(),
                reason: e.to_string(),
            }),
        None => Ok(Duration::ZERO),
    }
}
