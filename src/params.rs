//! Service wide constants and environment tunable parameters.

use std::sync::OnceLock;
use std::time::Duration;

use log::warn;

/// Page size used when the caller does not ask for one (or asks for a
/// non-positive one).
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Upper bound on the number of summaries returned by a single listing call.
pub const MAX_PAGE_SIZE: u32 = 100;

pub mod env {
    pub const REQUEST_TIMEOUT_MS: &str = "BLOGD_REQUEST_TIMEOUT_MS";
    pub const DB_ACQUIRE_TIMEOUT_MS: &str = "BLOGD_DB_ACQUIRE_TIMEOUT_MS";
    pub const SHUTDOWN_GRACE_MS: &str = "BLOGD_SHUTDOWN_GRACE_MS";
}

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_DB_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct Configurables {
    /// Upper bound for a single request against the storage layer
    pub request_timeout: Duration,
    /// Maximum wait for a pooled connection
    pub db_acquire_timeout: Duration,
    /// Time given to in-flight requests once a termination signal arrives
    pub shutdown_grace: Duration,
}

impl Default for Configurables {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            db_acquire_timeout: DEFAULT_DB_ACQUIRE_TIMEOUT,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }
}

impl Configurables {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            request_timeout: millis_from_env(env::REQUEST_TIMEOUT_MS, defaults.request_timeout),
            db_acquire_timeout: millis_from_env(
                env::DB_ACQUIRE_TIMEOUT_MS,
                defaults.db_acquire_timeout,
            ),
            shutdown_grace: millis_from_env(env::SHUTDOWN_GRACE_MS, defaults.shutdown_grace),
        }
    }
}

static CONFIGURABLES: OnceLock<Configurables> = OnceLock::new();

/// Returns the process wide configurables, read from the environment on first use.
pub fn configurables() -> &'static Configurables {
    CONFIGURABLES.get_or_init(Configurables::from_env)
}

fn millis_from_env(var: &str, default: Duration) -> Duration {
    match std::env::var(var) {
        Ok(value) => parse_millis(&value).unwrap_or_else(|| {
            warn!("ignoring invalid value `{}` for {}", value, var);
            default
        }),
        Err(_) => default,
    }
}

fn parse_millis(value: &str) -> Option<Duration> {
    let ms: u64 = value.trim().parse().ok()?;
    if ms == 0 {
        return None;
    }
    Some(Duration::from_millis(ms))
}
