use std::future::Future;
use std::time::Duration;

use log::warn;

use super::errors::ServerError;
use crate::repo::FacadeError;

/// Time budget granted to a request against the storage layer.
///
/// When the budget runs out the storage future is dropped, which aborts the
/// statement in flight and releases its connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    timeout: Duration,
}

impl Deadline {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Narrows the budget to the caller supplied `grpc-timeout` value, if any.
    /// Budgets are never extended by the caller.
    pub fn narrowed_by(self, grpc_timeout: Option<&str>) -> Self {
        match grpc_timeout.and_then(parse_grpc_timeout) {
            Some(timeout) if timeout < self.timeout => Self { timeout },
            _ => self,
        }
    }

    /// Runs the storage call built by `call`, which receives the budget to
    /// hand down to the storage layer.
    ///
    /// Both an expired budget and a statement aborted by the backend's own
    /// timeout are reported as [`ServerError::DeadlineExceeded`].
    pub async fn run<T, C, F>(self, op: &'static str, call: C) -> Result<T, ServerError>
    where
        C: FnOnce(Duration) -> F,
        F: Future<Output = Result<T, FacadeError>>,
    {
        let exceeded = || {
            warn!("{} aborted after {}ms", op, self.timeout.as_millis());
            ServerError::DeadlineExceeded {
                op,
                timeout: self.timeout,
            }
        };

        match tokio::time::timeout(self.timeout, call(self.timeout)).await {
            Ok(Err(e)) if e.is_timeout() => Err(exceeded()),
            Ok(result) => result.map_err(|e| ServerError::from_facade(op, e)),
            Err(_) => Err(exceeded()),
        }
    }
}

/// Parses a `grpc-timeout` header value: up to eight ASCII digits followed by a
/// unit (`H`, `M`, `S`, `m`, `u`, `n`).
fn parse_grpc_timeout(value: &str) -> Option<Duration> {
    let value = value.trim();
    if value.len() < 2 || value.len() > 9 {
        return None;
    }

    let (digits, unit) = value.split_at(value.len() - 1);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let amount: u64 = digits.parse().ok()?;

    let timeout = match unit {
        "H" => Duration::from_secs(amount * 60 * 60),
        "M" => Duration::from_secs(amount * 60),
        "S" => Duration::from_secs(amount),
        "m" => Duration::from_millis(amount),
        "u" => Duration::from_micros(amount),
        "n" => Duration::from_nanos(amount),
        _ => return None,
    };
    Some(timeout)
}
