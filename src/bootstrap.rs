use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use anyhow::Context;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::db;
use crate::error::AppError;
use crate::ServiceKind;

/// Fixed-delay retry bound for startup work that waits on the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_secs(2),
        }
    }
}

/// Run `operation` until it succeeds, fails with an error `is_retryable`
/// rejects, or the attempt budget is spent. The closure gets the 1-based
/// attempt number. The last error is returned on exhaustion.
pub async fn retry_fixed<F, Fut, T, E, R>(
    policy: RetryPolicy,
    is_retryable: R,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    R: Fn(&E) -> bool,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_attempts && is_retryable(&err) => {
                warn!(
                    attempt,
                    max_attempts,
                    error = %err,
                    "Database not ready, retrying in {:?}",
                    policy.delay
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// True for failures that mean "the database is not reachable yet" rather
/// than "the statement is wrong".
pub fn is_transient(err: &AppError) -> bool {
    let AppError::Database(err) = err else {
        return false;
    };
    match err {
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut => true,
        // 08xxx connection exceptions, 57P03 cannot_connect_now (server starting up)
        sqlx::Error::Database(db_err) => db_err
            .code()
            .map(|code| code.starts_with("08") || code == "57P03")
            .unwrap_or(false),
        _ => false,
    }
}

/// Make sure the service's table exists before any request is served.
/// Exhausting the retry budget is fatal.
pub async fn ensure_schema(pool: &PgPool, kind: ServiceKind, policy: RetryPolicy) -> anyhow::Result<()> {
    info!(table = kind.table(), "Ensuring table exists...");

    retry_fixed(policy, is_transient, |_| db::ensure_table(pool, kind))
        .await
        .with_context(|| {
            format!(
                "could not create table `{}` (gave up after at most {} attempts)",
                kind.table(),
                policy.max_attempts.max(1)
            )
        })?;

    info!(table = kind.table(), "Table ready.");
    Ok(())
}
