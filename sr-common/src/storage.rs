//! Storage deadlines
//!
//! Every repository call runs under a fixed short deadline. Expiry aborts the
//! call with [`Error::Timeout`]; there is no retry.

use crate::{Error, Result};
use std::future::Future;
use std::time::Duration;

/// Default per-operation storage deadline
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Deadline for the health-check ping
pub const PING_TIMEOUT: Duration = Duration::from_millis(100);

/// Run a storage operation under `deadline`
pub async fn with_deadline<T, F>(operation: &str, deadline: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!(operation, ?deadline, "Storage operation timed out");
            Err(Error::Timeout {
                operation: operation.to_string(),
                elapsed: deadline,
            })
        }
    }
}
