//! Per-call deadlines for external collaborators.

use std::future::Future;
use std::time::Duration;

use scout_shared::{Result, ScoutError};

/// Await `call`, failing with [`ScoutError::Timeout`] once `limit` elapses.
pub(crate) async fn bounded<T>(
    service: &str,
    limit: Duration,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ScoutError::timeout(service, limit)),
    }
}
