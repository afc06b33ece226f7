//! Periodic deletion of expired session rows.
//!
//! Expiry is otherwise enforced only by query predicates; this task keeps
//! the table itself from accumulating dead rows. Runs on a fixed interval
//! using `tokio::time::interval`.

use std::time::Duration;

use scrivia_db::repositories::SessionRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// How often the cleanup job runs.
const GC_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the session expiry cleanup loop until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = GC_INTERVAL.as_secs(),
        "Session expiry GC started"
    );

    let mut interval = tokio::time::interval(GC_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session expiry GC stopping");
                break;
            }
            _ = interval.tick() => {
                match SessionRepo::delete_expired(&pool).await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Session expiry GC: purged expired rows");
                        } else {
                            tracing::debug!("Session expiry GC: no rows to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Session expiry GC: cleanup failed");
                    }
                }
            }
        }
    }
}
