//! Attempt fan-out assembly.
//!
//! A run record carries attempt IDs only; each attempt is fetched with its
//! own independent request. The fan-out settles as a whole: every ID
//! produces either an attempt or a per-item failure record, and a shared
//! deadline bounds how long a hung request can hold the row open.

use std::time::Duration;

use importdash_async_utils::settle_all_timeout;
use importdash_client::DashboardClient;
use importdash_protocol::ImportAttempt;

/// One attempt ID whose fetch did not produce an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    pub attempt_id: String,
    pub error: String,
}

/// Result of assembling a run's attempt list.
///
/// Successes keep the run's attempt-ID order; attempts are never re-sorted
/// by timestamp (only logs are).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttemptAssembly {
    pub attempts: Vec<ImportAttempt>,
    pub failures: Vec<AttemptFailure>,
}

impl AttemptAssembly {
    /// True when every requested attempt arrived.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fetch every attempt of a run concurrently and settle into an assembly.
///
/// A failed or timed-out item becomes a failure record next to its siblings'
/// successes; it never leaves the whole list empty.
pub async fn assemble_attempts(
    client: &DashboardClient,
    attempt_ids: &[String],
    limit: Duration,
) -> AttemptAssembly {
    let outcomes = settle_all_timeout(
        attempt_ids.iter().map(|id| client.import_attempt(id)),
        limit,
    )
    .await;

    let mut assembly = AttemptAssembly::default();
    for (attempt_id, outcome) in attempt_ids.iter().zip(outcomes) {
        match outcome {
            Ok(attempt) => assembly.attempts.push(attempt),
            Err(e) => {
                tracing::warn!(attempt_id = %attempt_id, error = %e, "attempt fetch failed");
                assembly.failures.push(AttemptFailure {
                    attempt_id: attempt_id.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
    assembly
}
