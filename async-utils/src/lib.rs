//! Async combinators for lifecycle-bound fetching.
//!
//! Two concerns live here: racing a future against a `CancellationToken`
//! (`OrCancelExt`), and driving a fan-out of fallible futures to completion
//! without letting one failure or hang discard or stall its siblings
//! (`settle_all` / `settle_all_timeout`).

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tokio_util::sync::CancellationToken;

/// Error returned when a future is cancelled.
#[derive(Debug, PartialEq, Eq)]
pub enum CancelErr {
    Cancelled,
}

/// Extension trait for making futures cancellable.
///
/// A view component that unmounts cancels its token; every fetch it started
/// is raced against that token so no late completion can touch state that
/// has already been discarded.
#[async_trait]
pub trait OrCancelExt: Sized {
    type Output;

    /// Race this future against the cancellation token.
    ///
    /// Returns `Ok(output)` if the future completes first, or
    /// `Err(CancelErr::Cancelled)` if the token is cancelled before the
    /// future completes.
    async fn or_cancel(self, token: &CancellationToken) -> Result<Self::Output, CancelErr>;
}

#[async_trait]
impl<F> OrCancelExt for F
where
    F: Future + Send,
    F::Output: Send,
{
    type Output = F::Output;

    async fn or_cancel(self, token: &CancellationToken) -> Result<Self::Output, CancelErr> {
        tokio::select! {
            _ = token.cancelled() => Err(CancelErr::Cancelled),
            res = self => Ok(res),
        }
    }
}

/// Per-item outcome of a settled fan-out.
#[derive(Debug, PartialEq, Eq)]
pub enum SettleErr<E> {
    /// The item's future resolved with an error.
    Failed(E),
    /// The item was still pending when the deadline fired.
    Elapsed,
}

impl<E: std::fmt::Display> std::fmt::Display for SettleErr<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettleErr::Failed(e) => write!(f, "{e}"),
            SettleErr::Elapsed => write!(f, "timed out"),
        }
    }
}

/// Drive all futures to completion concurrently and report every outcome.
///
/// Outcomes are returned in input order regardless of completion order. One
/// failed item never discards the results of its siblings, and the call
/// always resolves once every item has settled.
pub async fn settle_all<I, F, T, E>(futures: I) -> Vec<Result<T, E>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    join_all(futures).await
}

/// [`settle_all`] with a deadline shared by the whole fan-out.
///
/// Items that have not settled when `limit` expires report
/// `Err(SettleErr::Elapsed)`; the caller is never stalled past the deadline
/// by a single hung request.
pub async fn settle_all_timeout<I, F, T, E>(
    futures: I,
    limit: Duration,
) -> Vec<Result<T, SettleErr<E>>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    join_all(futures.into_iter().map(|fut| async move {
        match tokio::time::timeout(limit, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(SettleErr::Failed(e)),
            Err(_) => Err(SettleErr::Elapsed),
        }
    }))
    .await
}
