//! Run listing.

use importdash_client::ClientResult;
use importdash_client::DashboardClient;
use importdash_client::RunListQuery;
use importdash_client::RunOrder;
use importdash_protocol::SystemRun;

/// Fetch the most recent runs, bounded to `limit`.
///
/// Ordering (creation time descending) is delegated to the backend via the
/// `order` query parameter; the listing is rendered in response order.
pub async fn fetch_recent_runs(
    client: &DashboardClient,
    limit: u32,
) -> ClientResult<Vec<SystemRun>> {
    let runs = client
        .list_system_runs(RunListQuery {
            limit: Some(limit),
            order: Some(RunOrder::Descending),
        })
        .await?;
    tracing::info!(count = runs.len(), "run listing loaded");
    Ok(runs)
}
