//! Log retrieval and ordering.
//!
//! Logs arrive unordered on the wire; the display contract is ascending by
//! `time_logged`. The sort is stable so entries sharing a timestamp keep
//! their wire order.

use importdash_client::ClientResult;
use importdash_client::DashboardClient;
use importdash_protocol::ProgressLog;

/// The entity whose logs are being fetched. Selects the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSource {
    /// Logs attached to a system run.
    Run(String),
    /// Logs attached to an import attempt.
    Attempt(String),
}

impl LogSource {
    /// ID of the owning entity.
    pub fn owner_id(&self) -> &str {
        match self {
            LogSource::Run(id) | LogSource::Attempt(id) => id,
        }
    }
}

/// Sort logs in place, ascending by `time_logged`.
pub fn sort_logs(logs: &mut [ProgressLog]) {
    logs.sort_by_key(|log| log.time_logged);
}

/// Fetch the owner's logs and return them in display order.
pub async fn fetch_logs(
    client: &DashboardClient,
    source: &LogSource,
) -> ClientResult<Vec<ProgressLog>> {
    let mut logs = match source {
        LogSource::Run(run_id) => client.system_run_logs(run_id).await?,
        LogSource::Attempt(attempt_id) => client.import_attempt_logs(attempt_id).await?,
    };
    sort_logs(&mut logs);
    tracing::debug!(owner = source.owner_id(), count = logs.len(), "logs loaded");
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;
    use importdash_protocol::LogLevel;
    use pretty_assertions::assert_eq;

    fn log(id: &str, hour: u32, minute: u32) -> ProgressLog {
        ProgressLog {
            log_id: id.to_string(),
            time_logged: Utc
                .with_ymd_and_hms(2020, 1, 1, hour, minute, 0)
                .single()
                .expect("valid timestamp"),
            level: LogLevel::Info,
            message: String::new(),
        }
    }

    #[test]
    fn sorts_ascending_by_time_logged() {
        let mut logs = vec![log("l2", 10, 2), log("l1", 10, 1)];

        sort_logs(&mut logs);

        let ids: Vec<&str> = logs.iter().map(|l| l.log_id.as_str()).collect();
        assert_eq!(ids, vec!["l1", "l2"]);
    }

    #[test]
    fn distinct_timestamps_yield_strictly_ascending_order() {
        let mut logs = vec![log("d", 12, 0), log("b", 9, 30), log("c", 11, 15), log("a", 8, 0)];

        sort_logs(&mut logs);

        assert!(logs.windows(2).all(|w| w[0].time_logged < w[1].time_logged));
    }

    #[test]
    fn equal_timestamps_keep_wire_order() {
        let mut logs = vec![log("first", 10, 0), log("second", 10, 0)];

        sort_logs(&mut logs);

        let ids: Vec<&str> = logs.iter().map(|l| l.log_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn log_source_exposes_owner_id() {
        assert_eq!(LogSource::Run("r1".to_string()).owner_id(), "r1");
        assert_eq!(LogSource::Attempt("a1".to_string()).owner_id(), "a1");
    }
}
