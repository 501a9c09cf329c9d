//! Wire schema for the import-progress backend.
//!
//! The backend is an external collaborator reached over four read-only REST
//! endpoints; this crate pins the one canonical JSON schema the rest of the
//! workspace speaks. Canonical field casing is snake_case. Older backend
//! revisions emitted camelCase, so every field also accepts its camelCase
//! spelling via a serde alias.

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Lifecycle status of a system run or an import attempt.
///
/// The backend may grow new statuses; unrecognized strings deserialize to
/// [`RunStatus::Unknown`] instead of failing the whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Created,
    Queued,
    Running,
    Succeeded,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RunStatus::Created => "created",
            RunStatus::Queued => "queued",
            RunStatus::Running => "running",
            RunStatus::Succeeded => "succeeded",
            RunStatus::Failed => "failed",
            RunStatus::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}

/// Severity of a progress log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
            LogLevel::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}

/// One execution of the import automation system.
///
/// A run may perform multiple import attempts; the run record carries only
/// the attempt IDs. The attempts themselves are fetched from
/// `/import_attempts/{attempt_id}`, the run's own logs from
/// `/system_runs/{run_id}/logs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemRun {
    #[serde(alias = "runId")]
    pub run_id: String,
    #[serde(default, alias = "repoName")]
    pub repo_name: String,
    #[serde(default, alias = "branchName")]
    pub branch_name: String,
    #[serde(default, alias = "prNumber")]
    pub pr_number: i64,
    #[serde(default, alias = "commitSha")]
    pub commit_sha: String,
    #[serde(alias = "timeCreated")]
    pub time_created: DateTime<Utc>,
    #[serde(default, alias = "timeCompleted")]
    pub time_completed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: RunStatus,
    #[serde(default, alias = "importAttempts")]
    pub import_attempts: Vec<String>,
    #[serde(default)]
    pub logs: Vec<String>,
}

/// One try at importing a specific dataset within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportAttempt {
    #[serde(alias = "attemptId")]
    pub attempt_id: String,
    #[serde(default, alias = "absoluteImportName")]
    pub absolute_import_name: String,
    #[serde(default)]
    pub status: RunStatus,
    #[serde(alias = "timeCreated")]
    pub time_created: DateTime<Utc>,
    #[serde(default, alias = "timeCompleted")]
    pub time_completed: Option<DateTime<Utc>>,
    #[serde(default, alias = "provenanceUrl")]
    pub provenance_url: String,
    #[serde(default, alias = "provenanceDescription")]
    pub provenance_description: String,
    #[serde(default)]
    pub logs: Vec<String>,
}

/// A timestamped, leveled message attached to a run or an attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressLog {
    #[serde(alias = "logId")]
    pub log_id: String,
    #[serde(alias = "timeLogged")]
    pub time_logged: DateTime<Utc>,
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn run_decodes_snake_case() {
        let run: SystemRun = serde_json::from_value(serde_json::json!({
            "run_id": "r1",
            "repo_name": "data",
            "branch_name": "main",
            "pr_number": 42,
            "commit_sha": "abc123",
            "time_created": "2020-01-01T10:00:00Z",
            "time_completed": "2020-01-01T10:05:00Z",
            "status": "succeeded",
            "import_attempts": ["a1", "a2"],
            "logs": ["l1"],
        }))
        .expect("decode run");

        assert_eq!(run.run_id, "r1");
        assert_eq!(run.pr_number, 42);
        assert_eq!(run.status, RunStatus::Succeeded);
        assert_eq!(run.import_attempts, vec!["a1", "a2"]);
        assert!(run.time_completed.is_some());
    }

    #[test]
    fn run_decodes_camel_case_aliases() {
        let snake: SystemRun = serde_json::from_value(serde_json::json!({
            "run_id": "r1",
            "repo_name": "data",
            "branch_name": "main",
            "pr_number": 7,
            "commit_sha": "deadbeef",
            "time_created": "2020-01-01T10:00:00Z",
            "status": "running",
            "import_attempts": ["a1"],
        }))
        .expect("decode snake");
        let camel: SystemRun = serde_json::from_value(serde_json::json!({
            "runId": "r1",
            "repoName": "data",
            "branchName": "main",
            "prNumber": 7,
            "commitSha": "deadbeef",
            "timeCreated": "2020-01-01T10:00:00Z",
            "status": "running",
            "importAttempts": ["a1"],
        }))
        .expect("decode camel");

        assert_eq!(snake, camel);
    }

    #[test]
    fn missing_optional_fields_default() {
        let run: SystemRun = serde_json::from_value(serde_json::json!({
            "run_id": "r1",
            "time_created": "2020-01-01T10:00:00Z",
        }))
        .expect("decode minimal run");

        assert_eq!(run.status, RunStatus::Unknown);
        assert!(run.time_completed.is_none());
        assert!(run.import_attempts.is_empty());
        assert!(run.logs.is_empty());
        assert_eq!(run.pr_number, 0);
    }

    #[test]
    fn unknown_status_and_level_do_not_fail() {
        let attempt: ImportAttempt = serde_json::from_value(serde_json::json!({
            "attempt_id": "a1",
            "time_created": "2020-01-01T10:00:00Z",
            "status": "paused_for_review",
        }))
        .expect("decode attempt");
        assert_eq!(attempt.status, RunStatus::Unknown);

        let log: ProgressLog = serde_json::from_value(serde_json::json!({
            "log_id": "l1",
            "time_logged": "2020-01-01T10:00:00Z",
            "level": "trace",
            "message": "m",
        }))
        .expect("decode log");
        assert_eq!(log.level, LogLevel::Unknown);
    }

    #[test]
    fn attempt_decodes_camel_case_aliases() {
        let attempt: ImportAttempt = serde_json::from_value(serde_json::json!({
            "attemptId": "a9",
            "absoluteImportName": "scripts/us_fed:treasury",
            "timeCreated": "2020-01-02T00:00:00Z",
            "provenanceUrl": "https://example.org/data.csv",
            "provenanceDescription": "Treasury constant maturity rates",
            "status": "failed",
        }))
        .expect("decode attempt");

        assert_eq!(attempt.attempt_id, "a9");
        assert_eq!(attempt.absolute_import_name, "scripts/us_fed:treasury");
        assert_eq!(attempt.status, RunStatus::Failed);
        assert_eq!(attempt.provenance_url, "https://example.org/data.csv");
    }
}
