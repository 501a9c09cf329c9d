//! Data assembly for the import-progress dashboard.
//!
//! The view layers in `importdash-tui` stay thin: everything about how run,
//! attempt, and log data is fetched, ordered, and settled lives here.
//! Control flow is top-down initiation, bottom-up arrival — the run listing
//! is requested once, each run row independently requests its own logs and
//! attempts, and each attempt row its own logs. There is no shared cache or
//! request de-duplication across rows.

pub mod attempts;
pub mod config;
pub mod logs;
pub mod runs;
pub mod state;

pub use attempts::{assemble_attempts, AttemptAssembly, AttemptFailure};
pub use config::{ConfigError, ConfigLoader, DashboardConfig};
pub use logs::{fetch_logs, sort_logs, LogSource};
pub use runs::fetch_recent_runs;
pub use state::{Disclosure, LoadState};
