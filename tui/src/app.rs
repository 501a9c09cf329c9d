//! Application state and the single event loop.
//!
//! Each run row (and each attempt row under it) owns its state exclusively.
//! Loader tasks are spawned when a row mounts, raced against the row's
//! cancellation token, and report back through `AppEvent`s; nothing else
//! writes view state, so no locks are needed anywhere in the view path.

use std::sync::Arc;

use ratatui::Terminal;
use ratatui::backend::Backend;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;

use crossterm::event::{KeyCode, KeyEvent};
use importdash_async_utils::{CancelErr, OrCancelExt};
use importdash_client::DashboardClient;
use importdash_core::{
    AttemptAssembly, AttemptFailure, DashboardConfig, Disclosure, LoadState, LogSource,
    assemble_attempts, fetch_logs, fetch_recent_runs,
};
use importdash_protocol::{ImportAttempt, ProgressLog, SystemRun};

use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;
use crate::render;

/// An attempt row nested under an expanded run.
#[derive(Debug)]
pub struct AttemptRowState {
    pub attempt: ImportAttempt,
    pub disclosure: Disclosure,
    pub logs: LoadState<Vec<ProgressLog>>,
}

/// The settled attempt section of a run row.
#[derive(Debug)]
pub struct AttemptPane {
    pub rows: Vec<AttemptRowState>,
    pub failures: Vec<AttemptFailure>,
}

/// One run in the table, with its independently fetched logs and attempts.
#[derive(Debug)]
pub struct RunRowState {
    pub run: SystemRun,
    pub disclosure: Disclosure,
    pub logs: LoadState<Vec<ProgressLog>>,
    pub attempts: LoadState<AttemptPane>,
    cancel: CancellationToken,
}

/// Position of a selectable row in the flattened table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRef {
    Run(usize),
    Attempt { run: usize, attempt: usize },
}

pub struct App {
    config: DashboardConfig,
    client: Arc<DashboardClient>,
    events: AppEventSender,
    pub(crate) runs: LoadState<Vec<RunRowState>>,
    pub(crate) selected: usize,
    pub(crate) scroll: usize,
    root_cancel: CancellationToken,
    should_exit: bool,
}

impl App {
    pub(crate) fn new(
        config: DashboardConfig,
        client: Arc<DashboardClient>,
        events: AppEventSender,
    ) -> Self {
        Self {
            config,
            client,
            events,
            runs: LoadState::Loading,
            selected: 0,
            scroll: 0,
            root_cancel: CancellationToken::new(),
            should_exit: false,
        }
    }

    pub(crate) fn server_url(&self) -> &str {
        self.client.base_url()
    }

    pub(crate) fn should_exit(&self) -> bool {
        self.should_exit
    }

    /// Issue the one run-list request. Rows spawn their own loaders when
    /// the listing arrives.
    pub(crate) fn start(&self) {
        let client = self.client.clone();
        let events = self.events.clone();
        let token = self.root_cancel.clone();
        let limit = self.config.run_limit;
        tokio::spawn(async move {
            match fetch_recent_runs(&client, limit).or_cancel(&token).await {
                Ok(result) => {
                    events.send(AppEvent::RunsLoaded(result.map_err(|e| e.to_string())));
                }
                Err(CancelErr::Cancelled) => tracing::debug!("run listing fetch cancelled"),
            }
        });
    }

    pub(crate) fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Resize => {}
            AppEvent::ExitRequest => self.request_exit(),
            AppEvent::RunsLoaded(result) => self.on_runs_loaded(result),
            AppEvent::RunLogsLoaded { run_id, result } => {
                if let Some(row) = self.run_row_mut(&run_id) {
                    row.logs.settle(result);
                }
            }
            AppEvent::AttemptsAssembled { run_id, assembly } => {
                self.on_attempts_assembled(&run_id, assembly);
            }
            AppEvent::AttemptLogsLoaded { attempt_id, result } => {
                if let Some(row) = self.attempt_row_mut(&attempt_id) {
                    row.logs.settle(result);
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.request_exit(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected(),
            _ => {}
        }
    }

    fn request_exit(&mut self) {
        // Cancelling the root token cascades to every row's child token, so
        // no in-flight fetch outlives the view it was feeding.
        self.root_cancel.cancel();
        self.should_exit = true;
    }

    fn on_runs_loaded(&mut self, result: Result<Vec<SystemRun>, String>) {
        if let Some(old_rows) = self.runs.as_ready() {
            for row in old_rows {
                row.cancel.cancel();
            }
        }
        match result {
            Ok(runs) => {
                let rows: Vec<RunRowState> = runs
                    .into_iter()
                    .map(|run| RunRowState {
                        run,
                        disclosure: Disclosure::Collapsed,
                        logs: LoadState::Loading,
                        attempts: LoadState::Loading,
                        cancel: self.root_cancel.child_token(),
                    })
                    .collect();
                for row in &rows {
                    self.spawn_run_loaders(row);
                }
                self.runs = LoadState::Ready(rows);
            }
            Err(message) => self.runs = LoadState::Failed(message),
        }
        self.clamp_selection();
    }

    /// A mounted run row independently requests (a) its logs and (b) its
    /// attempt fan-out. No shared cache, no de-duplication across rows.
    fn spawn_run_loaders(&self, row: &RunRowState) {
        let run_id = row.run.run_id.clone();
        {
            let client = self.client.clone();
            let events = self.events.clone();
            let token = row.cancel.clone();
            let run_id = run_id.clone();
            tokio::spawn(async move {
                let source = LogSource::Run(run_id.clone());
                match fetch_logs(&client, &source).or_cancel(&token).await {
                    Ok(result) => events.send(AppEvent::RunLogsLoaded {
                        run_id,
                        result: result.map_err(|e| e.to_string()),
                    }),
                    Err(CancelErr::Cancelled) => {
                        tracing::debug!(run_id = %run_id, "run log fetch cancelled");
                    }
                }
            });
        }
        {
            let client = self.client.clone();
            let events = self.events.clone();
            let token = row.cancel.clone();
            let ids = row.run.import_attempts.clone();
            let limit = self.config.attempt_timeout();
            tokio::spawn(async move {
                match assemble_attempts(&client, &ids, limit)
                    .or_cancel(&token)
                    .await
                {
                    Ok(assembly) => events.send(AppEvent::AttemptsAssembled { run_id, assembly }),
                    Err(CancelErr::Cancelled) => {
                        tracing::debug!(run_id = %run_id, "attempt fan-out cancelled");
                    }
                }
            });
        }
    }

    fn on_attempts_assembled(&mut self, run_id: &str, assembly: AttemptAssembly) {
        let AttemptAssembly { attempts, failures } = assembly;
        let rows: Vec<AttemptRowState> = attempts
            .into_iter()
            .map(|attempt| AttemptRowState {
                attempt,
                disclosure: Disclosure::Collapsed,
                logs: LoadState::Loading,
            })
            .collect();

        let Some(run_row) = self.run_row_mut(run_id) else {
            return;
        };
        let token = run_row.cancel.clone();
        // Each attempt sub-row mounts now and requests its own logs.
        for attempt_row in &rows {
            let client = self.client.clone();
            let events = self.events.clone();
            let token = token.clone();
            let attempt_id = attempt_row.attempt.attempt_id.clone();
            tokio::spawn(async move {
                let source = LogSource::Attempt(attempt_id.clone());
                match fetch_logs(&client, &source).or_cancel(&token).await {
                    Ok(result) => events.send(AppEvent::AttemptLogsLoaded {
                        attempt_id,
                        result: result.map_err(|e| e.to_string()),
                    }),
                    Err(CancelErr::Cancelled) => {
                        tracing::debug!(attempt_id = %attempt_id, "attempt log fetch cancelled");
                    }
                }
            });
        }

        if let Some(run_row) = self.run_row_mut(run_id) {
            run_row.attempts = LoadState::Ready(AttemptPane { rows, failures });
        }
    }

    fn run_row_mut(&mut self, run_id: &str) -> Option<&mut RunRowState> {
        match &mut self.runs {
            LoadState::Ready(rows) => rows.iter_mut().find(|r| r.run.run_id == run_id),
            _ => None,
        }
    }

    fn attempt_row_mut(&mut self, attempt_id: &str) -> Option<&mut AttemptRowState> {
        let rows = match &mut self.runs {
            LoadState::Ready(rows) => rows,
            _ => return None,
        };
        rows.iter_mut()
            .filter_map(|run| run.attempts.as_ready_mut())
            .flat_map(|pane| pane.rows.iter_mut())
            .find(|row| row.attempt.attempt_id == attempt_id)
    }

    /// The selectable rows in display order: every run, plus the attempt
    /// rows of runs that are expanded with a settled attempt section.
    pub(crate) fn visible_rows(&self) -> Vec<RowRef> {
        let mut rows = Vec::new();
        if let Some(run_rows) = self.runs.as_ready() {
            for (run_idx, run_row) in run_rows.iter().enumerate() {
                rows.push(RowRef::Run(run_idx));
                if !run_row.disclosure.is_expanded() {
                    continue;
                }
                if let Some(pane) = run_row.attempts.as_ready() {
                    for attempt_idx in 0..pane.rows.len() {
                        rows.push(RowRef::Attempt {
                            run: run_idx,
                            attempt: attempt_idx,
                        });
                    }
                }
            }
        }
        rows
    }

    pub(crate) fn selected_row(&self) -> Option<RowRef> {
        self.visible_rows().get(self.selected).copied()
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn select_next(&mut self) {
        let count = self.visible_rows().len();
        if count > 0 && self.selected + 1 < count {
            self.selected += 1;
        }
    }

    /// Toggling is pure view state: it never triggers or waits for a fetch,
    /// and an expanded row with pending data just shows its loading line.
    fn toggle_selected(&mut self) {
        let Some(row_ref) = self.selected_row() else {
            return;
        };
        let Some(rows) = self.runs.as_ready_mut() else {
            return;
        };
        match row_ref {
            RowRef::Run(run_idx) => {
                if let Some(run_row) = rows.get_mut(run_idx) {
                    run_row.disclosure.toggle();
                }
            }
            RowRef::Attempt { run, attempt } => {
                if let Some(attempt_row) = rows
                    .get_mut(run)
                    .and_then(|r| r.attempts.as_ready_mut())
                    .and_then(|pane| pane.rows.get_mut(attempt))
                {
                    attempt_row.disclosure.toggle();
                }
            }
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_rows().len();
        if count == 0 {
            self.selected = 0;
        } else if self.selected >= count {
            self.selected = count - 1;
        }
    }
}

/// Convenience on `LoadState` used only by the app; kept here so the core
/// type stays free of view-specific helpers.
trait AsReadyMut<T> {
    fn as_ready_mut(&mut self) -> Option<&mut T>;
}

impl<T> AsReadyMut<T> for LoadState<T> {
    fn as_ready_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Drive the app: draw, wait for the next event (input before bulk data),
/// fold it into state, repeat until exit.
pub(crate) async fn run<B: Backend>(
    mut app: App,
    mut high_rx: UnboundedReceiver<AppEvent>,
    mut bulk_rx: UnboundedReceiver<AppEvent>,
    terminal: &mut Terminal<B>,
) -> std::io::Result<()> {
    app.start();
    loop {
        terminal.draw(|frame| render::draw(frame, &mut app))?;

        let event = tokio::select! {
            biased;
            ev = high_rx.recv() => ev,
            ev = bulk_rx.recv() => ev,
        };
        let Some(event) = event else {
            break;
        };
        app.handle_event(event);
        // Fold in whatever else is already queued before paying for a redraw.
        while let Ok(event) = high_rx.try_recv() {
            app.handle_event(event);
        }
        while let Ok(event) = bulk_rx.try_recv() {
            app.handle_event(event);
        }

        if app.should_exit() {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;
    use importdash_protocol::RunStatus;
    use tokio::sync::mpsc::unbounded_channel;

    pub(crate) fn test_run(run_id: &str, attempt_ids: &[&str]) -> SystemRun {
        SystemRun {
            run_id: run_id.to_string(),
            repo_name: "data".to_string(),
            branch_name: "main".to_string(),
            pr_number: 1,
            commit_sha: "abcdef0".to_string(),
            time_created: Utc
                .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
                .single()
                .expect("valid timestamp"),
            time_completed: None,
            status: RunStatus::Running,
            import_attempts: attempt_ids.iter().map(|s| s.to_string()).collect(),
            logs: Vec::new(),
        }
    }

    pub(crate) fn test_attempt(attempt_id: &str) -> ImportAttempt {
        ImportAttempt {
            attempt_id: attempt_id.to_string(),
            absolute_import_name: format!("scripts/{attempt_id}"),
            status: RunStatus::Succeeded,
            time_created: Utc
                .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
                .single()
                .expect("valid timestamp"),
            time_completed: None,
            provenance_url: String::new(),
            provenance_description: String::new(),
            logs: Vec::new(),
        }
    }

    pub(crate) fn harness_app() -> App {
        let (high_tx, _high_rx) = unbounded_channel();
        let (bulk_tx, _bulk_rx) = unbounded_channel();
        // Nothing listens on this address; loader tasks spawned by the app
        // settle with an error event that these tests simply never read.
        let client = DashboardClient::new("http://127.0.0.1:9").expect("valid url");
        App::new(
            DashboardConfig::default(),
            Arc::new(client),
            AppEventSender::new_dual(high_tx, bulk_tx),
        )
    }
}
