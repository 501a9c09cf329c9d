//! Line builders for the run table.
//!
//! Nested sections are expressed by indentation: a run line at the left
//! edge, its logs and attempt rows one level in, attempt logs two levels in.

use importdash_core::{AttemptFailure, Disclosure, LoadState};
use importdash_protocol::ProgressLog;
use ratatui::text::{Line, Span};

use crate::app::{AttemptRowState, RunRowState};
use crate::render::style;

const INDENT: &str = "  ";

fn arrow(disclosure: Disclosure) -> &'static str {
    if disclosure.is_expanded() { "▾ " } else { "▸ " }
}

pub(crate) fn run_line(row: &RunRowState) -> Line<'static> {
    let run = &row.run;
    Line::from(vec![
        Span::raw(arrow(row.disclosure)),
        Span::styled(
            format!("{:<10}", run.status.to_string()),
            style::status_style(run.status),
        ),
        Span::raw(format!(
            "{:<21}{:<21}{:<22}{:<18}#{:<7}{}",
            style::fmt_time(run.time_created),
            style::fmt_opt_time(run.time_completed),
            style::truncate(&run.repo_name, 20),
            style::truncate(&run.branch_name, 16),
            run.pr_number,
            style::short_sha(&run.commit_sha),
        )),
    ])
}

pub(crate) fn attempt_line(row: &AttemptRowState) -> Line<'static> {
    let attempt = &row.attempt;
    Line::from(vec![
        Span::raw(INDENT),
        Span::raw(arrow(row.disclosure)),
        Span::styled(
            format!("{:<10}", attempt.status.to_string()),
            style::status_style(attempt.status),
        ),
        Span::raw(format!(
            "{:<34}{:<21}{:<21}",
            style::truncate(&attempt.absolute_import_name, 32),
            style::fmt_time(attempt.time_created),
            style::fmt_opt_time(attempt.time_completed),
        )),
        Span::styled(
            style::truncate(&attempt.provenance_description, 40),
            style::dim(),
        ),
    ])
}

pub(crate) fn failure_line(failure: &AttemptFailure) -> Line<'static> {
    Line::from(vec![
        Span::raw(INDENT.repeat(2)),
        Span::styled(
            format!("{}: {}", failure.attempt_id, failure.error),
            style::error_style(),
        ),
    ])
}

pub(crate) fn section_header(depth: usize, title: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw(INDENT.repeat(depth)),
        Span::styled(title.to_string(), style::header_style()),
    ])
}

/// Render a log section in its current load state at `depth` indent levels.
pub(crate) fn log_section(depth: usize, logs: &LoadState<Vec<ProgressLog>>) -> Vec<Line<'static>> {
    let pad = INDENT.repeat(depth);
    match logs {
        LoadState::Loading => vec![Line::from(vec![
            Span::raw(pad),
            Span::styled("loading\u{2026}".to_string(), style::dim()),
        ])],
        LoadState::Failed(message) => vec![Line::from(vec![
            Span::raw(pad),
            Span::styled(format!("failed to load logs: {message}"), style::error_style()),
        ])],
        LoadState::Ready(logs) if logs.is_empty() => vec![Line::from(vec![
            Span::raw(pad),
            Span::styled("(no logs)".to_string(), style::dim()),
        ])],
        LoadState::Ready(logs) => logs
            .iter()
            .map(|log| {
                Line::from(vec![
                    Span::raw(pad.clone()),
                    Span::raw(format!("{}  ", style::fmt_time(log.time_logged))),
                    Span::styled(
                        format!("{:<9}", log.level.to_string()),
                        style::level_style(log.level),
                    ),
                    Span::raw(log.message.clone()),
                ])
            })
            .collect(),
    }
}
