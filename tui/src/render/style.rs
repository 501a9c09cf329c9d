//! Colors and small formatting helpers shared by the row builders.

use chrono::{DateTime, Utc};
use importdash_protocol::{LogLevel, RunStatus};
use ratatui::style::{Color, Modifier, Style};

pub(crate) fn status_style(status: RunStatus) -> Style {
    match status {
        RunStatus::Succeeded => Style::default().fg(Color::Green),
        RunStatus::Failed => Style::default().fg(Color::Red),
        RunStatus::Running => Style::default().fg(Color::Cyan),
        RunStatus::Queued => Style::default().fg(Color::Yellow),
        RunStatus::Created => Style::default().fg(Color::Blue),
        RunStatus::Unknown => Style::default().fg(Color::DarkGray),
    }
}

pub(crate) fn level_style(level: LogLevel) -> Style {
    match level {
        LogLevel::Critical | LogLevel::Error => Style::default().fg(Color::Red),
        LogLevel::Warning => Style::default().fg(Color::Yellow),
        LogLevel::Info => Style::default(),
        LogLevel::Debug | LogLevel::Unknown => Style::default().fg(Color::DarkGray),
    }
}

pub(crate) fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

pub(crate) fn error_style() -> Style {
    Style::default().fg(Color::Red)
}

pub(crate) fn header_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub(crate) fn fmt_time(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub(crate) fn fmt_opt_time(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(t) => fmt_time(t),
        None => "-".to_string(),
    }
}

pub(crate) fn short_sha(sha: &str) -> &str {
    let end = sha
        .char_indices()
        .nth(7)
        .map(|(idx, _)| idx)
        .unwrap_or(sha.len());
    &sha[..end]
}

/// Unicode-width-aware truncation with ellipsis. Returns `""` when
/// `max_width` is 0.
pub(crate) fn truncate(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthStr;
    if max_width == 0 {
        return String::new();
    }
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for c in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if width + cw + 1 > max_width {
            result.push('\u{2026}');
            break;
        }
        result.push(c);
        width += cw;
    }
    result
}
