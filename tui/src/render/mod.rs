//! Drawing the dashboard frame.

mod rows;
mod style;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use importdash_core::LoadState;

use crate::app::App;

/// The body rendered to lines, with the line index of each selectable row.
///
/// `row_lines` is index-aligned with `App::visible_rows()`; that is what
/// keeps selection highlighting and scrolling in step with the app state.
struct RenderedBody {
    lines: Vec<Line<'static>>,
    row_lines: Vec<usize>,
}

pub(crate) fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .split(frame.area());

    let title = Line::from(vec![
        Span::styled("importdash", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" · {}", app.server_url())),
    ]);
    frame.render_widget(Paragraph::new(title), chunks[0]);

    let mut body = render_body(app);
    highlight_selection(app, &mut body);
    let height = chunks[1].height as usize;
    adjust_scroll(app, &body, height);
    frame.render_widget(
        Paragraph::new(body.lines).scroll((app.scroll as u16, 0)),
        chunks[1],
    );

    let hints = Line::from(Span::styled(
        "↑/↓ select   enter expand/collapse   q quit",
        Style::default().add_modifier(Modifier::DIM),
    ));
    frame.render_widget(Paragraph::new(hints), chunks[2]);
}

fn render_body(app: &App) -> RenderedBody {
    let mut body = RenderedBody {
        lines: Vec::new(),
        row_lines: Vec::new(),
    };

    body.lines.push(rows::section_header(
        0,
        "  STATUS    CREATED              COMPLETED            REPO                  BRANCH            PR      COMMIT",
    ));

    match &app.runs {
        LoadState::Loading => {
            body.lines.push(dim_line("loading runs\u{2026}"));
        }
        LoadState::Failed(message) => {
            body.lines
                .push(error_line(&format!("failed to load runs: {message}")));
        }
        LoadState::Ready(run_rows) if run_rows.is_empty() => {
            body.lines.push(dim_line("(no runs)"));
        }
        LoadState::Ready(run_rows) => {
            for run_row in run_rows {
                body.row_lines.push(body.lines.len());
                body.lines.push(rows::run_line(run_row));
                if !run_row.disclosure.is_expanded() {
                    continue;
                }

                body.lines.push(rows::section_header(1, "Run Logs"));
                body.lines.extend(rows::log_section(2, &run_row.logs));

                body.lines.push(rows::section_header(1, "Import Attempts"));
                match &run_row.attempts {
                    LoadState::Loading => body.lines.push(indented_dim(2, "loading\u{2026}")),
                    LoadState::Failed(message) => body
                        .lines
                        .push(error_line(&format!("  failed to load attempts: {message}"))),
                    LoadState::Ready(pane) => {
                        if pane.rows.is_empty() && pane.failures.is_empty() {
                            body.lines.push(indented_dim(2, "(no attempts)"));
                        }
                        for attempt_row in &pane.rows {
                            body.row_lines.push(body.lines.len());
                            body.lines.push(rows::attempt_line(attempt_row));
                            if attempt_row.disclosure.is_expanded() {
                                body.lines.extend(rows::log_section(3, &attempt_row.logs));
                            }
                        }
                        for failure in &pane.failures {
                            body.lines.push(rows::failure_line(failure));
                        }
                    }
                }
            }
        }
    }
    body
}

fn highlight_selection(app: &App, body: &mut RenderedBody) {
    if app.selected_row().is_none() {
        return;
    }
    if let Some(&line_idx) = body.row_lines.get(app.selected)
        && let Some(line) = body.lines.get_mut(line_idx)
    {
        *line = std::mem::take(line).style(Style::default().add_modifier(Modifier::REVERSED));
    }
}

/// Keep the selected row inside the viewport.
fn adjust_scroll(app: &mut App, body: &RenderedBody, height: usize) {
    if height == 0 {
        return;
    }
    let Some(&line_idx) = body.row_lines.get(app.selected) else {
        app.scroll = 0;
        return;
    };
    if line_idx < app.scroll {
        app.scroll = line_idx;
    } else if line_idx >= app.scroll + height {
        app.scroll = line_idx + 1 - height;
    }
}

fn dim_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().add_modifier(Modifier::DIM),
    ))
}

fn indented_dim(depth: usize, text: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  ".repeat(depth)),
        Span::styled(text.to_string(), Style::default().add_modifier(Modifier::DIM)),
    ])
}

fn error_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(ratatui::style::Color::Red),
    ))
}
