//! Dashboard rendering.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header: user, selection, cycle phase (3 lines)          │
//! ├─────────────────────────────────────────────────────────┤
//! │ Patient counts (3 lines)                                │
//! ├─────────────────────────────────────────────────────────┤
//! │ Age / Sex grouped bar chart (fills)                     │
//! ├─────────────────────────────────────────────────────────┤
//! │ Summary statistics table (6 lines)                      │
//! ├─────────────────────────────────────────────────────────┤
//! │ Status line and key help (3 lines)                      │
//! └─────────────────────────────────────────────────────────┘
//! ```

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use cohortscope::cohort::{AgeGroup, Cohort, Sex};
use cohortscope::refresh::{CohortView, DashboardSnapshot, RefreshPhase};

use super::state::DashboardState;
use crate::commands::common::{describe_selection, stat_cell};

/// Render the full dashboard.
pub fn render_ui(
    frame: &mut Frame,
    snapshot: &DashboardSnapshot,
    state: &DashboardState,
    spinner: char,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Counts
            Constraint::Min(10),   // Age / Sex chart
            Constraint::Length(6), // Stats
            Constraint::Length(3), // Status
        ])
        .split(frame.area());

    render_header(frame, chunks[0], snapshot, state, spinner);

    match snapshot.view() {
        Some(view) => {
            render_counts(frame, chunks[1], view);
            render_age_sex(frame, chunks[2], view);
            render_stats(frame, chunks[3], view);
        }
        None => {
            let placeholder = match snapshot.phase {
                RefreshPhase::Loading | RefreshPhase::Idle => "Loading...",
                _ => "No data",
            };
            render_counts_placeholder(frame, chunks[1], placeholder);
            frame.render_widget(
                Paragraph::new(placeholder).block(section_block(" Age / Sex ", Color::Blue)),
                chunks[2],
            );
            frame.render_widget(
                Paragraph::new(placeholder)
                    .block(section_block(" Summary Statistics ", Color::Magenta)),
                chunks[3],
            );
        }
    }

    render_status(frame, chunks[4], snapshot, state);
}

fn section_block(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(title, Style::default().fg(color)))
}

fn render_header(
    frame: &mut Frame,
    area: Rect,
    snapshot: &DashboardSnapshot,
    state: &DashboardState,
    spinner: char,
) {
    let selection = snapshot
        .selection
        .as_ref()
        .map(describe_selection)
        .unwrap_or_else(|| "(none)".to_string());

    let (phase_text, phase_color) = match snapshot.phase {
        RefreshPhase::Idle => ("idle".to_string(), Color::DarkGray),
        RefreshPhase::Loading => (format!("{} loading", spinner), Color::Yellow),
        RefreshPhase::Ready => ("● ready".to_string(), Color::Green),
        RefreshPhase::Failed => ("● failed".to_string(), Color::Red),
    };

    let line = Line::from(vec![
        Span::styled(
            format!("cohortscope v{}", cohortscope::VERSION),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("User: ", Style::default().fg(Color::DarkGray)),
        Span::raw(state.user.as_str()),
        Span::raw("  "),
        Span::styled("Selection: ", Style::default().fg(Color::DarkGray)),
        Span::raw(selection),
        Span::raw("  "),
        Span::styled(phase_text, Style::default().fg(phase_color)),
    ]);

    frame.render_widget(
        Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        ),
        area,
    );
}

fn render_counts(frame: &mut Frame, area: Rect, view: &CohortView) {
    let counts = &view.counts;
    let mut spans = vec![
        Span::styled("Disease: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            counts.case_count.to_string(),
            Style::default().fg(cohort_color(Cohort::Disease)),
        ),
        Span::raw("    "),
        Span::styled("Non-Disease: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            counts.control_count.to_string(),
            Style::default().fg(cohort_color(Cohort::NonDisease)),
        ),
    ];
    if let Some(total) = counts.total_people {
        spans.push(Span::raw("    "));
        spans.push(Span::styled("Total: ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::raw(total.to_string()));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(section_block(" Patient Counts ", Color::Green)),
        area,
    );
}

fn render_counts_placeholder(frame: &mut Frame, area: Rect, text: &str) {
    frame.render_widget(
        Paragraph::new(text).block(section_block(" Patient Counts ", Color::Green)),
        area,
    );
}

fn cohort_color(cohort: Cohort) -> Color {
    match cohort {
        Cohort::Disease => Color::Red,
        Cohort::NonDisease => Color::Blue,
    }
}

fn series_color(cohort: Cohort, sex: Sex) -> Color {
    match (cohort, sex) {
        (Cohort::Disease, Sex::Male) => Color::Red,
        (Cohort::Disease, Sex::Female) => Color::LightRed,
        (Cohort::NonDisease, Sex::Male) => Color::Blue,
        (Cohort::NonDisease, Sex::Female) => Color::LightBlue,
    }
}

fn render_age_sex(frame: &mut Frame, area: Rect, view: &CohortView) {
    let block = section_block(" Age / Sex ", Color::Blue);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let mut legend = Vec::new();
    for series in &view.series {
        legend.push(Span::styled(
            "■ ",
            Style::default().fg(series_color(series.cohort, series.sex)),
        ));
        legend.push(Span::raw(format!("{}   ", series.name())));
    }
    frame.render_widget(Paragraph::new(Line::from(legend)), parts[0]);

    let mut chart = BarChart::default()
        .bar_width(3)
        .bar_gap(0)
        .group_gap(3)
        .max(view.series.iter().map(|s| s.max()).max().unwrap_or(0).max(1));

    for (i, group) in AgeGroup::ALL.iter().enumerate() {
        let bars: Vec<Bar> = view
            .series
            .iter()
            .map(|series| {
                Bar::default()
                    .value(series.counts[i])
                    .style(Style::default().fg(series_color(series.cohort, series.sex)))
            })
            .collect();
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(group.label()))
                .bars(&bars),
        );
    }

    frame.render_widget(chart, parts[1]);
}

fn render_stats(frame: &mut Frame, area: Rect, view: &CohortView) {
    let header = Row::new(vec!["Cohort", "N", "Median", "P25", "P75"])
        .style(Style::default().fg(Color::DarkGray));

    let rows: Vec<Row> = Cohort::ALL
        .iter()
        .map(|&cohort| {
            let stats = view.stats.get(cohort);
            Row::new(vec![
                Cell::from(cohort.as_str()).style(Style::default().fg(cohort_color(cohort))),
                Cell::from(stats.n.to_string()),
                Cell::from(stat_cell(stats.median)),
                Cell::from(stat_cell(stats.p25)),
                Cell::from(stat_cell(stats.p75)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(section_block(" Summary Statistics ", Color::Magenta));

    frame.render_widget(table, area);
}

fn render_status(
    frame: &mut Frame,
    area: Rect,
    snapshot: &DashboardSnapshot,
    state: &DashboardState,
) {
    let mut spans = Vec::new();

    if let Some(message) = snapshot.message {
        let color = if message.is_error() {
            Color::Red
        } else {
            Color::Yellow
        };
        spans.push(Span::styled(message.text(), Style::default().fg(color)));
        spans.push(Span::raw("  "));
    }

    if let Some(notice) = &state.notice {
        let color = if notice.is_error {
            Color::Red
        } else {
            Color::Green
        };
        spans.push(Span::styled(notice.text.as_str(), Style::default().fg(color)));
        spans.push(Span::raw("  "));
    }

    spans.push(Span::styled(
        "[m] measurement  [r] refresh  [p] png  [d] pdf  [q] quit",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        ),
        area,
    );
}
